//! Assess command - full tax assessment for one filing year

use crate::cmd::read_filing;
use crate::filing::{Filing, SphereKind};
use crate::tax::{assess, Assessment, SphereResults};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct AssessCommand {
    /// Filing JSON file. Reads from stdin if not specified.
    #[arg(short, long, default_value = "-")]
    filing: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl AssessCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let record = read_filing(&self.filing)?;
        let filing = record.into_filing()?;
        let assessment = assess(&filing);

        if self.json {
            self.print_json(&filing, &assessment)
        } else {
            self.print_text(&filing, &assessment);
            Ok(())
        }
    }

    fn print_text(&self, filing: &Filing, assessment: &Assessment) {
        println!();
        println!("TAX ASSESSMENT {} - {}", assessment.year, filing.club.name);
        let address = &filing.club.address;
        if !address.street.is_empty() || !address.city.is_empty() {
            println!(
                "{}, {} {}",
                address.street, address.postal_code, address.city
            );
        }
        println!();

        let rows = sphere_rows(&assessment.initial_results, &assessment.final_results);
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();

        println!(
            "Taxable commercial income:  {:>12}",
            format_eur(assessment.taxable_commercial_income)
        );
        println!();
        println!(
            "Corporate tax:              {:>12}",
            format_eur(assessment.corporate_tax)
        );
        println!(
            "Solidarity surcharge:       {:>12}",
            format_eur(assessment.solidarity_surcharge)
        );
        println!(
            "Trade tax:                  {:>12}",
            format_eur(assessment.trade_tax)
        );
        println!(
            "VAT net payable:            {:>12}   (output {}, input {})",
            format_eur(assessment.vat.net_payable),
            format_eur(assessment.vat.output_vat),
            format_eur(assessment.vat.input_vat)
        );
        println!();
        println!(
            "TOTAL LIABILITY:            {:>12}",
            format_eur(assessment.total_liability)
        );

        let donations = donation_rows(filing);
        if !donations.is_empty() {
            println!();
            println!(
                "Donation-equivalent postings carried for the annex: {}",
                donations.len()
            );
            for donation in &donations {
                println!("  {} ({}): {}", donation.label, donation.sphere, donation.amount);
            }
        }
    }

    fn print_json(&self, filing: &Filing, assessment: &Assessment) -> anyhow::Result<()> {
        let output = AssessmentData::new(filing, assessment);
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn sphere_rows(initial: &SphereResults, after: &SphereResults) -> Vec<SphereRow> {
    let entries = [
        (SphereKind::Core, initial.core, after.core),
        (
            SphereKind::AssetManagement,
            initial.asset_management,
            after.asset_management,
        ),
        (
            SphereKind::PurposeBusiness,
            initial.purpose_business,
            after.purpose_business,
        ),
        (SphereKind::Commercial, initial.commercial, after.commercial),
    ];

    entries
        .iter()
        .map(|(kind, before, after)| SphereRow {
            sphere: kind.display().to_string(),
            initial: format_eur(*before),
            final_result: format_eur(*after),
        })
        .collect()
}

/// Postings flagged as donation equivalents, for the donation annex of the
/// rendered report. Carried through, never part of the tax arithmetic.
fn donation_rows(filing: &Filing) -> Vec<DonationData> {
    filing
        .spheres()
        .into_iter()
        .flat_map(|(kind, sphere)| {
            sphere
                .income
                .iter()
                .chain(sphere.expenses.iter())
                .filter(|p| p.treat_as_donation)
                .map(move |p| DonationData {
                    sphere: kind.display().to_string(),
                    label: p.label.clone(),
                    amount: format_eur(p.amount),
                })
        })
        .collect()
}

fn format_eur(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// Row for the sphere results table
#[derive(Debug, Clone, Tabled)]
struct SphereRow {
    #[tabled(rename = "Sphere")]
    sphere: String,
    #[tabled(rename = "Initial (EUR)")]
    initial: String,
    #[tabled(rename = "Final (EUR)")]
    final_result: String,
}

/// Assessment data for JSON output; this is the document a downstream
/// report renderer consumes, so every value here is final.
#[derive(Debug, Serialize)]
struct AssessmentData {
    year: i32,
    club: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tax_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tax_office: Option<String>,
    sphere_results: Vec<SphereResultData>,
    taxable_commercial_income: String,
    corporate_tax: String,
    solidarity_surcharge: String,
    trade_tax: String,
    vat: VatData,
    total_liability: String,
    donations: Vec<DonationData>,
}

#[derive(Debug, Serialize)]
struct SphereResultData {
    sphere: String,
    initial: String,
    #[serde(rename = "final")]
    final_result: String,
}

#[derive(Debug, Clone, Serialize)]
struct DonationData {
    sphere: String,
    label: String,
    amount: String,
}

#[derive(Debug, Serialize)]
struct VatData {
    output_vat: String,
    input_vat: String,
    net_payable: String,
}

impl AssessmentData {
    fn new(filing: &Filing, assessment: &Assessment) -> Self {
        let sphere_results = sphere_rows(&assessment.initial_results, &assessment.final_results)
            .into_iter()
            .map(|row| SphereResultData {
                sphere: row.sphere,
                initial: row.initial,
                final_result: row.final_result,
            })
            .collect();

        AssessmentData {
            year: assessment.year.0,
            club: filing.club.name.clone(),
            tax_number: filing.club.tax_number.clone(),
            tax_office: filing.club.tax_office.clone(),
            sphere_results,
            taxable_commercial_income: format_eur(assessment.taxable_commercial_income),
            corporate_tax: format_eur(assessment.corporate_tax),
            solidarity_surcharge: format_eur(assessment.solidarity_surcharge),
            trade_tax: format_eur(assessment.trade_tax),
            vat: VatData {
                output_vat: format_eur(assessment.vat.output_vat),
                input_vat: format_eur(assessment.vat.input_vat),
                net_payable: format_eur(assessment.vat.net_payable),
            },
            total_liability: format_eur(assessment.total_liability),
            donations: donation_rows(filing),
        }
    }
}
