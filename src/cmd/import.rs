//! Import command - convert a flat postings CSV into a filing document

use crate::filing::{self, FilingRecord, PostingRecord, SphereKind, SphereRecord};
use chrono::Datelike;
use clap::Args;
use rust_decimal::Decimal;
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ImportCommand {
    /// Postings CSV file
    #[arg(short, long)]
    postings: PathBuf,

    /// Assessment year (defaults to the previous calendar year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Registered club name
    #[arg(short, long)]
    name: String,

    /// Municipal trade-tax multiplier (Hebesatz) in percent
    #[arg(short, long, default_value = "400")]
    multiplier: Decimal,

    /// Claim the § 19 UStG small-business exemption
    #[arg(long)]
    small_business: bool,
}

impl ImportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let file = File::open(&self.postings)?;
        let records = filing::read_postings_csv(file)?;

        let mut document = FilingRecord {
            year: self.year.unwrap_or_else(previous_year),
            ..Default::default()
        };
        document.club.name = self.name.clone();
        document.club.municipal_multiplier = self.multiplier;
        document.club.small_business_exemption = self.small_business;

        for (row, record) in records.into_iter().enumerate() {
            let line = row + 2; // header is line 1
            let kind = SphereKind::from_str(&record.sphere).ok_or_else(|| {
                anyhow::anyhow!("line {}: unknown sphere {:?}", line, record.sphere)
            })?;

            let posting = PostingRecord {
                label: record.label,
                amount: record.amount,
                vat_rate: record.vat_rate,
                treat_as_donation: record.donation.unwrap_or(false),
            };

            let sphere = sphere_mut(&mut document, kind);
            match record.flow.to_lowercase().as_str() {
                "income" => sphere.income.push(posting),
                "expense" => sphere.expenses.push(posting),
                other => anyhow::bail!("line {}: unknown flow {:?}", line, other),
            }
        }

        println!("{}", serde_json::to_string_pretty(&document)?);
        Ok(())
    }
}

fn sphere_mut(document: &mut FilingRecord, kind: SphereKind) -> &mut SphereRecord {
    match kind {
        SphereKind::Core => &mut document.core,
        SphereKind::AssetManagement => &mut document.asset_management,
        SphereKind::PurposeBusiness => &mut document.purpose_business,
        SphereKind::Commercial => &mut document.commercial,
    }
}

fn previous_year() -> i32 {
    chrono::Local::now().year() - 1
}
