//! Schema command - print expected input formats

use crate::filing::FilingRecord;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or csv-header
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the filing document
    JsonSchema,
    /// CSV header row for the postings import format
    CsvHeader,
    /// CSV column descriptions for the postings import format
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(FilingRecord);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", CSV_COLUMNS.join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Postings CSV Input Format");
        println!("=========================");
        println!();
        for (name, required, description) in CSV_FIELD_DESCRIPTIONS {
            let req = if *required { "required" } else { "optional" };
            println!("{:12} ({:8})  {}", name, req, description);
        }
        println!();
        println!("Amounts are decimal strings; a single comma is accepted as the decimal separator.");
        Ok(())
    }
}

const CSV_COLUMNS: &[&str] = &["sphere", "flow", "label", "amount", "vat_rate", "donation"];

const CSV_FIELD_DESCRIPTIONS: &[(&str, bool, &str)] = &[
    (
        "sphere",
        true,
        "core, asset_management, purpose_business or commercial",
    ),
    ("flow", true, "income or expense"),
    ("label", true, "Short description of the line item"),
    ("amount", true, "Non-negative decimal amount in EUR"),
    (
        "vat_rate",
        false,
        "VAT rate in percent (only used in VAT-relevant spheres)",
    ),
    (
        "donation",
        false,
        "true to treat this posting as a donation equivalent",
    ),
];
