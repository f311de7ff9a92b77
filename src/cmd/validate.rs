//! Validate command - surface every input problem without computing taxes

use crate::cmd::read_filing;
use crate::filing::FilingError;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Filing JSON file. Reads from stdin if not specified.
    #[arg(short, long, default_value = "-")]
    filing: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let record = read_filing(&self.filing)?;

        let issues: Vec<ValidationIssue> = record
            .issues()
            .iter()
            .map(|e| ValidationIssue {
                issue_type: issue_type_name(e),
                message: e.to_string(),
            })
            .collect();

        if self.json {
            self.print_json(&issues)?;
        } else {
            self.print_text(&issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, issues: &[ValidationIssue]) {
        println!();
        println!("VALIDATION RESULTS");
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
        } else {
            println!("\u{26A0} {} issue(s) found:", issues.len());
            println!();

            for (i, issue) in issues.iter().enumerate() {
                println!("  {}. [{}] {}", i + 1, issue.issue_type, issue.message);
            }
            println!();
        }
    }

    fn print_json(&self, issues: &[ValidationIssue]) -> anyhow::Result<()> {
        let output = ValidationOutput {
            issue_count: issues.len(),
            issues: issues.to_vec(),
        };

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn issue_type_name(error: &FilingError) -> String {
    match error {
        FilingError::InvalidAmount { .. } => "InvalidAmount".to_string(),
        FilingError::InvalidVatRate { .. } => "InvalidVatRate".to_string(),
        FilingError::InvalidFiling(_) => "InvalidFiling".to_string(),
    }
}
