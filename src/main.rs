use clap::{Parser, Subcommand};

mod cmd;
mod filing;
mod tax;

use crate::cmd::assess::AssessCommand;
use crate::cmd::import::ImportCommand;
use crate::cmd::schema::SchemaCommand;
use crate::cmd::validate::ValidateCommand;

#[derive(Parser, Debug)]
#[command(
    name = "vtax",
    version,
    about = "Calculate German non-profit club taxes (Vereinsbesteuerung)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the full tax assessment for a filing
    Assess(AssessCommand),
    /// Check a filing for input problems
    Validate(ValidateCommand),
    /// Convert a flat postings CSV into a filing document
    Import(ImportCommand),
    /// Print the expected input formats
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Assess(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Import(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
