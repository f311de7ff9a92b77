pub mod assess;
pub mod import;
pub mod schema;
pub mod validate;

use crate::filing::{self, FilingRecord};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a filing document (JSON) from a file, or from stdin with "-"
pub fn read_filing(path: &Path) -> anyhow::Result<FilingRecord> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        filing::read_json(reader)
    }
}

fn read_from_stdin() -> anyhow::Result<FilingRecord> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    filing::read_json(io::Cursor::new(buffer))
}
