pub mod calculate;
pub mod rates;
pub mod schema;
pub mod validate;
pub mod weeks;

use crate::claim::ClaimInput;
use crate::tax::RateTable;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a claim (JSON) from a file, or stdin with "-"
pub fn read_claim(path: &Path) -> anyhow::Result<ClaimInput> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        read_from_file(path)
    }
}

fn read_from_file(path: &Path) -> anyhow::Result<ClaimInput> {
    let file = File::open(path)?;
    let claim = serde_json::from_reader(BufReader::new(file))?;
    Ok(claim)
}

fn read_from_stdin() -> anyhow::Result<ClaimInput> {
    let mut buffer = Vec::new();
    io::stdin().lock().read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a claim file or pipe data to stdin.");
    }

    let claim = serde_json::from_slice(&buffer)?;
    Ok(claim)
}

/// Rate table from a CSV file, or the published rates when none given
pub fn load_rates(path: Option<&Path>) -> anyhow::Result<RateTable> {
    match path {
        Some(path) => {
            let file = File::open(path)?;
            Ok(RateTable::read_csv(BufReader::new(file))?)
        }
        None => Ok(RateTable::default()),
    }
}

/// Format an amount in pounds, e.g. "£1,066.00"
pub fn format_gbp(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (whole, pence) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}\u{00A3}{}.{}", sign, grouped, pence)
}
