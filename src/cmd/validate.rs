//! Validate command - list every problem with a claim without calculating

use crate::cmd::{load_rates, read_claim};
use crate::tax::{ClaimValidation, TaxChargeCalculator};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// JSON file containing the claim (or "-" for stdin)
    #[arg(short, long)]
    claim: PathBuf,

    /// CSV file of child benefit rates to use instead of the published rates
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    child: Option<usize>,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    valid: bool,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let claim = read_claim(&self.claim)?;
        let rates = load_rates(self.rates.as_deref())?;
        let validation = TaxChargeCalculator::new(&claim, &rates).validate();

        print_validation(&validation, self.json)?;

        // Exit with code 1 if issues found
        if !validation.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}

/// Flatten claim and per child errors into one list
pub fn issues(validation: &ClaimValidation) -> Vec<ValidationIssue> {
    let claim_issues = validation.errors.iter().map(|(field, message)| ValidationIssue {
        field: field.to_string(),
        child: None,
        message: message.to_string(),
    });
    let child_issues = validation
        .starting_children
        .iter()
        .enumerate()
        .flat_map(|(n, errors)| {
            errors.iter().map(move |(field, message)| ValidationIssue {
                field: field.to_string(),
                child: Some(n + 1),
                message: message.to_string(),
            })
        });
    claim_issues.chain(child_issues).collect()
}

pub fn print_validation(validation: &ClaimValidation, json: bool) -> anyhow::Result<()> {
    let issues = issues(validation);
    if json {
        let output = ValidationOutput {
            valid: validation.is_valid(),
            issue_count: issues.len(),
            issues,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text(&issues);
    }
    Ok(())
}

fn print_text(issues: &[ValidationIssue]) {
    println!();
    println!("VALIDATION RESULTS");
    println!();

    if issues.is_empty() {
        println!("\u{2713} No issues found.");
        return;
    }

    println!("\u{26A0} {} issue(s) found:", issues.len());
    println!();
    for (i, issue) in issues.iter().enumerate() {
        match issue.child {
            Some(child) => println!("  {}. [child {} {}]", i + 1, child, issue.field),
            None => println!("  {}. [{}]", i + 1, issue.field),
        }
        println!("     {}", issue.message);
        println!();
    }
}
