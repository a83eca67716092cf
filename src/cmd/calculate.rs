//! Calculate command - estimate the High Income Child Benefit Charge for a claim

use crate::cmd::validate::print_validation;
use crate::cmd::{format_gbp, load_rates, read_claim};
use crate::tax::{ChargeEstimate, TaxChargeCalculator};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CalculateCommand {
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

impl CalculateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let claim = read_claim(&self.claim)?;
        let rates = load_rates(self.rates.as_deref())?;
        let calculator = TaxChargeCalculator::new(&claim, &rates);

        if !calculator.can_calculate() {
            let validation = calculator.validate();
            log::warn!(
                "Claim has {} problem(s), not calculating",
                validation.error_count()
            );
            print_validation(&validation, self.json)?;
            std::process::exit(1);
        }

        let estimate = calculator.estimate()?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&estimate)?);
        } else {
            print_estimate(&estimate);
        }
        Ok(())
    }
}

fn print_estimate(estimate: &ChargeEstimate) {
    println!();
    println!("HIGH INCOME CHILD BENEFIT CHARGE ({})", estimate.tax_year);
    println!();
    println!(
        "  Child Benefit period:   {} to {}",
        estimate.child_benefit_start_date.format("%-d %B %Y"),
        estimate.child_benefit_end_date.format("%-d %B %Y")
    );
    println!(
        "  Adjusted net income:    {}",
        format_gbp(estimate.adjusted_net_income)
    );
    println!(
        "  Child Benefit received: {}",
        format_gbp(estimate.benefits_claimed_amount)
    );
    println!();

    if estimate.nothing_owed {
        println!("  There is no tax charge to pay.");
    } else {
        println!("  Tax charge:             {}%", estimate.percent_tax_charge);
        println!(
            "  Estimated charge:       {}",
            format_gbp(estimate.tax_estimate)
        );
    }
    println!();
}
