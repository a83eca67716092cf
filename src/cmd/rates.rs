//! Rates command - supported tax years and their child benefit rates

use crate::cmd::{format_gbp, load_rates};
use crate::tax::RateTable;
use clap::Args;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct RatesCommand {
    /// CSV file of child benefit rates to show instead of the published rates
    #[arg(short, long)]
    rates: Option<PathBuf>,
}

#[derive(Debug, Tabled)]
struct RateRow {
    #[tabled(rename = "Tax Year")]
    tax_year: String,
    #[tabled(rename = "Child Benefit Period")]
    period: String,
    #[tabled(rename = "First Child")]
    first_child: String,
    #[tabled(rename = "Additional Child")]
    additional_child: String,
}

impl RatesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rates = load_rates(self.rates.as_deref())?;
        let table = Table::new(build_rate_rows(&rates))
            .with(Style::rounded())
            .to_string();
        println!("{}", table);
        Ok(())
    }
}

fn build_rate_rows(rates: &RateTable) -> Vec<RateRow> {
    rates
        .iter()
        .filter_map(|(year, year_rates)| {
            let period = year.child_benefit_window()?;
            Some(RateRow {
                tax_year: year.display(),
                period: period.to_string(),
                first_child: format!("{}/week", format_gbp(year_rates.first_child)),
                additional_child: format!("{}/week", format_gbp(year_rates.additional_child)),
            })
        })
        .collect()
}
