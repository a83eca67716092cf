//! Weeks command - week by week view of the child benefit received

use crate::cmd::validate::print_validation;
use crate::cmd::{format_gbp, load_rates, read_claim};
use crate::tax::{TaxChargeCalculator, WeekAccrual};
use clap::Args;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct WeeksCommand {
    /// JSON file containing the claim (or "-" for stdin)
    #[arg(short, long)]
    claim: PathBuf,

    /// CSV file of child benefit rates to use instead of the published rates
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

impl WeeksCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let claim = read_claim(&self.claim)?;
        let rates = load_rates(self.rates.as_deref())?;
        let calculator = TaxChargeCalculator::new(&claim, &rates);

        let validation = calculator.validate();
        if !validation.is_valid() {
            print_validation(&validation, false)?;
            std::process::exit(1);
        }

        let rows = build_week_rows(&calculator.weekly_breakdown()?);
        if self.csv {
            self.write_csv(&rows)
        } else {
            self.print_table(&rows);
            Ok(())
        }
    }

    fn print_table(&self, rows: &[WeekRow]) {
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    fn write_csv(&self, rows: &[WeekRow]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Row for the weeks table output
#[derive(Debug, Clone, Tabled, serde::Serialize)]
pub struct WeekRow {
    #[tabled(rename = "#")]
    pub week: usize,

    #[tabled(rename = "Week Of")]
    pub anchor: String,

    #[tabled(rename = "Children")]
    pub children: u32,

    #[tabled(rename = "Benefit")]
    pub amount: String,

    #[tabled(rename = "Running Total")]
    pub running_total: String,
}

fn build_week_rows(weeks: &[WeekAccrual]) -> Vec<WeekRow> {
    let mut running_total = rust_decimal::Decimal::ZERO;
    weeks
        .iter()
        .enumerate()
        .map(|(i, week)| {
            running_total += week.amount;
            WeekRow {
                week: i + 1,
                anchor: week.anchor.format("%Y-%m-%d").to_string(),
                children: week.children,
                amount: format_gbp(week.amount),
                running_total: format_gbp(running_total),
            }
        })
        .collect()
}
