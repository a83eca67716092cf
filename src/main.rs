use clap::{Parser, Subcommand};

mod claim;
mod cmd;
mod tax;

/// Estimate the UK High Income Child Benefit Charge
#[derive(Parser, Debug)]
#[command(name = "hicbc", version, author, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the charge owed for a claim
    Calculate(cmd::calculate::CalculateCommand),
    /// Show the child benefit received week by week
    Weeks(cmd::weeks::WeeksCommand),
    /// List every problem with a claim
    Validate(cmd::validate::ValidateCommand),
    /// Show supported tax years and child benefit rates
    Rates(cmd::rates::RatesCommand),
    /// Print the claim input format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Calculate(calculate) => calculate.exec(),
        Command::Weeks(weeks) => weeks.exec(),
        Command::Validate(validate) => validate.exec(),
        Command::Rates(rates) => rates.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
