use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lending_core::portfolio::{analyze_portfolio, investment_history, PortfolioInput};
use lending_core::EngineConfig;

use crate::input;

/// Arguments for portfolio reports
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to JSON input file (investment records with their schedules)
    #[arg(long)]
    pub input: Option<String>,

    /// Aggregate as of this date instead of the input's
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Uninvested deposit balance counted in the overview
    #[arg(long)]
    pub deposit: Option<Decimal>,
}

fn read_portfolio(args: &PortfolioArgs) -> Result<PortfolioInput, Box<dyn std::error::Error>> {
    let mut portfolio: PortfolioInput = input::read_input(args.input.as_deref(), "Portfolio input")?;
    if let Some(today) = args.today {
        portfolio.today = today;
    }
    if args.deposit.is_some() {
        portfolio.deposit_balance = args.deposit;
    }
    Ok(portfolio)
}

pub fn run_portfolio(args: PortfolioArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let portfolio = read_portfolio(&args)?;
    let result = analyze_portfolio(&portfolio, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_history(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let portfolio = read_portfolio(&args)?;
    for record in &portfolio.records {
        record.validate()?;
    }
    Ok(serde_json::to_value(investment_history(&portfolio.records))?)
}
