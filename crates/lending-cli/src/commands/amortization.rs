use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use lending_core::amortization::{compute_amortization, AmortizationInput};
use lending_core::time_value::{periodic_rate_from_annual, PERIODS_PER_YEAR};
use lending_core::RepaymentMethod;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Mixed,
    EqualInstallment,
    Balloon,
    EqualPrincipal,
}

impl From<MethodArg> for RepaymentMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Mixed => RepaymentMethod::Mixed,
            MethodArg::EqualInstallment => RepaymentMethod::EqualInstallment,
            MethodArg::Balloon => RepaymentMethod::Balloon,
            MethodArg::EqualPrincipal => RepaymentMethod::EqualPrincipal,
        }
    }
}

/// Arguments for a loan amortization
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal in whole currency units
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Interest rate per period (monthly), e.g. 0.005
    #[arg(long, conflicts_with = "annual_rate")]
    pub rate: Option<Decimal>,

    /// Annual nominal rate, e.g. 0.06; converted to a monthly rate
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Number of periods
    #[arg(long)]
    pub term: Option<u32>,

    /// Repayment method
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Persisted repayment method code (1-4), instead of --method
    #[arg(long, conflicts_with = "method")]
    pub method_code: Option<u8>,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amortization_input: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let periodic_rate = match (args.rate, args.annual_rate) {
            (Some(rate), _) => rate,
            (None, Some(annual)) => periodic_rate_from_annual(annual, PERIODS_PER_YEAR)?,
            (None, None) => return Err("--rate or --annual-rate is required (or provide --input)".into()),
        };
        let method: RepaymentMethod = match (args.method, args.method_code) {
            (Some(m), _) => m.into(),
            (None, Some(code)) => RepaymentMethod::try_from(code)?,
            (None, None) => return Err("--method is required (or provide --input)".into()),
        };
        AmortizationInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            periodic_rate,
            term: args.term.ok_or("--term is required (or provide --input)")?,
            method,
        }
    };

    let result = compute_amortization(&amortization_input)?;
    Ok(serde_json::to_value(result)?)
}
