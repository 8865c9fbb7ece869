use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lending_core::placement::{build_option_previews, validate_placement, PreviewInput};
use lending_core::EngineConfig;

use crate::input;

/// Arguments for investment option previews
#[derive(Args)]
pub struct PreviewArgs {
    /// Path to JSON input file (a deal and as-of date)
    #[arg(long)]
    pub input: Option<String>,

    /// Preview as of this date instead of the input's
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Check that this amount may be placed into the deal first
    #[arg(long)]
    pub amount: Option<Decimal>,
}

pub fn run_preview(args: PreviewArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let mut preview: PreviewInput = input::read_input(args.input.as_deref(), "Preview input")?;
    if let Some(as_of) = args.as_of {
        preview.as_of = as_of;
    }
    if let Some(amount) = args.amount {
        validate_placement(&preview.deal, amount, &config.placement)?;
    }

    let result = build_option_previews(&preview, config)?;
    Ok(serde_json::to_value(result)?)
}
