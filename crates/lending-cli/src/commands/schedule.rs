use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use lending_core::schedule::{build_schedule, ScheduleRequest};
use lending_core::EngineConfig;

use crate::input;

/// Arguments for payback schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (a deal, investor amount and as-of date)
    #[arg(long)]
    pub input: Option<String>,

    /// Classify rounds as of this date instead of the input's
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_schedule(args: ScheduleArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: ScheduleRequest = input::read_input(args.input.as_deref(), "Schedule request")?;
    if let Some(as_of) = args.as_of {
        request.as_of = as_of;
    }

    let result = build_schedule(&request, config)?;
    Ok(serde_json::to_value(result)?)
}
