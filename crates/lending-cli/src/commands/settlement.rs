use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use lending_core::settlement::{classify_state_with, SettlementQuery};
use lending_core::{DealStatus, EngineConfig};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Applying,
    Normal,
    Delay,
    Overdue,
    Nonperform,
    NormalCompletion,
    NonperformCompletion,
    Scheduled,
}

impl From<StatusArg> for DealStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Applying => DealStatus::Applying,
            StatusArg::Normal => DealStatus::Normal,
            StatusArg::Delay => DealStatus::Delay,
            StatusArg::Overdue => DealStatus::Overdue,
            StatusArg::Nonperform => DealStatus::Nonperform,
            StatusArg::NormalCompletion => DealStatus::NormalCompletion,
            StatusArg::NonperformCompletion => DealStatus::NonperformCompletion,
            StatusArg::Scheduled => DealStatus::Scheduled,
        }
    }
}

/// Arguments for settlement classification
#[derive(Args)]
pub struct ClassifyArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Deal status
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Due date of the round (YYYY-MM-DD)
    #[arg(long)]
    pub due_date: Option<NaiveDate>,

    /// Date to classify against (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Deal end date, used for deals closed with loss
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
}

pub fn run_classify(args: ClassifyArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let query: SettlementQuery = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SettlementQuery {
            status: args
                .status
                .ok_or("--status is required (or provide --input)")?
                .into(),
            due_date: args
                .due_date
                .ok_or("--due-date is required (or provide --input)")?,
            today: args.today.ok_or("--today is required (or provide --input)")?,
            end_date: args.end_date,
        }
    };

    let state = classify_state_with(
        &config.settlement,
        query.status,
        query.due_date,
        query.today,
        query.end_date,
    );

    Ok(json!({
        "status": query.status,
        "due_date": query.due_date,
        "today": query.today,
        "end_date": query.end_date,
        "state": state,
    }))
}
