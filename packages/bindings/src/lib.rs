use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use lending_core::amortization::{compute_amortization, AmortizationInput};
use lending_core::placement::{build_option_previews, PreviewInput};
use lending_core::portfolio::{analyze_portfolio, investment_history, PortfolioInput};
use lending_core::schedule::{build_schedule, ScheduleRequest};
use lending_core::settlement::SettlementQuery;
use lending_core::EngineConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Optional engine configuration passed alongside the input as JSON.
fn parse_config(config_json: Option<String>) -> NapiResult<EngineConfig> {
    let config: EngineConfig = match config_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => EngineConfig::default(),
    };
    config.validate().map_err(to_napi_error)?;
    Ok(config)
}

fn parse<T: for<'de> Deserialize<'de>>(input_json: &str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization and schedules
// ---------------------------------------------------------------------------

#[napi(js_name = "computeAmortization")]
pub fn compute_amortization_json(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = parse(&input_json)?;
    let output = compute_amortization(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn generate_schedule(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let request: ScheduleRequest = parse(&input_json)?;
    let config = parse_config(config_json)?;
    let output = build_schedule(&request, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn classify_settlement(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let query: SettlementQuery = parse(&input_json)?;
    let config = parse_config(config_json)?;
    let state = query.classify(&config.settlement);
    serde_json::to_string(&state).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[napi(js_name = "analyzePortfolio")]
pub fn analyze_portfolio_json(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: PortfolioInput = parse(&input_json)?;
    let config = parse_config(config_json)?;
    let output = analyze_portfolio(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi(js_name = "investmentHistory")]
pub fn investment_history_json(input_json: String) -> NapiResult<String> {
    let input: PortfolioInput = parse(&input_json)?;
    for record in &input.records {
        record.validate().map_err(to_napi_error)?;
    }
    serde_json::to_string(&investment_history(&input.records)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

#[napi]
pub fn preview_options(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: PreviewInput = parse(&input_json)?;
    let config = parse_config(config_json)?;
    let output = build_option_previews(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
