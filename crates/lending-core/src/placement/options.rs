//! Previews of what each offered investment amount would pay back.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::EngineConfig;
use crate::deal::Deal;
use crate::placement::checks::{funding_progress, FundingProgress};
use crate::schedule::generator::generate_entries;
use crate::schedule::ScheduleEntry;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewInput {
    pub deal: Deal,
    pub as_of: NaiveDate,
    /// Amount already reserved by investors, for the progress figure.
    #[serde(default)]
    pub reserved: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionPreview {
    pub option: Money,
    pub entries: Vec<ScheduleEntry>,
    pub interest: Money,
    pub tax: Money,
    pub commission: Money,
    /// Option amount plus interest net of withholding.
    pub reality_price: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewOutput {
    pub deal_id: u64,
    pub previews: Vec<OptionPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding: Option<FundingProgress>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// One preview per configured option. Options larger than the deal
/// itself are skipped.
pub fn preview_options(
    deal: &Deal,
    as_of: NaiveDate,
    config: &EngineConfig,
) -> LendingResult<Vec<OptionPreview>> {
    let mut warnings = Vec::new();
    preview_with_warnings(deal, as_of, config, &mut warnings)
}

pub fn build_option_previews(
    input: &PreviewInput,
    config: &EngineConfig,
) -> LendingResult<ComputationOutput<PreviewOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.validate()?;
    let previews = preview_with_warnings(&input.deal, input.as_of, config, &mut warnings)?;

    let output = PreviewOutput {
        deal_id: input.deal.id,
        previews,
        funding: input.reserved.map(|r| funding_progress(&input.deal, r)),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Investment option previews on the deal's payback calendar",
        &serde_json::json!({
            "deal_id": input.deal.id,
            "options": config.placement.options.iter().map(|o| o.to_string()).collect::<Vec<_>>(),
            "anchor_date": input.deal.anchor_date(),
            "as_of": input.as_of,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn preview_with_warnings(
    deal: &Deal,
    as_of: NaiveDate,
    config: &EngineConfig,
    warnings: &mut Vec<String>,
) -> LendingResult<Vec<OptionPreview>> {
    let mut previews = Vec::with_capacity(config.placement.options.len());

    for &option in &config.placement.options {
        if option > deal.principal {
            warnings.push(format!(
                "Option {option} exceeds deal principal {}; skipped",
                deal.principal
            ));
            continue;
        }
        let (entries, _) =
            generate_entries(deal, option, deal.anchor_date(), as_of, config, warnings)?;
        previews.push(summarize_option(option, entries));
    }

    Ok(previews)
}

fn summarize_option(option: Money, entries: Vec<ScheduleEntry>) -> OptionPreview {
    let mut interest = Decimal::ZERO;
    let mut tax = Decimal::ZERO;
    let mut commission = Decimal::ZERO;
    for e in &entries {
        interest += e.interest;
        tax += e.tax;
        commission += e.commission;
    }
    OptionPreview {
        option,
        entries,
        interest,
        tax,
        commission,
        reality_price: option + interest - tax - commission,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{DealCategory, DealStatus, Grade, RepaymentMethod};
    use crate::settlement::SettlementState;
    use rust_decimal_macros::dec;

    fn balloon_deal(principal: Money) -> Deal {
        Deal {
            id: 12,
            name: "deal_12".into(),
            category: DealCategory::Corporate,
            grade: Grade::BPlus,
            principal,
            periodic_rate: dec!(0.01),
            earning_rate: dec!(12),
            term: 6,
            repayment_method: RepaymentMethod::Balloon,
            payment_day: 15,
            start_date: NaiveDate::from_ymd_opt(2021, 7, 20).unwrap(),
            end_date: None,
            status: DealStatus::Applying,
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 7, 28).unwrap()
    }

    #[test]
    fn test_balloon_option_totals() {
        let previews = preview_options(&balloon_deal(dec!(3_000_000)), as_of(), &EngineConfig::default())
            .unwrap();
        assert_eq!(previews.len(), 4);

        let five = &previews[0];
        assert_eq!(five.option, dec!(5000));
        assert_eq!(five.interest, dec!(300));
        assert_eq!(five.tax, dec!(0));
        assert_eq!(five.commission, dec!(42));
        assert_eq!(five.reality_price, dec!(5258));

        let ten = &previews[1];
        assert_eq!(ten.interest, dec!(600));
        assert_eq!(ten.tax, dec!(60));
        assert_eq!(ten.commission, dec!(90));
        assert_eq!(ten.reality_price, dec!(10_450));
    }

    #[test]
    fn test_preview_entries_are_upcoming() {
        let previews = preview_options(&balloon_deal(dec!(3_000_000)), as_of(), &EngineConfig::default())
            .unwrap();
        let first = &previews[0].entries[0];
        // Anchor 2021-08-19, September skipped.
        assert_eq!(first.due_date, NaiveDate::from_ymd_opt(2021, 10, 15).unwrap());
        assert!(previews[0]
            .entries
            .iter()
            .all(|e| e.state == SettlementState::ToBePaid));
    }

    #[test]
    fn test_oversized_options_are_skipped_with_warning() {
        let input = PreviewInput {
            deal: balloon_deal(dec!(20_000)),
            as_of: as_of(),
            reserved: Some(dec!(5_000)),
        };
        let out = build_option_previews(&input, &EngineConfig::default()).unwrap();
        assert_eq!(out.result.previews.len(), 2);
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(out.result.funding.unwrap().percentage, dec!(25));
    }
}
