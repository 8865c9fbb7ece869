use chrono::{Duration, NaiveDate};
use lending_core::config::{DayOverflow, EngineConfig, SchedulePolicy};
use lending_core::portfolio::{
    aggregate, analyze_portfolio, investment_capacity, investment_history, investment_overview,
    realized_earning_rate, CategoryGroup, GradeGroup, InvestmentRecord, PortfolioInput,
    RateBand,
};
use lending_core::schedule::generate_schedule;
use lending_core::{Deal, DealCategory, DealStatus, Grade, RepaymentMethod, SettlementState};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixture: ten deals, one investment each, funded in full
// ===========================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 7, 28).unwrap()
}

fn funded_config() -> EngineConfig {
    EngineConfig {
        schedule: SchedulePolicy {
            first_payment_lag_months: 1,
            day_overflow: DayOverflow::Rollover,
        },
        ..EngineConfig::default()
    }
}

/// Stored origination earning rates, percent.
const EARNING_RATES: [Decimal; 10] = [
    dec!(3.74),
    dec!(7.00),
    dec!(0.04),
    dec!(8.01),
    dec!(6.82),
    dec!(11.00),
    dec!(0.07),
    dec!(12.61),
    dec!(10.39),
    dec!(15.00),
];

fn fixture_deal(i: u64) -> Deal {
    let status_code = if i % 2 == 0 {
        6
    } else if i % 3 == 0 {
        2
    } else {
        ((i + 1) / 2) % 8 + 1
    };
    let status = DealStatus::try_from(status_code as u8).unwrap();
    let days_back = match status {
        DealStatus::NormalCompletion | DealStatus::NonperformCompletion => 600,
        _ => (10 * i as i64) % 300 + 60,
    };
    let start_date = today() - Duration::days(days_back);

    Deal {
        id: i,
        name: format!("deal_{i}"),
        category: DealCategory::try_from((i % 5 + 1) as u8).unwrap(),
        grade: Grade::try_from((i % 12 + 1) as u8).unwrap(),
        principal: Decimal::from((i % 50 + 1) * 120_000),
        periodic_rate: Decimal::from(i % 12 + 5) / dec!(100) / dec!(12),
        earning_rate: EARNING_RATES[(i - 1) as usize],
        term: 12,
        repayment_method: RepaymentMethod::try_from((i % 4 + 1) as u8).unwrap(),
        payment_day: (i % 25 + 1) as u32,
        start_date,
        end_date: Some(start_date + Duration::days(30)),
        status,
    }
}

fn fixture_records() -> Vec<InvestmentRecord> {
    let config = funded_config();
    (1..=10)
        .map(|i| {
            let deal = fixture_deal(i);
            let entries = generate_schedule(&deal, deal.principal, today(), &config).unwrap();
            InvestmentRecord {
                investment_id: i,
                amount: deal.principal,
                deal,
                entries,
            }
        })
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[test]
fn test_fixture_shape() {
    let records = fixture_records();
    let statuses: Vec<DealStatus> = records.iter().map(|r| r.deal.status).collect();
    assert_eq!(
        statuses,
        vec![
            DealStatus::Normal,
            DealStatus::NormalCompletion,
            DealStatus::Normal,
            DealStatus::NormalCompletion,
            DealStatus::Overdue,
            DealStatus::NormalCompletion,
            DealStatus::Nonperform,
            DealStatus::NormalCompletion,
            DealStatus::Normal,
            DealStatus::NormalCompletion,
        ]
    );
    let states: Vec<String> = records
        .iter()
        .map(|r| {
            r.entries
                .iter()
                .map(|e| match e.state {
                    SettlementState::Paid => 'P',
                    SettlementState::Unpaid => 'U',
                    SettlementState::ToBePaid => 'T',
                })
                .collect()
        })
        .collect();
    assert_eq!(states[0], "PTTTTTTTTTTT");
    assert_eq!(states[4], "UUTTTTTTTTTT");
    assert_eq!(states[6], "UUUTTTTTTTTT");
    assert_eq!(states[8], "PPPPTTTTTTTT");
    assert_eq!(states[9], "PPPPPPPPPPPP");
}

#[test]
fn test_investor_summary() {
    let report = aggregate(&fixture_records(), today());
    let s = &report.investor_summary;

    assert_eq!(s.investment_count, 10);
    assert_eq!(s.total_invested, dec!(7_800_000));
    assert_eq!(s.total_collected, dec!(5_428_740));
    assert_eq!(s.interest_collected, dec!(560_337));
    assert_eq!(s.paid_principal, dec!(4_681_044));
    assert_eq!(s.paid_interest, dec!(522_414));

    assert_eq!(s.status_counts[&DealStatus::Normal], 3);
    assert_eq!(s.status_counts[&DealStatus::Overdue], 1);
    assert_eq!(s.status_counts[&DealStatus::Nonperform], 1);
    assert_eq!(s.status_counts[&DealStatus::NormalCompletion], 5);
    assert_eq!(s.status_counts[&DealStatus::Delay], 0);
    assert_eq!(s.status_counts.values().sum::<usize>(), 10);
}

#[test]
fn test_portfolio_breakdown() {
    let b = aggregate(&fixture_records(), today()).portfolio_breakdown;

    let grades: Vec<(GradeGroup, Decimal, usize)> =
        b.by_grade.iter().map(|x| (x.key, x.amount, x.count)).collect();
    assert_eq!(
        grades,
        vec![
            (GradeGroup::ATier, dec!(600_000), 2),
            (GradeGroup::BTier, dec!(1_800_000), 3),
            (GradeGroup::CTier, dec!(2_880_000), 3),
            (GradeGroup::DTier, dec!(2_520_000), 2),
            (GradeGroup::Other, dec!(0), 0),
        ]
    );

    let bands: Vec<(RateBand, Decimal, usize)> =
        b.by_rate_band.iter().map(|x| (x.key, x.amount, x.count)).collect();
    assert_eq!(
        bands,
        vec![
            (RateBand::Below8, dec!(2_760_000), 5),
            (RateBand::From8To10, dec!(600_000), 1),
            (RateBand::From10To12, dec!(2_040_000), 2),
            (RateBand::From12, dec!(2_400_000), 2),
        ]
    );

    let categories: Vec<(CategoryGroup, Decimal, usize)> =
        b.by_category.iter().map(|x| (x.key, x.amount, x.count)).collect();
    assert_eq!(
        categories,
        vec![
            (CategoryGroup::PersonalCredit, dec!(1_080_000), 2),
            (CategoryGroup::Corporate, dec!(1_560_000), 2),
            (CategoryGroup::Special, dec!(1_320_000), 2),
            (CategoryGroup::RealEstate, dec!(2_040_000), 2),
            (CategoryGroup::Other, dec!(1_800_000), 2),
        ]
    );
}

#[test]
fn test_every_axis_covers_the_whole_portfolio() {
    let b = aggregate(&fixture_records(), today()).portfolio_breakdown;
    let total = dec!(7_800_000);
    assert_eq!(b.by_grade.iter().map(|x| x.amount).sum::<Decimal>(), total);
    assert_eq!(b.by_rate_band.iter().map(|x| x.amount).sum::<Decimal>(), total);
    assert_eq!(b.by_category.iter().map(|x| x.amount).sum::<Decimal>(), total);
}

#[test]
fn test_delinquency_rollup() {
    let d = aggregate(&fixture_records(), today()).delinquency_rollup;

    assert_eq!(d.complete, dec!(4_681_044));
    assert_eq!(d.normal, dec!(1_438_956));
    assert_eq!(d.delay, dec!(0));
    assert_eq!(d.overdue, dec!(720_000));
    assert_eq!(d.nonperform, dec!(960_000));
    assert_eq!(d.loss, dec!(0));
    assert_eq!(d.outstanding, dec!(3_118_956));
    assert_eq!(d.complete + d.outstanding, dec!(7_800_000));

    // 560,337 collected (paid and unpaid) over 5,060,000 principal-years
    let expected = dec!(560_337) / dec!(5_060_000) * dec!(100);
    assert!(
        (d.realized_earning_rate - expected).abs() < dec!(0.000001),
        "got {}",
        d.realized_earning_rate
    );
    assert_eq!(d.realized_earning_rate.round_dp(2), dec!(11.07));
}

#[test]
fn test_investment_history_rows() {
    let history = investment_history(&fixture_records());

    let ids: Vec<u64> = history.iter().map(|h| h.investment_id).collect();
    assert_eq!(ids, vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);

    let by_deal = |id: u64| history.iter().find(|h| h.deal_id == id).unwrap();
    let rows: Vec<(Decimal, Decimal, usize)> = (1..=10)
        .map(|id| {
            let h = by_deal(id);
            (h.total_interest, h.repayment_pct, h.paid_rounds)
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            (dec!(7_873), dec!(8), 1),
            (dec!(25_200), dec!(100), 12),
            (dec!(20_800), dec!(16), 2),
            (dec!(41_057), dec!(100), 12),
            (dec!(39_595), dec!(0), 0),
            (dec!(92_400), dec!(100), 12),
            (dec!(62_400), dec!(0), 0),
            (dec!(109_037), dec!(100), 12),
            (dec!(92_937), dec!(31), 4),
            (dec!(198_000), dec!(100), 12),
        ]
    );
    assert_eq!(by_deal(1).paid_principal, dec!(19_455));
    assert_eq!(by_deal(9).paid_principal, dec!(381_589));
    assert!(history.iter().all(|h| !h.is_cancelable));
}

#[test]
fn test_capacity_and_overview() {
    let records = fixture_records();
    let config = EngineConfig::default();

    let capacity = investment_capacity(&records, &config.limits);
    assert_eq!(capacity.remaining_total, dec!(26_881_044));
    assert_eq!(capacity.remaining_real_estate, dec!(9_280_000));

    let overview = investment_overview(&records, dec!(5_000));
    assert_eq!(overview.asset, dec!(3_123_956));
    assert_eq!(overview.paid_revenue, dec!(444_066));
    assert_eq!(
        overview.realized_earning_rate,
        realized_earning_rate(&records)
    );
    assert_eq!(overview.realized_earning_rate.round_dp(2), dec!(11.07));
}

#[test]
fn test_analyze_portfolio_envelope() {
    let input = PortfolioInput {
        records: fixture_records(),
        today: today(),
        deposit_balance: Some(dec!(5_000)),
    };
    let out = analyze_portfolio(&input, &funded_config()).unwrap();

    assert!(out.warnings.is_empty());
    assert_eq!(
        out.result.report.investor_summary.total_invested,
        dec!(7_800_000)
    );
    assert_eq!(out.result.overview.asset, dec!(3_123_956));

    let json = serde_json::to_value(&out.result).unwrap();
    assert!(json.get("investor_summary").is_some());
    assert_eq!(json["investor_summary"]["status_counts"]["OVERDUE"], 1);
}

#[test]
fn test_empty_portfolio_is_zero_not_error() {
    let input = PortfolioInput {
        records: vec![],
        today: today(),
        deposit_balance: None,
    };
    let out = analyze_portfolio(&input, &EngineConfig::default()).unwrap();
    assert_eq!(out.result.report.investor_summary.total_invested, Decimal::ZERO);
    assert_eq!(out.result.capacity.remaining_total, dec!(30_000_000));
    assert_eq!(out.result.overview.asset, Decimal::ZERO);
}
