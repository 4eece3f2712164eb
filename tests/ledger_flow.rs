use std::path::PathBuf;

use chrono::NaiveDate;
use kairos::core::{
    Clock, FixedClock, FreedomTier, HistorySnapshot, Impact, InMemoryLedger, Ledger,
    LedgerSource, PlannerConfig, Scenario, TargetEta, Trajectory, active_goal_progress,
    build_oracle, build_statement, career_summary, expenses_by_category, simulate_scenarios,
};

const EPS: f64 = 1e-6;

fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= EPS,
        "actual={actual}, expected={expected}"
    );
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn sample_ledger() -> Ledger {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/sample_ledger.json");
    Ledger::from_json_file(&path).expect("sample ledger loads")
}

#[test]
fn sample_ledger_metrics() {
    let metrics = sample_ledger().metrics();

    assert_approx(metrics.assets, 58_500.0);
    assert_approx(metrics.liabilities, 9_000.0);
    assert_approx(metrics.net_worth, 49_500.0);
    assert_approx(metrics.cashflow, 4_400.0 - 1_820.0);
    assert_approx(metrics.freedom_index, 200.0 / 1_820.0 * 100.0);
}

#[test]
fn stored_ledger_drives_oracle_statement_and_scenarios() {
    let store = InMemoryLedger::new();
    let clock = FixedClock(date(2026, 10, 17));
    store
        .replace_ledger("ada", sample_ledger())
        .expect("ledger saves");

    let snapshot = store
        .record_snapshot("ada", clock.today())
        .expect("snapshot recorded");
    assert_approx(snapshot.net_worth, 49_500.0);

    let ledger = store.load_ledger("ada").expect("ledger loads");
    assert_eq!(ledger.history.len(), 4);

    let metrics = ledger.metrics();
    let report = build_oracle(
        &metrics,
        &ledger.history,
        clock.today(),
        &PlannerConfig::default(),
    );
    assert_eq!(report.trajectory, Trajectory::Ascending);
    assert!(report.forecast.is_determined());
    assert!(report.forecast.slope > 0.0);
    let six = report.forecast.prediction(6).expect("6 month prediction");
    let twelve = report.forecast.prediction(12).expect("12 month prediction");
    assert!(twelve > six && six > 49_500.0);

    let months = report.months_to_target.expect("reachable target");
    assert_approx(months, (1_000_000.0 - 49_500.0) / 2_580.0);
    assert_eq!(
        report.target_eta,
        TargetEta::Projected {
            months,
            date: date(2057, 6, 17)
        }
    );

    let statement = build_statement(
        "Ada",
        &metrics,
        &ledger.assets,
        &ledger.cashflow,
        clock.today(),
    );
    assert_eq!(statement.file_stem, "Kairos_Report_2026-10");
    assert_eq!(statement.strategy.tier, FreedomTier::HighActiveReliance);
    assert_approx(statement.balance_sheet.equity, 49_500.0);
    let categories: Vec<&str> = statement
        .balance_sheet
        .assets_by_category
        .iter()
        .map(|slice| slice.category.as_str())
        .collect();
    assert_eq!(categories, vec!["Cash", "Crypto", "Stocks"]);

    let set = simulate_scenarios(
        metrics.net_worth,
        7.0,
        2.5,
        15,
        report.suggested_contribution,
    );
    let realistic = set.get(Scenario::Realistic).expect("realistic run");
    assert_eq!(realistic.points.len(), 181);
    assert_approx(realistic.points[0].wealth, 49_500.0);
    let pessimistic = set.get(Scenario::Pessimistic).expect("bear run");
    let optimistic = set.get(Scenario::Optimistic).expect("bull run");
    assert!(pessimistic.final_wealth() < realistic.final_wealth());
    assert!(realistic.final_wealth() < optimistic.final_wealth());
}

#[test]
fn breakdowns_and_goals_from_sample() {
    let ledger = sample_ledger();

    let expenses = expenses_by_category(&ledger.cashflow);
    assert_eq!(expenses.len(), 3);
    assert_eq!(expenses[0].category, "Insurance");
    assert_approx(expenses[0].amount, 20.0);
    assert_eq!(expenses[2].category, "Housing");

    let goals = active_goal_progress(&ledger.goals);
    assert_eq!(goals.len(), 1);
    assert_approx(goals[0].progress, 0.8);

    let career = career_summary(&ledger.skills, &ledger.wins);
    assert_eq!(career.skills[0].levels_to_target, 25);
    assert_eq!(career.timeline[0].impact, Impact::Critical);
    assert_eq!(career.timeline[1].date, date(2026, 2, 20));
}

#[test]
fn replacing_a_table_leaves_history_intact() {
    let store = InMemoryLedger::new();
    store
        .replace_ledger("ada", sample_ledger())
        .expect("ledger saves");
    store.replace_assets("ada", vec![]).expect("assets save");

    let ledger = store.load_ledger("ada").expect("ledger loads");
    assert!(ledger.assets.is_empty());
    assert_eq!(ledger.history.len(), 3);
    assert_approx(ledger.metrics().net_worth, -9_000.0);
}

#[test]
fn saving_a_full_ledger_only_appends_history() {
    let store = InMemoryLedger::new();
    for (day, net_worth) in [(1, 1_000.0), (15, 1_200.0)] {
        store
            .append_snapshot(
                "ada",
                HistorySnapshot {
                    date: date(2026, 9, day),
                    total_assets: net_worth,
                    total_liabilities: 0.0,
                    net_worth,
                },
            )
            .expect("snapshot appends");
    }

    store
        .replace_ledger("ada", Ledger::default())
        .expect("ledger saves");
    assert_eq!(store.load_history("ada").expect("history loads").len(), 2);

    let reloaded = store.load_ledger("ada").expect("ledger loads");
    store
        .replace_ledger("ada", reloaded)
        .expect("ledger saves");
    assert_eq!(store.load_history("ada").expect("history loads").len(), 2);

    store
        .replace_ledger("ada", sample_ledger())
        .expect("ledger saves");
    let history = store.load_history("ada").expect("history loads");
    assert_eq!(history.len(), 5);
    assert_eq!(history[0].date, date(2026, 9, 1));
    assert_eq!(history[1].date, date(2026, 9, 15));
}
