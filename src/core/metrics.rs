use std::collections::BTreeMap;

use super::config::is_passive_category;
use super::types::{
    AssetRecord, CashflowKind, CashflowRecord, CategoryAmount, LiabilityRecord, Metrics,
    MonthlyCashflow,
};

/// Reduces a user's ledger to the headline metrics. Empty inputs give zeros.
pub fn compute_metrics(
    assets: &[AssetRecord],
    liabilities: &[LiabilityRecord],
    cashflow: &[CashflowRecord],
) -> Metrics {
    let assets_total = total_assets(assets);
    let liabilities_total = total_liabilities(liabilities);
    let flow = monthly_cashflow(cashflow);

    Metrics {
        net_worth: assets_total - liabilities_total,
        assets: assets_total,
        liabilities: liabilities_total,
        cashflow: flow.net,
        freedom_index: flow.freedom_index(),
    }
}

pub fn total_assets(assets: &[AssetRecord]) -> f64 {
    assets.iter().fold(0.0, |acc, a| acc + a.total_value())
}

pub fn total_liabilities(liabilities: &[LiabilityRecord]) -> f64 {
    liabilities
        .iter()
        .fold(0.0, |acc, l| acc + l.remaining_balance)
}

pub fn monthly_cashflow(cashflow: &[CashflowRecord]) -> MonthlyCashflow {
    let mut flow = MonthlyCashflow::default();
    for row in cashflow {
        let monthly = row.monthly_value();
        match row.kind {
            CashflowKind::Income => {
                flow.income += monthly;
                if is_passive_category(&row.category) {
                    flow.passive += monthly;
                }
            }
            CashflowKind::Expense => flow.expenses += monthly,
        }
    }
    flow.net = flow.income - flow.expenses;
    flow
}

/// Asset value per category, sorted by category name.
pub fn asset_allocation(assets: &[AssetRecord]) -> Vec<CategoryAmount> {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for asset in assets {
        *by_category.entry(asset.category.as_str()).or_insert(0.0) += asset.total_value();
    }
    with_shares(by_category)
}

/// Normalized monthly expense per category, smallest first.
pub fn expenses_by_category(cashflow: &[CashflowRecord]) -> Vec<CategoryAmount> {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for row in cashflow.iter().filter(|r| r.kind == CashflowKind::Expense) {
        *by_category.entry(row.category.as_str()).or_insert(0.0) += row.monthly_value();
    }
    let mut out = with_shares(by_category);
    out.sort_by(|a, b| a.amount.total_cmp(&b.amount));
    out
}

fn with_shares(by_category: BTreeMap<&str, f64>) -> Vec<CategoryAmount> {
    let total = by_category.values().fold(0.0, |acc, v| acc + v);
    by_category
        .into_iter()
        .map(|(category, amount)| CategoryAmount {
            category: category.to_string(),
            amount,
            share: if total > 0.0 {
                amount / total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Frequency;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn asset(category: &str, quantity: f64, price: f64) -> AssetRecord {
        AssetRecord {
            name: format!("{category} holding"),
            category: category.to_string(),
            ticker: None,
            quantity,
            avg_price: price,
            current_price: price,
            currency: "EUR".to_string(),
        }
    }

    fn liability(balance: f64) -> LiabilityRecord {
        LiabilityRecord {
            name: "Mortgage".to_string(),
            category: "Mortgage".to_string(),
            remaining_balance: balance,
            monthly_payment: 0.0,
            interest_rate: 0.0,
        }
    }

    fn flow(kind: CashflowKind, category: &str, amount: f64, frequency: Frequency) -> CashflowRecord {
        CashflowRecord {
            kind,
            category: category.to_string(),
            name: category.to_string(),
            amount,
            frequency,
        }
    }

    fn demo_cashflow() -> Vec<CashflowRecord> {
        vec![
            flow(CashflowKind::Income, "Salary", 4_200.0, Frequency::Monthly),
            flow(CashflowKind::Income, "Rent", 650.0, Frequency::Monthly),
            flow(CashflowKind::Income, "Dividends", 1_200.0, Frequency::Yearly),
            flow(CashflowKind::Income, "Passive", 150.0, Frequency::Monthly),
            flow(CashflowKind::Expense, "Housing", 1_100.0, Frequency::Monthly),
            flow(CashflowKind::Expense, "Transport", 500.0, Frequency::Monthly),
            flow(CashflowKind::Expense, "Food", 600.0, Frequency::Monthly),
            flow(CashflowKind::Expense, "Fun", 400.0, Frequency::Monthly),
        ]
    }

    #[test]
    fn empty_ledger_yields_zeroed_metrics() {
        let m = compute_metrics(&[], &[], &[]);
        assert_eq!(m, Metrics::default());
        assert!(m.net_worth.is_sign_positive());
    }

    #[test]
    fn net_worth_subtracts_liability_balances() {
        let m = compute_metrics(&[asset("Stocks", 10.0, 100.0)], &[liability(200.0)], &[]);
        assert_approx(m.assets, 1_000.0);
        assert_approx(m.liabilities, 200.0);
        assert_approx(m.net_worth, 800.0);
    }

    #[test]
    fn yearly_rows_are_spread_over_twelve_months() {
        let yearly = monthly_cashflow(&[flow(
            CashflowKind::Income,
            "Bonus",
            1_200.0,
            Frequency::Yearly,
        )]);
        assert_eq!(yearly.income, 100.0);

        let monthly = monthly_cashflow(&[flow(
            CashflowKind::Income,
            "Salary",
            100.0,
            Frequency::Monthly,
        )]);
        assert_eq!(monthly.income, 100.0);
    }

    #[test]
    fn one_time_rows_count_as_monthly() {
        let f = monthly_cashflow(&[flow(
            CashflowKind::Expense,
            "Travel",
            900.0,
            Frequency::OneTime,
        )]);
        assert_eq!(f.expenses, 900.0);
    }

    #[test]
    fn freedom_index_uses_only_passive_categories() {
        let f = monthly_cashflow(&demo_cashflow());
        assert_approx(f.income, 5_100.0);
        assert_approx(f.expenses, 2_600.0);
        assert_approx(f.passive, 900.0);
        assert_approx(f.net, 2_500.0);
        assert_approx(f.freedom_index(), 900.0 / 2_600.0 * 100.0);
    }

    #[test]
    fn passive_match_is_case_sensitive() {
        let f = monthly_cashflow(&[
            flow(CashflowKind::Income, "dividends", 100.0, Frequency::Monthly),
            flow(CashflowKind::Expense, "Food", 100.0, Frequency::Monthly),
        ]);
        assert_eq!(f.passive, 0.0);
        assert_eq!(f.freedom_index(), 0.0);
    }

    #[test]
    fn passive_expense_rows_are_not_passive_income() {
        let f = monthly_cashflow(&[
            flow(CashflowKind::Expense, "Rent", 800.0, Frequency::Monthly),
        ]);
        assert_eq!(f.passive, 0.0);
        assert_approx(f.net, -800.0);
    }

    #[test]
    fn freedom_index_is_zero_without_expenses() {
        let f = monthly_cashflow(&[flow(
            CashflowKind::Income,
            "Dividends",
            10_000.0,
            Frequency::Monthly,
        )]);
        assert_eq!(f.freedom_index(), 0.0);
    }

    #[test]
    fn allocation_groups_by_category_with_shares() {
        let slices = asset_allocation(&[
            asset("Crypto", 1.0, 300.0),
            asset("Cash", 100.0, 1.0),
            asset("Crypto", 2.0, 300.0),
        ]);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].category, "Cash");
        assert_approx(slices[0].amount, 100.0);
        assert_approx(slices[0].share, 10.0);
        assert_eq!(slices[1].category, "Crypto");
        assert_approx(slices[1].amount, 900.0);
        assert_approx(slices[1].share, 90.0);
    }

    #[test]
    fn allocation_of_worthless_assets_has_zero_shares() {
        let slices = asset_allocation(&[asset("Stocks", 0.0, 10.0)]);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].share, 0.0);
    }

    #[test]
    fn expense_breakdown_is_sorted_ascending() {
        let rows = expenses_by_category(&demo_cashflow());
        let categories: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["Fun", "Transport", "Food", "Housing"]);
        assert_approx(rows[3].amount, 1_100.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn assets_only_ledger_has_net_worth_equal_to_assets(
            rows in proptest::collection::vec((0.0f64..1e6, 0.0f64..1e4), 0..20)
        ) {
            let assets: Vec<AssetRecord> = rows
                .iter()
                .map(|&(q, p)| asset("Stocks", q, p))
                .collect();
            let m = compute_metrics(&assets, &[], &[]);
            prop_assert_eq!(m.liabilities, 0.0);
            prop_assert_eq!(m.net_worth, m.assets);
        }

        #[test]
        fn expense_only_cashflow_has_no_freedom(
            amounts in proptest::collection::vec(0.01f64..1e5, 1..20),
            yearly in proptest::collection::vec(proptest::prelude::any::<bool>(), 20)
        ) {
            let rows: Vec<CashflowRecord> = amounts
                .iter()
                .zip(yearly.iter())
                .map(|(&a, &y)| flow(
                    CashflowKind::Expense,
                    "Rent",
                    a,
                    if y { Frequency::Yearly } else { Frequency::Monthly },
                ))
                .collect();
            let m = compute_metrics(&[], &[], &rows);
            prop_assert_eq!(m.freedom_index, 0.0);
            prop_assert!(m.cashflow <= 0.0);
        }

        #[test]
        fn freedom_index_is_never_negative(
            incomes in proptest::collection::vec(0.0f64..1e5, 0..10),
            expenses in proptest::collection::vec(0.0f64..1e5, 0..10)
        ) {
            let mut rows: Vec<CashflowRecord> = incomes
                .iter()
                .map(|&a| flow(CashflowKind::Income, "Dividends", a, Frequency::Monthly))
                .collect();
            rows.extend(
                expenses
                    .iter()
                    .map(|&a| flow(CashflowKind::Expense, "Food", a, Frequency::Monthly)),
            );
            let f = monthly_cashflow(&rows);
            let index = f.freedom_index();
            prop_assert!(index >= 0.0);
            if f.expenses == 0.0 {
                prop_assert_eq!(index, 0.0);
            }
        }
    }
}
