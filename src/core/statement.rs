use chrono::NaiveDate;
use serde::Serialize;

use super::metrics::{asset_allocation, monthly_cashflow};
use super::types::{AssetRecord, CashflowRecord, CategoryAmount, Metrics};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FreedomTier {
    HighActiveReliance,
    BuildingMomentum,
    EscapeImminent,
    FinanciallyFree,
}

impl FreedomTier {
    pub fn from_index(freedom_index: f64) -> Self {
        if freedom_index < 20.0 {
            FreedomTier::HighActiveReliance
        } else if freedom_index < 50.0 {
            FreedomTier::BuildingMomentum
        } else if freedom_index < 100.0 {
            FreedomTier::EscapeImminent
        } else {
            FreedomTier::FinanciallyFree
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            FreedomTier::HighActiveReliance => {
                "WARNING: HIGH RELIANCE ON ACTIVE INCOME. Target: Increase passive cashflow streams immediately. Reduce liabilities."
            }
            FreedomTier::BuildingMomentum => {
                "STATUS: BUILDING MOMENTUM. You are on the right track but still dependent on your job. Focus on acquiring income-generating assets."
            }
            FreedomTier::EscapeImminent => {
                "STATUS: RAT RACE ESCAPE IMMINENT. You are over halfway there. Accelerate asset accumulation."
            }
            FreedomTier::FinanciallyFree => {
                "STATUS: FINANCIALLY FREE. Congratulations. You have escaped the Rat Race."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub net_cashflow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    pub assets_by_category: Vec<CategoryAmount>,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyInsight {
    pub freedom_index: f64,
    pub tier: FreedomTier,
    pub advice: &'static str,
}

/// Content of the monthly closing statement, ready for a document renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub prepared_for: String,
    pub date: NaiveDate,
    pub period: String,
    pub file_stem: String,
    pub net_worth: f64,
    pub income_statement: IncomeStatement,
    pub balance_sheet: BalanceSheet,
    pub strategy: StrategyInsight,
}

pub fn build_statement(
    prepared_for: &str,
    metrics: &Metrics,
    assets: &[AssetRecord],
    cashflow: &[CashflowRecord],
    today: NaiveDate,
) -> Statement {
    let flow = monthly_cashflow(cashflow);
    let assets_by_category = asset_allocation(assets);
    let total_assets = assets_by_category
        .iter()
        .fold(0.0, |acc, slice| acc + slice.amount);
    let period = today.format("%Y-%m").to_string();
    let tier = FreedomTier::from_index(metrics.freedom_index);

    Statement {
        prepared_for: prepared_for.to_string(),
        date: today,
        file_stem: format!("Kairos_Report_{period}"),
        period,
        net_worth: metrics.net_worth,
        income_statement: IncomeStatement {
            monthly_income: flow.income,
            monthly_expenses: flow.expenses,
            net_cashflow: flow.net,
        },
        balance_sheet: BalanceSheet {
            assets_by_category,
            total_assets,
            total_liabilities: metrics.liabilities,
            equity: total_assets - metrics.liabilities,
        },
        strategy: StrategyInsight {
            freedom_index: metrics.freedom_index,
            tier,
            advice: tier.advice(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::compute_metrics;
    use crate::core::types::{CashflowKind, Frequency, LiabilityRecord};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn tiers_follow_freedom_thresholds() {
        assert_eq!(FreedomTier::from_index(0.0), FreedomTier::HighActiveReliance);
        assert_eq!(FreedomTier::from_index(19.99), FreedomTier::HighActiveReliance);
        assert_eq!(FreedomTier::from_index(20.0), FreedomTier::BuildingMomentum);
        assert_eq!(FreedomTier::from_index(49.9), FreedomTier::BuildingMomentum);
        assert_eq!(FreedomTier::from_index(50.0), FreedomTier::EscapeImminent);
        assert_eq!(FreedomTier::from_index(100.0), FreedomTier::FinanciallyFree);
        assert_eq!(FreedomTier::from_index(250.0), FreedomTier::FinanciallyFree);
    }

    #[test]
    fn statement_balances_assets_and_liabilities() {
        let assets = vec![
            AssetRecord {
                name: "ETF".to_string(),
                category: "Stocks".to_string(),
                ticker: Some("VWCE".to_string()),
                quantity: 10.0,
                avg_price: 90.0,
                current_price: 100.0,
                currency: "EUR".to_string(),
            },
            AssetRecord {
                name: "Savings".to_string(),
                category: "Cash".to_string(),
                ticker: None,
                quantity: 500.0,
                avg_price: 1.0,
                current_price: 1.0,
                currency: "EUR".to_string(),
            },
        ];
        let liabilities = vec![LiabilityRecord {
            name: "Car".to_string(),
            category: "Car Loan".to_string(),
            remaining_balance: 300.0,
            monthly_payment: 50.0,
            interest_rate: 4.5,
        }];
        let cashflow = vec![
            CashflowRecord {
                kind: CashflowKind::Income,
                category: "Rent".to_string(),
                name: "Flat".to_string(),
                amount: 600.0,
                frequency: Frequency::Monthly,
            },
            CashflowRecord {
                kind: CashflowKind::Expense,
                category: "Food".to_string(),
                name: "Groceries".to_string(),
                amount: 12_000.0,
                frequency: Frequency::Yearly,
            },
        ];
        let metrics = compute_metrics(&assets, &liabilities, &cashflow);
        let today = NaiveDate::from_ymd_opt(2026, 3, 9).expect("valid date");

        let statement = build_statement("operator", &metrics, &assets, &cashflow, today);

        assert_eq!(statement.period, "2026-03");
        assert_eq!(statement.file_stem, "Kairos_Report_2026-03");
        assert_approx(statement.net_worth, 1_200.0);
        assert_approx(statement.income_statement.monthly_income, 600.0);
        assert_approx(statement.income_statement.monthly_expenses, 1_000.0);
        assert_approx(statement.income_statement.net_cashflow, -400.0);

        let sheet = &statement.balance_sheet;
        assert_eq!(sheet.assets_by_category.len(), 2);
        assert_eq!(sheet.assets_by_category[0].category, "Cash");
        assert_approx(sheet.total_assets, 1_500.0);
        assert_approx(sheet.equity, 1_200.0);

        assert_approx(statement.strategy.freedom_index, 60.0);
        assert_eq!(statement.strategy.tier, FreedomTier::EscapeImminent);
    }

    #[test]
    fn statement_serializes_camel_case() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date");
        let statement = build_statement("op", &Metrics::default(), &[], &[], today);
        let json = serde_json::to_value(&statement).expect("serializes");
        assert_eq!(json["fileStem"], "Kairos_Report_2026-01");
        assert_eq!(json["strategy"]["tier"], "HIGH_ACTIVE_RELIANCE");
        assert_eq!(json["balanceSheet"]["totalAssets"], 0.0);
    }
}
