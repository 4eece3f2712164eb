use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CashflowKind {
    #[serde(alias = "income", alias = "INCOME")]
    Income,
    #[serde(alias = "expense", alias = "EXPENSE")]
    Expense,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Frequency {
    #[default]
    #[serde(alias = "monthly")]
    Monthly,
    #[serde(alias = "yearly")]
    Yearly,
    #[serde(rename = "One-Time", alias = "OneTime", alias = "one-time")]
    OneTime,
}

impl Frequency {
    /// Anything that is not yearly counts as a monthly flow, one-time included.
    pub fn monthly_amount(self, amount: f64) -> f64 {
        match self {
            Frequency::Yearly => amount / 12.0,
            Frequency::Monthly | Frequency::OneTime => amount,
        }
    }
}

fn default_currency() -> String {
    "EUR".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub avg_price: f64,
    #[serde(default)]
    pub current_price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl AssetRecord {
    pub fn total_value(&self) -> f64 {
        self.quantity * self.current_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiabilityRecord {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub remaining_balance: f64,
    #[serde(default)]
    pub monthly_payment: f64,
    #[serde(default)]
    pub interest_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashflowRecord {
    #[serde(rename = "type")]
    pub kind: CashflowKind,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub frequency: Frequency,
}

impl CashflowRecord {
    pub fn monthly_value(&self) -> f64 {
        self.frequency.monthly_amount(self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub date: NaiveDate,
    #[serde(default)]
    pub total_assets: f64,
    #[serde(default)]
    pub total_liabilities: f64,
    pub net_worth: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub net_worth: f64,
    pub assets: f64,
    pub liabilities: f64,
    /// Net monthly cashflow.
    pub cashflow: f64,
    /// Passive income over expenses, in percent.
    pub freedom_index: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCashflow {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub passive: f64,
}

impl MonthlyCashflow {
    pub fn freedom_index(&self) -> f64 {
        if self.expenses > 0.0 {
            self.passive / self.expenses * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
    /// Share of the grouped total in percent.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    /// Month offset to predicted net worth; `None` when it cannot be determined.
    pub predictions: BTreeMap<u32, Option<f64>>,
    /// Net worth change per calendar day.
    pub slope: f64,
}

impl Forecast {
    pub fn undetermined(offsets: &[u32]) -> Self {
        Forecast {
            predictions: offsets.iter().map(|&m| (m, None)).collect(),
            slope: 0.0,
        }
    }

    pub fn prediction(&self, offset: u32) -> Option<f64> {
        self.predictions.get(&offset).copied().flatten()
    }

    pub fn is_determined(&self) -> bool {
        !self.predictions.is_empty() && self.predictions.values().all(Option::is_some)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trajectory {
    Ascending,
    Descending,
    Flat,
    InsufficientData,
}

impl Trajectory {
    pub fn message(self) -> &'static str {
        match self {
            Trajectory::Ascending => "POSITIVE TRAJECTORY. ASCENDING.",
            Trajectory::Descending => "NEGATIVE TRAJECTORY. DESCENDING.",
            Trajectory::Flat => "TRAJECTORY FLAT. STAGNATION DETECTED.",
            Trajectory::InsufficientData => "INSUFFICIENT DATA FOR TRAJECTORY ANALYSIS.",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TargetEta {
    Achieved,
    Unreachable,
    Projected { months: f64, date: NaiveDate },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Pessimistic,
    Realistic,
    Optimistic,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::Pessimistic,
        Scenario::Realistic,
        Scenario::Optimistic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Scenario::Pessimistic => "PESSIMISTIC (Bear)",
            Scenario::Realistic => "REALISTIC (Base)",
            Scenario::Optimistic => "OPTIMISTIC (Bull)",
        }
    }

    /// Offset in percentage points applied to the base annual return.
    pub fn rate_offset(self, spread: f64) -> f64 {
        match self {
            Scenario::Pessimistic => -spread,
            Scenario::Realistic => 0.0,
            Scenario::Optimistic => spread,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPoint {
    pub month: u32,
    pub wealth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioProjection {
    pub scenario: Scenario,
    pub label: &'static str,
    /// Nominal annual return in percent.
    pub annual_rate: f64,
    /// Inflation-adjusted monthly rate as a fraction.
    pub monthly_real_rate: f64,
    pub points: Vec<ScenarioPoint>,
}

impl ScenarioProjection {
    pub fn final_wealth(&self) -> f64 {
        self.points.last().map(|p| p.wealth).unwrap_or(0.0)
    }

    pub fn wealth(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.wealth).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSet {
    pub projections: Vec<ScenarioProjection>,
}

impl ScenarioSet {
    pub fn get(&self, scenario: Scenario) -> Option<&ScenarioProjection> {
        self.projections.iter().find(|p| p.scenario == scenario)
    }

    /// The realistic end value, shown as "projected real wealth".
    pub fn projected_real_wealth(&self) -> f64 {
        self.get(Scenario::Realistic)
            .map(ScenarioProjection::final_wealth)
            .unwrap_or(0.0)
    }

    pub fn by_label(&self) -> BTreeMap<&'static str, Vec<f64>> {
        self.projections
            .iter()
            .map(|p| (p.label, p.wealth()))
            .collect()
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub name: String,
    #[serde(default)]
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub status: GoalStatus,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Impact {
    #[default]
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "critical", alias = "CRITICAL")]
    Critical,
}

/// One skill on the career tree. Levels are on a 0..=100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerSkill {
    pub skill_name: String,
    #[serde(default)]
    pub current_level: u32,
    #[serde(default)]
    pub target_level: u32,
    #[serde(default)]
    pub category: String,
}

/// A logged career achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerWin {
    pub date: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub impact: Impact,
}
