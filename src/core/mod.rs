mod career;
mod clock;
pub mod config;
mod forecast;
mod goals;
mod ledger;
mod metrics;
mod oracle;
mod planner;
mod scenario;
mod statement;
mod types;

pub use career::{
    CareerSummary, SkillProgress, career_summary, skill_progress, victory_timeline,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{PlannerConfig, ScenarioConfig};
pub use forecast::{classify_trajectory, day_ordinal, forecast, sorted_by_date};
pub use goals::{GoalProgress, active_goal_progress, goal_progress};
pub use ledger::{InMemoryLedger, Ledger, LedgerSource};
pub use metrics::{
    asset_allocation, compute_metrics, expenses_by_category, monthly_cashflow, total_assets,
    total_liabilities,
};
pub use oracle::{OracleReport, build_oracle, suggested_contribution};
pub use planner::{months_to_target, target_eta};
pub use scenario::{
    SimulationInputs, project_wealth, real_monthly_rate, run_scenarios, simulate_scenarios,
};
pub use statement::{
    BalanceSheet, FreedomTier, IncomeStatement, Statement, StrategyInsight, build_statement,
};
pub use types::{
    AssetRecord, CareerSkill, CareerWin, CashflowKind, CashflowRecord, CategoryAmount, Forecast,
    Frequency, Goal, GoalStatus, HistorySnapshot, Impact, LiabilityRecord, Metrics,
    MonthlyCashflow, Scenario, ScenarioPoint, ScenarioProjection, ScenarioSet, TargetEta,
    Trajectory,
};
