use chrono::NaiveDate;
use serde::Serialize;

use super::config::{FALLBACK_MONTHLY_CONTRIBUTION, PlannerConfig};
use super::forecast::{classify_trajectory, forecast};
use super::planner::{months_to_target, target_eta};
use super::types::{Forecast, HistorySnapshot, Metrics, TargetEta, Trajectory};

/// Forecast page summary: trend, direction and time to the net worth target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleReport {
    pub forecast: Forecast,
    pub trajectory: Trajectory,
    pub trajectory_message: &'static str,
    pub target_net_worth: f64,
    pub monthly_savings: f64,
    pub months_to_target: Option<f64>,
    pub target_eta: TargetEta,
    pub suggested_contribution: f64,
}

pub fn build_oracle(
    metrics: &Metrics,
    history: &[HistorySnapshot],
    today: NaiveDate,
    config: &PlannerConfig,
) -> OracleReport {
    let forecast = forecast(history, &config.forecast_offsets);
    let trajectory = classify_trajectory(history);
    let monthly_savings = metrics.cashflow.max(0.0);
    let months = months_to_target(metrics.net_worth, monthly_savings, config.target_net_worth);
    let eta = target_eta(months, today);
    if eta == TargetEta::Unreachable {
        tracing::debug!(
            net_worth = metrics.net_worth,
            target = config.target_net_worth,
            "net worth target unreachable at current savings"
        );
    }

    OracleReport {
        forecast,
        trajectory,
        trajectory_message: trajectory.message(),
        target_net_worth: config.target_net_worth,
        monthly_savings,
        months_to_target: months.is_finite().then_some(months),
        target_eta: eta,
        suggested_contribution: suggested_contribution(metrics),
    }
}

/// Default simulator contribution: current positive cashflow in whole units,
/// else a fallback.
pub fn suggested_contribution(metrics: &Metrics) -> f64 {
    if metrics.cashflow > 0.0 {
        metrics.cashflow.trunc()
    } else {
        FALLBACK_MONTHLY_CONTRIBUTION
    }
}
