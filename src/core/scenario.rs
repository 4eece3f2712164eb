use super::config::ScenarioConfig;
use super::types::{Scenario, ScenarioPoint, ScenarioProjection, ScenarioSet};

/// Slider values for the scenario simulator. Rates are annual percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationInputs {
    pub start_net_worth: f64,
    pub base_annual_rate: f64,
    pub inflation_rate: f64,
    pub years: u32,
    pub monthly_contribution: f64,
}

pub fn simulate_scenarios(
    start_net_worth: f64,
    base_annual_rate: f64,
    inflation_rate: f64,
    years: u32,
    monthly_contribution: f64,
) -> ScenarioSet {
    let inputs = SimulationInputs {
        start_net_worth,
        base_annual_rate,
        inflation_rate,
        years,
        monthly_contribution,
    };
    run_scenarios(&inputs, &ScenarioConfig::default())
}

/// Each projection holds `years * 12 + 1` monthly points. A horizon whose
/// month count does not fit in `u32` yields only the month-0 point.
pub fn run_scenarios(inputs: &SimulationInputs, config: &ScenarioConfig) -> ScenarioSet {
    let months = inputs.years.checked_mul(12).unwrap_or_else(|| {
        tracing::debug!(
            years = inputs.years,
            "simulation horizon overflows, keeping month 0 only"
        );
        0
    });
    let projections = Scenario::ALL
        .iter()
        .map(|&scenario| {
            let annual_rate = inputs.base_annual_rate + scenario.rate_offset(config.spread);
            let monthly_real_rate = real_monthly_rate(annual_rate, inputs.inflation_rate);
            ScenarioProjection {
                scenario,
                label: scenario.label(),
                annual_rate,
                monthly_real_rate,
                points: project_wealth(
                    inputs.start_net_worth,
                    monthly_real_rate,
                    months,
                    inputs.monthly_contribution,
                ),
            }
        })
        .collect();

    ScenarioSet { projections }
}

/// Inflation-adjusted monthly rate from annual percentages.
pub fn real_monthly_rate(annual_rate: f64, inflation_rate: f64) -> f64 {
    (annual_rate - inflation_rate) / 100.0 / 12.0
}

/// Month 0 is `start`; each later month grows the previous balance and then
/// adds the contribution.
pub fn project_wealth(
    start: f64,
    monthly_rate: f64,
    months: u32,
    monthly_contribution: f64,
) -> Vec<ScenarioPoint> {
    let mut points = Vec::with_capacity(months as usize + 1);
    let mut wealth = start;
    points.push(ScenarioPoint { month: 0, wealth });
    for month in 1..=months {
        wealth = wealth * (1.0 + monthly_rate) + monthly_contribution;
        points.push(ScenarioPoint { month, wealth });
    }
    points
}
