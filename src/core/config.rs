/// Income categories that count as passive. Closed list, matched exactly.
pub const PASSIVE_CATEGORIES: [&str; 4] = ["Dividends", "Rent", "Passive", "Interests"];

pub const DEFAULT_TARGET_NET_WORTH: f64 = 1_000_000.0;

/// Percentage points between the realistic scenario and the bear/bull ones.
pub const DEFAULT_SCENARIO_SPREAD: f64 = 3.0;

pub const DEFAULT_FORECAST_OFFSETS: [u32; 3] = [6, 12, 24];

/// Contribution used by the simulator when the ledger shows no positive savings.
pub const FALLBACK_MONTHLY_CONTRIBUTION: f64 = 500.0;

pub fn is_passive_category(category: &str) -> bool {
    PASSIVE_CATEGORIES.contains(&category)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub target_net_worth: f64,
    pub forecast_offsets: Vec<u32>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            target_net_worth: DEFAULT_TARGET_NET_WORTH,
            forecast_offsets: DEFAULT_FORECAST_OFFSETS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioConfig {
    pub spread: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            spread: DEFAULT_SCENARIO_SPREAD,
        }
    }
}

/// Upper bound of the career skill level scale.
pub const MAX_SKILL_LEVEL: u32 = 100;
