use serde::Serialize;

use super::types::{Goal, GoalStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<chrono::NaiveDate>,
    /// Fraction reached, clamped to [0, 1].
    pub progress: f64,
}

pub fn goal_progress(goal: &Goal) -> f64 {
    if goal.target_amount > 0.0 {
        (goal.current_amount / goal.target_amount).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn active_goal_progress(goals: &[Goal]) -> Vec<GoalProgress> {
    goals
        .iter()
        .filter(|g| g.status == GoalStatus::Active)
        .map(|g| GoalProgress {
            name: g.name.clone(),
            target_amount: g.target_amount,
            current_amount: g.current_amount,
            deadline: g.deadline,
            progress: goal_progress(g),
        })
        .collect()
}
