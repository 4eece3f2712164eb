use serde::Serialize;

use super::config::MAX_SKILL_LEVEL;
use super::types::{CareerSkill, CareerWin};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProgress {
    pub skill_name: String,
    pub category: String,
    pub current_level: u32,
    pub target_level: u32,
    /// Current level as a fraction of the full scale, clamped to [0, 1].
    pub level_fraction: f64,
    pub levels_to_target: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerSummary {
    pub skills: Vec<SkillProgress>,
    pub timeline: Vec<CareerWin>,
}

pub fn skill_progress(skill: &CareerSkill) -> SkillProgress {
    SkillProgress {
        skill_name: skill.skill_name.clone(),
        category: skill.category.clone(),
        current_level: skill.current_level,
        target_level: skill.target_level,
        level_fraction: f64::from(skill.current_level.min(MAX_SKILL_LEVEL))
            / f64::from(MAX_SKILL_LEVEL),
        levels_to_target: skill.target_level.saturating_sub(skill.current_level),
    }
}

/// Wins newest first. Wins logged on the same day keep their logging order.
pub fn victory_timeline(wins: &[CareerWin]) -> Vec<CareerWin> {
    let mut ordered = wins.to_vec();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    ordered
}

pub fn career_summary(skills: &[CareerSkill], wins: &[CareerWin]) -> CareerSummary {
    CareerSummary {
        skills: skills.iter().map(skill_progress).collect(),
        timeline: victory_timeline(wins),
    }
}
