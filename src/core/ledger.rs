use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::config::MAX_SKILL_LEVEL;
use super::metrics::compute_metrics;
use super::types::{
    AssetRecord, CareerSkill, CareerWin, CashflowRecord, Goal, HistorySnapshot, Impact,
    LiabilityRecord, Metrics,
};
use crate::error::{Error, Result};

/// Every table held for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ledger {
    pub assets: Vec<AssetRecord>,
    pub liabilities: Vec<LiabilityRecord>,
    pub cashflow: Vec<CashflowRecord>,
    pub history: Vec<HistorySnapshot>,
    pub goals: Vec<Goal>,
    pub skills: Vec<CareerSkill>,
    pub wins: Vec<CareerWin>,
}

impl Ledger {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn metrics(&self) -> Metrics {
        compute_metrics(&self.assets, &self.liabilities, &self.cashflow)
    }
}

/// Read side of the per-user ledger store. Rows come back in no particular order.
pub trait LedgerSource: Send + Sync {
    fn load_assets(&self, user: &str) -> Result<Vec<AssetRecord>>;
    fn load_liabilities(&self, user: &str) -> Result<Vec<LiabilityRecord>>;
    fn load_cashflow(&self, user: &str) -> Result<Vec<CashflowRecord>>;
    fn load_history(&self, user: &str) -> Result<Vec<HistorySnapshot>>;
    fn load_goals(&self, user: &str) -> Result<Vec<Goal>>;
    fn load_skills(&self, user: &str) -> Result<Vec<CareerSkill>>;
    fn load_wins(&self, user: &str) -> Result<Vec<CareerWin>>;

    fn load_ledger(&self, user: &str) -> Result<Ledger> {
        Ok(Ledger {
            assets: self.load_assets(user)?,
            liabilities: self.load_liabilities(user)?,
            cashflow: self.load_cashflow(user)?,
            history: self.load_history(user)?,
            goals: self.load_goals(user)?,
            skills: self.load_skills(user)?,
            wins: self.load_wins(user)?,
        })
    }
}

/// Process-local ledger store. Saves replace a whole table for a user in one
/// write-locked step, so readers never observe a half-written table.
/// History and career wins are append-only: no save removes or rewrites them.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    users: RwLock<HashMap<String, Ledger>>,
}

fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::Storage("ledger lock poisoned".to_string())
}

/// Appends the incoming rows that are not already stored.
fn append_new<T: PartialEq>(stored: &mut Vec<T>, incoming: Vec<T>) {
    for row in incoming {
        if !stored.contains(&row) {
            stored.push(row);
        }
    }
}

fn check_skills(rows: &[CareerSkill]) -> Result<()> {
    for skill in rows {
        if skill.skill_name.trim().is_empty() {
            return Err(Error::Validation("skill name must not be empty".to_string()));
        }
        if skill.current_level > MAX_SKILL_LEVEL {
            return Err(Error::Validation(format!(
                "{}: current level must be <= {MAX_SKILL_LEVEL}",
                skill.skill_name
            )));
        }
    }
    Ok(())
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, user: &str, pick: impl FnOnce(&Ledger) -> T) -> Result<T>
    where
        T: Default,
    {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(user).map(pick).unwrap_or_default())
    }

    fn write(&self, user: &str, apply: impl FnOnce(&mut Ledger)) -> Result<()> {
        if user.trim().is_empty() {
            return Err(Error::Validation("user must not be empty".to_string()));
        }
        let mut users = self.users.write().map_err(poisoned)?;
        apply(users.entry(user.to_string()).or_default());
        Ok(())
    }

    /// Replaces every editable table at once. Incoming history and wins are
    /// merged by appending rows not already stored, so re-saving a loaded
    /// ledger is a no-op for them.
    pub fn replace_ledger(&self, user: &str, ledger: Ledger) -> Result<()> {
        check_skills(&ledger.skills)?;
        tracing::debug!(user, "replacing full ledger");
        self.write(user, |current| {
            current.assets = ledger.assets;
            current.liabilities = ledger.liabilities;
            current.cashflow = ledger.cashflow;
            current.goals = ledger.goals;
            current.skills = ledger.skills;
            append_new(&mut current.history, ledger.history);
            append_new(&mut current.wins, ledger.wins);
        })
    }

    pub fn replace_assets(&self, user: &str, rows: Vec<AssetRecord>) -> Result<()> {
        tracing::debug!(user, rows = rows.len(), "replacing assets");
        self.write(user, |ledger| ledger.assets = rows)
    }

    pub fn replace_liabilities(&self, user: &str, rows: Vec<LiabilityRecord>) -> Result<()> {
        tracing::debug!(user, rows = rows.len(), "replacing liabilities");
        self.write(user, |ledger| ledger.liabilities = rows)
    }

    pub fn replace_cashflow(&self, user: &str, rows: Vec<CashflowRecord>) -> Result<()> {
        tracing::debug!(user, rows = rows.len(), "replacing cashflow");
        self.write(user, |ledger| ledger.cashflow = rows)
    }

    pub fn replace_goals(&self, user: &str, rows: Vec<Goal>) -> Result<()> {
        tracing::debug!(user, rows = rows.len(), "replacing goals");
        self.write(user, |ledger| ledger.goals = rows)
    }

    pub fn replace_skills(&self, user: &str, rows: Vec<CareerSkill>) -> Result<()> {
        check_skills(&rows)?;
        tracing::debug!(user, rows = rows.len(), "replacing career skills");
        self.write(user, |ledger| ledger.skills = rows)
    }

    pub fn log_victory(
        &self,
        user: &str,
        date: NaiveDate,
        description: &str,
        impact: Impact,
    ) -> Result<CareerWin> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::Validation(
                "victory description must not be empty".to_string(),
            ));
        }
        let win = CareerWin {
            date,
            description: description.to_string(),
            impact,
        };
        self.write(user, |ledger| ledger.wins.push(win.clone()))?;
        Ok(win)
    }

    pub fn append_snapshot(&self, user: &str, snapshot: HistorySnapshot) -> Result<()> {
        self.write(user, |ledger| ledger.history.push(snapshot))
    }

    /// Records today's metrics as a history snapshot and returns it.
    pub fn record_snapshot(&self, user: &str, date: NaiveDate) -> Result<HistorySnapshot> {
        let mut recorded = None;
        self.write(user, |ledger| {
            let metrics = ledger.metrics();
            let snapshot = HistorySnapshot {
                date,
                total_assets: metrics.assets,
                total_liabilities: metrics.liabilities,
                net_worth: metrics.net_worth,
            };
            ledger.history.push(snapshot.clone());
            recorded = Some(snapshot);
        })?;
        recorded.ok_or_else(|| Error::Storage("snapshot was not recorded".to_string()))
    }

    pub fn delete_user(&self, user: &str) -> Result<bool> {
        let mut users = self.users.write().map_err(poisoned)?;
        Ok(users.remove(user).is_some())
    }
}

impl LedgerSource for InMemoryLedger {
    fn load_assets(&self, user: &str) -> Result<Vec<AssetRecord>> {
        self.read(user, |l| l.assets.clone())
    }

    fn load_liabilities(&self, user: &str) -> Result<Vec<LiabilityRecord>> {
        self.read(user, |l| l.liabilities.clone())
    }

    fn load_cashflow(&self, user: &str) -> Result<Vec<CashflowRecord>> {
        self.read(user, |l| l.cashflow.clone())
    }

    fn load_history(&self, user: &str) -> Result<Vec<HistorySnapshot>> {
        self.read(user, |l| l.history.clone())
    }

    fn load_goals(&self, user: &str) -> Result<Vec<Goal>> {
        self.read(user, |l| l.goals.clone())
    }

    fn load_skills(&self, user: &str) -> Result<Vec<CareerSkill>> {
        self.read(user, |l| l.skills.clone())
    }

    fn load_wins(&self, user: &str) -> Result<Vec<CareerWin>> {
        self.read(user, |l| l.wins.clone())
    }

    fn load_ledger(&self, user: &str) -> Result<Ledger> {
        self.read(user, Ledger::clone)
    }
}
