use chrono::{Months, NaiveDate};

use super::types::TargetEta;

/// Months until `target` under linear accumulation of `monthly_cashflow`.
/// Returns `f64::INFINITY` when the target cannot be reached.
pub fn months_to_target(current_net_worth: f64, monthly_cashflow: f64, target: f64) -> f64 {
    if current_net_worth >= target {
        return 0.0;
    }

    if monthly_cashflow.is_nan() || monthly_cashflow <= 0.0 {
        return f64::INFINITY;
    }

    (target - current_net_worth) / monthly_cashflow
}

/// Turns a month count into a calendar estimate, adding whole months to `today`.
pub fn target_eta(months: f64, today: NaiveDate) -> TargetEta {
    if months == 0.0 {
        return TargetEta::Achieved;
    }
    if !months.is_finite() || months < 0.0 {
        return TargetEta::Unreachable;
    }

    let whole = months.trunc();
    let date = (whole <= f64::from(u32::MAX))
        .then(|| today.checked_add_months(Months::new(whole as u32)))
        .flatten();

    match date {
        Some(date) => TargetEta::Projected { months, date },
        None => {
            tracing::debug!(months, "target date falls outside the calendar range");
            TargetEta::Unreachable
        }
    }
}
