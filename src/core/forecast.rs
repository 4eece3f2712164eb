use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};

use super::types::{Forecast, HistorySnapshot, Trajectory};

#[derive(Debug, Clone, Copy)]
struct LinearFit {
    slope: f64,
    x_mean: f64,
    y_mean: f64,
}

impl LinearFit {
    fn at(self, x: f64) -> f64 {
        self.y_mean + self.slope * (x - self.x_mean)
    }
}

/// Days since 0001-01-01 (day 1) in the proleptic Gregorian calendar.
pub fn day_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// Snapshots in ascending date order. Ties keep their storage order.
pub fn sorted_by_date(history: &[HistorySnapshot]) -> Vec<&HistorySnapshot> {
    let mut ordered: Vec<&HistorySnapshot> = history.iter().collect();
    ordered.sort_by_key(|s| s.date);
    ordered
}

/// Fits an ordinary least squares line through every snapshot and
/// projects it `offsets` calendar months past the latest snapshot.
pub fn forecast(history: &[HistorySnapshot], offsets: &[u32]) -> Forecast {
    let ordered = sorted_by_date(history);
    if ordered.len() < 2 {
        return Forecast::undetermined(offsets);
    }

    match fit_and_project(&ordered, offsets) {
        Some(result) => result,
        None => {
            tracing::debug!(
                snapshots = ordered.len(),
                "net worth trend fit is degenerate, leaving predictions undetermined"
            );
            Forecast::undetermined(offsets)
        }
    }
}

fn fit_and_project(ordered: &[&HistorySnapshot], offsets: &[u32]) -> Option<Forecast> {
    let points: Vec<(f64, f64)> = ordered
        .iter()
        .map(|s| (day_ordinal(s.date) as f64, s.net_worth))
        .collect();
    let line = fit_line(&points)?;
    let last_date = ordered.last()?.date;

    let mut predictions = BTreeMap::new();
    for &months in offsets {
        let future = last_date.checked_add_months(Months::new(months))?;
        let value = line.at(day_ordinal(future) as f64);
        if !value.is_finite() {
            return None;
        }
        predictions.insert(months, Some(value));
    }

    Some(Forecast {
        predictions,
        slope: line.slope,
    })
}

fn fit_line(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let x_mean = points.iter().fold(0.0, |acc, (x, _)| acc + x) / n;
    let y_mean = points.iter().fold(0.0, |acc, (_, y)| acc + y) / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for &(x, y) in points {
        let dx = x - x_mean;
        sxx += dx * dx;
        sxy += dx * (y - y_mean);
    }

    if sxx.is_nan() || sxx <= 0.0 || !sxy.is_finite() || !y_mean.is_finite() {
        return None;
    }

    let slope = sxy / sxx;
    slope.is_finite().then_some(LinearFit {
        slope,
        x_mean,
        y_mean,
    })
}

/// Direction of net worth from the earliest to the latest snapshot.
pub fn classify_trajectory(history: &[HistorySnapshot]) -> Trajectory {
    let ordered = sorted_by_date(history);
    if ordered.len() < 2 {
        return Trajectory::InsufficientData;
    }
    let (first, last) = (ordered[0], ordered[ordered.len() - 1]);

    if last.net_worth > first.net_worth {
        Trajectory::Ascending
    } else if last.net_worth < first.net_worth {
        Trajectory::Descending
    } else {
        Trajectory::Flat
    }
}
