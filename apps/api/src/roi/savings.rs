//! Per-task savings and the per-cycle totals folded from them.

use serde::{Deserialize, Serialize};

use crate::roi::inputs::{parse_decimal, Task};

/// Derived hours and cost for a single task in one proposal cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskSavings {
    pub hours_using: f64,
    pub hours_saved: f64,
    pub cost_savings: f64,
}

/// Sums over every task, plus the yearly cost savings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub total_hours_manually: f64,
    pub total_hours_using: f64,
    pub total_hours_saved: f64,
    pub total_cost_savings: f64,
    pub annual_savings: f64,
}

/// Computes the savings for one task whose manual effort is `hours` (text, 0 if unparsable).
///
/// An efficiency outside 0..=100 is not clamped and yields negative hours.
pub fn calculate_savings(hours: &str, efficiency_gain_percent: f64, hourly_rate: f64) -> TaskSavings {
    let hours = parse_decimal(hours);
    let hours_using = hours * (1.0 - efficiency_gain_percent / 100.0);
    let hours_saved = hours - hours_using;
    TaskSavings {
        hours_using,
        hours_saved,
        cost_savings: hours_saved * hourly_rate,
    }
}

/// Folds [`calculate_savings`] over `tasks` in list order.
pub fn calculate_totals(
    tasks: &[Task],
    efficiency_gain_percent: f64,
    hourly_rate: f64,
    rfps_per_year: f64,
) -> Totals {
    let mut totals = tasks.iter().fold(Totals::default(), |mut acc, task| {
        let savings = calculate_savings(&task.hours, efficiency_gain_percent, hourly_rate);
        acc.total_hours_manually += parse_decimal(&task.hours);
        acc.total_hours_using += savings.hours_using;
        acc.total_hours_saved += savings.hours_saved;
        acc.total_cost_savings += savings.cost_savings;
        acc
    });
    totals.annual_savings = totals.total_cost_savings * rfps_per_year;
    totals
}
