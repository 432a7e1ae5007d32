//! One pass from an input snapshot to every figure the calculator reports.

use serde::{Deserialize, Serialize};

use crate::roi::growth::{calculate_growth_potential, GrowthPotential};
use crate::roi::inputs::{parse_decimal, InputSnapshot, ParsedInputs};
use crate::roi::savings::{calculate_savings, calculate_totals, TaskSavings, Totals};

/// A table row: the task's manual hours and its derived savings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBreakdown {
    pub name: String,
    pub hours_manually: f64,
    #[serde(flatten)]
    pub savings: TaskSavings,
}

/// Per-cycle totals scaled to a full year of RFPs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnualEfficiency {
    pub hours_manually: f64,
    pub hours_using: f64,
    pub hours_saved: f64,
    pub cost_savings: f64,
}

impl AnnualEfficiency {
    /// `rfps_per_year` is the coerced value, so blank text gives 0 hours, not NaN.
    pub fn from_totals(totals: &Totals, rfps_per_year: f64) -> Self {
        Self {
            hours_manually: totals.total_hours_manually * rfps_per_year,
            hours_using: totals.total_hours_using * rfps_per_year,
            hours_saved: totals.total_hours_saved * rfps_per_year,
            cost_savings: totals.annual_savings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiSummary {
    pub tasks: Vec<TaskBreakdown>,
    pub totals: Totals,
    pub annual: AnnualEfficiency,
    pub growth: GrowthPotential,
    /// Annual savings plus potential new revenue: the headline "Annual ROI".
    pub combined_impact: f64,
}

/// Computes every derived figure from `snapshot`. Holds no state between calls.
pub fn summarize(snapshot: &InputSnapshot) -> RoiSummary {
    let ParsedInputs {
        rfps_per_year,
        hourly_rate,
        efficiency_gain_percent,
        additional_rfps,
        average_award_size,
        conversion_rate,
    } = snapshot.parsed();

    let tasks = snapshot
        .tasks
        .iter()
        .map(|task| TaskBreakdown {
            name: task.name.clone(),
            hours_manually: parse_decimal(&task.hours),
            savings: calculate_savings(&task.hours, efficiency_gain_percent, hourly_rate),
        })
        .collect();

    let totals = calculate_totals(
        &snapshot.tasks,
        efficiency_gain_percent,
        hourly_rate,
        rfps_per_year,
    );
    let growth = calculate_growth_potential(additional_rfps, conversion_rate, average_award_size);

    RoiSummary {
        tasks,
        totals,
        annual: AnnualEfficiency::from_totals(&totals, rfps_per_year),
        growth,
        combined_impact: totals.annual_savings + growth.potential_new_revenue,
    }
}
