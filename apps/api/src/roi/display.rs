//! Display strings for every figure, shared by the API responses and the report.
//!
//! The report copies these strings verbatim so the export can never drift from the
//! interactive view.

use serde::{Deserialize, Serialize};

use crate::roi::format::{
    format_currency, format_currency_grouped, format_hours, format_percent, format_whole,
};
use crate::roi::inputs::InputSnapshot;
use crate::roi::summary::{summarize, RoiSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRowDisplay {
    pub name: String,
    pub hours_manually: String,
    pub hours_using: String,
    pub hours_saved: String,
    pub cost_savings: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsDisplay {
    pub hours_manually: String,
    pub hours_using: String,
    pub hours_saved: String,
    pub cost_savings: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualDisplay {
    pub hours_manually: String,
    pub hours_using: String,
    pub hours_saved: String,
    pub cost_savings: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthDisplay {
    /// Echoed as typed, like the input it comes from.
    pub additional_rfps: String,
    pub win_rate: String,
    pub potential_new_wins: String,
    pub potential_new_revenue: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineDisplay {
    pub annual_roi: String,
    pub annual_cost_savings: String,
    pub efficiency_improvement: String,
    pub potential_new_revenue: String,
    pub projected_new_wins: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDisplay {
    pub tasks: Vec<TaskRowDisplay>,
    pub totals: TotalsDisplay,
    pub annual: AnnualDisplay,
    pub growth: GrowthDisplay,
    pub headline: HeadlineDisplay,
}

impl SummaryDisplay {
    pub fn new(snapshot: &InputSnapshot, summary: &RoiSummary) -> Self {
        let tasks = summary
            .tasks
            .iter()
            .map(|row| TaskRowDisplay {
                name: row.name.clone(),
                hours_manually: format_hours(row.hours_manually),
                hours_using: format_hours(row.savings.hours_using),
                hours_saved: format_hours(row.savings.hours_saved),
                cost_savings: format_currency(row.savings.cost_savings),
            })
            .collect();

        let totals = &summary.totals;
        let annual = &summary.annual;
        let growth = &summary.growth;
        let annual_cost_savings = format_currency_grouped(annual.cost_savings);
        let potential_new_revenue = format_currency_grouped(growth.potential_new_revenue);
        let potential_new_wins = format_whole(growth.potential_new_wins);

        Self {
            tasks,
            totals: TotalsDisplay {
                hours_manually: format_hours(totals.total_hours_manually),
                hours_using: format_hours(totals.total_hours_using),
                hours_saved: format_hours(totals.total_hours_saved),
                cost_savings: format_currency(totals.total_cost_savings),
            },
            annual: AnnualDisplay {
                hours_manually: format_whole(annual.hours_manually),
                hours_using: format_whole(annual.hours_using),
                hours_saved: format_whole(annual.hours_saved),
                cost_savings: annual_cost_savings.clone(),
            },
            growth: GrowthDisplay {
                additional_rfps: snapshot.additional_rfps.clone(),
                win_rate: format_percent(&snapshot.conversion_rate),
                potential_new_wins: potential_new_wins.clone(),
                potential_new_revenue: potential_new_revenue.clone(),
            },
            headline: HeadlineDisplay {
                annual_roi: format_currency_grouped(summary.combined_impact),
                annual_cost_savings,
                efficiency_improvement: format_percent(&snapshot.efficiency_gain_percent),
                potential_new_revenue,
                projected_new_wins: potential_new_wins,
            },
        }
    }
}

/// A snapshot together with everything derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub inputs: InputSnapshot,
    pub summary: RoiSummary,
    pub display: SummaryDisplay,
}

impl Calculation {
    pub fn from_snapshot(inputs: InputSnapshot) -> Self {
        let summary = summarize(&inputs);
        let display = SummaryDisplay::new(&inputs, &summary);
        Self {
            inputs,
            summary,
            display,
        }
    }
}
