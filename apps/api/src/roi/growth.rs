use serde::{Deserialize, Serialize};

use crate::roi::inputs::round_half_up;

/// Extra wins and revenue from pursuing more RFPs with the time saved.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GrowthPotential {
    /// Whole number of wins, rounded half-up.
    pub potential_new_wins: f64,
    /// Not rounded; display truncates to whole currency units.
    pub potential_new_revenue: f64,
}

pub fn calculate_growth_potential(
    additional_rfps: f64,
    conversion_rate: f64,
    average_award_size: f64,
) -> GrowthPotential {
    let potential_new_wins = round_half_up(additional_rfps * (conversion_rate / 100.0));
    GrowthPotential {
        potential_new_wins,
        potential_new_revenue: potential_new_wins * average_award_size,
    }
}
