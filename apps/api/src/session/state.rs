//! Edit events and the update policy applied to a calculator's fields.
//!
//! # Cascade rule
//! Editing `rfps_per_year` overwrites `additional_rfps` with `round(rfps × 0.2)`,
//! discarding any value the user typed there. Editing `additional_rfps` never flows
//! back, and no other edit touches it.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::roi::inputs::{derive_additional_rfps, numeric_text};
use crate::roi::InputSnapshot;

/// A single field change, tagged by the field it targets.
///
/// ```json
/// {"field": "rfps_per_year", "value": "50"}
/// {"field": "task_hours", "index": 2, "value": "8"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum FieldEdit {
    RfpsPerYear {
        #[serde(deserialize_with = "numeric_text")]
        value: String,
    },
    HourlyRate {
        #[serde(deserialize_with = "numeric_text")]
        value: String,
    },
    EfficiencyGainPercent {
        #[serde(deserialize_with = "numeric_text")]
        value: String,
    },
    AdditionalRfps {
        #[serde(deserialize_with = "numeric_text")]
        value: String,
    },
    AverageAwardSize {
        #[serde(deserialize_with = "numeric_text")]
        value: String,
    },
    ConversionRate {
        #[serde(deserialize_with = "numeric_text")]
        value: String,
    },
    TaskHours {
        index: usize,
        #[serde(deserialize_with = "numeric_text")]
        value: String,
    },
}

/// Current text of every field in one calculator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatorState {
    inputs: InputSnapshot,
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn inputs(&self) -> &InputSnapshot {
        &self.inputs
    }

    /// Owned copy for work that outlives the borrow (exports, responses).
    pub fn snapshot(&self) -> InputSnapshot {
        self.inputs.clone()
    }

    /// Applies `edit`. A task index past the end of the list is rejected and the
    /// state is left as it was.
    pub fn apply(&mut self, edit: FieldEdit) -> Result<(), AppError> {
        let inputs = &mut self.inputs;
        match edit {
            FieldEdit::RfpsPerYear { value } => {
                inputs.additional_rfps = derive_additional_rfps(&value);
                inputs.rfps_per_year = value;
            }
            FieldEdit::HourlyRate { value } => inputs.hourly_rate = value,
            FieldEdit::EfficiencyGainPercent { value } => inputs.efficiency_gain_percent = value,
            FieldEdit::AdditionalRfps { value } => inputs.additional_rfps = value,
            FieldEdit::AverageAwardSize { value } => inputs.average_award_size = value,
            FieldEdit::ConversionRate { value } => inputs.conversion_rate = value,
            FieldEdit::TaskHours { index, value } => {
                let task_count = inputs.tasks.len();
                let task = inputs.tasks.get_mut(index).ok_or_else(|| {
                    AppError::Validation(format!(
                        "task index {index} is out of range (calculator has {task_count} tasks)"
                    ))
                })?;
                task.hours = value;
            }
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.inputs = InputSnapshot::default();
    }
}
