//! Input snapshot and lenient numeric parsing.
//!
//! Every field is kept as the text the user typed. Numbers are only extracted at
//! calculation time, and text that does not start with a number reads as 0.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::roi::format::to_fixed;

/// Share of yearly RFPs a customer can additionally pursue with freed capacity.
pub const ADDITIONAL_RFP_FACTOR: f64 = 0.2;

/// One line of the efficiency table. Only `hours` is user-editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(deserialize_with = "numeric_text")]
    pub hours: String,
}

impl Task {
    pub fn new(name: impl Into<String>, hours: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hours: hours.into(),
        }
    }
}

/// Complete, immutable copy of every calculator field.
///
/// Calculations read only from a snapshot, never from live session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    #[serde(deserialize_with = "numeric_text")]
    pub rfps_per_year: String,
    #[serde(deserialize_with = "numeric_text")]
    pub hourly_rate: String,
    #[serde(deserialize_with = "numeric_text")]
    pub efficiency_gain_percent: String,
    #[serde(deserialize_with = "numeric_text")]
    pub additional_rfps: String,
    #[serde(deserialize_with = "numeric_text")]
    pub average_award_size: String,
    #[serde(deserialize_with = "numeric_text")]
    pub conversion_rate: String,
    pub tasks: Vec<Task>,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            rfps_per_year: "24".to_string(),
            hourly_rate: "75".to_string(),
            efficiency_gain_percent: "85".to_string(),
            additional_rfps: derive_additional_rfps("24"),
            average_award_size: "1000000".to_string(),
            conversion_rate: "25".to_string(),
            tasks: seed_tasks(),
        }
    }
}

/// The seven proposal tasks every calculator starts with.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task::new(
            "Requirements Compliance Matrix (e.g. Shredding a doc to Excel)",
            "12",
        ),
        Task::new("Discovery (e.g. Gap analysis across docs)", "5"),
        Task::new("Past Performance and Existing Content Search", "3"),
        Task::new(
            "Compliant Outline (e.g. Marrying sections L & M, mapping PWS requirements, etc.)",
            "5",
        ),
        Task::new("Content Drafting (e.g. Pink/Red team)", "30"),
        Task::new(
            "Color Team Reviews (e.g. Editing and reviewing a draft)",
            "10",
        ),
        Task::new("Acronym Checking", "3"),
    ]
}

/// Numeric view of the six scalar fields, each coerced with [`parse_decimal`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParsedInputs {
    pub rfps_per_year: f64,
    pub hourly_rate: f64,
    pub efficiency_gain_percent: f64,
    pub additional_rfps: f64,
    pub average_award_size: f64,
    pub conversion_rate: f64,
}

impl InputSnapshot {
    pub fn parsed(&self) -> ParsedInputs {
        ParsedInputs {
            rfps_per_year: parse_decimal(&self.rfps_per_year),
            hourly_rate: parse_decimal(&self.hourly_rate),
            efficiency_gain_percent: parse_decimal(&self.efficiency_gain_percent),
            additional_rfps: parse_decimal(&self.additional_rfps),
            average_award_size: parse_decimal(&self.average_award_size),
            conversion_rate: parse_decimal(&self.conversion_rate),
        }
    }
}

/// Text written into `additional_rfps` whenever `rfps_per_year` changes.
pub fn derive_additional_rfps(rfps_per_year: &str) -> String {
    let derived = round_half_up(parse_decimal(rfps_per_year) * ADDITIONAL_RFP_FACTOR);
    // whole number; to_fixed also folds -0 into "0" and spells out "Infinity"
    to_fixed(derived, 0)
}

/// Parses the leading decimal number of `text`, returning 0 when there is none.
///
/// Accepts `[+-]? digits [. digits] [(e|E) [+-]? digits]` after optional leading
/// whitespace; anything after the longest such prefix is ignored. A leading
/// `Infinity` and exponents that overflow read as signed infinity.
pub fn parse_decimal(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if mantissa_digits > 0 || frac_end > frac_start {
            mantissa_digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return 0.0;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(0.0)
}

/// Rounds to the nearest integer, breaking ties toward positive infinity.
///
/// `f64::round` breaks ties away from zero instead, so the two disagree on
/// negative halves: `round_half_up(-2.5) == -2.0` while `(-2.5f64).round() == -3.0`.
pub fn round_half_up(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Accepts a JSON string, number or null for a numeric text field.
pub(crate) fn numeric_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}
