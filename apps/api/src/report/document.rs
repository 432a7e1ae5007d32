//! Report Document: the exportable summary as pages of typed blocks.
//!
//! Built from a [`Calculation`]: every figure is copied from its display strings,
//! nothing is recomputed here, so the export always matches the interactive view.
//!
//! # Pages
//! 1. Cover: headline Annual ROI plus efficiency and growth highlights.
//! 2. Company data, the per-task efficiency table and annual efficiency savings.
//! 3. Growth goals, growth potential and the total annual impact.

use serde::{Deserialize, Serialize};

use crate::roi::Calculation;

/// Fixed name every exported report is downloaded as.
pub const REPORT_FILE_NAME: &str = "GovEagle_ROI_Analysis.pdf";
pub const PRODUCT_NAME: &str = "GovEagle";

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub header: String,
    pub align: Align,
    /// Share of the text width, columns of a table sum to 1.0.
    pub width_fraction: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    /// Emphasized closing row (totals).
    pub footer: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Title(String),
    Subtitle(String),
    SectionHeading(String),
    /// A label on the left with its value right-aligned.
    Metric { label: String, value: String },
    /// A large centered figure with a label above and caption below.
    Headline {
        label: String,
        value: String,
        caption: String,
    },
    Table(Table),
    Note(String),
    Spacer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportPage {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub file_name: String,
    pub pages: Vec<ReportPage>,
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

pub fn build_report(calc: &Calculation) -> ReportDocument {
    ReportDocument {
        title: format!("{PRODUCT_NAME} ROI Analysis"),
        file_name: REPORT_FILE_NAME.to_string(),
        pages: vec![cover_page(calc), breakdown_page(calc), growth_page(calc)],
    }
}

fn metric(label: &str, value: &str) -> Block {
    Block::Metric {
        label: label.to_string(),
        value: value.to_string(),
    }
}

fn cover_page(calc: &Calculation) -> ReportPage {
    let headline = &calc.display.headline;
    ReportPage {
        blocks: vec![
            Block::Title("ROI Calculator".to_string()),
            Block::Subtitle(format!(
                "Discover Your Potential Savings with {PRODUCT_NAME}"
            )),
            Block::Spacer,
            Block::Headline {
                label: "Your Annual ROI".to_string(),
                value: headline.annual_roi.clone(),
                caption: "Projected Annual Impact".to_string(),
            },
            Block::Spacer,
            Block::SectionHeading("Efficiency Metrics".to_string()),
            metric("Annual Cost Savings", &headline.annual_cost_savings),
            metric("Efficiency Improvement", &headline.efficiency_improvement),
            Block::Spacer,
            Block::SectionHeading("Growth Potential".to_string()),
            metric("Potential New Revenue", &headline.potential_new_revenue),
            metric("Projected New Contract Wins", &headline.projected_new_wins),
        ],
    }
}

fn breakdown_page(calc: &Calculation) -> ReportPage {
    let inputs = &calc.inputs;
    let display = &calc.display;

    let column = |header: &str, align: Align, width_fraction: f32| Column {
        header: header.to_string(),
        align,
        width_fraction,
    };
    let table = Table {
        columns: vec![
            column("Task", Align::Left, 0.40),
            column("Avg. Hours Manually", Align::Right, 0.15),
            column(&format!("Hours using {PRODUCT_NAME}"), Align::Right, 0.15),
            column("Hours Saved per Cycle", Align::Right, 0.15),
            column("Cost Savings ($)", Align::Right, 0.15),
        ],
        rows: display
            .tasks
            .iter()
            .map(|row| {
                vec![
                    row.name.clone(),
                    row.hours_manually.clone(),
                    row.hours_using.clone(),
                    row.hours_saved.clone(),
                    row.cost_savings.clone(),
                ]
            })
            .collect(),
        footer: Some(vec![
            "Totals".to_string(),
            display.totals.hours_manually.clone(),
            display.totals.hours_using.clone(),
            display.totals.hours_saved.clone(),
            display.totals.cost_savings.clone(),
        ]),
    };

    ReportPage {
        blocks: vec![
            Block::SectionHeading("1. Company Data".to_string()),
            metric("RFPs / Proposals per year", &inputs.rfps_per_year),
            metric("Fully Burdened Average Hourly Rate ($)", &inputs.hourly_rate),
            metric(
                "Average efficiency gain per task (%)",
                &inputs.efficiency_gain_percent,
            ),
            Block::Note(
                "Fully burdened includes employer costs like social security etc.".to_string(),
            ),
            Block::Spacer,
            Block::SectionHeading("2. Efficiency Increase Per Cycle".to_string()),
            Block::Table(table),
            Block::Spacer,
            Block::SectionHeading("Annual Efficiency Savings".to_string()),
            metric("Hours Manually", &display.annual.hours_manually),
            metric(
                &format!("Hours using {PRODUCT_NAME}"),
                &display.annual.hours_using,
            ),
            metric("Total Hours Saved", &display.annual.hours_saved),
            metric("Cost Savings", &display.annual.cost_savings),
        ],
    }
}

fn growth_page(calc: &Calculation) -> ReportPage {
    let display = &calc.display;
    ReportPage {
        blocks: vec![
            Block::SectionHeading("3. Growth Goals".to_string()),
            metric(
                "Additional RFPs pursued with saved time",
                &display.growth.additional_rfps,
            ),
            metric(
                "Average contract award size ($)",
                &calc.inputs.average_award_size,
            ),
            metric("Conversion rate (%)", &calc.inputs.conversion_rate),
            Block::Spacer,
            Block::SectionHeading("Growth Potential".to_string()),
            metric("Additional RFPs", &display.growth.additional_rfps),
            metric("Win Rate", &display.growth.win_rate),
            metric("Potential New Wins", &display.growth.potential_new_wins),
            metric("Potential New Revenue", &display.growth.potential_new_revenue),
            Block::Spacer,
            Block::SectionHeading("Annual Efficiency Savings".to_string()),
            metric("Cost Savings", &display.annual.cost_savings),
            Block::Spacer,
            Block::Headline {
                label: "Total Annual Impact".to_string(),
                value: display.headline.annual_roi.clone(),
                caption: "Annual cost savings plus potential new revenue".to_string(),
            },
        ],
    }
}

/// Every string the document would print, in page order.
#[cfg(test)]
pub fn document_text(document: &ReportDocument) -> Vec<String> {
    let mut out = Vec::new();
    for page in &document.pages {
        for block in &page.blocks {
            match block {
                Block::Title(s) | Block::Subtitle(s) | Block::SectionHeading(s) | Block::Note(s) => {
                    out.push(s.clone())
                }
                Block::Metric { label, value } => {
                    out.push(label.clone());
                    out.push(value.clone());
                }
                Block::Headline {
                    label,
                    value,
                    caption,
                } => out.extend([label.clone(), value.clone(), caption.clone()]),
                Block::Table(table) => {
                    out.extend(table.columns.iter().map(|c| c.header.clone()));
                    for row in table.rows.iter().chain(table.footer.iter()) {
                        out.extend(row.iter().cloned());
                    }
                }
                Block::Spacer => {}
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roi::InputSnapshot;

    fn seed_report() -> (Calculation, ReportDocument) {
        let calc = Calculation::from_snapshot(InputSnapshot::default());
        let doc = build_report(&calc);
        (calc, doc)
    }

    #[test]
    fn test_three_pages_with_fixed_file_name() {
        let (_, doc) = seed_report();
        assert_eq!(doc.pages.len(), 3);
        assert_eq!(doc.file_name, "GovEagle_ROI_Analysis.pdf");
    }

    #[test]
    fn test_cover_leads_with_combined_impact() {
        let (_, doc) = seed_report();
        let headline = doc.pages[0]
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Headline { value, .. } => Some(value.as_str()),
                _ => None,
            });
        assert_eq!(headline, Some("$1,104,040"));
    }

    #[test]
    fn test_table_mirrors_display_rows() {
        let (calc, doc) = seed_report();
        let table = doc.pages[1]
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .expect("breakdown page has a table");
        assert_eq!(table.rows.len(), calc.display.tasks.len());
        assert_eq!(table.rows[0][4], "$765");
        let footer = table.footer.as_ref().unwrap();
        assert_eq!(footer[..], ["Totals", "68.0", "10.2", "57.8", "$4335"]);
        let widths: f32 = table.columns.iter().map(|c| c.width_fraction).sum();
        assert!((widths - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_every_display_figure_reaches_the_document() {
        let (calc, doc) = seed_report();
        let text = document_text(&doc);
        let d = &calc.display;
        for figure in [
            &d.headline.annual_roi,
            &d.headline.annual_cost_savings,
            &d.headline.efficiency_improvement,
            &d.headline.potential_new_revenue,
            &d.headline.projected_new_wins,
            &d.annual.hours_manually,
            &d.annual.hours_using,
            &d.annual.hours_saved,
            &d.growth.win_rate,
            &d.totals.cost_savings,
        ] {
            assert!(text.contains(figure), "missing {figure}");
        }
    }

    #[test]
    fn test_report_uses_display_strings_verbatim() {
        let mut calc = Calculation::from_snapshot(InputSnapshot::default());
        // A report built from a tampered display shows the tampered text, proving
        // the builder copies rather than recomputes.
        calc.display.headline.annual_roi = "$42".to_string();
        let doc = build_report(&calc);
        assert!(document_text(&doc).contains(&"$42".to_string()));
        assert!(!document_text(&doc).contains(&"$1,104,040".to_string()));
    }

    #[test]
    fn test_raw_inputs_are_echoed() {
        let snapshot = InputSnapshot {
            hourly_rate: "82.50".to_string(),
            ..InputSnapshot::default()
        };
        let doc = build_report(&Calculation::from_snapshot(snapshot));
        assert!(document_text(&doc).contains(&"82.50".to_string()));
    }
}
