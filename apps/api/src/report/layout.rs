//! Report Layout: positions every block of a [`ReportDocument`] on fixed-size pages.
//!
//! Coordinates are millimetres from the bottom-left corner (the PDF convention);
//! `y_mm` is the text baseline. A page whose blocks run past the bottom margin
//! continues on an extra page; table rows never split, and a table that continues
//! repeats its header row.

use serde::{Deserialize, Serialize};

use crate::report::document::{Align, Block, ReportDocument, Table};
use crate::report::metrics::{get_metrics, FontWeight, PT_TO_MM};

// ────────────────────────────────────────────────────────────────────────────
// Page setup
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSetup {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    pub body_size_pt: f32,
    /// Baseline-to-baseline distance as a multiple of the font size.
    pub leading: f32,
}

impl PageSetup {
    pub fn text_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    fn line_height_mm(&self, size_pt: f32) -> f32 {
        size_pt * self.leading * PT_TO_MM
    }
}

/// US letter, 20mm margins, 10pt body text.
pub fn default_page_setup() -> PageSetup {
    PageSetup {
        width_mm: 215.9,
        height_mm: 279.4,
        margin_mm: 20.0,
        body_size_pt: 10.0,
        leading: 1.35,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Body,
    Muted,
    Accent,
    Strong,
}

/// One positioned piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub size_pt: f32,
    pub weight: FontWeight,
    pub tone: Tone,
}

#[cfg(test)]
impl TextRun {
    pub fn width_mm(&self) -> f32 {
        get_metrics(self.weight).width_mm(&self.text, self.size_pt)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaidOutPage {
    pub runs: Vec<TextRun>,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

pub fn layout_document(document: &ReportDocument, setup: &PageSetup) -> Vec<LaidOutPage> {
    let mut pages = Vec::new();
    for page in &document.pages {
        let mut cursor = Cursor::new(setup);
        for block in &page.blocks {
            cursor.place(block);
        }
        pages.extend(cursor.finish());
    }
    pages
}

/// Flows blocks down a page, starting a continuation page when space runs out.
struct Cursor<'a> {
    setup: &'a PageSetup,
    done: Vec<LaidOutPage>,
    current: LaidOutPage,
    /// Top of the free space on the current page.
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(setup: &'a PageSetup) -> Self {
        Self {
            setup,
            done: Vec::new(),
            current: LaidOutPage::default(),
            y: setup.height_mm - setup.margin_mm,
        }
    }

    fn finish(mut self) -> Vec<LaidOutPage> {
        self.done.push(self.current);
        self.done
    }

    fn remaining(&self) -> f32 {
        self.y - self.setup.margin_mm
    }

    /// Moves to a fresh page unless `height` still fits. An empty page always
    /// accepts, so an oversized block cannot loop forever.
    fn ensure(&mut self, height: f32) {
        if height > self.remaining() && !self.current.runs.is_empty() {
            self.done.push(std::mem::take(&mut self.current));
            self.y = self.setup.height_mm - self.setup.margin_mm;
        }
    }

    fn left(&self) -> f32 {
        self.setup.margin_mm
    }

    fn right(&self) -> f32 {
        self.setup.width_mm - self.setup.margin_mm
    }

    fn push(&mut self, text: &str, x_mm: f32, y_mm: f32, size_pt: f32, weight: FontWeight, tone: Tone) {
        if text.is_empty() {
            return;
        }
        self.current.runs.push(TextRun {
            text: text.to_string(),
            x_mm,
            y_mm,
            size_pt,
            weight,
            tone,
        });
    }

    /// Lays out wrapped lines starting at the cursor; returns nothing, advances `y`.
    fn paragraph(&mut self, text: &str, size_pt: f32, weight: FontWeight, tone: Tone, centered: bool) {
        let metrics = get_metrics(weight);
        let line_h = self.setup.line_height_mm(size_pt);
        for line in metrics.wrap(text, self.setup.text_width_mm(), size_pt) {
            self.ensure(line_h);
            let x = if centered {
                (self.setup.width_mm - metrics.width_mm(&line, size_pt)) / 2.0
            } else {
                self.left()
            };
            let baseline = self.y - size_pt * PT_TO_MM;
            self.push(&line, x, baseline, size_pt, weight, tone);
            self.y -= line_h;
        }
    }

    fn place(&mut self, block: &Block) {
        let body = self.setup.body_size_pt;
        match block {
            Block::Title(text) => self.paragraph(text, body * 2.4, FontWeight::Bold, Tone::Strong, true),
            Block::Subtitle(text) => self.paragraph(text, body * 1.2, FontWeight::Regular, Tone::Muted, true),
            Block::SectionHeading(text) => {
                self.ensure(self.setup.line_height_mm(body) * 3.0);
                self.y -= self.setup.line_height_mm(body) * 0.4;
                self.paragraph(text, body * 1.3, FontWeight::Bold, Tone::Accent, false);
            }
            Block::Metric { label, value } => self.metric(label, value),
            Block::Headline {
                label,
                value,
                caption,
            } => {
                let needed = self.setup.line_height_mm(body * 1.4)
                    + self.setup.line_height_mm(body * 3.6)
                    + self.setup.line_height_mm(body);
                self.ensure(needed);
                self.paragraph(label, body * 1.4, FontWeight::Bold, Tone::Accent, true);
                self.paragraph(value, body * 3.6, FontWeight::Bold, Tone::Strong, true);
                self.paragraph(caption, body, FontWeight::Regular, Tone::Muted, true);
            }
            Block::Table(table) => self.table(table),
            Block::Note(text) => self.paragraph(text, body * 0.85, FontWeight::Regular, Tone::Muted, false),
            Block::Spacer => self.y -= self.setup.line_height_mm(body),
        }
    }

    /// Label left, value right-aligned, on one line when the label fits beside it.
    fn metric(&mut self, label: &str, value: &str) {
        let size = self.setup.body_size_pt;
        let line_h = self.setup.line_height_mm(size);
        let value_metrics = get_metrics(FontWeight::Bold);
        let value_w = value_metrics.width_mm(value, size);
        let gap = 4.0;
        let label_width = (self.setup.text_width_mm() - value_w - gap).max(self.setup.text_width_mm() / 2.0);
        let label_lines = get_metrics(FontWeight::Regular).wrap(label, label_width, size);

        self.ensure(line_h * label_lines.len() as f32);
        let first_baseline = self.y - size * PT_TO_MM;
        for (i, line) in label_lines.iter().enumerate() {
            let baseline = first_baseline - i as f32 * line_h;
            self.push(line, self.left(), baseline, size, FontWeight::Regular, Tone::Body);
        }
        self.push(
            value,
            self.right() - value_w,
            first_baseline,
            size,
            FontWeight::Bold,
            Tone::Body,
        );
        self.y -= line_h * label_lines.len() as f32;
    }

    fn table(&mut self, table: &Table) {
        let size = self.setup.body_size_pt * 0.9;
        let header: Vec<String> = table.columns.iter().map(|c| c.header.clone()).collect();
        let header_h = self.row_height(table, &header, size, FontWeight::Bold);

        // Keep the header with at least the first row.
        let first_h = table
            .rows
            .first()
            .map(|r| self.row_height(table, r, size, FontWeight::Regular))
            .unwrap_or(0.0);
        self.ensure(header_h + first_h);
        self.row(table, &header, size, FontWeight::Bold, Tone::Accent);

        for row in &table.rows {
            let h = self.row_height(table, row, size, FontWeight::Regular);
            if h > self.remaining() && !self.current.runs.is_empty() {
                self.ensure(h + header_h);
                self.row(table, &header, size, FontWeight::Bold, Tone::Accent);
            }
            self.row(table, row, size, FontWeight::Regular, Tone::Body);
        }
        if let Some(footer) = &table.footer {
            let h = self.row_height(table, footer, size, FontWeight::Bold);
            self.ensure(h);
            self.row(table, footer, size, FontWeight::Bold, Tone::Strong);
        }
    }

    /// Cell text lines for every column of `cells`.
    fn wrap_cells(&self, table: &Table, cells: &[String], size: f32, weight: FontWeight) -> Vec<Vec<String>> {
        let metrics = get_metrics(weight);
        let text_width = self.setup.text_width_mm();
        table
            .columns
            .iter()
            .zip(cells)
            .map(|(col, cell)| metrics.wrap(cell, col.width_fraction * text_width - CELL_PADDING_MM, size))
            .collect()
    }

    fn row_height(&self, table: &Table, cells: &[String], size: f32, weight: FontWeight) -> f32 {
        let lines = self
            .wrap_cells(table, cells, size, weight)
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(1);
        lines as f32 * self.setup.line_height_mm(size) + ROW_GAP_MM
    }

    fn row(&mut self, table: &Table, cells: &[String], size: f32, weight: FontWeight, tone: Tone) {
        let height = self.row_height(table, cells, size, weight);
        self.ensure(height);
        let metrics = get_metrics(weight);
        let line_h = self.setup.line_height_mm(size);
        let text_width = self.setup.text_width_mm();
        let first_baseline = self.y - size * PT_TO_MM;

        let mut col_left = self.left();
        let wrapped = self.wrap_cells(table, cells, size, weight);
        for (col, lines) in table.columns.iter().zip(wrapped) {
            let col_width = col.width_fraction * text_width;
            for (i, line) in lines.iter().enumerate() {
                let x = match col.align {
                    Align::Left => col_left,
                    Align::Right => col_left + col_width - metrics.width_mm(line, size),
                };
                self.push(line, x, first_baseline - i as f32 * line_h, size, weight, tone);
            }
            col_left += col_width;
        }
        self.y -= height;
    }
}

const CELL_PADDING_MM: f32 = 3.0;
const ROW_GAP_MM: f32 = 1.5;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::document::{build_report, document_text, Column, ReportPage};
    use crate::roi::inputs::Task;
    use crate::roi::{Calculation, InputSnapshot};

    fn seed_layout() -> (ReportDocument, Vec<LaidOutPage>) {
        let doc = build_report(&Calculation::from_snapshot(InputSnapshot::default()));
        let pages = layout_document(&doc, &default_page_setup());
        (doc, pages)
    }

    fn assert_inside_margins(pages: &[LaidOutPage], setup: &PageSetup) {
        for (p, page) in pages.iter().enumerate() {
            for run in &page.runs {
                assert!(run.x_mm >= setup.margin_mm - 1e-3, "page {p}: {run:?} left of margin");
                assert!(
                    run.x_mm + run.width_mm() <= setup.width_mm - setup.margin_mm + 1e-3,
                    "page {p}: {run:?} past right margin"
                );
                assert!(run.y_mm >= setup.margin_mm - 1e-3, "page {p}: {run:?} below bottom margin");
                assert!(run.y_mm <= setup.height_mm - setup.margin_mm, "page {p}: {run:?} above top margin");
            }
        }
    }

    #[test]
    fn test_seed_report_is_three_pages() {
        let (_, pages) = seed_layout();
        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|p| !p.runs.is_empty()));
    }

    #[test]
    fn test_seed_report_stays_inside_margins() {
        let (_, pages) = seed_layout();
        assert_inside_margins(&pages, &default_page_setup());
    }

    #[test]
    fn test_runs_descend_down_the_page() {
        let (_, pages) = seed_layout();
        let ys: Vec<f32> = pages[0].runs.iter().map(|r| r.y_mm).collect();
        assert!(ys.windows(2).all(|w| w[1] <= w[0] + 1e-3), "cover runs not top-down: {ys:?}");
    }

    #[test]
    fn test_numeric_cells_are_right_aligned() {
        let (_, pages) = seed_layout();
        let setup = default_page_setup();
        let right_edge = setup.width_mm - setup.margin_mm;
        let totals = pages[1]
            .runs
            .iter()
            .find(|r| r.text == "$4335")
            .expect("totals cost cell present");
        assert!((totals.x_mm + totals.width_mm() - right_edge).abs() < 1e-3);
        assert_eq!(totals.weight, FontWeight::Bold);
    }

    #[test]
    fn test_long_task_name_wraps_inside_its_column() {
        let (_, pages) = seed_layout();
        let setup = default_page_setup();
        let task_col_right = setup.margin_mm + 0.40 * setup.text_width_mm();
        let outline_lines: Vec<&TextRun> = pages[1]
            .runs
            .iter()
            .filter(|r| r.x_mm == setup.margin_mm && r.size_pt < setup.body_size_pt)
            .filter(|r| r.text.contains("Outline") || r.text.contains("PWS"))
            .collect();
        assert!(!outline_lines.is_empty());
        for run in outline_lines {
            assert!(run.x_mm + run.width_mm() <= task_col_right);
        }
    }

    #[test]
    fn test_all_document_text_is_placed() {
        let (doc, pages) = seed_layout();
        let placed: String = pages
            .iter()
            .flat_map(|p| p.runs.iter().map(|r| r.text.as_str()))
            .collect::<Vec<_>>()
            .join(" ");
        for text in document_text(&doc) {
            for word in text.split_whitespace() {
                assert!(placed.contains(word), "'{word}' never placed");
            }
        }
    }

    #[test]
    fn test_long_task_list_continues_with_repeated_header() {
        let tasks: Vec<Task> = (0..80)
            .map(|i| Task::new(format!("Review cycle {i}"), "2"))
            .collect();
        let snapshot = InputSnapshot {
            tasks,
            ..InputSnapshot::default()
        };
        let doc = build_report(&Calculation::from_snapshot(snapshot));
        let setup = default_page_setup();
        let pages = layout_document(&doc, &setup);

        assert!(pages.len() > 3, "expected overflow pages, got {}", pages.len());
        assert_inside_margins(&pages, &setup);
        let header_count = pages
            .iter()
            .flat_map(|p| &p.runs)
            .filter(|r| r.text == "Task")
            .count();
        assert!(header_count >= 2, "header not repeated");
        let last_row = pages.iter().flat_map(|p| &p.runs).any(|r| r.text == "Review cycle 79");
        assert!(last_row);
    }

    #[test]
    fn test_empty_table_still_renders_header_and_footer() {
        let doc = ReportDocument {
            title: "t".to_string(),
            file_name: "t.pdf".to_string(),
            pages: vec![ReportPage {
                blocks: vec![Block::Table(Table {
                    columns: vec![Column {
                        header: "Task".to_string(),
                        align: Align::Left,
                        width_fraction: 1.0,
                    }],
                    rows: vec![],
                    footer: Some(vec!["Totals".to_string()]),
                })],
            }],
        };
        let pages = layout_document(&doc, &default_page_setup());
        let texts: Vec<&str> = pages[0].runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["Task", "Totals"]);
    }
}
