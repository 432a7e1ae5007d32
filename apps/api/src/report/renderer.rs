//! Report renderers: pluggable, trait-based backends that turn a document into bytes.
//!
//! Default: `PdfRenderer` (printpdf with the built-in Helvetica fonts, no font files).
//! `AppState` holds an `Arc<dyn ReportRenderer>`, so tests can swap in a stub.

use std::io::{BufWriter, Cursor};

use async_trait::async_trait;
use bytes::Bytes;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, Rgb};
use tracing::debug;

use crate::errors::AppError;
use crate::report::document::ReportDocument;
use crate::report::layout::{layout_document, LaidOutPage, PageSetup, Tone};
use crate::report::metrics::FontWeight;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ReportRenderer: Send + Sync {
    async fn render(&self, document: ReportDocument) -> Result<Bytes, AppError>;

    /// MIME type of the rendered bytes.
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PdfRenderer
// ────────────────────────────────────────────────────────────────────────────

pub struct PdfRenderer {
    pub setup: PageSetup,
}

impl PdfRenderer {
    pub fn new(setup: PageSetup) -> Self {
        Self { setup }
    }
}

#[async_trait]
impl ReportRenderer for PdfRenderer {
    async fn render(&self, document: ReportDocument) -> Result<Bytes, AppError> {
        let setup = self.setup.clone();
        // Layout and serialization are CPU-bound; keep them off the async workers.
        let bytes = tokio::task::spawn_blocking(move || {
            let pages = layout_document(&document, &setup);
            render_pdf(&document.title, &pages, &setup)
        })
        .await
        .map_err(|e| AppError::Export(format!("render task failed: {e}")))??;
        Ok(Bytes::from(bytes))
    }
}

fn tone_color(tone: Tone) -> Color {
    let (r, g, b) = match tone {
        Tone::Body => (0.10, 0.10, 0.12),
        Tone::Muted => (0.42, 0.45, 0.50),
        Tone::Accent => (0.00, 0.50, 0.52),
        Tone::Strong => (0.05, 0.16, 0.36),
    };
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Writes laid-out pages to a PDF byte buffer.
pub fn render_pdf(title: &str, pages: &[LaidOutPage], setup: &PageSetup) -> Result<Vec<u8>, AppError> {
    let width = Mm(setup.width_mm);
    let height = Mm(setup.height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Page 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Export(format!("font setup failed: {e:?}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::Export(format!("font setup failed: {e:?}")))?;

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, format!("Page {}", index + 1))
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for run in &page.runs {
            let font: &IndirectFontRef = match run.weight {
                FontWeight::Regular => &regular,
                FontWeight::Bold => &bold,
            };
            layer.set_fill_color(tone_color(run.tone));
            layer.use_text(run.text.clone(), run.size_pt, Mm(run.x_mm), Mm(run.y_mm), font);
        }
    }

    let mut writer = BufWriter::new(Cursor::new(Vec::new()));
    doc.save(&mut writer)
        .map_err(|e| AppError::Export(format!("PDF serialization failed: {e:?}")))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Export(format!("PDF buffer flush failed: {e}")))?
        .into_inner();

    debug!(pages = pages.len(), bytes = bytes.len(), "Rendered PDF report");
    Ok(bytes)
}
