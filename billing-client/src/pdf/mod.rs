//! PDF rendering for kacha and pakka bills.
//!
//! A bill is projected into the pure [`DocumentModel`] and the model is
//! drawn page by page: A4 geometry, a flowing cursor, and a fresh page
//! whenever a section would cross the bottom margin. Output is a byte
//! buffer plus the download filename; nothing is written to disk unless
//! the caller asks.

mod document;

pub use document::{
    fmt_money, format_date, format_decimal, sanitize_filename, DocumentModel, PartyBlock, PdfKind,
    TableLine, TextBlock,
};

use crate::error::AppError;
use crate::models::{BillDraft, CompanyProfile};
use crate::services::api::ApiClient;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::path::{Path, PathBuf};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_X: f32 = 15.0;
const MARGIN_TOP: f32 = 14.0;
const MARGIN_BOTTOM: f32 = 14.0;

const CONTENT_RIGHT: f32 = PAGE_W - MARGIN_X;
const CONTENT_WIDTH: f32 = CONTENT_RIGHT - MARGIN_X;

const LINE_H: f32 = 4.4;
const SECTION_GAP: f32 = 7.0;

// Product table column offsets from the left margin.
const COL_SERIAL: f32 = 0.0;
const COL_NAME: f32 = 12.0;
const COL_QTY: f32 = 102.0;
const COL_RATE: f32 = 122.0;
const COL_AMOUNT: f32 = 150.0;
const NAME_WRAP_CHARS: usize = 48;
const BODY_WRAP_CHARS: usize = 95;

/// Approximate Helvetica line width in mm; good enough for centering and
/// right-aligning short strings.
fn approx_width_mm(text: &str, font_size: f32) -> f32 {
    const PT_TO_MM: f32 = 0.3528;
    const AVG_GLYPH_EM: f32 = 0.5;
    text.chars().count() as f32 * font_size * AVG_GLYPH_EM * PT_TO_MM
}

/// A finished document: bytes plus the filename the browser download
/// would have used.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl RenderedPdf {
    /// Write the document into `dir` under its download filename.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, AppError> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Bill-to-PDF renderer.
///
/// Construction performs the one-time generator availability check (font
/// registration against a probe document); a constructed renderer cannot
/// fail for availability reasons afterwards.
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Result<Self, AppError> {
        let (probe, _, _) = PdfDocument::new("probe", Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        probe
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::PdfUnavailable(e.to_string()))?;
        Ok(Self)
    }

    /// Render one bill. The company profile, when supplied, enriches the
    /// pakka "Sold By" block; kacha documents ignore it.
    pub fn render(
        &self,
        kind: PdfKind,
        bill: &BillDraft,
        company: Option<&CompanyProfile>,
    ) -> Result<RenderedPdf, AppError> {
        let model = DocumentModel::build(kind, bill, company);
        let bytes = draw_document(&model)?;
        tracing::info!(filename = %model.filename, "bill rendered to PDF");
        Ok(RenderedPdf {
            filename: model.filename,
            bytes,
        })
    }
}

/// Fetch a bill and render it, the list pages' download action. The
/// company profile is fetched best-effort (cached per client) for pakka
/// enrichment; a profile failure never blocks the download.
pub async fn download_bill_pdf(
    api: &ApiClient,
    renderer: &PdfRenderer,
    kind: PdfKind,
    bill_id: &str,
) -> Result<RenderedPdf, AppError> {
    let bill = match kind {
        PdfKind::Kacha => api.get_kacha_bill(bill_id).await?,
        PdfKind::Pakka => api.get_pakka_bill(bill_id).await?,
    };
    let company = match kind {
        PdfKind::Kacha => None,
        PdfKind::Pakka => api.company_profile().await.ok(),
    };
    renderer.render(kind, &bill, company)
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, AppError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::PdfUnavailable(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::PdfUnavailable(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            font,
            font_bold,
            y: PAGE_H - MARGIN_TOP,
        })
    }

    /// Start a fresh page when `needed` mm would cross the bottom margin.
    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN_BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_H - MARGIN_TOP;
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn text_centered(&self, text: &str, size: f32, bold: bool) {
        let x = MARGIN_X + (CONTENT_WIDTH - approx_width_mm(text, size)) / 2.0;
        self.text(text, size, x.max(MARGIN_X), bold);
    }

    fn text_right(&self, text: &str, size: f32, bold: bool) {
        let x = CONTENT_RIGHT - approx_width_mm(text, size);
        self.text(text, size, x.max(MARGIN_X), bold);
    }

    fn advance(&mut self, amount: f32) {
        self.y -= amount;
    }

    fn rule(&self, x1: f32, x2: f32) {
        self.layer.add_line(printpdf::Line {
            points: vec![
                (printpdf::Point::new(Mm(x1), Mm(self.y)), false),
                (printpdf::Point::new(Mm(x2), Mm(self.y)), false),
            ],
            is_closed: false,
        });
    }

    fn finish(self) -> Result<Vec<u8>, AppError> {
        let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
        self.doc
            .save(&mut writer)
            .map_err(|e| AppError::PdfRender(e.to_string()))?;
        writer
            .into_inner()
            .map_err(|e| AppError::PdfRender(e.to_string()))
    }
}

fn draw_document(model: &DocumentModel) -> Result<Vec<u8>, AppError> {
    let mut page = PageWriter::new(&model.title)?;

    // Title block with a rule underneath.
    page.text_centered(&model.title, 18.0, true);
    page.advance(6.5);
    page.text_centered(&model.subtitle, 9.5, false);
    page.advance(4.0);
    page.rule(MARGIN_X, CONTENT_RIGHT);
    page.advance(SECTION_GAP);

    // Seller block on the left, meta column on the right.
    let parties_top = page.y;
    draw_party(&mut page, &model.seller);
    let seller_bottom = page.y;

    page.y = parties_top;
    for (label, value) in &model.meta {
        page.text_right(&format!("{}: {}", label, value), 9.0, false);
        page.advance(LINE_H);
    }
    page.y = seller_bottom.min(page.y);
    page.advance(SECTION_GAP);

    draw_party(&mut page, &model.buyer);
    page.advance(SECTION_GAP);

    draw_table(&mut page, &model.table);
    page.advance(SECTION_GAP);

    page.ensure_room(LINE_H * 2.0);
    page.text_right(&model.total, 11.0, true);
    page.advance(SECTION_GAP + 2.0);

    if let Some(notes) = &model.notes {
        draw_text_block(&mut page, notes);
    }
    if let Some(terms) = &model.terms {
        draw_text_block(&mut page, terms);
    }

    if let Some(rows) = &model.bank_details {
        page.ensure_room(LINE_H * (rows.len() as f32 + 2.0));
        page.text("Bank Details:", 10.0, MARGIN_X, true);
        page.advance(LINE_H + 1.0);
        for (label, value) in rows {
            page.text(&format!("{}: {}", label, value), 9.0, MARGIN_X, false);
            page.advance(LINE_H);
        }
        page.advance(SECTION_GAP);
    }

    if let Some((left, right)) = &model.signatures {
        draw_signatures(&mut page, left, right);
    }

    // Footer lines, centered and small.
    page.ensure_room(LINE_H * (model.footer.len() as f32 + 2.0));
    page.advance(SECTION_GAP);
    page.rule(MARGIN_X, CONTENT_RIGHT);
    page.advance(LINE_H);
    for line in &model.footer {
        page.text_centered(line, 8.0, false);
        page.advance(LINE_H - 0.6);
    }

    page.finish()
}

fn draw_party(page: &mut PageWriter, party: &PartyBlock) {
    page.ensure_room(LINE_H * (party.lines.len() as f32 + 1.0));
    page.text(&party.heading, 10.0, MARGIN_X, true);
    page.advance(LINE_H + 0.6);
    for (index, line) in party.lines.iter().enumerate() {
        // First line is the party name.
        page.text(line, 9.0, MARGIN_X, index == 0);
        page.advance(LINE_H);
    }
}

fn draw_table(page: &mut PageWriter, lines: &[TableLine]) {
    page.ensure_room(LINE_H * 3.0);
    page.text("#", 9.0, MARGIN_X + COL_SERIAL, true);
    page.text("Product/Service Description", 9.0, MARGIN_X + COL_NAME, true);
    page.text("Qty", 9.0, MARGIN_X + COL_QTY, true);
    page.text("Rate", 9.0, MARGIN_X + COL_RATE, true);
    page.text("Amount", 9.0, MARGIN_X + COL_AMOUNT, true);
    page.advance(2.0);
    page.rule(MARGIN_X, CONTENT_RIGHT);
    page.advance(LINE_H + 0.6);

    for line in lines {
        let name_lines = wrap_text_lines(&line.name, NAME_WRAP_CHARS);
        let row_height = LINE_H * name_lines.len().max(1) as f32 + 1.2;
        page.ensure_room(row_height);

        page.text(&line.serial, 9.0, MARGIN_X + COL_SERIAL, false);
        page.text(&line.quantity, 9.0, MARGIN_X + COL_QTY, false);
        page.text(&line.rate, 9.0, MARGIN_X + COL_RATE, false);
        page.text(&line.amount, 9.0, MARGIN_X + COL_AMOUNT, false);
        for (index, name_line) in name_lines.iter().enumerate() {
            if index > 0 {
                page.advance(LINE_H);
            }
            page.text(name_line, 9.0, MARGIN_X + COL_NAME, false);
        }
        page.advance(LINE_H + 1.2);
    }

    page.advance(0.6);
    page.rule(MARGIN_X, CONTENT_RIGHT);
}

fn draw_text_block(page: &mut PageWriter, block: &TextBlock) {
    let body_lines: Vec<String> = block
        .body
        .lines()
        .flat_map(|line| {
            let wrapped = wrap_text_lines(line, BODY_WRAP_CHARS);
            if wrapped.is_empty() {
                vec![String::new()]
            } else {
                wrapped
            }
        })
        .collect();

    page.ensure_room(LINE_H * (body_lines.len() as f32 + 2.0));
    page.text(&block.heading, 10.0, MARGIN_X, true);
    page.advance(LINE_H + 1.0);
    for line in &body_lines {
        page.ensure_room(LINE_H);
        page.text(line, 8.5, MARGIN_X, false);
        page.advance(LINE_H);
    }
    page.advance(SECTION_GAP - 2.0);
}

fn draw_signatures(page: &mut PageWriter, left: &str, right: &str) {
    const SIG_WIDTH: f32 = 60.0;
    let left_lines: Vec<&str> = left.lines().collect();
    let right_lines: Vec<&str> = right.lines().collect();
    let rows = left_lines.len().max(right_lines.len());

    page.ensure_room(LINE_H * (rows as f32 + 4.0));
    page.advance(SECTION_GAP + 4.0);
    page.rule(MARGIN_X, MARGIN_X + SIG_WIDTH);
    page.rule(CONTENT_RIGHT - SIG_WIDTH, CONTENT_RIGHT);
    page.advance(LINE_H);

    let top = page.y;
    for (index, line) in left_lines.iter().enumerate() {
        page.text(line, 8.5, MARGIN_X, index == 0);
        page.advance(LINE_H);
    }
    page.y = top;
    for (index, line) in right_lines.iter().enumerate() {
        page.text(line, 8.5, CONTENT_RIGHT - SIG_WIDTH, index == 0);
        page.advance(LINE_H);
    }
    page.advance(LINE_H * (rows.saturating_sub(right_lines.len())) as f32);
}

/// Greedy word wrap to a character limit.
fn wrap_text_lines(input: &str, max_chars: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in input.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        out.push(current);
    }

    out
}
