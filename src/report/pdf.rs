//! Fixed-layout, single-page PDF rendering with the standard Type1 fonts.
//!
//! Content streams are left uncompressed so the digests stay greppable in the
//! raw file.

use std::path::Path;

use humansize::{format_size, BINARY};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::constants::{APP_NAME, REPORT_TITLE};
use crate::error::AcquisitionError;
use crate::report::{EvidenceEntry, ReportData};

// A4 in points
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;

// Courier glyphs are all 600/1000 em wide
const COURIER_ADVANCE: f32 = 0.6;
// Helvetica is proportional; this bounds its wider capitals
const HELVETICA_ADVANCE: f32 = 0.667;

const CONTINUATION_INDENT: &str = "  ";

/// Whole points are precise enough for this layout
fn points(value: f32) -> Object {
    Object::Integer(value.round() as i64)
}

/// Encode `text` for a WinAnsiEncoding font.
///
/// Printable ASCII and Latin-1 map to the same byte. Anything else has no
/// glyph in the standard fonts and becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

fn pdf_string(text: &str) -> Object {
    Object::String(win_ansi(text), StringFormat::Literal)
}

/// Split `text` into lines of at most `max_chars`, preferring to break after a
/// space or path separator. Continuation lines are indented.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut width = max_chars.max(1);

    while chars.len() - start > width {
        let window = &chars[start..start + width];
        let cut = window
            .iter()
            .rposition(|&c| matches!(c, ' ' | '/' | '\\'))
            .filter(|&i| i >= width / 2)
            .map(|i| i + 1)
            .unwrap_or(width);
        lines.push(window[..cut].iter().collect::<String>());
        start += cut;
        width = max_chars.saturating_sub(CONTINUATION_INDENT.len()).max(1);
    }
    lines.push(chars[start..].iter().collect());

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.trim_end().to_string()
            } else {
                format!("{}{}", CONTINUATION_INDENT, line.trim_end())
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum Font {
    Courier,
    CourierBold,
    Helvetica,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Courier => "F1",
            Font::CourierBold => "F2",
            Font::Helvetica => "F3",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Font::Courier => "Courier",
            Font::CourierBold => "Courier-Bold",
            Font::Helvetica => "Helvetica",
        }
    }

    fn advance(self) -> f32 {
        match self {
            Font::Courier | Font::CourierBold => COURIER_ADVANCE,
            Font::Helvetica => HELVETICA_ADVANCE,
        }
    }

    /// Characters that fit between the margins at `size`
    fn max_chars(self, size: f32) -> usize {
        ((PAGE_WIDTH - 2.0 * MARGIN) / (size * self.advance())) as usize
    }
}

/// Accumulates text operations top to bottom
struct PageWriter {
    operations: Vec<Operation>,
    cursor: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            operations: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn text_at(&mut self, font: Font, size: f32, x: f32, text: &str) {
        self.operations.push(Operation::new("BT", vec![]));
        self.operations.push(Operation::new(
            "Tf",
            vec![font.resource_name().into(), points(size)],
        ));
        self.operations.push(Operation::new("Td", vec![points(x), points(self.cursor)]));
        self.operations.push(Operation::new("Tj", vec![pdf_string(text)]));
        self.operations.push(Operation::new("ET", vec![]));
        self.cursor -= size * 1.6;
    }

    fn line(&mut self, font: Font, size: f32, text: &str) {
        for piece in wrap_text(text, font.max_chars(size)) {
            self.text_at(font, size, MARGIN, &piece);
        }
    }

    /// Center a Courier line using its fixed advance width
    fn centered(&mut self, font: Font, size: f32, text: &str) {
        let width = text.chars().count() as f32 * size * font.advance();
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
        self.text_at(font, size, x, text);
    }

    fn gap(&mut self, amount: f32) {
        self.cursor -= amount;
    }

    fn evidence(&mut self, heading: &str, entry: &EvidenceEntry) {
        self.line(Font::CourierBold, 10.0, heading);
        self.line(Font::Courier, 10.0, entry.digest.as_str());
        if let Some(mode) = &entry.mode {
            self.line(Font::Courier, 9.0, &format!("Mode: {}", mode.description()));
        }
        if let Some(size) = entry.file_size {
            self.line(
                Font::Courier,
                9.0,
                &format!("Size: {} ({} bytes)", format_size(size, BINARY), size),
            );
        }
        if let Some(path) = &entry.path {
            self.line(Font::Courier, 9.0, &format!("File: {}", path.display()));
        }
        if let Some(source) = &entry.source {
            self.line(Font::Courier, 9.0, &format!("Source: {}", source.display()));
        }
    }
}

/// Build the chain of custody document in memory
pub fn render_report(data: &ReportData) -> Result<Document, AcquisitionError> {
    let mut page = PageWriter::new();

    page.centered(Font::CourierBold, 16.0, REPORT_TITLE);
    page.gap(16.0);

    let date = data.generated_at.format("%Y-%m-%d %H:%M:%S%.6f");
    page.line(Font::Helvetica, 12.0, &format!("Date: {}", date));
    page.line(Font::Helvetica, 12.0, &format!("Case ID: {}", data.case_id));
    page.line(Font::Helvetica, 12.0, &format!("Host: {}", data.hostname));
    page.gap(16.0);

    page.line(Font::CourierBold, 12.0, "EVIDENCE MANIFEST:");
    page.gap(6.0);
    page.evidence("RAM DUMP (SHA-256):", &data.ram);
    page.gap(10.0);
    page.evidence("DISK IMAGE (SHA-256):", &data.disk);

    if data.ram.mode.as_ref().is_some_and(|m| m.is_simulated()) {
        page.gap(16.0);
        page.line(
            Font::Helvetica,
            10.0,
            "NOTE: The RAM artifact was SIMULATED. It holds synthetic data, not memory contents.",
        );
    }

    let content = Content {
        operations: page.operations,
    };
    let encoded = content
        .encode()
        .map_err(|e| AcquisitionError::Report(format!("Failed to encode page content: {}", e)))?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for font in [Font::Courier, Font::CourierBold, Font::Helvetica] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), points(PAGE_WIDTH), points(PAGE_HEIGHT)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => pdf_string(REPORT_TITLE),
        "Subject" => pdf_string(&format!("Case {}", data.case_id)),
        "Producer" => pdf_string(&format!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    Ok(doc)
}

/// Render and write the report to `path`, replacing any earlier report
pub fn write_report(data: &ReportData, path: &Path) -> Result<(), AcquisitionError> {
    let mut doc = render_report(data)?;
    doc.save(path)
        .map_err(|e| AcquisitionError::Report(format!("Failed to save {}: {}", path.display(), e)))?;
    Ok(())
}
