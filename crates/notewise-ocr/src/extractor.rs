//! Plain-text extraction from uploaded files.
//!
//! Dispatches on the file extension: text files are decoded directly, PDFs go
//! through their text layer with an OCR fallback for scans, DOCX files are
//! read from `word/document.xml`, and images are OCR'd with a handwriting
//! retry when the first pass finds almost nothing.

use std::io::{Cursor, Read};
use std::sync::Arc;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use notewise_core::error::{NotewiseError, Result};
use notewise_core::{file_extension, FileKind};

use crate::OcrService;

/// Default minimum extracted length before falling back to OCR.
pub const DEFAULT_MIN_TEXT_CHARS: usize = 50;

/// Turns text, PDF, DOCX and image uploads into plain text.
#[derive(Clone)]
pub struct DocumentExtractor {
    ocr: Arc<dyn OcrService>,
    min_text_chars: usize,
}

impl DocumentExtractor {
    pub fn new(ocr: Arc<dyn OcrService>) -> Self {
        Self {
            ocr,
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
        }
    }

    /// Set the length below which PDF text and first-pass image OCR are
    /// considered too short.
    pub fn with_min_text_chars(mut self, min_text_chars: usize) -> Self {
        self.min_text_chars = min_text_chars;
        self
    }

    pub fn ocr(&self) -> &Arc<dyn OcrService> {
        &self.ocr
    }

    /// Extract text from a file, choosing the method by extension.
    ///
    /// Audio files are not handled here and yield `UnsupportedFile`.
    pub async fn extract(&self, filename: &str, data: &[u8]) -> Result<String> {
        let ext = file_extension(filename)
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| NotewiseError::UnsupportedFile(filename.to_string()))?;

        match FileKind::from_extension(&ext) {
            Some(FileKind::Text) => Ok(decode_text(data)),
            Some(FileKind::Document) if ext == "pdf" => self.extract_pdf(data).await,
            Some(FileKind::Document) => extract_docx(data),
            Some(FileKind::Image) => self.extract_image(data).await,
            Some(FileKind::Audio) | None => Err(NotewiseError::UnsupportedFile(ext)),
        }
    }

    /// OCR an image, retrying in handwriting mode when the first pass is short.
    pub async fn extract_image(&self, data: &[u8]) -> Result<String> {
        let printed = self.ocr.extract_text(data).await?;
        if char_len(&printed) >= self.min_text_chars {
            return Ok(printed);
        }

        debug!(chars = char_len(&printed), "Short OCR result, retrying as handwriting");
        match self.ocr.extract_handwriting(data).await {
            Ok(handwriting) if char_len(&handwriting) > char_len(&printed) => Ok(handwriting),
            Ok(_) => Ok(printed),
            Err(e) => {
                warn!(error = %e, "Handwriting OCR failed");
                Ok(printed)
            }
        }
    }

    /// Read the PDF text layer, OCR'ing the rendered pages if it is too short.
    pub async fn extract_pdf(&self, data: &[u8]) -> Result<String> {
        let layer = match extract_pdf_text_layer(data).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "PDF text layer unreadable, falling back to OCR");
                String::new()
            }
        };

        if char_len(&layer) >= self.min_text_chars {
            return Ok(layer);
        }

        debug!(chars = char_len(&layer), "PDF text layer too short, running OCR");
        match self.ocr.extract_pdf_pages(data).await {
            Ok(ocr_text) => Ok(ocr_text),
            Err(e) if !layer.trim().is_empty() => {
                warn!(error = %e, "PDF OCR failed, keeping text layer");
                Ok(layer)
            }
            Err(e) => Err(e),
        }
    }
}

/// Trimmed length in characters.
fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}

/// Decode a text upload, replacing invalid UTF-8 sequences.
pub fn decode_text(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

/// The PDF text layer. Parsing runs on the blocking pool since `pdf-extract`
/// is CPU-bound and may panic on malformed input.
async fn extract_pdf_text_layer(data: &[u8]) -> Result<String> {
    let bytes = data.to_vec();
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| NotewiseError::Extraction(format!("PDF parser panicked: {}", e)))?
        .map_err(|e| NotewiseError::Extraction(format!("PDF parse failed: {}", e)))
}

/// Paragraph text of a DOCX file, one line per `<w:p>`.
pub fn extract_docx(data: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| NotewiseError::Extraction(format!("Invalid DOCX archive: {}", e)))?;

    let mut xml = Vec::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| NotewiseError::Extraction(format!("DOCX has no document body: {}", e)))?
        .read_to_end(&mut xml)?;

    docx_body_text(&xml)
}

fn docx_body_text(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => text.push_str(&String::from_utf8_lossy(&e)),
            Ok(Event::GeneralRef(r)) if in_text_run => {
                if let Some(c) = entity_char(&r) {
                    text.push(c);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(NotewiseError::Extraction(format!(
                    "Malformed DOCX XML at {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
        buf.clear();
    }

    Ok(text.trim_end().to_string())
}

/// Resolve the predefined XML entities and numeric character references.
fn entity_char(name: &[u8]) -> Option<char> {
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        [b'#', b'x', hex @ ..] => u32::from_str_radix(std::str::from_utf8(hex).ok()?, 16)
            .ok()
            .and_then(char::from_u32),
        [b'#', dec @ ..] => std::str::from_utf8(dec)
            .ok()?
            .parse()
            .ok()
            .and_then(char::from_u32),
        _ => None,
    }
}
