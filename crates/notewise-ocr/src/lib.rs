//! Notewise OCR crate - OCR engine trait and document text extraction.
//!
//! Provides the OcrService trait for text extraction from images and scanned
//! PDFs, a MockOcrService for testing, a TesseractOcrService that drives the
//! `tesseract` and `pdftoppm` command-line tools, and a DocumentExtractor that
//! turns uploaded text, PDF, DOCX and image files into plain text.

pub mod extractor;
pub mod tesseract;

use async_trait::async_trait;
use notewise_core::error::{NotewiseError, Result};

pub use extractor::DocumentExtractor;
pub use tesseract::TesseractOcrService;

/// Service for extracting text from images and scanned documents.
///
/// Implementations wrap an OCR engine behind a uniform async interface so the
/// HTTP layer can hold any of them as `Arc<dyn OcrService>`.
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Extract printed text from encoded image bytes (PNG, JPEG, BMP, ...).
    ///
    /// May return an empty string if no text is detected.
    async fn extract_text(&self, image_data: &[u8]) -> Result<String>;

    /// Extract text using settings tuned for handwriting.
    async fn extract_handwriting(&self, image_data: &[u8]) -> Result<String> {
        self.extract_text(image_data).await
    }

    /// Rasterize every page of a PDF and OCR the pages in order.
    async fn extract_pdf_pages(&self, pdf_data: &[u8]) -> Result<String>;
}

/// Mock OCR service for testing.
///
/// Returns deterministic text output without performing real OCR.
#[derive(Debug, Clone)]
pub struct MockOcrService {
    /// The text to return for any input.
    response_text: String,
    /// Returned by `extract_handwriting` when set.
    handwriting_text: Option<String>,
}

impl MockOcrService {
    /// Create a new mock OCR service with default response text.
    pub fn new() -> Self {
        Self::with_text("Mock OCR extracted text: Lorem ipsum dolor sit amet")
    }

    /// Create a mock OCR service that returns the specified text.
    pub fn with_text(text: &str) -> Self {
        Self {
            response_text: text.to_string(),
            handwriting_text: None,
        }
    }

    /// Create a mock OCR service that returns empty text (simulating no text found).
    pub fn empty() -> Self {
        Self::with_text("")
    }

    /// Return different text from the handwriting pass.
    pub fn with_handwriting(mut self, text: &str) -> Self {
        self.handwriting_text = Some(text.to_string());
        self
    }
}

impl Default for MockOcrService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrService for MockOcrService {
    async fn extract_text(&self, image_data: &[u8]) -> Result<String> {
        if image_data.is_empty() {
            return Err(NotewiseError::Ocr("Empty image data".to_string()));
        }
        Ok(self.response_text.clone())
    }

    async fn extract_handwriting(&self, image_data: &[u8]) -> Result<String> {
        match &self.handwriting_text {
            Some(text) if !image_data.is_empty() => Ok(text.clone()),
            _ => self.extract_text(image_data).await,
        }
    }

    async fn extract_pdf_pages(&self, pdf_data: &[u8]) -> Result<String> {
        if pdf_data.is_empty() {
            return Err(NotewiseError::Ocr("Empty PDF data".to_string()));
        }
        Ok(self.response_text.clone())
    }
}
