//! OCR via the Tesseract command-line tool.
//!
//! Images are piped through `tesseract stdin stdout`. Scanned PDFs are first
//! rasterized to PNG pages with `pdftoppm` in a temporary directory, then each
//! page is recognized in order.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use notewise_core::config::OcrConfig;
use notewise_core::error::{NotewiseError, Result};

use crate::OcrService;

/// Tesseract flags for handwritten notes: LSTM engine, single text block.
const HANDWRITING_ARGS: &[&str] = &["--oem", "1", "--psm", "6"];

/// OCR service that shells out to `tesseract` and `pdftoppm`.
#[derive(Debug, Clone)]
pub struct TesseractOcrService {
    tesseract_path: String,
    pdftoppm_path: String,
    language: String,
    pdf_dpi: u32,
}

impl TesseractOcrService {
    /// Create a service from the `[ocr]` config section.
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            tesseract_path: config.tesseract_path.clone(),
            pdftoppm_path: config.pdftoppm_path.clone(),
            language: config.language.clone(),
            pdf_dpi: config.pdf_dpi,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Command line for one recognition pass.
    fn tesseract_args(&self, handwriting: bool) -> Vec<&str> {
        let mut args = vec!["stdin", "stdout", "-l", self.language.as_str()];
        if handwriting {
            args.extend_from_slice(HANDWRITING_ARGS);
        }
        args
    }

    async fn run_tesseract(&self, image_data: &[u8], handwriting: bool) -> Result<String> {
        if image_data.is_empty() {
            return Err(NotewiseError::Ocr("Empty image data".into()));
        }

        let mut child = Command::new(&self.tesseract_path)
            .args(self.tesseract_args(handwriting))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                NotewiseError::Ocr(format!("Failed to start {}: {}", self.tesseract_path, e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| NotewiseError::Ocr("tesseract stdin unavailable".into()))?;
        stdin.write_all(image_data).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NotewiseError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(chars = text.len(), handwriting, "tesseract pass complete");
        Ok(text)
    }

    /// Render each PDF page to `<dir>/page-N.png`.
    async fn rasterize_pdf(
        &self,
        pdf_path: &Path,
        out_dir: &Path,
    ) -> Result<Vec<std::path::PathBuf>> {
        let prefix = out_dir.join("page");
        let output = Command::new(&self.pdftoppm_path)
            .arg("-r")
            .arg(self.pdf_dpi.to_string())
            .arg("-png")
            .arg(pdf_path)
            .arg(&prefix)
            .output()
            .await
            .map_err(|e| {
                NotewiseError::Ocr(format!("Failed to start {}: {}", self.pdftoppm_path, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NotewiseError::Ocr(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let mut pages = Vec::new();
        let mut entries = tokio::fs::read_dir(out_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "png") {
                pages.push(path);
            }
        }
        pages.sort_by_key(|p| page_number(p));
        Ok(pages)
    }
}

/// Page number from a `page-07.png` style name; pdftoppm zero-pads by page count.
fn page_number(path: &Path) -> usize {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.rsplit('-').next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(usize::MAX)
}

#[async_trait]
impl OcrService for TesseractOcrService {
    async fn extract_text(&self, image_data: &[u8]) -> Result<String> {
        self.run_tesseract(image_data, false).await
    }

    async fn extract_handwriting(&self, image_data: &[u8]) -> Result<String> {
        self.run_tesseract(image_data, true).await
    }

    async fn extract_pdf_pages(&self, pdf_data: &[u8]) -> Result<String> {
        if pdf_data.is_empty() {
            return Err(NotewiseError::Ocr("Empty PDF data".into()));
        }

        let dir = tempfile::tempdir()?;
        let pdf_path = dir.path().join("input.pdf");
        tokio::fs::write(&pdf_path, pdf_data).await?;

        let pages_dir = dir.path().join("pages");
        tokio::fs::create_dir(&pages_dir).await?;
        let pages = self.rasterize_pdf(&pdf_path, &pages_dir).await?;
        debug!(pages = pages.len(), "Rasterized PDF for OCR");

        let mut text = String::new();
        for page in &pages {
            let image = tokio::fs::read(page).await?;
            match self.extract_text(&image).await {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => warn!(page = %page.display(), error = %e, "OCR failed for page"),
            }
        }
        Ok(text)
    }
}
