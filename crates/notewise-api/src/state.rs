//! Application state shared across all route handlers.
//!
//! AppState holds references to all services and shared resources.
//! It is passed to handlers via axum's State extractor.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use notewise_core::config::NotewiseConfig;
use notewise_core::error::Result;
use notewise_insight::{ConceptMapGenerator, ExtractiveSummarizer, LexiconTagger};
use notewise_ocr::{DocumentExtractor, OcrService};
use notewise_whisper::TranscriptionService;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. Everything
/// here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<NotewiseConfig>,
    /// Sentence-ranking summarizer.
    pub summarizer: Arc<ExtractiveSummarizer>,
    /// Noun co-occurrence concept maps.
    pub concept_maps: Arc<ConceptMapGenerator>,
    /// Text extraction for documents and images.
    pub extractor: DocumentExtractor,
    /// Speech-to-text for audio uploads.
    pub transcriber: Arc<dyn TranscriptionService>,
    /// Where `/api/upload/` stores files.
    pub upload_dir: PathBuf,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState, building the text pipeline from `config`.
    ///
    /// The concept-map generator shares the summarizer's stop-word language.
    pub fn new(
        config: NotewiseConfig,
        ocr: Arc<dyn OcrService>,
        transcriber: Arc<dyn TranscriptionService>,
    ) -> Result<Self> {
        let summarizer = ExtractiveSummarizer::from_config(&config.summarizer)?;
        let concept_maps =
            ConceptMapGenerator::new(summarizer.tokenizer().clone(), LexiconTagger::new())
                .with_max_concepts(config.mindmap.max_concepts);
        let extractor =
            DocumentExtractor::new(ocr).with_min_text_chars(config.ocr.min_text_chars);
        let upload_dir = config.upload.resolve_dir();

        Ok(Self {
            config: Arc::new(config),
            summarizer: Arc::new(summarizer),
            concept_maps: Arc::new(concept_maps),
            extractor,
            transcriber,
            upload_dir,
            start_time: Instant::now(),
        })
    }
}
