//! Notewise application binary - composition root.
//!
//! Ties together all Notewise crates into a single executable:
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialize tracing
//! 3. Choose the OCR engine and speech-to-text backend
//! 4. Start the axum REST API server

mod cli;

use std::sync::Arc;

use clap::Parser;

use notewise_api::routes;
use notewise_api::state::AppState;
use notewise_core::config::NotewiseConfig;
use notewise_ocr::{MockOcrService, OcrService, TesseractOcrService};
use notewise_whisper::{
    MockTranscriptionService, TranscriptionService, WhisperConfig, WhisperService,
};

use crate::cli::CliArgs;

fn build_ocr(config: &NotewiseConfig) -> Arc<dyn OcrService> {
    match config.ocr.engine.as_str() {
        "mock" => {
            tracing::info!("Using mock OCR engine");
            Arc::new(MockOcrService::new())
        }
        engine => {
            if engine != "tesseract" {
                tracing::warn!(engine = %engine, "Unknown OCR engine, using tesseract");
            }
            tracing::info!(
                binary = %config.ocr.tesseract_path,
                lang = %config.ocr.language,
                "Using tesseract OCR"
            );
            Arc::new(TesseractOcrService::new(&config.ocr))
        }
    }
}

fn build_transcriber(config: &NotewiseConfig) -> Arc<dyn TranscriptionService> {
    if config.audio.model_path.trim().is_empty() {
        tracing::info!("No whisper model configured, using mock transcription");
        return Arc::new(MockTranscriptionService::new());
    }

    match WhisperService::new(WhisperConfig::from(&config.audio)) {
        Ok(service) => {
            tracing::info!(model = %config.audio.model_path, "Whisper transcription ready");
            Arc::new(service)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Whisper unavailable, using mock transcription");
            Arc::new(MockTranscriptionService::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = NotewiseConfig::load_or_default(&config_file);
    config.server.port = args.resolve_port(config.server.port);
    config.server.host = args.resolve_host(&config.server.host);
    let log_level = args.resolve_log_level(&config.general.log_level);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting Notewise v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    let ocr = build_ocr(&config);
    let transcriber = build_transcriber(&config);
    let state = AppState::new(config.clone(), ocr, transcriber)?;

    tracing::info!(dir = %state.upload_dir.display(), "Upload directory");

    if let Err(e) = routes::start_server(&config, state).await {
        tracing::error!(error = %e, "API server stopped");
        return Err(e.into());
    }

    Ok(())
}
