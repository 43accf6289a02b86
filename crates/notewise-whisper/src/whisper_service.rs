//! Real Whisper transcription service via whisper-rs (whisper.cpp bindings).
//!
//! When compiled with the `whisper` feature, loads a GGML model file and runs
//! speech-to-text inference on the blocking thread pool. Without the feature,
//! provides a stub that reports transcription as unavailable.

#[cfg(feature = "whisper")]
use std::path::Path;
#[cfg(feature = "whisper")]
use std::sync::Arc;

use async_trait::async_trait;

use notewise_core::error::{NotewiseError, Result};

#[cfg(feature = "whisper")]
use crate::Segment;
use crate::{validate_input, TranscriptionResult, TranscriptionService, WhisperConfig};

#[cfg(feature = "whisper")]
const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Whisper transcription service backed by whisper.cpp.
///
/// Holds a loaded model context that is shared with the blocking inference
/// task on every call.
pub struct WhisperService {
    #[cfg(feature = "whisper")]
    ctx: Arc<whisper_rs::WhisperContext>,
    config: WhisperConfig,
}

impl WhisperService {
    /// Create a new WhisperService by loading a GGML model file.
    ///
    /// # Errors
    /// Returns `NotewiseError::Transcription` if the model file doesn't exist
    /// or fails to load.
    #[cfg(feature = "whisper")]
    pub fn new(config: WhisperConfig) -> Result<Self> {
        use whisper_rs::{WhisperContext, WhisperContextParameters};

        let model_path = &config.model_path;
        if !Path::new(model_path).exists() {
            return Err(NotewiseError::Transcription(format!(
                "Whisper model file not found: {}",
                model_path
            )));
        }

        tracing::info!(model = %model_path, lang = %config.language, "Loading Whisper model");

        let params = WhisperContextParameters::default();
        let ctx = WhisperContext::new_with_params(model_path, params).map_err(|e| {
            NotewiseError::Transcription(format!("Failed to load Whisper model: {}", e))
        })?;

        tracing::info!("Whisper model loaded successfully");
        Ok(Self {
            ctx: Arc::new(ctx),
            config,
        })
    }

    /// Stub constructor when the `whisper` feature is disabled.
    #[cfg(not(feature = "whisper"))]
    pub fn new(config: WhisperConfig) -> Result<Self> {
        tracing::warn!(
            "WhisperService created without the `whisper` feature, transcription will fail"
        );
        Ok(Self { config })
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Real implementation (whisper feature enabled)
// ---------------------------------------------------------------------------

#[cfg(feature = "whisper")]
#[async_trait]
impl TranscriptionService for WhisperService {
    async fn transcribe(
        &self,
        audio_data: &[f32],
        sample_rate: u32,
    ) -> Result<TranscriptionResult> {
        validate_input(audio_data, sample_rate)?;

        // Whisper expects 16 kHz mono PCM.
        let samples = resample(audio_data, sample_rate, WHISPER_SAMPLE_RATE);
        let ctx = Arc::clone(&self.ctx);
        let language = self.config.language.clone();

        tokio::task::spawn_blocking(move || run_inference(&ctx, &samples, &language))
            .await
            .map_err(|e| NotewiseError::Transcription(format!("Whisper task panicked: {}", e)))?
    }
}

#[cfg(feature = "whisper")]
fn run_inference(
    ctx: &whisper_rs::WhisperContext,
    samples: &[f32],
    language: &str,
) -> Result<TranscriptionResult> {
    use whisper_rs::{FullParams, SamplingStrategy};

    let duration_secs = samples.len() as f32 / WHISPER_SAMPLE_RATE as f32;
    tracing::debug!(samples = samples.len(), duration_secs, "Starting Whisper transcription");

    let mut state = ctx.create_state().map_err(|e| {
        NotewiseError::Transcription(format!("Failed to create Whisper state: {}", e))
    })?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

    // None = auto-detect.
    let lang = if language == "auto" { None } else { Some(language) };
    params.set_language(lang);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);
    params.set_single_segment(false);

    state
        .full(params, samples)
        .map_err(|e| NotewiseError::Transcription(format!("Whisper inference failed: {}", e)))?;

    let n_segments = state.full_n_segments().map_err(|e| {
        NotewiseError::Transcription(format!("Failed to get segment count: {}", e))
    })?;

    let mut segments = Vec::with_capacity(n_segments.max(0) as usize);
    let mut full_text = String::new();

    for i in 0..n_segments {
        let text = state.full_get_segment_text(i).map_err(|e| {
            NotewiseError::Transcription(format!("Failed to get segment {} text: {}", i, e))
        })?;

        // Timestamps are in centiseconds.
        let t0 = state.full_get_segment_t0(i).map_err(|e| {
            NotewiseError::Transcription(format!("Failed to get segment {} t0: {}", i, e))
        })?;
        let t1 = state.full_get_segment_t1(i).map_err(|e| {
            NotewiseError::Transcription(format!("Failed to get segment {} t1: {}", i, e))
        })?;

        let text = text.trim();
        if !full_text.is_empty() {
            full_text.push(' ');
        }
        full_text.push_str(text);

        segments.push(Segment {
            start: t0 as f32 / 100.0,
            end: t1 as f32 / 100.0,
            text: text.to_string(),
        });
    }

    tracing::info!(
        segments = n_segments,
        text_len = full_text.len(),
        "Transcription complete"
    );

    Ok(TranscriptionResult {
        text: full_text,
        segments,
        language: lang.unwrap_or("auto").to_string(),
        duration_secs,
    })
}

// ---------------------------------------------------------------------------
// Stub implementation (whisper feature disabled)
// ---------------------------------------------------------------------------

#[cfg(not(feature = "whisper"))]
#[async_trait]
impl TranscriptionService for WhisperService {
    async fn transcribe(
        &self,
        audio_data: &[f32],
        sample_rate: u32,
    ) -> Result<TranscriptionResult> {
        validate_input(audio_data, sample_rate)?;
        Err(NotewiseError::Transcription(
            "Whisper transcription requires the `whisper` feature to be enabled".into(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Resampling helper
// ---------------------------------------------------------------------------

/// Linear-interpolation resampling.
#[cfg_attr(not(feature = "whisper"), allow(dead_code))]
fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || input.is_empty() {
        return input.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (input.len() as f64 / ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_idx = i as f64 * ratio;
        let idx0 = (src_idx.floor() as usize).min(input.len() - 1);
        let idx1 = (idx0 + 1).min(input.len() - 1);
        let frac = (src_idx - idx0 as f64) as f32;

        output.push(input[idx0] * (1.0 - frac) + input[idx1] * frac);
    }

    output
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
