//! Notewise Whisper crate - speech-to-text for uploaded recordings.
//!
//! Provides a trait-based abstraction for transcription, configuration and
//! result types, WAV decoding into the mono `f32` samples Whisper expects, and
//! a mock implementation for testing without loading a real model.

pub mod wav;
pub mod whisper_service;

use async_trait::async_trait;

use notewise_core::config::AudioConfig;
use notewise_core::error::{NotewiseError, Result};

pub use wav::{decode_audio, decode_wav, DecodedAudio};
pub use whisper_service::WhisperService;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the Whisper transcription engine.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to the Whisper GGML model file.
    pub model_path: String,
    /// Language code for transcription (e.g., "en", "auto").
    pub language: String,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            language: "en".to_string(),
        }
    }
}

impl From<&AudioConfig> for WhisperConfig {
    fn from(config: &AudioConfig) -> Self {
        Self {
            model_path: config.model_path.clone(),
            language: config.language.clone(),
        }
    }
}

// =============================================================================
// Result types
// =============================================================================

/// A single time-aligned segment within a transcription.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Start time in seconds from the beginning of the audio.
    pub start: f32,
    /// End time in seconds from the beginning of the audio.
    pub end: f32,
    /// Transcribed text for this segment.
    pub text: String,
}

/// The complete result of a transcription operation.
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// Full transcribed text.
    pub text: String,
    /// Time-aligned segments.
    pub segments: Vec<Segment>,
    /// Detected or specified language.
    pub language: String,
    /// Total audio duration in seconds.
    pub duration_secs: f32,
}

// =============================================================================
// Trait
// =============================================================================

/// Service for transcribing audio data to text.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Transcribe audio data into text.
    ///
    /// # Arguments
    /// * `audio_data` - Mono PCM samples as f32 values in [-1.0, 1.0].
    /// * `sample_rate` - Sample rate of the audio data in Hz (e.g., 16000).
    async fn transcribe(&self, audio_data: &[f32], sample_rate: u32)
        -> Result<TranscriptionResult>;
}

/// Reject input no engine can work with.
pub(crate) fn validate_input(audio_data: &[f32], sample_rate: u32) -> Result<()> {
    if audio_data.is_empty() {
        return Err(NotewiseError::Transcription(
            "Cannot transcribe empty audio data".to_string(),
        ));
    }
    if sample_rate == 0 {
        return Err(NotewiseError::Transcription(
            "Sample rate must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

// =============================================================================
// Mock implementation
// =============================================================================

/// Mock transcription service that returns a fixed transcript.
///
/// Returns a single segment covering the full audio duration.
#[derive(Debug, Clone)]
pub struct MockTranscriptionService {
    text: String,
}

impl MockTranscriptionService {
    pub fn new() -> Self {
        Self::with_text("[mock transcription]")
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl Default for MockTranscriptionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptionService for MockTranscriptionService {
    async fn transcribe(
        &self,
        audio_data: &[f32],
        sample_rate: u32,
    ) -> Result<TranscriptionResult> {
        validate_input(audio_data, sample_rate)?;

        let duration_secs = audio_data.len() as f32 / sample_rate as f32;

        tracing::debug!(
            duration_secs = duration_secs,
            sample_rate = sample_rate,
            "Mock transcription generated"
        );

        Ok(TranscriptionResult {
            text: self.text.clone(),
            segments: vec![Segment {
                start: 0.0,
                end: duration_secs,
                text: self.text.clone(),
            }],
            language: "en".to_string(),
            duration_secs,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
