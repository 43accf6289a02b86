//! Decoding uploaded recordings into mono `f32` PCM.

use std::io::Cursor;

use hound::{SampleFormat, WavReader};

use notewise_core::error::{NotewiseError, Result};
use notewise_core::file_extension;

/// Mono samples in [-1.0, 1.0] with their sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f32 / self.sample_rate as f32
        }
    }
}

/// Decode an upload by extension. Only WAV is decoded; other audio
/// containers are reported as unsupported.
pub fn decode_audio(filename: &str, data: &[u8]) -> Result<DecodedAudio> {
    match file_extension(filename).map(str::to_ascii_lowercase).as_deref() {
        Some("wav") => decode_wav(data),
        Some(ext) => Err(NotewiseError::UnsupportedFile(format!(
            "cannot decode .{ext} audio, upload a WAV file"
        ))),
        None => Err(NotewiseError::UnsupportedFile(filename.to_string())),
    }
}

/// Decode PCM or float WAV bytes, averaging channels down to mono.
pub fn decode_wav(data: &[u8]) -> Result<DecodedAudio> {
    let reader = WavReader::new(Cursor::new(data))
        .map_err(|e| NotewiseError::Transcription(format!("Invalid WAV data: {}", e)))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| NotewiseError::Transcription(format!("Corrupt WAV samples: {}", e)))?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| {
                    NotewiseError::Transcription(format!("Corrupt WAV samples: {}", e))
                })?
        }
    };

    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    tracing::debug!(
        sample_rate = spec.sample_rate,
        channels,
        samples = samples.len(),
        "Decoded WAV"
    );

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}
