use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{NotewiseError, Result};

/// Top-level configuration for the Notewise service.
///
/// Loaded from `~/.notewise/config.toml` by default. Each section corresponds
/// to one crate or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotewiseConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub mindmap: MindmapConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

impl NotewiseConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NotewiseConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Reject values no component can run with.
    pub fn validate(&self) -> Result<()> {
        self.summarizer.validate()
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| NotewiseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Allowed CORS origins. `"*"` allows any origin.
    pub cors_origins: Vec<String>,
    /// Maximum request body size in megabytes.
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: vec!["*".to_string()],
            max_upload_mb: 16,
        }
    }
}

impl ServerConfig {
    /// Body limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Extractive summarizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Stop-word language code ("en", "de", "fr", ...).
    pub language: String,
    /// Length used when a request omits it: short, medium, large.
    pub default_length: String,
    /// Format used when a request omits it: paragraph, bullets, mindmap.
    pub default_format: String,
    /// Map unrecognized length/format values to a default instead of
    /// rejecting the request.
    pub lenient_options: bool,
    /// PageRank damping factor.
    pub damping: f64,
    /// Power-iteration cap.
    pub max_iterations: usize,
    /// Per-node convergence tolerance.
    pub tolerance: f64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            default_length: "medium".to_string(),
            default_format: "paragraph".to_string(),
            lenient_options: false,
            damping: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl SummarizerConfig {
    /// Check the ranking parameters: damping in `[0, 1]`, a finite
    /// non-negative tolerance, and at least one iteration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(NotewiseError::InvalidArgument(format!(
                "summarizer.damping must be within [0, 1], got {}",
                self.damping
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(NotewiseError::InvalidArgument(format!(
                "summarizer.tolerance must be a finite non-negative number, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(NotewiseError::InvalidArgument(
                "summarizer.max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Concept-map settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MindmapConfig {
    /// Number of concepts kept per document.
    pub max_concepts: usize,
}

impl Default for MindmapConfig {
    fn default() -> Self {
        Self { max_concepts: 7 }
    }
}

/// OCR and document extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// OCR engine: "tesseract" or "mock".
    pub engine: String,
    /// Path or name of the tesseract executable.
    pub tesseract_path: String,
    /// Path or name of the pdftoppm executable used to rasterize PDFs.
    pub pdftoppm_path: String,
    /// Tesseract language code.
    pub language: String,
    /// Rasterization resolution for scanned PDFs.
    pub pdf_dpi: u32,
    /// Extracted text shorter than this triggers the OCR fallback.
    pub min_text_chars: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: "tesseract".to_string(),
            tesseract_path: "tesseract".to_string(),
            pdftoppm_path: "pdftoppm".to_string(),
            language: "eng".to_string(),
            pdf_dpi: 200,
            min_text_chars: 50,
        }
    }
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Path to the whisper GGML model. Empty uses the mock transcriber.
    pub model_path: String,
    /// Language code for transcription ("en", "auto").
    pub language: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            language: "en".to_string(),
        }
    }
}

/// Upload storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory for stored uploads. Empty means the system temp dir.
    pub dir: String,
}

impl UploadConfig {
    /// Resolve the upload directory.
    pub fn resolve_dir(&self) -> std::path::PathBuf {
        if self.dir.trim().is_empty() {
            std::env::temp_dir()
        } else {
            std::path::PathBuf::from(&self.dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = NotewiseConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.cors_origins, vec!["*"]);
        assert_eq!(config.server.max_upload_bytes(), 16 * 1024 * 1024);
        assert_eq!(config.summarizer.default_length, "medium");
        assert_eq!(config.summarizer.default_format, "paragraph");
        assert!(!config.summarizer.lenient_options);
        assert!((config.summarizer.damping - 0.85).abs() < f64::EPSILON);
        assert_eq!(config.summarizer.max_iterations, 100);
        assert_eq!(config.mindmap.max_concepts, 7);
        assert_eq!(config.ocr.engine, "tesseract");
        assert_eq!(config.ocr.min_text_chars, 50);
        assert!(config.audio.model_path.is_empty());
        assert!(config.upload.dir.is_empty());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[server]
host = "127.0.0.1"
port = 8080
cors_origins = ["http://localhost:3000"]
max_upload_mb = 4

[summarizer]
language = "de"
default_length = "short"
default_format = "bullets"
lenient_options = true
damping = 0.9
max_iterations = 50
tolerance = 1e-8

[mindmap]
max_concepts = 10

[ocr]
engine = "mock"
language = "deu"
pdf_dpi = 300
min_text_chars = 80

[audio]
model_path = "/models/ggml-base.en.bin"
language = "auto"

[upload]
dir = "/var/lib/notewise/uploads"
"#;
        let file = create_temp_config(content);
        let config = NotewiseConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_upload_bytes(), 4 * 1024 * 1024);
        assert_eq!(config.summarizer.language, "de");
        assert!(config.summarizer.lenient_options);
        assert_eq!(config.summarizer.max_iterations, 50);
        assert_eq!(config.mindmap.max_concepts, 10);
        assert_eq!(config.ocr.engine, "mock");
        // Unset fields in a present section keep their defaults.
        assert_eq!(config.ocr.tesseract_path, "tesseract");
        assert_eq!(config.ocr.pdf_dpi, 300);
        assert_eq!(config.audio.language, "auto");
        assert_eq!(
            config.upload.resolve_dir(),
            std::path::PathBuf::from("/var/lib/notewise/uploads")
        );
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[server]
port = 9000
"#;
        let file = create_temp_config(content);
        let config = NotewiseConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.summarizer.default_format, "paragraph");
        assert_eq!(config.mindmap.max_concepts, 7);
    }

    #[test]
    fn test_config_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = NotewiseConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.ocr.language, "eng");
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        let result = NotewiseConfig::load(file.path());
        assert!(matches!(result, Err(NotewiseError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_ranking_parameters() {
        let bad = [
            (-0.5, 1e-6, 100),
            (1.5, 1e-6, 100),
            (f64::NAN, 1e-6, 100),
            (0.85, -1e-6, 100),
            (0.85, f64::INFINITY, 100),
            (0.85, 1e-6, 0),
        ];
        for (damping, tolerance, max_iterations) in bad {
            let config = SummarizerConfig {
                damping,
                tolerance,
                max_iterations,
                ..SummarizerConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(NotewiseError::InvalidArgument(_))),
                "accepted {:?}",
                config
            );
        }

        let edges = SummarizerConfig {
            damping: 1.0,
            tolerance: 0.0,
            ..SummarizerConfig::default()
        };
        assert!(edges.validate().is_ok());
        assert!(NotewiseConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_rejects_invalid_damping() {
        let file = create_temp_config("[summarizer]\ndamping = 1.5\n");
        let result = NotewiseConfig::load(file.path());
        assert!(matches!(result, Err(NotewiseError::InvalidArgument(_))));

        let config = NotewiseConfig::load_or_default(file.path());
        assert!((config.summarizer.damping - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = NotewiseConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = NotewiseConfig::default();
        config.server.port = 7070;
        config.summarizer.lenient_options = true;
        config.save(&path).unwrap();

        let reloaded = NotewiseConfig::load(&path).unwrap();
        assert_eq!(reloaded.server.port, 7070);
        assert!(reloaded.summarizer.lenient_options);
        assert_eq!(reloaded.ocr.pdftoppm_path, config.ocr.pdftoppm_path);
    }

    #[test]
    fn test_upload_dir_defaults_to_temp() {
        let upload = UploadConfig::default();
        assert_eq!(upload.resolve_dir(), std::env::temp_dir());
    }
}
