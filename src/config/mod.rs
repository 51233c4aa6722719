//! Configuration management for scan-image
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. embedded `default-config.toml`
//! 2. `~/.config/scan-image/config.{toml,json,yaml,yml}`
//! 3. `./scan-image.{toml,json,yaml,yml}` (or only the file passed with `--config`)
//! 4. `SCAN_IMAGE_<SECTION>__<KEY>` environment variables and `TESSERACT_PATH`
//! 5. command-line overrides

use crate::scanner::types::ScannerConfig;
use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Environment variable prefix for nested settings
pub const ENV_PREFIX: &str = "SCAN_IMAGE_";

/// Legacy variable pointing at the Tesseract executable
pub const TESSERACT_PATH_ENV: &str = "TESSERACT_PATH";

/// Project-level config file stem, looked up in the working directory
pub const PROJECT_CONFIG_STEM: &str = "scan-image";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ScanImageConfig {
    pub scanner: ScannerSection,
    pub ocr: OcrSection,
}

/// Pipeline thresholds and worker pool sizing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScannerSection {
    pub extensions: Vec<String>,
    pub min_width: u32,
    pub min_height: u32,
    pub canny_low: f32,
    pub canny_high: f32,
    pub edge_density_threshold: f64,
    /// 0 = auto-detect from CPU cores
    pub max_threads: usize,
    pub thread_percentage: u8,
    pub follow_symlinks: bool,
}

impl Default for ScannerSection {
    fn default() -> Self {
        let defaults = ScannerConfig::default();
        let mut extensions: Vec<String> = defaults.extensions.into_iter().collect();
        extensions.sort();
        Self {
            extensions,
            min_width: defaults.min_width,
            min_height: defaults.min_height,
            canny_low: defaults.canny_low,
            canny_high: defaults.canny_high,
            edge_density_threshold: defaults.edge_density_threshold,
            max_threads: defaults.max_threads,
            thread_percentage: defaults.thread_percentage,
            follow_symlinks: defaults.follow_symlinks,
        }
    }
}

/// OCR engine settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OcrSection {
    /// Full path or bare name of the Tesseract binary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tesseract_path: Option<String>,
    /// Tesseract language code(s), e.g. `eng` or `eng+deu`
    pub language: String,
}

impl Default for OcrSection {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            language: "eng".to_string(),
        }
    }
}

impl ScanImageConfig {
    /// Load with the standard layering and no overrides
    pub fn load_default() -> Result<Self> {
        Self::load(None, None)
    }

    /// Load configuration.
    ///
    /// With `custom_config`, only that file is read (plus defaults and the
    /// environment) and it must exist. `overrides` is a JSON object shaped
    /// like the config, merged last.
    pub fn load(custom_config: Option<&str>, overrides: Option<serde_json::Value>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            let path = Path::new(custom_path);
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            figment = merge_file(figment, path);
        } else {
            if let Some(user_dir) = Self::user_config_dir() {
                figment = merge_stem(figment, &user_dir.join("config"));
            }
            figment = merge_stem(figment, Path::new(PROJECT_CONFIG_STEM));
        }

        // Environment variables always beat files
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        if let Some(path) = std::env::var(TESSERACT_PATH_ENV).ok().filter(|p| !p.trim().is_empty()) {
            figment = figment.merge(Serialized::defaults(serde_json::json!({
                "ocr": { "tesseract_path": path }
            })));
        }

        if let Some(overrides) = overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(overrides));
        }

        let config: Self = figment.extract().context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let scanner = &self.scanner;
        if scanner.extensions.is_empty() {
            bail!("scanner.extensions must list at least one image extension");
        }
        if scanner.min_width == 0 || scanner.min_height == 0 {
            bail!("scanner.min_width and scanner.min_height must be greater than zero");
        }
        if !(1..=100).contains(&scanner.thread_percentage) {
            bail!("scanner.thread_percentage must be between 1 and 100");
        }
        if scanner.canny_low < 0.0 || scanner.canny_low > scanner.canny_high {
            bail!("scanner.canny_low must be non-negative and not above scanner.canny_high");
        }
        if !(0.0..=1.0).contains(&scanner.edge_density_threshold) {
            bail!("scanner.edge_density_threshold must be between 0.0 and 1.0");
        }
        if self.ocr.language.trim().is_empty() {
            bail!("ocr.language must not be empty");
        }
        Ok(())
    }

    /// Pipeline view of the `[scanner]` section
    pub fn scanner_config(&self) -> ScannerConfig {
        let s = &self.scanner;
        ScannerConfig {
            extensions: s
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            min_width: s.min_width,
            min_height: s.min_height,
            canny_low: s.canny_low,
            canny_high: s.canny_high,
            edge_density_threshold: s.edge_density_threshold,
            max_threads: s.max_threads,
            thread_percentage: s.thread_percentage,
            follow_symlinks: s.follow_symlinks,
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Path `config init` writes to
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(format!("{PROJECT_CONFIG_STEM}.toml"))
    }

    fn user_config_dir() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join("scan-image"))
    }
}

/// Merge `<stem>.toml`, `.json`, `.yaml` and `.yml`; missing files are skipped
fn merge_stem(figment: Figment, stem: &Path) -> Figment {
    figment
        .merge(Toml::file(stem.with_extension("toml")))
        .merge(Json::file(stem.with_extension("json")))
        .merge(Yaml::file(stem.with_extension("yaml")))
        .merge(Yaml::file(stem.with_extension("yml")))
}

/// Merge one explicit file, picking the format from its extension
fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => figment.merge(Json::file(path)),
        Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_config_loads_defaults() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let config = ScanImageConfig::load(None, None).expect("defaults should load");

            assert_eq!(config.scanner.min_width, 50);
            assert_eq!(config.scanner.min_height, 50);
            assert_eq!(config.scanner.edge_density_threshold, 0.02);
            assert_eq!(config.ocr.language, "eng");
            assert!(config.ocr.tesseract_path.is_none());
            assert_eq!(config.scanner_config().extensions, ScannerConfig::default().extensions);
            Ok(())
        });
    }

    #[test]
    fn test_embedded_defaults_match_code_defaults() {
        let embedded: ScanImageConfig = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .extract()
            .unwrap();
        assert_eq!(embedded, ScanImageConfig::default());
    }

    #[test]
    fn test_project_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "scan-image.toml",
                r#"
                [scanner]
                min_width = 100
                min_height = 120
                extensions = [".PNG", "gif"]
                "#,
            )?;
            jail.set_env("SCAN_IMAGE_SCANNER__MIN_HEIGHT", "64");
            jail.set_env("TESSERACT_PATH", "/opt/tesseract/bin/tesseract");

            let config = ScanImageConfig::load(None, None).unwrap();
            assert_eq!(config.scanner.min_width, 100);
            assert_eq!(config.scanner.min_height, 64);
            assert_eq!(config.ocr.tesseract_path.as_deref(), Some("/opt/tesseract/bin/tesseract"));

            let scanner = config.scanner_config();
            assert!(scanner.extensions.contains("png"));
            assert!(scanner.extensions.contains("gif"));
            Ok(())
        });
    }

    #[test]
    fn test_cli_overrides_win() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("SCAN_IMAGE_OCR__LANGUAGE", "deu");
            let overrides = serde_json::json!({
                "scanner": { "max_threads": 2 },
                "ocr": { "language": "fra" }
            });

            let config = ScanImageConfig::load(None, Some(overrides)).unwrap();
            assert_eq!(config.scanner.max_threads, 2);
            assert_eq!(config.ocr.language, "fra");
            Ok(())
        });
    }

    #[test]
    fn test_custom_config_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("custom.yaml", "ocr:\n  language: jpn\n")?;
            // ignored when --config is given
            jail.create_file("scan-image.toml", "[ocr]\nlanguage = \"kor\"\n")?;

            let config = ScanImageConfig::load(Some("custom.yaml"), None).unwrap();
            assert_eq!(config.ocr.language, "jpn");

            assert!(ScanImageConfig::load(Some("missing.toml"), None).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_rejected() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("scan-image.toml", "[scanner]\nthread_percentage = 0\n")?;
            assert!(ScanImageConfig::load(None, None).is_err());

            jail.create_file("scan-image.toml", "[scanner]\nmin_width = \"wide\"\n")?;
            assert!(ScanImageConfig::load(None, None).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_toml_round_trip_for_init() {
        let text = ScanImageConfig::default().to_toml_string().unwrap();
        assert!(text.contains("[scanner]"));
        assert!(text.contains("min_width = 50"));
        let parsed: ScanImageConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, ScanImageConfig::default());
    }
}
