//! TOML configuration for the batch binary.
//!
//! ```toml
//! [source]
//! path = "invoices.json"
//!
//! [output]
//! directory = "out"
//! profile = "comfort"
//! formats = ["xml", "pdf"]
//!
//! [logging]
//! level = "info"
//!
//! [projection]
//! currency = "EUR"
//!
//! [projection.seller]
//! name = "Das Company"
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::PipelineError;
use crate::profile::{ProfileKind, ProjectionSettings};
use crate::render::OutputFormat;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub projection: ProjectionSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// JSON dataset read by the in-memory record source.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub profile: ProfileKind,
    pub formats: Vec<OutputFormat>,
    /// File name prefix; the profile name when unset.
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("invoices.json"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("out"),
            profile: ProfileKind::Comfort,
            formats: vec![OutputFormat::Xml],
            prefix: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, PipelineError> {
        let config: Self = toml::from_str(s).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.output.formats.is_empty() {
            return Err(PipelineError::Config(
                "output.formats must name at least one format".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.projection.seller.name, "Das Company");
        assert_eq!(config.output.profile, ProfileKind::Comfort);
    }

    #[test]
    fn overrides_nested_sections() {
        let config = Config::from_toml_str(
            r#"
            [output]
            profile = "basic"
            formats = ["xml"]
            prefix = "inv"

            [projection]
            currency = "USD"

            [projection.seller]
            name = "Other Corp"
            country_id = "NL"

            [[projection.payment.accounts]]
            iban = "NL91 ABNA 0417 1643 00"
            bic = "ABNANL2A"
            institution = "ABN AMRO"
            "#,
        )
        .unwrap();
        assert_eq!(config.output.profile, ProfileKind::Basic);
        assert_eq!(config.output.prefix.as_deref(), Some("inv"));
        assert_eq!(config.projection.currency, "USD");
        assert_eq!(config.projection.seller.name, "Other Corp");
        // unset seller keys fall back to the defaults
        assert_eq!(config.projection.seller.city, "Ghent");
        assert_eq!(config.projection.payment.accounts.len(), 1);
        assert_eq!(config.projection.payment.terms_days, 30);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Config::from_toml_str("[output]\nprofile = \"extended\""),
            Err(PipelineError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[output]\nformats = []"),
            Err(PipelineError::Config(_))
        ));
        assert!(matches!(
            Config::load("/nonexistent/zugferd.toml"),
            Err(PipelineError::Config(_))
        ));
    }
}
