//! Settings for the `slax` command: input buffer sizing, the default
//! output format and indent, and lexer tracing.
//!
//! Values start from `defaults/slax.default.toml`, compiled in with
//! `include_str!`. A `--config` file and single-key overrides are stacked on
//! top by [`Loader`], and [`Loader::build`] rejects buffer sizes the input
//! reader cannot work with.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::slax::lexing::InputOptions;

const DEFAULT_TOML: &str = include_str!("../../defaults/slax.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SlaxConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub trace: TraceConfig,
}

/// Growth policy of the lexer's input buffer.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub initial_size: usize,
    pub fudge: usize,
    pub increment: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
    pub indent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraceConfig {
    pub enabled: bool,
}

impl InputConfig {
    pub fn options(&self) -> InputOptions {
        InputOptions::new(self.initial_size, self.fudge, self.increment)
    }
}

impl SlaxConfig {
    fn validate(self) -> Result<Self, ConfigError> {
        let input = &self.input;
        if input.fudge == 0 || input.increment == 0 {
            return Err(ConfigError::Message(
                "input.fudge and input.increment must be positive".to_string(),
            ));
        }
        if input.fudge >= input.increment {
            return Err(ConfigError::Message(format!(
                "input.fudge ({}) must be smaller than input.increment ({})",
                input.fudge, input.increment
            )));
        }
        if input.initial_size <= input.fudge {
            return Err(ConfigError::Message(format!(
                "input.initial_size ({}) must be larger than input.fudge ({})",
                input.initial_size, input.fudge
            )));
        }
        Ok(self)
    }
}

/// Stacks config sources, last one wins, then yields a checked [`SlaxConfig`].
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Only the compiled-in `slax.default.toml`.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Stack a TOML file named on the command line; it must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Stack a TOML file that is skipped when absent, such as a per-user file.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set one dotted key such as `input.fudge` or `output.format`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge the sources, then check the `input` sizes against each other.
    pub fn build(self) -> Result<SlaxConfig, ConfigError> {
        let config: SlaxConfig = self.builder.build()?.try_deserialize()?;
        config.validate()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<SlaxConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.input.initial_size, 8192);
        assert_eq!(config.input.fudge, 1024);
        assert_eq!(config.output.format, "xml");
        assert_eq!(config.output.indent, "  ");
        assert!(!config.trace.enabled);
    }

    #[test]
    fn default_options_match_lexer_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.input.options(), InputOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.format", "treeviz")
            .expect("override to apply")
            .set_override("trace.enabled", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "treeviz");
        assert!(config.trace.enabled);
    }

    #[test]
    fn rejects_fudge_not_below_increment() {
        let error = Loader::new()
            .set_override("input.fudge", 8192)
            .expect("override to apply")
            .build()
            .unwrap_err();
        assert!(error.to_string().contains("must be smaller than input.increment"));
    }

    #[test]
    fn optional_file_may_be_missing() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/slax.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.input.increment, 8192);
    }
}
