//! Parser configuration
//!
//! `defaults/perl-cst.default.toml` is embedded so the documented defaults and the
//! runtime ones cannot drift. [Loader] layers user files and `PERL_CST_*`
//! environment variables on top before deserializing into [ParserConfig].

use crate::cst::report::{Reporter, SilentReporter, StreamReporter};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/perl-cst.default.toml");

/// Knobs for one parse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParserConfig {
    /// Maximum bracket nesting depth.
    ///
    /// Each level recurses in the builder; the default fits a 2 MiB thread stack.
    pub max_depth: usize,
    /// Tab stop width used for visual columns.
    pub tab_width: usize,
    pub reporter: ReporterKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReporterKind {
    Silent,
    Stderr,
}

impl ReporterKind {
    pub fn build(self) -> Box<dyn Reporter> {
        match self {
            ReporterKind::Silent => Box::new(SilentReporter),
            ReporterKind::Stderr => Box::new(StreamReporter::stderr()),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 128,
            tab_width: 1,
            reporter: ReporterKind::Silent,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `PERL_CST_MAX_DEPTH` and friends.
    pub fn with_env(mut self) -> Self {
        self.builder = self
            .builder
            .add_source(Environment::with_prefix("PERL_CST").try_parsing(true));
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ParserConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<ParserConfig, ConfigError> {
    Loader::new().build()
}
