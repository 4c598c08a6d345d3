//! Format registry
//!
//! Each output format implements [Formatter] and is looked up by name through
//! [FormatRegistry]; the command line's `--format` flag resolves here.

use super::dumper::Dumper;
use super::snapshot::TreeSnapshot;
use crate::cst::ast::Document;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Renders a [Document] as text
pub trait Formatter: Send + Sync {
    /// Name used to select the format, e.g. "tree" or "json"
    fn name(&self) -> &str;

    fn serialize(&self, doc: &Document) -> Result<String, FormatError>;

    fn description(&self) -> &str {
        ""
    }
}

/// The indented class dump
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeFormatter(pub Dumper);

impl Formatter for TreeFormatter {
    fn name(&self) -> &str {
        "tree"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(self.0.dump(doc))
    }

    fn description(&self) -> &str {
        "Indented element classes with token contents"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serde_json::to_string_pretty(&TreeSnapshot::from_document(doc))
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "Tree snapshot as pretty-printed JSON"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serde_yaml::to_string(&TreeSnapshot::from_document(doc))
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "Tree snapshot as YAML"
    }
}

/// Formatters by name
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any with the same name.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(doc)
    }

    /// Registered format names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registry with the built-in formats, the tree dump using `dumper`.
    pub fn with_dumper(dumper: Dumper) -> Self {
        let mut registry = Self::new();
        registry.register(TreeFormatter(dumper));
        registry.register(JsonFormatter);
        registry.register(YamlFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_dumper(Dumper::default())
    }
}
