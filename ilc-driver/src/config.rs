//! Compiler configuration
//!
//! An optional JSON file supplies defaults for `ilc compile`; command-line
//! flags override it.

use clap::ValueEnum;
use ilc_codegen::GeneratorOptions;
use ilc_common::CompilerError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How semantic diagnostics are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticFormat {
    /// One `file:line:column: error: message` line per diagnostic on stderr
    #[default]
    Text,
    /// The whole report as a JSON document on stdout
    Json,
}

/// Compiler configuration loaded from a JSON file.
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub entry_point: String,
    pub require_entry_point: bool,
    pub emit_comments: bool,
    pub diagnostic_format: DiagnosticFormat,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        let options = GeneratorOptions::default();
        Self {
            entry_point: options.entry_point,
            require_entry_point: options.require_entry_point,
            emit_comments: options.emit_comments,
            diagnostic_format: DiagnosticFormat::Text,
        }
    }
}

impl CompilerConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, CompilerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|err| CompilerError::ConfigError {
            message: format!("{}: {}", path.display(), err),
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Apply command-line flags on top of file values
    pub fn apply_overrides(
        &mut self,
        entry_point: Option<String>,
        no_comments: bool,
        diagnostic_format: Option<DiagnosticFormat>,
    ) {
        if let Some(entry_point) = entry_point {
            self.entry_point = entry_point;
        }
        if no_comments {
            self.emit_comments = false;
        }
        if let Some(format) = diagnostic_format {
            self.diagnostic_format = format;
        }
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            entry_point: self.entry_point.clone(),
            require_entry_point: self.require_entry_point,
            emit_comments: self.emit_comments,
        }
    }
}
