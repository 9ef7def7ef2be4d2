//! Compiler configuration loaded from `lijs.toml`

use crate::CompileError;
use anyhow::{Context, Result};
use lj_lower::LowerOptions;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Compiler configuration
///
/// ```toml
/// [lowering]
/// require_callee = "require"
/// exports_target = "module.exports"
///
/// [lowering.temporaries]
/// strategy = "counter"
/// prefix = "_t"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Lowering options
    pub lowering: LowerOptions,
}

impl Config {
    /// Name of the configuration file looked up by [`Config::find_in_dir`]
    pub const FILE_NAME: &str = "lijs.toml";

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Config`] when the text is not valid configuration.
    pub fn from_toml_str(contents: &str) -> Result<Self, CompileError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find configuration in a directory (looks for `lijs.toml`)
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable or invalid.
    pub fn find_in_dir(dir: &Path) -> Result<Self> {
        Self::from_file(&dir.join(Self::FILE_NAME))
    }
}
