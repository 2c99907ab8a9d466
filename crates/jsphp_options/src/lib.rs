//! jsphp_options: jsphp.json parsing and compiler options.
//!
//! The options surface is small: the two reserved prefixes guarded by the
//! tokenizer, the prefix of the runtime helpers referenced by the output,
//! and a few emission switches.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default prefix reserved for synthesized constants.
pub const CONST_PREFIX: &str = "__JPC";
/// Default prefix reserved for synthesized variables and helpers.
pub const VAR_PREFIX: &str = "__jpv";

/// Compiler options, matching the `compilerOptions` object of jsphp.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    /// User constants may not start with this prefix.
    pub const_prefix: String,
    /// User variables may not start with this prefix; block-local names
    /// are renamed under it.
    pub var_prefix: String,
    /// Prefix of the runtime helper globals. Defaults to `var_prefix + "_"`.
    pub helper_prefix: Option<String>,
    /// Prepend the definitions of the helpers the output uses.
    pub emit_helpers: bool,
    /// Start the output with a `<?php` open tag.
    pub php_open_tag: bool,
    pub out_dir: Option<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            const_prefix: CONST_PREFIX.to_string(),
            var_prefix: VAR_PREFIX.to_string(),
            helper_prefix: None,
            emit_helpers: true,
            php_open_tag: false,
            out_dir: None,
        }
    }
}

impl CompilerOptions {
    /// The prefix shared by every runtime helper name.
    pub fn helper_prefix(&self) -> String {
        self.helper_prefix
            .clone()
            .unwrap_or_else(|| format!("{}_", self.var_prefix))
    }

    /// The reserved prefixes consulted by the tokenizer.
    pub fn reserved_prefixes(&self) -> ReservedPrefixes {
        ReservedPrefixes {
            constant: self.const_prefix.clone(),
            variable: self.var_prefix.clone(),
        }
    }
}

/// Prefixes the tokenizer refuses at the start of user names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedPrefixes {
    pub constant: String,
    pub variable: String,
}

impl Default for ReservedPrefixes {
    fn default() -> Self {
        Self {
            constant: CONST_PREFIX.to_string(),
            variable: VAR_PREFIX.to_string(),
        }
    }
}

/// The jsphp.json file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub compiler_options: Option<CompilerOptions>,
    pub files: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a jsphp.json file from a string.
pub fn parse_config(content: &str) -> Result<ConfigFile, ConfigError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse a jsphp.json file from a path.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<ConfigFile, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content)
}
