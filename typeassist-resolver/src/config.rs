//! User-facing settings read from `typeassist.toml`
//!
//! The configuration is an explicit value handed to the resolver and the
//! assignment composer; nothing here is global.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "typeassist.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssistConfig {
    pub format: FormatConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    #[serde(default)]
    pub declaration: DeclarationKeyword,
    #[serde(default = "default_end_with_semicolon")]
    pub end_with_semicolon: bool,
    #[serde(default = "default_placeholder_name")]
    pub placeholder_name: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            declaration: DeclarationKeyword::default(),
            end_with_semicolon: default_end_with_semicolon(),
            placeholder_name: default_placeholder_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    #[serde(default = "default_placeholder_type")]
    pub placeholder_type: String,
    #[serde(
        default = "default_max_alias_depth",
        deserialize_with = "deserialize_alias_depth"
    )]
    pub max_alias_depth: usize,
    #[serde(default)]
    pub generic_arguments: GenericArgumentPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            placeholder_type: default_placeholder_type(),
            max_alias_depth: default_max_alias_depth(),
            generic_arguments: GenericArgumentPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKeyword {
    #[default]
    Const,
    Let,
    Var,
}

impl DeclarationKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKeyword::Const => "const",
            DeclarationKeyword::Let => "let",
            DeclarationKeyword::Var => "var",
        }
    }
}

impl std::fmt::Display for DeclarationKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeclarationKeyword {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "const" => Ok(DeclarationKeyword::Const),
            "let" => Ok(DeclarationKeyword::Let),
            "var" => Ok(DeclarationKeyword::Var),
            other => Err(format!("expected const, let or var, found `{other}`")),
        }
    }
}

/// What to do when several calls in one chain pass explicit type arguments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenericArgumentPolicy {
    /// Keep the first list found in source order
    #[default]
    FirstWins,
    /// Fail when two lists disagree
    RejectConflicts,
}

fn default_end_with_semicolon() -> bool {
    true
}

fn default_placeholder_name() -> String {
    "val".to_string()
}

fn default_placeholder_type() -> String {
    "any".to_string()
}

fn default_max_alias_depth() -> usize {
    64
}

/// A depth of zero would reject every reference, even a direct call
fn deserialize_alias_depth<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let depth = usize::deserialize(deserializer)?;
    if depth == 0 {
        return Err(de::Error::invalid_value(
            de::Unexpected::Unsigned(0),
            &"an alias depth of at least 1",
        ));
    }
    Ok(depth)
}

impl AssistConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `typeassist.toml` from `dir` when present, defaults otherwise
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading configuration");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
