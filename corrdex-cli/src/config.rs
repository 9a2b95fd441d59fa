use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use transform::{AliasTable, SubjectIdentity};

/// Optional TOML configuration overriding the built-in subject identity
/// and alias table. A missing file is not an error; the curated defaults
/// apply.
///
/// Aliases are an array of tables rather than a map because the config
/// layer treats map keys case-insensitively, and canonical names must
/// keep their display case.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub subject: Option<SubjectConfig>,
    pub alias: Option<Vec<AliasEntry>>,
}

/// `[subject]` section: known addresses, exact name variants, and the
/// tokens of the loose containment rule.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SubjectConfig {
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub name_tokens: Vec<String>,
}

/// One `[[alias]]` entry: a canonical display name and the raw strings
/// that consolidate into it.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AliasEntry {
    pub canonical: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl AppConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.unwrap_or_else(default_config_path);

        if !config_path.exists() {
            return Ok((Self::default(), config_path));
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: AppConfig = builder.try_deserialize()?;
        Ok((config, config_path))
    }

    pub fn subject_identity(&self) -> SubjectIdentity {
        match &self.subject {
            Some(subject) => SubjectIdentity::new(
                subject.emails.iter().map(String::as_str),
                subject.names.iter().map(String::as_str),
                subject.name_tokens.iter().map(String::as_str),
            ),
            None => SubjectIdentity::default(),
        }
    }

    pub fn alias_table(&self) -> AliasTable {
        match &self.alias {
            Some(entries) => AliasTable::new(
                entries
                    .iter()
                    .map(|entry| (entry.canonical.clone(), entry.aliases.iter().cloned())),
            ),
            None => AliasTable::default(),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("corrdex").join("corrdex.toml")
    } else {
        PathBuf::from("corrdex.toml")
    }
}
