use std::env;

use thiserror::Error;
use tracing::warn;

use crate::blanks::{Notation, RenderOptions, Scanner, DEFAULT_FRAGMENT_CLASS, DEFAULT_PLACEHOLDER};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown blank notation '{0}', expected one of: parenthetical, numbered-underscore, bare-underscore")]
    UnknownNotation(String),

    #[error("at least one blank notation must be enabled")]
    NoNotations,
}

/// Engine settings shared by every passage in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// first number given to anonymous blanks
    pub starting_number: u32,
    /// enabled notation classes; tried in precedence order regardless of listing order
    pub notations: Vec<Notation>,
    pub placeholder: String,
    pub fragment_class: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_number: 1,
            notations: Notation::ALL.to_vec(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            fragment_class: DEFAULT_FRAGMENT_CLASS.to_string(),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `GAPFILL_*` environment variables. Values that
    /// fail to parse are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();

        let starting_number = match lookup("GAPFILL_STARTING_NUMBER") {
            Some(v) => v.trim().parse().unwrap_or_else(|_| {
                warn!(value = %v, "GAPFILL_STARTING_NUMBER is not a number, using default");
                default.starting_number
            }),
            None => default.starting_number,
        };

        let notations = match lookup("GAPFILL_NOTATIONS") {
            Some(v) => parse_notations(&v).unwrap_or_else(|e| {
                warn!(error = %e, "invalid GAPFILL_NOTATIONS, using default");
                default.notations.clone()
            }),
            None => default.notations,
        };

        Self {
            starting_number,
            notations,
            placeholder: lookup("GAPFILL_PLACEHOLDER").unwrap_or(default.placeholder),
            fragment_class: lookup("GAPFILL_FRAGMENT_CLASS").unwrap_or(default.fragment_class),
        }
    }

    pub fn scanner(&self) -> Scanner {
        Scanner::new(self.notations.iter().copied())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            placeholder: self.placeholder.clone(),
            fragment_class: self.fragment_class.clone(),
        }
    }
}

/// Parse a comma-separated list of notation names.
pub fn parse_notations(list: &str) -> Result<Vec<Notation>, ConfigError> {
    let notations = list
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<Notation>, ConfigError>>()?;

    if notations.is_empty() {
        return Err(ConfigError::NoNotations);
    }
    Ok(notations)
}
