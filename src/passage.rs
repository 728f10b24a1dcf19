use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blanks::AnswerStore;

#[derive(Error, Debug)]
pub enum PassageError {
    #[error("front matter opened with '---' is never closed")]
    UnterminatedFrontMatter,

    #[error("invalid front matter: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to access passage file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An authored passage and the answers typed for its blanks.
///
/// Blank markers are not stored; they are derived from `raw_text` whenever
/// needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    /// display label
    pub title: Option<String>,

    /// authored text, may carry inline markup
    pub raw_text: String,

    /// first number given to anonymous blanks
    pub starting_number: u32,

    /// keyed by question number, including answers whose blank is gone
    pub answers: AnswerStore,
}

impl Passage {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            title: None,
            raw_text: raw_text.into(),
            starting_number: default_starting_number(),
            answers: AnswerStore::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_starting_number(mut self, starting_number: u32) -> Self {
        self.starting_number = starting_number;
        self
    }
}

impl Default for Passage {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    #[serde(default = "default_starting_number")]
    starting_number: u32,

    #[serde(default, skip_serializing_if = "AnswerStore::is_empty")]
    answers: AnswerStore,
}

fn default_starting_number() -> u32 {
    1
}

/// Parse a passage document: YAML front matter between `---` lines followed
/// by the passage text. A document without front matter is all text.
pub fn parse_passage(document: &str) -> Result<Passage, PassageError> {
    let document = document.strip_prefix('\u{feff}').unwrap_or(document);

    let Some((yaml, body)) = split_front_matter(document)? else {
        return Ok(Passage::new(document));
    };

    let fm: Frontmatter = if yaml.trim().is_empty() {
        Frontmatter {
            starting_number: default_starting_number(),
            ..Default::default()
        }
    } else {
        serde_yaml_ng::from_str(yaml)?
    };

    Ok(Passage {
        title: fm.title,
        raw_text: body.to_string(),
        starting_number: fm.starting_number,
        answers: fm.answers,
    })
}

pub fn serialize_passage(passage: &Passage) -> Result<String, PassageError> {
    let fm = Frontmatter {
        title: passage.title.clone(),
        starting_number: passage.starting_number,
        answers: passage.answers.clone(),
    };

    Ok(format!(
        r#"---
{}---

{}"#,
        serde_yaml_ng::to_string(&fm)?,
        passage.raw_text
    ))
}

pub fn load_passage(path: impl AsRef<Path>) -> Result<Passage, PassageError> {
    let path = path.as_ref();
    let document = fs::read_to_string(path).map_err(|source| PassageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_passage(&document)
}

pub fn save_passage(path: impl AsRef<Path>, passage: &Passage) -> Result<(), PassageError> {
    let path = path.as_ref();
    let document = serialize_passage(passage)?;
    fs::write(path, document).map_err(|source| PassageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn split_front_matter(document: &str) -> Result<Option<(&str, &str)>, PassageError> {
    let Some(rest) = document.strip_prefix("---") else {
        return Ok(None);
    };
    let Some(rest) = strip_newline(rest) else {
        return Ok(None);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok(Some((yaml, strip_newline(body).unwrap_or(body))));
        }
        offset += line.len();
    }

    Err(PassageError::UnterminatedFrontMatter)
}

fn strip_newline(s: &str) -> Option<&str> {
    s.strip_prefix("\r\n").or_else(|| s.strip_prefix('\n'))
}
