use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// number written in the text, e.g. `(16)` or `31___`
    #[serde(rename = "numbered")]
    Numbered,
    /// anonymous run of underscores, numbered by reading order
    #[serde(rename = "positional")]
    Positional,
}

/// A blank detected in the plain-text projection of a passage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BlankMarker {
    /// unique within a passage
    pub question_number: u32,

    /// the exact substring that triggered detection
    pub matched_text: String,

    /// character (not byte) offset in the plain-text projection
    pub source_offset: usize,

    pub kind: MarkerKind,
}

/// Marker notation classes, declared in precedence order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Notation {
    /// `(N)` or `[N]`
    Parenthetical,
    /// `N___`, `N ...`
    NumberedUnderscore,
    /// `___`, `...`, `……`
    BareUnderscore,
}

impl Notation {
    pub const ALL: [Notation; 3] = [
        Notation::Parenthetical,
        Notation::NumberedUnderscore,
        Notation::BareUnderscore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Notation::Parenthetical => "parenthetical",
            Notation::NumberedUnderscore => "numbered-underscore",
            Notation::BareUnderscore => "bare-underscore",
        }
    }

    pub fn kind(self) -> MarkerKind {
        match self {
            Notation::Parenthetical | Notation::NumberedUnderscore => MarkerKind::Numbered,
            Notation::BareUnderscore => MarkerKind::Positional,
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Notation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Notation::ALL
            .into_iter()
            .find(|n| n.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownNotation(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notation_names_parse_back() {
        for notation in Notation::ALL {
            assert_eq!(notation.name().parse::<Notation>().unwrap(), notation);
        }
        assert_eq!(
            " Bare-Underscore ".parse::<Notation>().unwrap(),
            Notation::BareUnderscore
        );
    }

    #[test]
    fn unknown_notation_is_rejected() {
        let err = "dashes".parse::<Notation>().unwrap_err();
        assert!(err.to_string().contains("dashes"));
    }

    #[test]
    fn precedence_follows_declaration_order() {
        let mut shuffled = vec![
            Notation::BareUnderscore,
            Notation::Parenthetical,
            Notation::NumberedUnderscore,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Notation::ALL.to_vec());
    }
}
