use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use super::marker::{BlankMarker, MarkerKind, Notation};

// `(16)` or `[16]`, brackets must pair up
static PARENTHETICAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9]+)\)|\[([0-9]+)\]").unwrap());

// `31___`, `31 ...`, `31……`
static NUMBERED_UNDERSCORE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)[ \t\u{00A0}]?(?:[_…]{3,}|\.{3,}|…{2,})").unwrap()
});

static BARE_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_…]{3,}|\.{3,}|…{2,}").unwrap());

/// Detects blank markers in plain text.
///
/// Notation classes are tried in precedence order and the first class that
/// yields any match wins; results are never combined across classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanner {
    notations: Vec<Notation>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(Notation::ALL)
    }
}

impl Scanner {
    pub fn new(notations: impl IntoIterator<Item = Notation>) -> Self {
        let mut notations: Vec<Notation> = notations.into_iter().collect();
        notations.sort();
        notations.dedup();
        Self { notations }
    }

    pub fn notations(&self) -> &[Notation] {
        &self.notations
    }

    pub fn scan(&self, plain_text: &str, starting_number: u32) -> Vec<BlankMarker> {
        self.scan_with_notation(plain_text, starting_number)
            .map(|(_, markers)| markers)
            .unwrap_or_default()
    }

    /// Like [`Scanner::scan`], also reporting which notation class matched.
    /// `None` means no blanks were found.
    pub fn scan_with_notation(
        &self,
        plain_text: &str,
        starting_number: u32,
    ) -> Option<(Notation, Vec<BlankMarker>)> {
        if plain_text.trim().is_empty() {
            return None;
        }

        for &notation in &self.notations {
            let markers = match notation {
                Notation::Parenthetical => scan_parenthetical(plain_text),
                Notation::NumberedUnderscore => scan_numbered_underscore(plain_text),
                Notation::BareUnderscore => scan_bare(plain_text, starting_number),
            };

            if markers.is_empty() {
                trace!(notation = %notation, "no match, falling through");
                continue;
            }

            debug!(notation = %notation, count = markers.len(), "blank markers detected");
            return Some((notation, markers));
        }

        None
    }
}

/// Scan with every notation enabled.
pub fn scan(plain_text: &str, starting_number: u32) -> Vec<BlankMarker> {
    Scanner::default().scan(plain_text, starting_number)
}

fn scan_parenthetical(text: &str) -> Vec<BlankMarker> {
    let mut offsets = CharOffsets::new(text);
    let mut seen = HashSet::new();

    PARENTHETICAL_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let digits = caps.get(1).or_else(|| caps.get(2))?;
            let question_number = digits.as_str().parse::<u32>().ok()?;
            let source_offset = offsets.char_offset(whole.start());
            seen.insert(question_number).then(|| BlankMarker {
                question_number,
                matched_text: whole.as_str().to_string(),
                source_offset,
                kind: MarkerKind::Numbered,
            })
        })
        .collect()
}

fn scan_numbered_underscore(text: &str) -> Vec<BlankMarker> {
    let mut offsets = CharOffsets::new(text);
    let mut seen = HashSet::new();

    NUMBERED_UNDERSCORE_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let question_number = caps[1].parse::<u32>().ok()?;
            let source_offset = offsets.char_offset(whole.start());
            seen.insert(question_number).then(|| BlankMarker {
                question_number,
                matched_text: whole.as_str().to_string(),
                source_offset,
                kind: MarkerKind::Numbered,
            })
        })
        .collect()
}

fn scan_bare(text: &str, starting_number: u32) -> Vec<BlankMarker> {
    let mut offsets = CharOffsets::new(text);

    BARE_RUN_REGEX
        .find_iter(text)
        .filter(|run| !touches_digit(text, run.start(), run.end()))
        .enumerate()
        .map_while(|(index, run)| {
            let question_number = u32::try_from(index)
                .ok()
                .and_then(|i| starting_number.checked_add(i))?;
            Some(BlankMarker {
                question_number,
                matched_text: run.as_str().to_string(),
                source_offset: offsets.char_offset(run.start()),
                kind: MarkerKind::Positional,
            })
        })
        .collect()
}

fn touches_digit(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.is_some_and(|c| c.is_ascii_digit()) || after.is_some_and(|c| c.is_ascii_digit())
}

/// Converts increasing byte offsets into character offsets in one pass.
struct CharOffsets<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharOffsets<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn char_offset(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}
