use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Separates alternative accepted answers inside one raw answer.
pub const VARIANT_DELIMITER: char = '|';

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct AnswerEntry {
    pub raw_answer: String,
}

impl AnswerEntry {
    pub fn new(raw_answer: impl Into<String>) -> Self {
        Self {
            raw_answer: raw_answer.into(),
        }
    }

    /// Trimmed, non-empty alternatives in authored order.
    pub fn accepted_variants(&self) -> Vec<&str> {
        self.raw_answer
            .split(VARIANT_DELIMITER)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    }

    pub fn first_variant(&self) -> Option<&str> {
        self.accepted_variants().into_iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.first_variant().is_none()
    }
}

/// Answers keyed by question number.
///
/// Entries outlive the markers they were typed for: a lookup for a number
/// with no entry simply yields an empty answer, and nothing here ever drops
/// an entry because its blank vanished from the text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct AnswerStore {
    entries: BTreeMap<u32, AnswerEntry>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites whatever was stored for `question_number`.
    pub fn set_answer(&mut self, question_number: u32, raw_answer: impl Into<String>) {
        self.entries
            .insert(question_number, AnswerEntry::new(raw_answer));
    }

    /// Raw answer, or `""` when nothing is bound.
    pub fn get_answer(&self, question_number: u32) -> &str {
        self.entries
            .get(&question_number)
            .map_or("", |e| e.raw_answer.as_str())
    }

    pub fn entry(&self, question_number: u32) -> Option<&AnswerEntry> {
        self.entries.get(&question_number)
    }

    pub fn accepted_variants(&self, question_number: u32) -> Vec<&str> {
        self.entry(question_number)
            .map(AnswerEntry::accepted_variants)
            .unwrap_or_default()
    }

    pub fn variant_count(&self, question_number: u32) -> usize {
        self.accepted_variants(question_number).len()
    }

    /// Whether `candidate` matches any accepted variant, ignoring surrounding
    /// whitespace and ASCII case. All variants are equally correct.
    pub fn accepts(&self, question_number: u32, candidate: &str) -> bool {
        let candidate = candidate.trim();
        !candidate.is_empty()
            && self
                .accepted_variants(question_number)
                .iter()
                .any(|v| v.eq_ignore_ascii_case(candidate))
    }

    pub fn remove(&mut self, question_number: u32) -> Option<AnswerEntry> {
        self.entries.remove(&question_number)
    }

    pub fn numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &AnswerEntry)> {
        self.entries.iter().map(|(n, e)| (*n, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for AnswerStore {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(n, raw)| (n, AnswerEntry::new(raw)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_are_split_and_trimmed() {
        let mut store = AnswerStore::new();
        store.set_answer(3, "but | though | however");
        assert_eq!(store.accepted_variants(3), vec!["but", "though", "however"]);
        assert_eq!(store.variant_count(3), 3);

        store.set_answer(3, "  single  ");
        assert_eq!(store.accepted_variants(3), vec!["single"]);
        assert_eq!(store.get_answer(3), "  single  ");
    }

    #[test]
    fn empty_variants_are_dropped() {
        let entry = AnswerEntry::new("| a || b |");
        assert_eq!(entry.accepted_variants(), vec!["a", "b"]);
        assert!(AnswerEntry::new(" | ").is_empty());
        assert!(AnswerEntry::new("").is_empty());
    }

    #[test]
    fn missing_answer_reads_as_empty() {
        let store = AnswerStore::new();
        assert_eq!(store.get_answer(42), "");
        assert_eq!(store.variant_count(42), 0);
        assert!(!store.accepts(42, ""));
    }

    #[test]
    fn set_answer_overwrites_without_merging() {
        let mut store: AnswerStore = [(1, "went | travelled")].into_iter().collect();
        store.set_answer(1, "flew");
        assert_eq!(store.accepted_variants(1), vec!["flew"]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn every_variant_is_accepted() {
        let store: AnswerStore = [(7, "colour | color")].into_iter().collect();
        assert!(store.accepts(7, "colour"));
        assert!(store.accepts(7, " Color "));
        assert!(!store.accepts(7, "colr"));
        assert!(!store.accepts(8, "color"));
    }
}
