use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, trace};

use super::answer::{AnswerEntry, AnswerStore};
use super::marker::BlankMarker;
use super::plain::plain_text;
use super::scan::Scanner;

/// A current blank together with the answer bound to its number, if any.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Binding<'a> {
    pub marker: &'a BlankMarker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<&'a AnswerEntry>,
}

/// Answers are looked up by number and never merged into the markers, so
/// reconciliation leaves the freshly scanned markers untouched. Entries for
/// numbers that disappeared stay in the store and bind again once the number
/// comes back.
pub fn reconcile(new_markers: Vec<BlankMarker>, existing_answers: &AnswerStore) -> Vec<BlankMarker> {
    let stale = stale_numbers(&new_markers, existing_answers);
    if !stale.is_empty() {
        debug!(?stale, "answers without a matching blank kept aside");
    }
    new_markers
}

pub fn bind<'a>(markers: &'a [BlankMarker], answers: &'a AnswerStore) -> Vec<Binding<'a>> {
    markers
        .iter()
        .map(|marker| Binding {
            marker,
            answer: answers
                .entry(marker.question_number)
                .filter(|entry| !entry.is_empty()),
        })
        .collect()
}

/// Numbers that have an answer but no blank in `markers`.
pub fn stale_numbers(markers: &[BlankMarker], answers: &AnswerStore) -> Vec<u32> {
    let current: HashSet<u32> = markers.iter().map(|m| m.question_number).collect();
    answers.numbers().filter(|n| !current.contains(n)).collect()
}

/// Numbers of blanks with no usable answer.
pub fn unanswered_numbers(markers: &[BlankMarker], answers: &AnswerStore) -> Vec<u32> {
    markers
        .iter()
        .map(|m| m.question_number)
        .filter(|&n| answers.entry(n).map_or(true, AnswerEntry::is_empty))
        .collect()
}

/// The current blank set of one passage, re-derived from its text.
///
/// Scanning is cheap and side-effect free, so callers may refresh on every
/// keystroke; the last result is reused while the text and starting number
/// stay the same.
#[derive(Debug, Clone, Default)]
pub struct BlankRegistry {
    scanner: Scanner,
    source: Option<(String, u32)>,
    markers: Vec<BlankMarker>,
}

impl BlankRegistry {
    pub fn new(scanner: Scanner) -> Self {
        Self {
            scanner,
            source: None,
            markers: Vec::new(),
        }
    }

    /// Markers for `raw_text`, which may carry inline markup.
    pub fn refresh(
        &mut self,
        raw_text: &str,
        starting_number: u32,
        answers: &AnswerStore,
    ) -> &[BlankMarker] {
        let unchanged = self
            .source
            .as_ref()
            .is_some_and(|(text, start)| text == raw_text && *start == starting_number);

        if unchanged {
            trace!("passage text unchanged, reusing blank markers");
        } else {
            let scanned = self.scanner.scan(&plain_text(raw_text), starting_number);
            self.markers = reconcile(scanned, answers);
            self.source = Some((raw_text.to_string(), starting_number));
        }

        &self.markers
    }

    /// Markers from the last refresh.
    pub fn markers(&self) -> &[BlankMarker] {
        &self.markers
    }
}

/// An explicit, ordered list of blanks for question types that keep their
/// blanks as form rows rather than deriving them from text.
///
/// Numbers are always `starting_number + index`. Removing a row renumbers
/// every row after it and each answer stays with its row, not its old number.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct BlankList {
    starting_number: u32,
    slots: Vec<AnswerEntry>,
}

impl BlankList {
    pub fn new(starting_number: u32) -> Self {
        Self {
            starting_number,
            slots: Vec::new(),
        }
    }

    pub fn starting_number(&self) -> u32 {
        self.starting_number
    }

    pub fn set_starting_number(&mut self, starting_number: u32) {
        self.starting_number = starting_number;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn push(&mut self, raw_answer: impl Into<String>) -> u32 {
        self.slots.push(AnswerEntry::new(raw_answer));
        self.number_at(self.slots.len() - 1)
    }

    /// Inserts a row at `index` (clamped to the end), shifting later rows up.
    pub fn insert(&mut self, index: usize, raw_answer: impl Into<String>) -> u32 {
        let index = index.min(self.slots.len());
        self.slots.insert(index, AnswerEntry::new(raw_answer));
        self.number_at(index)
    }

    /// Removes the row at `index`; out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<AnswerEntry> {
        (index < self.slots.len()).then(|| self.slots.remove(index))
    }

    pub fn set(&mut self, index: usize, raw_answer: impl Into<String>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = AnswerEntry::new(raw_answer);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&AnswerEntry> {
        self.slots.get(index)
    }

    pub fn number_at(&self, index: usize) -> u32 {
        u32::try_from(index)
            .ok()
            .and_then(|i| self.starting_number.checked_add(i))
            .unwrap_or(u32::MAX)
    }

    pub fn numbers(&self) -> Vec<u32> {
        (0..self.slots.len()).map(|i| self.number_at(i)).collect()
    }

    pub fn to_answer_store(&self) -> AnswerStore {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (self.number_at(i), slot.raw_answer.clone()))
            .collect()
    }
}
