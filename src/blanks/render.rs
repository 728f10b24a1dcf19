use std::collections::HashMap;

use regex::Regex;
use tracing::warn;

use super::answer::AnswerStore;
use super::marker::BlankMarker;
use super::plain::{escape_html, literal_pattern, TAG_PATTERN};

pub const DEFAULT_PLACEHOLDER: &str = "______";
pub const DEFAULT_FRAGMENT_CLASS: &str = "blank";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// shown in place of a missing answer
    pub placeholder: String,
    /// CSS class of the inline fragment; empty blanks also get `<class>--empty`
    pub fragment_class: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            fragment_class: DEFAULT_FRAGMENT_CLASS.to_string(),
        }
    }
}

/// Render the author-facing preview of a passage.
///
/// Every literal occurrence of a marker's matched text in `raw_text` is
/// replaced by a fragment showing the question number and the first accepted
/// variant (or the placeholder). Substitution is by literal text rather than
/// by offset, so when several blanks share the same text (e.g. `___`), all
/// occurrences show the first of them. The same goes for a run the scanner
/// skipped, such as the digit-adjacent `___9`: it still renders as the blank
/// whose text it shares. Tags, attributes and comments are copied through
/// unchanged, and entity spellings (`&nbsp;`, `&hellip;`) match the characters
/// the scanner saw. Everything else is left untouched.
pub fn render(
    raw_text: &str,
    markers: &[BlankMarker],
    answers: &AnswerStore,
    options: &RenderOptions,
) -> String {
    // the first marker carrying a literal claims all of its occurrences
    let mut owners: HashMap<&str, &BlankMarker> = HashMap::new();
    for marker in markers.iter().filter(|m| !m.matched_text.is_empty()) {
        owners.entry(marker.matched_text.as_str()).or_insert(marker);
    }
    if owners.is_empty() {
        return raw_text.to_string();
    }

    let mut literals: Vec<&str> = owners.keys().copied().collect();
    literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    // group 1 copies markup through; group i + 2 is literals[i]
    let pattern = std::iter::once(TAG_PATTERN.to_string())
        .chain(literals.iter().map(|l| literal_pattern(l)))
        .map(|p| format!("({})", p))
        .collect::<Vec<String>>()
        .join("|");

    let regex = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(e) => {
            warn!(error = %e, "could not build preview pattern, leaving text unchanged");
            return raw_text.to_string();
        }
    };

    regex
        .replace_all(raw_text, |caps: &regex::Captures| {
            let owner = (0..literals.len())
                .find(|i| caps.get(i + 2).is_some())
                .and_then(|i| owners.get(literals[i]));
            match owner {
                Some(marker) => fragment(marker, answers, options),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn fragment(marker: &BlankMarker, answers: &AnswerStore, options: &RenderOptions) -> String {
    let class = escape_html(&options.fragment_class);
    let number = marker.question_number;

    match answers
        .entry(number)
        .and_then(|entry| entry.first_variant())
    {
        Some(answer) => format!(
            "<span class=\"{class}\" data-question=\"{number}\">{number}. {}</span>",
            escape_html(answer)
        ),
        None => format!(
            "<span class=\"{class} {class}--empty\" data-question=\"{number}\">{number}. {}</span>",
            escape_html(&options.placeholder)
        ),
    }
}
