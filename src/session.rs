use serde::Serialize;

use crate::blanks::{
    bind, render, stale_numbers, unanswered_numbers, BlankMarker, BlankRegistry, Binding,
    RenderOptions,
};
use crate::config::EngineConfig;
use crate::passage::Passage;

/// What the answer form should show for the current text.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    /// nothing detected yet; prompt the author to add markers
    NoBlanks,
    Blanks { total: usize, answered: usize },
}

/// One passage being edited by a single author.
///
/// Text edits and answer edits are the only inputs. Markers are re-derived
/// lazily from the text; answers are never dropped when their blank goes
/// away, so restoring the marker restores the answer.
#[derive(Debug, Clone)]
pub struct Session {
    passage: Passage,
    registry: BlankRegistry,
    render_options: RenderOptions,
}

impl Session {
    pub fn new(passage: Passage, config: &EngineConfig) -> Self {
        Self {
            passage,
            registry: BlankRegistry::new(config.scanner()),
            render_options: config.render_options(),
        }
    }

    /// A new passage from `raw_text`, numbered from the configured start.
    pub fn from_text(raw_text: impl Into<String>, config: &EngineConfig) -> Self {
        let passage = Passage::new(raw_text).with_starting_number(config.starting_number);
        Self::new(passage, config)
    }

    pub fn passage(&self) -> &Passage {
        &self.passage
    }

    pub fn into_passage(self) -> Passage {
        self.passage
    }

    pub fn set_text(&mut self, raw_text: impl Into<String>) {
        self.passage.raw_text = raw_text.into();
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.passage.title = title;
    }

    pub fn set_starting_number(&mut self, starting_number: u32) {
        self.passage.starting_number = starting_number;
    }

    pub fn set_answer(&mut self, question_number: u32, raw_answer: impl Into<String>) {
        self.passage.answers.set_answer(question_number, raw_answer);
    }

    pub fn answer(&self, question_number: u32) -> &str {
        self.passage.answers.get_answer(question_number)
    }

    pub fn variant_count(&self, question_number: u32) -> usize {
        self.passage.answers.variant_count(question_number)
    }

    pub fn markers(&mut self) -> &[BlankMarker] {
        let Passage {
            raw_text,
            starting_number,
            answers,
            ..
        } = &self.passage;
        self.registry.refresh(raw_text, *starting_number, answers)
    }

    pub fn bindings(&mut self) -> Vec<Binding<'_>> {
        self.markers();
        bind(self.registry.markers(), &self.passage.answers)
    }

    pub fn unanswered(&mut self) -> Vec<u32> {
        self.markers();
        unanswered_numbers(self.registry.markers(), &self.passage.answers)
    }

    pub fn stale_answers(&mut self) -> Vec<u32> {
        self.markers();
        stale_numbers(self.registry.markers(), &self.passage.answers)
    }

    pub fn status(&mut self) -> Status {
        let total = self.markers().len();
        if total == 0 {
            return Status::NoBlanks;
        }
        let answered = total - self.unanswered().len();
        Status::Blanks { total, answered }
    }

    pub fn preview(&mut self) -> String {
        self.markers();
        render(
            &self.passage.raw_text,
            self.registry.markers(),
            &self.passage.answers,
            &self.render_options,
        )
    }
}
