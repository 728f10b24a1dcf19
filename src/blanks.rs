mod answer;
mod marker;
mod plain;
mod registry;
mod render;
mod scan;

pub use answer::{AnswerEntry, AnswerStore, VARIANT_DELIMITER};
pub use marker::{BlankMarker, MarkerKind, Notation};
pub use plain::{escape_html, plain_text};
pub use registry::{bind, reconcile, stale_numbers, unanswered_numbers, BlankList, BlankRegistry, Binding};
pub use render::{render, RenderOptions, DEFAULT_FRAGMENT_CLASS, DEFAULT_PLACEHOLDER};
pub use scan::{scan, Scanner};
