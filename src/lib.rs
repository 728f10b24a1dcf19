//! Blank detection and answer binding for gap-fill exercises.
//!
//! Authored passages mark their blanks as `(16)`, `31___` or bare `___` runs.
//! [`blanks`] finds them, binds answers to their question numbers and renders
//! a preview; [`Session`] keeps one passage and its answers together while it
//! is being edited.

pub mod blanks;
pub mod config;
pub mod logging;
pub mod passage;
pub mod session;

pub use config::{ConfigError, EngineConfig};
pub use passage::{load_passage, parse_passage, save_passage, serialize_passage, Passage, PassageError};
pub use session::{Session, Status};
