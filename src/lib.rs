//! noteboard - a terminal notes board.
//!
//! Notes live in an in-memory [`store::NotesStore`]; the board renders them
//! with ratatui and filters them through a headless
//! [`dropdown::DropdownController`].

pub mod app;
pub mod cli;
pub mod dropdown;
pub mod error;
pub mod form;
pub mod icons;
pub mod listeners;
pub mod logging;
pub mod models;
pub mod select;
pub mod store;
pub mod ui;
pub mod viewport;

pub use error::NoteIdError;
pub use models::{NewNote, Note, NoteId, NoteType};
pub use store::NotesStore;
