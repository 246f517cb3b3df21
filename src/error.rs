use thiserror::Error;

/// Errors raised while turning user input into a [`NoteId`](crate::models::NoteId).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NoteIdError {
    #[error("Note id cannot be empty")]
    Empty,
    #[error("Invalid note id: {0:?}")]
    Invalid(String),
    #[error("Note ids start at 1")]
    Zero,
}
