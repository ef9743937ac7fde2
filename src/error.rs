use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("row {row} is out of range for a document with {line_count} line(s)")]
    InvalidPosition { row: usize, line_count: usize },
}
