/// One unit of a parsed document's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocEvent {
    StartElement(String),
    Text(String),
    EndElement(String),
    EndDocument,
}

/// The byte source behind an event stream failed while being read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("read failed: {message}")]
pub struct ReadError {
    pub message: String,
}

impl ReadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// The document is structurally invalid at this point.
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error(transparent)]
    Read(#[from] ReadError),
}
