//! Error types for ripplecheck-cache, mirroring the `kind`/`message`/
//! `source` shape used throughout the workspace.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An artifact file could not be read or its content was not valid JSON.
    Corrupt,
    /// An artifact file could not be written to disk.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Corrupt => "corrupt",
            ErrorKind::Io => "io",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct CacheError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl CacheError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Corrupt, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
