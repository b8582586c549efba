//! Error types for ripplecheck-orchestrator.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Core,
    Cache,
    Vcs,
    Oracle,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Core => "core",
            ErrorKind::Cache => "cache",
            ErrorKind::Vcs => "vcs",
            ErrorKind::Oracle => "oracle",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct OrchestratorError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl OrchestratorError {
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
}

impl From<ripplecheck_core::RippleError> for OrchestratorError {
    fn from(e: ripplecheck_core::RippleError) -> Self {
        Self::new(ErrorKind::Core, e.to_string())
    }
}

impl From<ripplecheck_cache::CacheError> for OrchestratorError {
    fn from(e: ripplecheck_cache::CacheError) -> Self {
        Self::new(ErrorKind::Cache, e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Structured failure surfaced by the intent oracle (spec §7 "Oracle
/// failure"): timeout, missing model, or explicit cancellation. No
/// analysis runs when this is returned.
#[derive(Debug, Clone, Error)]
#[error("intent parse failed for prompt {prompt:?}: {reason}")]
pub struct IntentParseError {
    pub prompt: String,
    pub reason: String,
}
