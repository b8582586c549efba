//! Intent oracle contract (spec §4.9, §6): the core never embeds a model,
//! it consumes whatever an external oracle returns for a prompt plus
//! grounding context.

use crate::error::IntentParseError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Add,
    Modify,
    Delete,
    Refactor,
    Unknown,
}

/// What the oracle returns for a prompt (spec §4.9).
#[derive(Debug, Clone, PartialEq)]
pub struct IntentDescriptor {
    pub prompt: String,
    pub change_type: ChangeType,
    pub symbol_hints: Vec<String>,
    pub file_hints: Vec<String>,
    pub affects_public_api: bool,
    pub summary: String,
}

/// Bounded grounding context handed to the oracle: exported symbols first,
/// capped per `RippleConfig::max_context_files` / `max_context_symbols`.
#[derive(Debug, Clone, Default)]
pub struct GroundingContext {
    pub file_paths: Vec<String>,
    pub symbol_descriptors: Vec<String>,
}

/// Cooperative cancellation for the oracle call (spec §5 "Cancellation"):
/// the only long operation that exposes one, since it is the only one
/// whose cost is unbounded (an external model call).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
pub trait IntentOracle {
    async fn describe(
        &self,
        prompt: &str,
        grounding: &GroundingContext,
        cancellation: &CancellationToken,
    ) -> Result<IntentDescriptor, IntentParseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_token_starts_uncancelled_and_latches_once_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }
}
