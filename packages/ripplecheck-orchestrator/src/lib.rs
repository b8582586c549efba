//! Orchestration layer: ties `ripplecheck-core` and `ripplecheck-cache`
//! together into the Incremental Updater, Staged-Diff Mapper, Blast-Radius
//! Engine, Intent Pipeline, and the top-level façade.

pub mod blast_radius;
pub mod config;
pub mod editor;
pub mod error;
pub mod incremental;
pub mod intent;
pub mod oracle;
pub mod orchestrator;
pub mod staged_diff;
pub mod vcs;

pub use blast_radius::{BlastRadiusEngine, BlastRadiusResult, ImpactRoot, PropagationMode, Reason};
pub use config::RippleConfig;
pub use error::{ErrorKind, IntentParseError, OrchestratorError, Result};
pub use incremental::IncrementalUpdater;
pub use intent::{Confidence, IntentAnalysisResult, IntentPipeline};
pub use oracle::{CancellationToken, ChangeType, GroundingContext, IntentDescriptor, IntentOracle};
pub use orchestrator::RippleOrchestrator;
pub use staged_diff::StagedDiffMapper;
pub use vcs::{FileStatus, GitCliCollaborator, StagedFile, StagedHunk, VcsCollaborator};
