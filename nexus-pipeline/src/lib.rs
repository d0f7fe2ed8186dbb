pub mod entropy;
pub mod error;
pub mod orchestrator;
pub mod runlog;
pub mod scoring;
pub mod sources;
pub mod stages;

pub use entropy::{Entropy, ScriptedEntropy, SeededEntropy, ThreadEntropy};
pub use error::{PipelineError, Result};
pub use orchestrator::{Orchestrator, RunSummary, StageOutcome};
pub use runlog::RunLog;
pub use scoring::score;
pub use stages::{Stage, StageContext, StageKind, StageReport};
