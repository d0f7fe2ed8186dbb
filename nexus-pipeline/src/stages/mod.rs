//! Stage agents.
//!
//! Each stage is a read-compute-append pass over the store: load a
//! snapshot of the collections it needs, apply its domain logic, write
//! the results back. Stages never hold cross-run state; the registry
//! builds fresh agents for every orchestrator invocation.

pub mod fulfillment;
pub mod lead_gen;
pub mod ops;
pub mod outreach;
pub mod sales;

use nexus_data::{PipelineConfig, PipelineStore};
use serde::Serialize;

use crate::entropy::Entropy;
use crate::error::Result;

pub use fulfillment::FulfillmentStage;
pub use lead_gen::LeadGenStage;
pub use ops::OpsStage;
pub use outreach::OutreachStage;
pub use sales::SalesStage;

/// The five fixed pipeline stages, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    LeadGen,
    Outreach,
    Sales,
    Fulfillment,
    Ops,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageKind::LeadGen => write!(f, "lead_gen"),
            StageKind::Outreach => write!(f, "outreach"),
            StageKind::Sales => write!(f, "sales"),
            StageKind::Fulfillment => write!(f, "fulfillment"),
            StageKind::Ops => write!(f, "ops"),
        }
    }
}

/// Everything a stage needs to run. Borrowed per invocation so agents
/// cannot retain store handles across runs.
pub struct StageContext<'a> {
    pub store: &'a PipelineStore,
    pub config: &'a PipelineConfig,
    /// Live mode actually transitions lead statuses; dry runs leave the
    /// store's leads untouched.
    pub live: bool,
}

/// What a stage produced, for the run log and the orchestrator's
/// empty-output checks.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: StageKind,
    /// Count of forward-propagating records (leads, meetings, deals,
    /// clients, reports).
    pub produced: usize,
    pub detail: String,
}

pub trait Stage {
    fn kind(&self) -> StageKind;
    fn run(&mut self, ctx: &StageContext, entropy: &mut dyn Entropy) -> Result<StageReport>;
}
