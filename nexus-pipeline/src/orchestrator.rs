//! Pipeline orchestrator.
//!
//! Runs the five stages in fixed order with per-stage fault isolation:
//! a stage failure is logged and treated as empty output, never a run
//! abort. From Sales onward, empty forward output short-circuits the
//! funnel straight to Ops, which always runs so every invocation ends
//! with a fresh report.

use serde::Serialize;
use tracing::{error, info};

use nexus_data::{PipelineConfig, PipelineStore};

use crate::entropy::Entropy;
use crate::error::Result;
use crate::runlog::RunLog;
use crate::sources::default_sources;
use crate::stages::{
    FulfillmentStage, LeadGenStage, OpsStage, OutreachStage, SalesStage, Stage, StageContext,
    StageKind,
};

/// Outcome of one stage within a run.
#[derive(Debug, Clone, Serialize)]
pub struct StageOutcome {
    pub stage: StageKind,
    pub produced: usize,
    pub detail: String,
    pub failed: bool,
}

/// Outcome of a whole pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub outcomes: Vec<StageOutcome>,
    /// True when an empty funnel cut the run short of Fulfillment.
    pub halted_early: bool,
}

impl RunSummary {
    pub fn produced(&self, stage: StageKind) -> usize {
        self.outcomes
            .iter()
            .find(|o| o.stage == stage)
            .map(|o| o.produced)
            .unwrap_or(0)
    }
}

pub struct Orchestrator {
    store: PipelineStore,
    config: PipelineConfig,
    live: bool,
    generate_invoices: bool,
}

impl Orchestrator {
    pub fn new(store: PipelineStore, config: PipelineConfig) -> Self {
        Self {
            store,
            config,
            live: false,
            generate_invoices: true,
        }
    }

    pub fn live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    pub fn with_invoices(mut self, generate_invoices: bool) -> Self {
        self.generate_invoices = generate_invoices;
        self
    }

    pub fn store(&self) -> &PipelineStore {
        &self.store
    }

    /// Run the full pipeline once. Only setup failures (the run log
    /// itself) propagate; stage failures are contained.
    pub fn run(&self, entropy: &mut dyn Entropy) -> Result<RunSummary> {
        let mut runlog = RunLog::create(&self.store.logs_dir())?;
        let run_id = runlog.run_id().to_string();
        info!(run_id = %run_id, live = self.live, "pipeline run started");
        runlog.event(&format!("run started (live={})", self.live));

        let ctx = StageContext {
            store: &self.store,
            config: &self.config,
            live: self.live,
        };

        let funnel: Vec<Box<dyn Stage>> = vec![
            Box::new(LeadGenStage::new(default_sources(self.live))),
            Box::new(OutreachStage::new(None)),
            Box::new(SalesStage),
            Box::new(FulfillmentStage),
        ];

        let mut outcomes = Vec::new();
        let mut halted_early = false;
        let mut last_produced = 0usize;

        for mut stage in funnel {
            let kind = stage.kind();
            // The funnel only carries forward from Sales on; the earlier
            // stages read durable state, not the previous stage's output.
            if matches!(kind, StageKind::Sales | StageKind::Fulfillment) && last_produced == 0 {
                runlog.event(&format!("halting before {kind}: empty funnel"));
                info!(stage = %kind, "empty funnel, skipping to ops");
                halted_early = true;
                break;
            }
            let outcome = self.run_stage(stage.as_mut(), &ctx, entropy, &mut runlog);
            last_produced = outcome.produced;
            outcomes.push(outcome);
        }

        // A halted run reports current state but bills nobody
        let mut ops = OpsStage::new(self.generate_invoices && !halted_early);
        outcomes.push(self.run_stage(&mut ops, &ctx, entropy, &mut runlog));

        runlog.event("run complete");
        info!(run_id = %run_id, stages = outcomes.len(), "pipeline run complete");

        Ok(RunSummary {
            run_id,
            outcomes,
            halted_early,
        })
    }

    fn run_stage(
        &self,
        stage: &mut dyn Stage,
        ctx: &StageContext,
        entropy: &mut dyn Entropy,
        runlog: &mut RunLog,
    ) -> StageOutcome {
        let kind = stage.kind();
        runlog.event(&format!("stage {kind} started"));
        match stage.run(ctx, entropy) {
            Ok(report) => {
                runlog.event(&format!("stage {kind}: {}", report.detail));
                StageOutcome {
                    stage: kind,
                    produced: report.produced,
                    detail: report.detail,
                    failed: false,
                }
            }
            Err(err) => {
                error!(stage = %kind, error = %err, "stage failed");
                runlog.stage_error(&kind.to_string(), &err);
                StageOutcome {
                    stage: kind,
                    produced: 0,
                    detail: err.to_string(),
                    failed: true,
                }
            }
        }
    }
}
