//! Lead generation stage: collect signals, score them, persist a ranked
//! shard of qualified leads.

use tracing::{debug, info};

use crate::entropy::Entropy;
use crate::error::Result;
use crate::scoring;
use crate::sources::SignalSource;
use crate::stages::{Stage, StageContext, StageKind, StageReport};

pub struct LeadGenStage {
    sources: Vec<Box<dyn SignalSource>>,
}

impl LeadGenStage {
    pub fn new(sources: Vec<Box<dyn SignalSource>>) -> Self {
        Self { sources }
    }
}

impl Stage for LeadGenStage {
    fn kind(&self) -> StageKind {
        StageKind::LeadGen
    }

    fn run(&mut self, ctx: &StageContext, _entropy: &mut dyn Entropy) -> Result<StageReport> {
        let mut signals = Vec::new();
        for source in &self.sources {
            let batch = source.collect();
            debug!(source = source.name(), count = batch.len(), "collected signals");
            signals.extend(batch);
        }

        let mut leads: Vec<_> = signals
            .iter()
            .filter_map(|s| scoring::score(s, &ctx.config.lead_gen))
            .collect();
        leads.sort_by(|a, b| b.score.total.cmp(&a.score.total));

        if !leads.is_empty() {
            let shard = ctx.store.append_leads(&leads)?;
            debug!(shard = %shard.display(), "saved lead shard");
        }

        for lead in leads.iter().take(5) {
            info!(
                tier = %lead.score.tier,
                score = lead.score.total,
                company = %lead.company,
                contact = %lead.contact.name,
                "qualified lead"
            );
        }

        Ok(StageReport {
            stage: StageKind::LeadGen,
            produced: leads.len(),
            detail: format!(
                "qualified {} of {} signals (min score: {})",
                leads.len(),
                signals.len(),
                ctx.config.lead_gen.min_lead_score
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::ScriptedEntropy;
    use crate::sources::default_sources;
    use nexus_data::{PipelineConfig, PipelineStore};

    #[test]
    fn test_mock_sources_yield_ranked_leads() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        let config = PipelineConfig::default();
        let ctx = StageContext {
            store: &store,
            config: &config,
            live: false,
        };

        let mut stage = LeadGenStage::new(default_sources(false));
        let mut entropy = ScriptedEntropy::constant(0.0);
        let report = stage.run(&ctx, &mut entropy).unwrap();

        let leads = store.load_leads().unwrap();
        assert_eq!(report.produced, leads.len());
        assert!(!leads.is_empty());
        // Ranked descending by total
        for pair in leads.windows(2) {
            assert!(pair[0].score.total >= pair[1].score.total);
        }
        // Every kept lead clears the configured minimum
        assert!(leads
            .iter()
            .all(|l| l.score.total >= config.lead_gen.min_lead_score));
    }

    #[test]
    fn test_restrictive_minimum_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        let mut config = PipelineConfig::default();
        config.lead_gen.min_lead_score = 99;
        let ctx = StageContext {
            store: &store,
            config: &config,
            live: false,
        };

        let mut stage = LeadGenStage::new(default_sources(false));
        let mut entropy = ScriptedEntropy::constant(0.0);
        let report = stage.run(&ctx, &mut entropy).unwrap();

        assert_eq!(report.produced, 0);
        assert!(store.load_leads().unwrap().is_empty());
    }
}
