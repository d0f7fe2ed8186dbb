//! Outreach stage: pick pending leads up to the daily cap, run a message
//! sequence per lead, simulate replies, and book meetings.

use chrono::Utc;
use tracing::{debug, info};

use nexus_data::{
    Lead, LeadTier, Meeting, OutreachConfig, OutreachLogEntry, OutreachStatus, Reply, ReplyKind,
    ReplyOutcome,
};

use crate::entropy::Entropy;
use crate::error::Result;
use crate::stages::{Stage, StageContext, StageKind, StageReport};

pub struct OutreachStage {
    tier: Option<LeadTier>,
}

impl OutreachStage {
    pub fn new(tier: Option<LeadTier>) -> Self {
        Self { tier }
    }
}

#[derive(Debug, Clone)]
pub struct SequenceStep {
    pub step: u32,
    pub delay_hours: u32,
    pub subject: String,
    pub body: String,
}

/// Build the message sequence for a lead. Hot leads get a varied choice
/// between the two templates; everyone else gets the standard sequence.
pub fn sequence_for(lead: &Lead, entropy: &mut dyn Entropy) -> (String, Vec<SequenceStep>) {
    let name = lead
        .contact
        .name
        .split_whitespace()
        .next()
        .unwrap_or("there")
        .to_string();
    let company = lead.company.clone();
    let hook = lead.outreach.hook.clone();
    let offer = lead.outreach.offer.clone();
    let industry = lead.context.industry;

    let direct_value = vec![
        SequenceStep {
            step: 1,
            delay_hours: 0,
            subject: format!("Quick question about {company}'s operations"),
            body: format!(
                "{hook}\n\nWe're offering {offer} to a select few companies this month. \
                 No commitment — just want to show you what's possible with modern \
                 automation.\n\nWorth a brief conversation?\n\nBest,\nNexus Automation Team"
            ),
        },
        SequenceStep {
            step: 2,
            delay_hours: 72,
            subject: "Re: automation pilot".to_string(),
            body: format!(
                "Hey {name} — wanted to follow up. We're building a handful of free \
                 automation pilots this week for {industry} companies.\n\nIf the manual \
                 work you mentioned is still eating your team's time, happy to slot \
                 {company} in.\n\nStill interested?\n\nBest"
            ),
        },
        SequenceStep {
            step: 3,
            delay_hours: 168,
            subject: format!("{name}, should I close the loop?"),
            body: format!(
                "Hi {name} — I'm assuming automation isn't a priority for {company} right \
                 now, which is totally fine.\n\nI'll close your spot in the pilot program \
                 unless I hear otherwise.\n\nBest,\nNexus Automation"
            ),
        },
    ];

    let social_proof = vec![
        SequenceStep {
            step: 1,
            delay_hours: 0,
            subject: "Saw your post about manual work — thought I'd reach out".to_string(),
            body: format!(
                "{hook}\n\nWe just helped a similar {industry} company eliminate 25+ \
                 hours/week of manual data work. Took 48 hours to build, paid for itself \
                 in week 1.\n\nWant to see if we can do the same for {company}? Free \
                 pilot, no strings.\n\nBest,\nNexus Automation Team"
            ),
        },
        SequenceStep {
            step: 2,
            delay_hours: 72,
            subject: format!("The math on {company}'s manual work"),
            body: format!(
                "Hey {name} — quick math:\n\nIf your team spends even 10 hours/week on \
                 manual tasks, and we cut that by 80%, that's 384 hours/year in recovered \
                 capacity.\n\nOur pilot is free. The math works.\n\nWorth 10 minutes?\n\nBest"
            ),
        },
        SequenceStep {
            step: 3,
            delay_hours: 168,
            subject: format!("Passing on {company}?"),
            body: format!(
                "Hi {name} — haven't heard back, so I'll assume now isn't the right time \
                 for {company}.\n\nNo worries — priorities shift.\n\nBest,\nNexus Automation"
            ),
        },
    ];

    if lead.score.total >= 85 {
        if entropy.index(2) == 0 {
            ("Direct Value".to_string(), direct_value)
        } else {
            ("Social Proof".to_string(), social_proof)
        }
    } else {
        ("Standard".to_string(), direct_value)
    }
}

/// Simulate a prospect reply to a sequence step. Reply probability is
/// keyed to the step number, overridden upward for hot leads.
pub fn simulate_reply(
    lead: &Lead,
    step: usize,
    config: &OutreachConfig,
    entropy: &mut dyn Entropy,
) -> Option<Reply> {
    let mut chance = config
        .reply_chance_by_step
        .get(step.saturating_sub(1))
        .copied()
        .unwrap_or(0.0);
    if lead.score.total >= 85 {
        chance = config.hot_reply_chance;
    }
    if !entropy.chance(chance) {
        return None;
    }

    let first = lead
        .contact
        .name
        .split_whitespace()
        .next()
        .unwrap_or("there");

    let reply = match entropy.index(3) {
        0 => Reply {
            kind: ReplyKind::Positive,
            subject: "Re: automation pilot".to_string(),
            body: format!(
                "Hi Nexus team — this is interesting. When could we chat? I'm free \
                 Thursday afternoon.\n\n{first}"
            ),
            outcome: ReplyOutcome::MeetingBooked,
        },
        1 => Reply {
            kind: ReplyKind::Curious,
            subject: "Re: automation pilot".to_string(),
            body: format!(
                "Can you tell me more about how this works? What platforms do you \
                 integrate with?\n\n{first}"
            ),
            outcome: ReplyOutcome::ReplyReceived,
        },
        _ => Reply {
            kind: ReplyKind::NotNow,
            subject: "Re: automation pilot".to_string(),
            body: format!(
                "Thanks for reaching out. Not a priority right now but maybe in Q3.\n\n{first}"
            ),
            outcome: ReplyOutcome::Nurture,
        },
    };
    Some(reply)
}

impl Stage for OutreachStage {
    fn kind(&self) -> StageKind {
        StageKind::Outreach
    }

    fn run(&mut self, ctx: &StageContext, entropy: &mut dyn Entropy) -> Result<StageReport> {
        let leads = ctx.store.load_leads()?;
        let pending: Vec<Lead> = leads
            .into_iter()
            .filter(|l| l.outreach.status == OutreachStatus::Pending)
            .filter(|l| self.tier.map_or(true, |t| l.score.tier == t))
            .collect();

        let mut log_entries = Vec::new();
        let mut meetings = Vec::new();
        let mut updated = Vec::new();

        for mut lead in pending.into_iter().take(ctx.config.outreach.daily_limit) {
            let (sequence_name, steps) = sequence_for(&lead, entropy);
            debug!(
                lead = %lead.id,
                score = lead.score.total,
                sequence = %sequence_name,
                "running outreach sequence"
            );

            // Replies are only simulated for the opening step; later
            // steps fire after real-world delays the batch run can't see.
            if let Some(reply) = simulate_reply(&lead, 1, &ctx.config.outreach, entropy) {
                info!(lead = %lead.id, kind = ?reply.kind, "simulated reply");
                if matches!(
                    reply.outcome,
                    ReplyOutcome::MeetingBooked | ReplyOutcome::ReplyReceived
                ) {
                    meetings.push(Meeting {
                        lead_id: lead.id.clone(),
                        lead: lead.clone(),
                        meeting_time: "Thursday 2pm".to_string(),
                        reply,
                    });
                }
            }

            let status = if ctx.live {
                OutreachStatus::Active
            } else {
                OutreachStatus::Pending
            };
            lead.outreach.status = status;

            log_entries.push(OutreachLogEntry {
                lead_id: lead.id.clone(),
                started_at: Utc::now(),
                sequence_name,
                steps_count: steps.len() as u32,
                status: if ctx.live {
                    OutreachStatus::Active
                } else {
                    OutreachStatus::Simulated
                },
            });

            if ctx.live {
                updated.push(lead);
            }
        }

        ctx.store.append_outreach(&log_entries)?;
        ctx.store.append_meetings(&meetings)?;
        if !updated.is_empty() {
            ctx.store.rewrite_leads(&updated)?;
        }

        Ok(StageReport {
            stage: StageKind::Outreach,
            produced: meetings.len(),
            detail: format!(
                "contacted {} leads, booked {} meetings",
                log_entries.len(),
                meetings.len()
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::ScriptedEntropy;
    use crate::scoring;
    use crate::sources::default_sources;
    use crate::stages::{LeadGenStage, Stage};
    use nexus_data::{PipelineConfig, PipelineStore};

    fn seeded_store(dir: &std::path::Path, config: &PipelineConfig) -> PipelineStore {
        let store = PipelineStore::open(dir).unwrap();
        let ctx = StageContext {
            store: &store,
            config,
            live: false,
        };
        let mut entropy = ScriptedEntropy::constant(0.0);
        LeadGenStage::new(default_sources(false))
            .run(&ctx, &mut entropy)
            .unwrap();
        store
    }

    #[test]
    fn test_positive_replies_become_meetings() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::default();
        let store = seeded_store(dir.path(), &config);
        let n_leads = store.load_leads().unwrap().len();
        assert!(n_leads > 0);

        let ctx = StageContext {
            store: &store,
            config: &config,
            live: false,
        };
        // Roll 0.0: every reply chance passes and index(3) picks Positive
        let mut entropy = ScriptedEntropy::constant(0.0);
        let report = OutreachStage::new(None).run(&ctx, &mut entropy).unwrap();

        assert_eq!(report.produced, n_leads);
        assert_eq!(store.load_meetings().unwrap().len(), n_leads);
        assert_eq!(store.load_outreach().unwrap().len(), n_leads);
        // Dry run leaves lead statuses pending
        assert!(store
            .load_leads()
            .unwrap()
            .iter()
            .all(|l| l.outreach.status == OutreachStatus::Pending));
    }

    #[test]
    fn test_zero_reply_chance_books_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.outreach.reply_chance_by_step = vec![0.0, 0.0, 0.0];
        config.outreach.hot_reply_chance = 0.0;
        let store = seeded_store(dir.path(), &config);

        let ctx = StageContext {
            store: &store,
            config: &config,
            live: false,
        };
        let mut entropy = ScriptedEntropy::constant(0.0);
        let report = OutreachStage::new(None).run(&ctx, &mut entropy).unwrap();

        assert_eq!(report.produced, 0);
        assert!(store.load_meetings().unwrap().is_empty());
        // The outreach log still records the attempts
        assert!(!store.load_outreach().unwrap().is_empty());
    }

    #[test]
    fn test_live_mode_transitions_lead_status() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::default();
        let store = seeded_store(dir.path(), &config);

        let ctx = StageContext {
            store: &store,
            config: &config,
            live: true,
        };
        let mut entropy = ScriptedEntropy::constant(0.0);
        OutreachStage::new(None).run(&ctx, &mut entropy).unwrap();

        assert!(store
            .load_leads()
            .unwrap()
            .iter()
            .all(|l| l.outreach.status == OutreachStatus::Active));
    }

    #[test]
    fn test_daily_cap_limits_contacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.outreach.daily_limit = 1;
        let store = seeded_store(dir.path(), &config);

        let ctx = StageContext {
            store: &store,
            config: &config,
            live: false,
        };
        let mut entropy = ScriptedEntropy::constant(0.0);
        OutreachStage::new(None).run(&ctx, &mut entropy).unwrap();

        assert_eq!(store.load_outreach().unwrap().len(), 1);
    }

    #[test]
    fn test_standard_sequence_below_hot() {
        let config = PipelineConfig::default();
        let signal = nexus_data::SignalRecord {
            id: "tw".to_string(),
            source: "twitter".to_string(),
            text: "4 hours every morning manually reconciling inventory, insane".to_string(),
            bio: "Founder".to_string(),
            author_name: Some("Marissa Chen".to_string()),
            followers: 3400,
            ..Default::default()
        };
        let lead = scoring::score(&signal, &config.lead_gen).unwrap();
        assert!(lead.score.total < 85);

        let mut entropy = ScriptedEntropy::constant(0.9);
        let (name, steps) = sequence_for(&lead, &mut entropy);
        assert_eq!(name, "Standard");
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].delay_hours, 0);
        assert_eq!(steps[2].delay_hours, 168);
    }
}
