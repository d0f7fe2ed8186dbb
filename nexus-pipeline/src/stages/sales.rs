//! Sales stage: discovery calls on booked meetings, qualification scoring,
//! and deal closing. Meetings are a queue: every run drains the whole
//! collection, closed or not.

use chrono::Utc;
use tracing::{debug, info};

use nexus_data::{
    AuthorityTier, Deal, DealStatus, DealTier, DiscoveryNote, Lead, Qualification, SalesConfig,
    Timeline,
};

use crate::entropy::Entropy;
use crate::error::Result;
use crate::stages::{Stage, StageContext, StageKind, StageReport};

pub struct SalesStage;

const PAIN_KEYWORDS: &[&str] = &[
    "hours", "nightmare", "hell", "daily", "weekly", "copying", "manual",
];
const BUDGET_KEYWORDS: &[&str] = &["hiring", "60k", "cost", "expensive", "person"];

const FALLBACK_ANSWER: &str = "It's complicated.";

/// Canned prospect answers per discovery question. Simulated calls pick
/// one per question; unknown questions get the fallback.
fn answer_bank(question: &str) -> &'static [&'static str] {
    match question {
        "What manual work takes up most of your team's time?" => &[
            "Honestly? Copying data between our CRM and billing system. Takes 2-3 hours daily.",
            "Inventory reconciliation across Shopify, Amazon, and our warehouse. It's a nightmare.",
            "Client reporting. We pull data from 5 platforms to build weekly decks. 20+ hours/week.",
        ],
        "How many hours per week are spent on repetitive tasks?" => &[
            "I'd estimate 30-40 hours across the team. Maybe more.",
            "At least 25 hours. Probably higher if we tracked it properly.",
            "Easily 50+ hours. It's basically a full-time person's job.",
        ],
        "What happens if this work doesn't get done?" => &[
            "Clients don't get billed on time. Cash flow nightmare.",
            "We oversell inventory. Then we have to cancel orders. Customer service hell.",
            "Clients churn. They expect these reports weekly. No report = no renewal.",
        ],
        "Have you tried automation before? What happened?" => &[
            "We tried Zapier but hit limits. Couldn't handle the complexity.",
            "Hired a dev to build something. It broke after 3 months. He left.",
            "Looked at some tools but couldn't justify the cost without proof it would work.",
        ],
        "What's the cost of continuing manually?" => &[
            "We're hiring a 3rd person for this next quarter. That's $60k+ annually.",
            "Opportunity cost is huge. My ops lead should be on strategy, not copy-paste.",
            "Hard to quantify, but we lose at least one client/month to competitors with better reporting.",
        ],
        _ => &[FALLBACK_ANSWER],
    }
}

/// Run a simulated discovery call, one picked answer per question in
/// question order.
pub fn discovery_notes(config: &SalesConfig, entropy: &mut dyn Entropy) -> Vec<DiscoveryNote> {
    config
        .discovery_questions
        .iter()
        .map(|question| {
            let bank = answer_bank(question);
            DiscoveryNote {
                question: question.clone(),
                answer: bank[entropy.index(bank.len())].to_string(),
            }
        })
        .collect()
}

/// Score a discovery call. Each dimension counts notes mentioning its
/// keywords, capped; timeline and decision-maker are all-or-nothing.
pub fn qualify(lead: &Lead, notes: &[DiscoveryNote]) -> Qualification {
    let mentions = |keywords: &[&str]| {
        notes
            .iter()
            .filter(|n| {
                let answer = n.answer.to_lowercase();
                keywords.iter().any(|kw| answer.contains(kw))
            })
            .count() as u32
    };

    let pain_score = (mentions(PAIN_KEYWORDS) * 10).min(30);
    let budget_score = (mentions(BUDGET_KEYWORDS) * 12).min(25);

    let has_urgency = notes
        .iter()
        .any(|n| n.answer.contains("next quarter") || n.answer.contains("monthly"));
    let timeline_score = if has_urgency { 20 } else { 15 };

    let dm_score = if lead.authority.tier == AuthorityTier::DecisionMaker {
        20
    } else {
        10
    };

    Qualification {
        score: pain_score + budget_score + timeline_score + dm_score,
        pain_confirmed: pain_score >= 20,
        budget_confirmed: budget_score >= 12,
        timeline: if timeline_score >= 20 {
            Timeline::Within30Days
        } else {
            Timeline::Future
        },
        decision_maker: dm_score >= 20,
    }
}

/// Pick deal tier and monthly value from budget signals in the notes,
/// with an enterprise override on company size.
pub fn deal_terms(lead: &Lead, notes: &[DiscoveryNote]) -> (DealTier, u32) {
    let signals = notes
        .iter()
        .map(|n| n.answer.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let (mut tier, mut value) = if signals.contains("60k")
        || signals.contains("3rd person")
        || signals.contains("hiring")
        || signals.contains("50+ hours")
        || signals.contains("full-time")
    {
        (DealTier::Growth, 2000)
    } else {
        (DealTier::Starter, 500)
    };

    if matches!(lead.context.company_size.as_str(), "100-200" | "200+") {
        tier = DealTier::Enterprise;
        value = 5000;
    }

    (tier, value)
}

fn close_deal(lead: &Lead, notes: Vec<DiscoveryNote>, qualification: Qualification) -> Deal {
    let (tier, value) = deal_terms(lead, &notes);
    Deal {
        id: format!("deal_{}", lead.id),
        lead_id: lead.id.clone(),
        company: lead.company.clone(),
        contact: lead.contact.clone(),
        tier,
        value,
        billing: "monthly".to_string(),
        pilot_duration_days: 14,
        status: DealStatus::ClosedWon,
        closed_at: Utc::now(),
        discovery_notes: notes,
        qualification,
        fulfillment_status: None,
        fulfillment_outcome: None,
    }
}

impl Stage for SalesStage {
    fn kind(&self) -> StageKind {
        StageKind::Sales
    }

    fn run(&mut self, ctx: &StageContext, entropy: &mut dyn Entropy) -> Result<StageReport> {
        let meetings = ctx.store.drain_meetings()?;
        if meetings.is_empty() {
            return Ok(StageReport {
                stage: StageKind::Sales,
                produced: 0,
                detail: "no meetings booked".to_string(),
            });
        }

        let mut deals = Vec::new();
        let mut nurtured = 0usize;

        for meeting in &meetings {
            let lead = &meeting.lead;
            let notes = discovery_notes(&ctx.config.sales, entropy);
            let qualification = qualify(lead, &notes);
            debug!(
                lead = %lead.id,
                score = qualification.score,
                "discovery call complete"
            );

            if qualification.score >= ctx.config.sales.min_qualification_score {
                let deal = close_deal(lead, notes, qualification);
                info!(deal = %deal.id, tier = %deal.tier, value = deal.value, "deal closed");
                deals.push(deal);
            } else {
                // Nurture is a log-only outcome; the lead stays in the
                // store untouched for a future pass.
                info!(lead = %lead.id, score = qualification.score, "not qualified, nurturing");
                nurtured += 1;
            }
        }

        ctx.store.append_deals(&deals)?;

        Ok(StageReport {
            stage: StageKind::Sales,
            produced: deals.len(),
            detail: format!(
                "closed {} of {} calls ({} nurtured)",
                deals.len(),
                meetings.len(),
                nurtured
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::ScriptedEntropy;
    use crate::scoring;
    use nexus_data::{
        Meeting, PipelineConfig, PipelineStore, Reply, ReplyKind, ReplyOutcome, SignalRecord,
    };

    fn lead(bio: &str, followers: u32, company_size: Option<&str>) -> Lead {
        let signal = SignalRecord {
            id: "sig".to_string(),
            source: "twitter".to_string(),
            text: "Spending 20+ hours every week manually reconciling inventory, \
                   currently hiring a 4th ops person"
                .to_string(),
            bio: bio.to_string(),
            author_name: Some("Jordan Reyes".to_string()),
            followers,
            company_size: company_size.map(|s| s.to_string()),
            ..Default::default()
        };
        scoring::score(&signal, &PipelineConfig::default().lead_gen).unwrap()
    }

    fn note(answer: &str) -> DiscoveryNote {
        DiscoveryNote {
            question: "q".to_string(),
            answer: answer.to_string(),
        }
    }

    fn meeting(lead: Lead) -> Meeting {
        Meeting {
            lead_id: lead.id.clone(),
            lead,
            meeting_time: "Thursday 2pm".to_string(),
            reply: Reply {
                kind: ReplyKind::Positive,
                subject: "Re: automation pilot".to_string(),
                body: "sounds interesting".to_string(),
                outcome: ReplyOutcome::MeetingBooked,
            },
        }
    }

    #[test]
    fn test_qualification_arithmetic() {
        let lead = lead("Founder @RapidCart", 6000, None);
        let notes = vec![
            note("Copying data between systems. Takes 2-3 hours daily."),
            note("I'd estimate 30-40 hours across the team."),
            note("Cash flow nightmare."),
            note("We tried Zapier but hit limits."),
            note("We're hiring a 3rd person next quarter. That's $60k+ annually."),
        ];
        let q = qualify(&lead, &notes);
        // pain 3 mentions -> 30, budget 1 mention -> 12, timeline 20, dm 20
        assert_eq!(q.score, 82);
        assert!(q.pain_confirmed);
        assert!(q.budget_confirmed);
        assert_eq!(q.timeline, Timeline::Within30Days);
        assert!(q.decision_maker);
    }

    #[test]
    fn test_pain_mentions_cap_at_30() {
        let lead = lead("Founder", 6000, None);
        let notes = vec![
            note("manual hours daily"),
            note("weekly copying nightmare"),
            note("it is hell"),
            note("manual again"),
            note("more manual hours"),
        ];
        let q = qualify(&lead, &notes);
        // 5 mentions would be 50 uncapped; budget 0, timeline 15, dm 20
        assert_eq!(q.score, 30 + 15 + 20);
    }

    #[test]
    fn test_non_decision_maker_scores_lower() {
        let dm = lead("Founder @RapidCart", 6000, None);
        let ic = lead("head of ops", 0, None);
        let notes = vec![note("nothing useful")];
        assert_eq!(qualify(&dm, &notes).score - qualify(&ic, &notes).score, 10);
    }

    #[test]
    fn test_deal_tier_brackets() {
        let l = lead("Founder", 6000, None);
        let growth = vec![note("We're hiring a 3rd person. $60k+ annually.")];
        assert_eq!(deal_terms(&l, &growth), (DealTier::Growth, 2000));

        let starter = vec![note("Maybe 25 hours. Probably higher.")];
        assert_eq!(deal_terms(&l, &starter), (DealTier::Starter, 500));

        let big = lead("Founder", 6000, Some("100-200"));
        assert_eq!(deal_terms(&big, &starter), (DealTier::Enterprise, 5000));
    }

    #[test]
    fn test_qualified_meeting_closes_and_drains() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        let config = PipelineConfig::default();
        store
            .append_meetings(&[meeting(lead("Founder @RapidCart", 6000, None))])
            .unwrap();

        let ctx = StageContext {
            store: &store,
            config: &config,
            live: false,
        };
        let mut entropy = ScriptedEntropy::constant(0.0);
        let report = SalesStage.run(&ctx, &mut entropy).unwrap();

        assert_eq!(report.produced, 1);
        let deals = store.load_deals().unwrap();
        assert_eq!(deals.len(), 1);
        let deal = &deals[0];
        assert_eq!(deal.id, format!("deal_{}", deal.lead_id));
        // Scripted answers: pain 30, budget 12, timeline 20, dm 20
        assert_eq!(deal.qualification.score, 82);
        assert_eq!(deal.tier, DealTier::Growth);
        assert_eq!(deal.value, 2000);
        assert_eq!(deal.billing, "monthly");
        assert_eq!(deal.pilot_duration_days, 14);
        assert!(deal.fulfillment_status.is_none());
        // Queue drained
        assert!(store.load_meetings().unwrap().is_empty());
    }

    #[test]
    fn test_unqualified_meeting_is_nurtured_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        let mut config = PipelineConfig::default();
        config.sales.min_qualification_score = 95;
        store
            .append_meetings(&[meeting(lead("head of ops", 0, None))])
            .unwrap();

        let ctx = StageContext {
            store: &store,
            config: &config,
            live: false,
        };
        let mut entropy = ScriptedEntropy::constant(0.0);
        let report = SalesStage.run(&ctx, &mut entropy).unwrap();

        assert_eq!(report.produced, 0);
        assert!(store.load_deals().unwrap().is_empty());
        assert!(store.load_meetings().unwrap().is_empty());
    }

    #[test]
    fn test_empty_queue_is_a_quiet_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        let config = PipelineConfig::default();

        let ctx = StageContext {
            store: &store,
            config: &config,
            live: false,
        };
        let mut entropy = ScriptedEntropy::constant(0.0);
        let report = SalesStage.run(&ctx, &mut entropy).unwrap();
        assert_eq!(report.produced, 0);
    }
}
