//! Composite lead scoring.
//!
//! `score` is the whole contract: signal in, `Option<Lead>` out. A signal
//! with no usable text, a pain score under 40, or a composite under the
//! configured minimum is silently rejected.

use chrono::Utc;
use nexus_data::{
    AuthorityProfile, Contact, Lead, LeadContext, LeadGenConfig, OutreachState, OutreachStatus,
    PainProfile, ScoreSummary, SignalRecord,
};

use super::{authority, industry, pain, templates};

const PAIN_WEIGHT: f64 = 0.45;
const AUTHORITY_WEIGHT: f64 = 0.30;
const BUDGET_WEIGHT: f64 = 0.25;

/// Minimum pain score before a signal is worth composite scoring.
const PAIN_FLOOR: u32 = 40;

/// Budget proxy. Not additive with the other detectors: hiring overrides
/// everything, then company-size brackets, then a flat base.
pub fn budget_score(text: &str, company_size: Option<&str>) -> u32 {
    if text.to_lowercase().contains("hiring") {
        return 85;
    }
    match company_size {
        Some("50-100") | Some("100-200") => 75,
        Some("25-50") => 65,
        _ => 60,
    }
}

/// Score a signal into a lead, or reject it.
pub fn score(signal: &SignalRecord, config: &LeadGenConfig) -> Option<Lead> {
    // Pain, budget, and industry read the body + title; authority reads
    // the role text (bio + title).
    let content = format!("{} {}", signal.text, signal.title);
    if content.trim().is_empty() {
        return None;
    }

    let (pain_score, pain_signals) = pain::score_pain(&content, config);
    if pain_score < PAIN_FLOOR {
        return None;
    }

    let role_text = format!("{} {}", signal.bio, signal.title);
    let (authority_score, authority_tier) = authority::score_authority(&role_text, signal.followers);
    let detected = industry::detect_industry(&content);
    let budget = budget_score(&content, signal.company_size.as_deref());

    let weighted = pain_score as f64 * PAIN_WEIGHT
        + authority_score as f64 * AUTHORITY_WEIGHT
        + budget as f64 * BUDGET_WEIGHT;
    let total = (weighted * detected.multiplier()).round() as u32;

    if total < config.min_lead_score {
        return None;
    }

    Some(Lead {
        id: format!("nexus_{}", signal.id),
        discovered_at: Utc::now(),
        source: signal.source.clone(),
        company: signal
            .company
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        contact: Contact {
            name: signal
                .author_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            handle: signal.author_handle.clone().unwrap_or_default(),
            bio: signal.bio.clone(),
            followers: signal.followers,
        },
        pain: PainProfile {
            text: signal.text.clone(),
            signals: pain_signals,
            score: pain_score,
        },
        authority: AuthorityProfile {
            score: authority_score,
            tier: authority_tier,
        },
        context: LeadContext {
            industry: detected,
            company_size: signal
                .company_size
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            budget_score: budget,
        },
        score: ScoreSummary::new(total),
        outreach: OutreachState {
            status: OutreachStatus::Pending,
            hook: templates::generate_hook(signal.author_name.as_deref(), &content),
            offer: templates::recommend_offer(detected, &content),
        },
    })
}
