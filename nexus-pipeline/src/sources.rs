//! Signal sources.
//!
//! Collectors normalize whatever shape a source emits into `SignalRecord`
//! so the scoring engine never cares where a signal came from. Live
//! collection is an external concern: when live mode is requested without
//! a credential the pipeline falls back to the built-in fixtures.

use nexus_data::SignalRecord;
use tracing::warn;

/// Env var selecting live vs simulated data sources.
pub const MODE_ENV: &str = "NEXUS_MODE";
/// Env var holding the collector credential.
pub const API_KEY_ENV: &str = "TWITTER_API_KEY";

pub trait SignalSource {
    fn name(&self) -> &'static str;
    fn collect(&self) -> Vec<SignalRecord>;
}

/// Mock job-board postings showing operational pain.
pub struct MockJobBoard;

impl SignalSource for MockJobBoard {
    fn name(&self) -> &'static str {
        "indeed"
    }

    fn collect(&self) -> Vec<SignalRecord> {
        vec![
            job(
                "indeed_001",
                "RapidCart",
                "Data Entry Specialist",
                "Fast-growing e-commerce company seeking data entry specialist to manually \
                 update inventory across multiple platforms. 40+ hours/week copying data \
                 between Shopify, Amazon, and internal systems.",
                "25-50",
            ),
            job(
                "indeed_002",
                "CloudSync SaaS",
                "Operations Associate",
                "Join our team! Responsibilities include manual reconciliation of customer \
                 accounts, spreadsheet management, and data migration between tools. \
                 Attention to detail required.",
                "50-100",
            ),
            job(
                "indeed_003",
                "GrowthLabs Agency",
                "Junior VA - Client Reporting",
                "Looking for virtual assistant to compile weekly client reports. Involves \
                 copying data from 5+ platforms into PowerPoint decks. 20 hrs/week.",
                "10-25",
            ),
        ]
    }
}

/// Mock social posts complaining about manual work.
pub struct MockSocial;

impl SignalSource for MockSocial {
    fn name(&self) -> &'static str {
        "twitter"
    }

    fn collect(&self) -> Vec<SignalRecord> {
        vec![
            post(
                "tw_001",
                "marissa_founder",
                "Marissa Chen",
                "Founder @RapidCart | 3x founder | E-commerce operator",
                3400,
                "Spending 4 hours every morning manually reconciling inventory across \
                 Shopify, Amazon, and our warehouse system. This is insane. There has to \
                 be a better way \u{1f62d}",
            ),
            post(
                "tw_002",
                "david_cto",
                "David Park",
                "CTO @CloudSync | Ex-Amazon | Building the future of data",
                8900,
                "Just approved hiring our 4th operations person for manual data \
                 reconciliation. Feels like we're treating the symptom not the disease. \
                 What are others doing for automated data pipelines?",
            ),
            post(
                "tw_003",
                "sarah_agency",
                "Sarah Miller",
                "CEO @GrowthLabs | Helping brands scale | 50+ clients served",
                2100,
                "My team spends 30+ hours/week copying data between platforms for client \
                 reports. This is not sustainable. Looking for automation solutions — any \
                 recommendations?",
            ),
            post(
                "tw_004",
                "random_dev",
                "Alex Johnson",
                "Software engineer | Open source contributor",
                340,
                "Manual testing is boring, wish it was automated",
            ),
        ]
    }
}

/// Mock forum posts from business communities.
pub struct MockForum;

impl SignalSource for MockForum {
    fn name(&self) -> &'static str {
        "reddit"
    }

    fn collect(&self) -> Vec<SignalRecord> {
        vec![
            SignalRecord {
                id: "rd_001".to_string(),
                source: "reddit".to_string(),
                title: "How do you handle inventory across multiple platforms?".to_string(),
                text: "I run a small e-commerce business doing about $50k/month. Currently \
                       selling on Shopify, Amazon, and Etsy. I'm spending 2-3 hours daily \
                       just updating inventory counts manually. It's killing me. What \
                       solutions have worked for you?"
                    .to_string(),
                author_handle: Some("shop_owner_2024".to_string()),
                ..Default::default()
            },
            SignalRecord {
                id: "rd_002".to_string(),
                source: "reddit".to_string(),
                title: "Team of 5 spending 100+ hours/week on manual reporting".to_string(),
                text: "I'm head of ops at a 60-person SaaS company. Our client success team \
                       manually compiles reports from 6 different tools every week. It's 20 \
                       hours per person. Leadership won't approve more headcount but won't \
                       invest in automation either. How do I make the business case?"
                    .to_string(),
                author_handle: Some("ops_manager_saas".to_string()),
                bio: "head of ops".to_string(),
                ..Default::default()
            },
        ]
    }
}

fn job(id: &str, company: &str, title: &str, description: &str, size: &str) -> SignalRecord {
    SignalRecord {
        id: id.to_string(),
        source: "indeed".to_string(),
        text: description.to_string(),
        title: title.to_string(),
        company: Some(company.to_string()),
        company_size: Some(size.to_string()),
        ..Default::default()
    }
}

fn post(id: &str, handle: &str, name: &str, bio: &str, followers: u32, text: &str) -> SignalRecord {
    SignalRecord {
        id: id.to_string(),
        source: "twitter".to_string(),
        text: text.to_string(),
        author_handle: Some(handle.to_string()),
        author_name: Some(name.to_string()),
        bio: bio.to_string(),
        followers,
        ..Default::default()
    }
}

/// The default source set. Live mode needs a collector credential; without
/// one every source silently degrades to its fixtures.
pub fn default_sources(live: bool) -> Vec<Box<dyn SignalSource>> {
    if live && std::env::var(API_KEY_ENV).is_err() {
        warn!("live mode requested but {API_KEY_ENV} is unset, using mock signals");
    }
    vec![
        Box::new(MockJobBoard),
        Box::new(MockSocial),
        Box::new(MockForum),
    ]
}

/// Whether the environment selects live data sources.
pub fn live_mode_from_env() -> bool {
    std::env::var(MODE_ENV).map(|v| v == "live").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_normalize_uniformly() {
        for source in default_sources(false) {
            for signal in source.collect() {
                assert!(!signal.id.is_empty());
                assert_eq!(signal.source, source.name());
                assert!(!signal.text.is_empty());
            }
        }
    }

    #[test]
    fn test_job_postings_carry_company_context() {
        let jobs = MockJobBoard.collect();
        assert_eq!(jobs.len(), 3);
        assert!(jobs.iter().all(|j| j.company.is_some()));
        assert!(jobs.iter().all(|j| j.company_size.is_some()));
    }
}
