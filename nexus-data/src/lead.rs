use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A normalized unit of raw input produced by a collector.
///
/// Sources fold job descriptions and post bodies into `text` during
/// normalization; `title` stays separate because authority scoring reads
/// role keywords from `bio` + `title`, not from the body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalRecord {
    pub id: String,
    pub source: String,
    pub text: String,

    #[serde(default)]
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_handle: Option<String>,

    #[serde(default)]
    pub bio: String,

    #[serde(default)]
    pub followers: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
}

/// Composite lead tier derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadTier {
    Cool,
    Warm,
    Hot,
}

impl std::fmt::Display for LeadTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadTier::Cool => write!(f, "cool"),
            LeadTier::Warm => write!(f, "warm"),
            LeadTier::Hot => write!(f, "hot"),
        }
    }
}

impl std::str::FromStr for LeadTier {
    type Err = DataError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cool" => Ok(LeadTier::Cool),
            "warm" => Ok(LeadTier::Warm),
            "hot" => Ok(LeadTier::Hot),
            _ => Err(DataError::InvalidTier(s.to_string())),
        }
    }
}

impl LeadTier {
    /// Tier thresholds: hot >= 85, warm >= 75, cool otherwise.
    pub fn from_total(total: u32) -> Self {
        if total >= 85 {
            LeadTier::Hot
        } else if total >= 75 {
            LeadTier::Warm
        } else {
            LeadTier::Cool
        }
    }
}

/// Decision-making authority bucket from role/reach signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityTier {
    Individual,
    Influencer,
    DecisionMaker,
}

impl std::fmt::Display for AuthorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorityTier::Individual => write!(f, "individual"),
            AuthorityTier::Influencer => write!(f, "influencer"),
            AuthorityTier::DecisionMaker => write!(f, "decision_maker"),
        }
    }
}

/// Detected industry cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Ecommerce,
    Saas,
    Agency,
    Fintech,
    Consulting,
    Other,
}

impl Industry {
    /// Industry multiplier applied to the composite score.
    pub fn multiplier(&self) -> f64 {
        match self {
            Industry::Saas | Industry::Ecommerce => 1.0,
            Industry::Agency | Industry::Fintech => 0.95,
            Industry::Consulting => 0.9,
            Industry::Other => 0.8,
        }
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Industry::Ecommerce => write!(f, "ecommerce"),
            Industry::Saas => write!(f, "saas"),
            Industry::Agency => write!(f, "agency"),
            Industry::Fintech => write!(f, "fintech"),
            Industry::Consulting => write!(f, "consulting"),
            Industry::Other => write!(f, "other"),
        }
    }
}

/// Outreach status on a lead. The one field the Outreach/Sales stages
/// transition in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutreachStatus {
    Pending,
    Active,
    Simulated,
}

impl std::fmt::Display for OutreachStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutreachStatus::Pending => write!(f, "pending"),
            OutreachStatus::Active => write!(f, "active"),
            OutreachStatus::Simulated => write!(f, "simulated"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub handle: String,
    pub bio: String,
    pub followers: u32,
}

/// Pain sub-score with the signals that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainProfile {
    pub text: String,
    pub signals: Vec<String>,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityProfile {
    pub score: u32,
    pub tier: AuthorityTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadContext {
    pub industry: Industry,
    pub company_size: String,
    pub budget_score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total: u32,
    pub tier: LeadTier,
}

impl ScoreSummary {
    /// Build a summary, clamping the total to [0, 100].
    pub fn new(total: u32) -> Self {
        let total = total.min(100);
        Self {
            total,
            tier: LeadTier::from_total(total),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachState {
    pub status: OutreachStatus,
    pub hook: String,
    pub offer: String,
}

/// A scored, tiered candidate derived from one Signal Record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub discovered_at: DateTime<Utc>,
    pub source: String,
    pub company: String,
    pub contact: Contact,
    pub pain: PainProfile,
    pub authority: AuthorityProfile,
    pub context: LeadContext,
    pub score: ScoreSummary,
    pub outreach: OutreachState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(LeadTier::from_total(100), LeadTier::Hot);
        assert_eq!(LeadTier::from_total(85), LeadTier::Hot);
        assert_eq!(LeadTier::from_total(84), LeadTier::Warm);
        assert_eq!(LeadTier::from_total(75), LeadTier::Warm);
        assert_eq!(LeadTier::from_total(74), LeadTier::Cool);
        assert_eq!(LeadTier::from_total(0), LeadTier::Cool);
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!("hot".parse::<LeadTier>().unwrap(), LeadTier::Hot);
        assert_eq!("Warm".parse::<LeadTier>().unwrap(), LeadTier::Warm);
        assert!("scorching".parse::<LeadTier>().is_err());
    }

    #[test]
    fn test_score_summary_clamps() {
        let summary = ScoreSummary::new(140);
        assert_eq!(summary.total, 100);
        assert_eq!(summary.tier, LeadTier::Hot);
    }

    #[test]
    fn test_industry_multipliers() {
        assert_eq!(Industry::Saas.multiplier(), 1.0);
        assert_eq!(Industry::Ecommerce.multiplier(), 1.0);
        assert_eq!(Industry::Agency.multiplier(), 0.95);
        assert_eq!(Industry::Fintech.multiplier(), 0.95);
        assert_eq!(Industry::Consulting.multiplier(), 0.9);
        assert_eq!(Industry::Other.multiplier(), 0.8);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&AuthorityTier::DecisionMaker).unwrap();
        assert_eq!(json, "\"decision_maker\"");
        let json = serde_json::to_string(&OutreachStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }
}
