//! Decision-making authority scoring.
//!
//! Tiered keyword match on role text plus a follower-count bonus. Role
//! tiers are mutually exclusive: only the first matching tier scores.

use nexus_data::AuthorityTier;

const AUTHORITY_TIERS: &[(&[&str], u32)] = &[
    (&["founder", "ceo", "owner", "co-founder"], 45),
    (&["cto", "coo", "chief"], 40),
    (&["head of", "vp ", "vice president"], 30),
    (&["director", "manager"], 20),
];

/// Score authority from bio + title text and follower reach.
pub fn score_authority(role_text: &str, followers: u32) -> (u32, AuthorityTier) {
    let combined = role_text.to_lowercase();
    let mut score = 0;

    for (keywords, points) in AUTHORITY_TIERS {
        if keywords.iter().any(|kw| combined.contains(kw)) {
            score += points;
            break;
        }
    }

    if followers > 5000 {
        score += 25;
    } else if followers > 1000 {
        score += 15;
    } else if followers > 500 {
        score += 10;
    }

    let tier = if score >= 60 {
        AuthorityTier::DecisionMaker
    } else if score >= 35 {
        AuthorityTier::Influencer
    } else {
        AuthorityTier::Individual
    };

    (score.min(100), tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_founder_with_reach_is_decision_maker() {
        let (score, tier) = score_authority("Founder @RapidCart | 3x founder", 6000);
        assert_eq!(score, 70);
        assert_eq!(tier, AuthorityTier::DecisionMaker);
    }

    #[test]
    fn test_role_tiers_are_mutually_exclusive() {
        // "founder" and "cto" both present; only the first tier scores
        let (score, _) = score_authority("Founder and CTO", 0);
        assert_eq!(score, 45);
    }

    #[test]
    fn test_follower_brackets() {
        assert_eq!(score_authority("", 5001).0, 25);
        assert_eq!(score_authority("", 5000).0, 15);
        assert_eq!(score_authority("", 1001).0, 15);
        assert_eq!(score_authority("", 501).0, 10);
        assert_eq!(score_authority("", 500).0, 0);
    }

    #[test]
    fn test_tier_boundaries() {
        // head of + >1000 followers = 45 -> influencer
        let (score, tier) = score_authority("Head of Ops", 1500);
        assert_eq!(score, 45);
        assert_eq!(tier, AuthorityTier::Influencer);

        // manager alone = 20 -> individual
        let (_, tier) = score_authority("Operations Manager", 0);
        assert_eq!(tier, AuthorityTier::Individual);

        // cto + >5000 followers = 65 -> decision maker
        let (_, tier) = score_authority("CTO @CloudSync", 8900);
        assert_eq!(tier, AuthorityTier::DecisionMaker);
    }
}
