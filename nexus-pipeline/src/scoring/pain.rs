//! Pain intensity scoring (0-100).
//!
//! An additive tally of independent detectors, clamped to 100. Each
//! detector contributes at most once; the keyword detector scores only
//! the first matching category in the configured order.

use std::sync::OnceLock;

use nexus_data::LeadGenConfig;
use regex::Regex;

// Compiled once; scoring runs per signal in a batch
fn hours_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\+?\s*(hours?|hrs?)").expect("valid hours pattern"))
}

fn recurrence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(every|each)\s+(day|morning|week)").expect("valid recurrence pattern")
    })
}

/// Score pain intensity and collect the signals that fired.
pub fn score_pain(text: &str, config: &LeadGenConfig) -> (u32, Vec<String>) {
    let mut score = 0;
    let mut signals = Vec::new();
    let text_lower = text.to_lowercase();

    // Quantified time cost, tiered by hours
    if let Some(caps) = hours_re().captures(&text_lower) {
        let hours: u32 = caps[1].parse().unwrap_or(0);
        if hours >= 20 {
            score += 35;
            signals.push(format!("High time cost: {hours}+ hours"));
        } else if hours >= 5 {
            score += 25;
            signals.push(format!("Moderate time cost: {hours} hours"));
        } else {
            score += 15;
            signals.push(format!("Time mentioned: {hours} hours"));
        }
    }

    // Recurring frequency phrasing
    if recurrence_re().is_match(&text_lower) {
        score += 20;
        signals.push("Daily recurring pain".to_string());
    }

    // First matching keyword category only
    for category in &config.pain_keywords {
        if category.patterns.iter().any(|p| text_lower.contains(p)) {
            score += 15;
            signals.push(format!("Keyword: {}", category.category));
            break;
        }
    }

    // Emotional intensity lexicon
    if config.emotion_words.iter().any(|w| text_lower.contains(w)) {
        score += 20;
        signals.push("Emotional intensity high".to_string());
    }

    // Hiring means the budget already exists
    if text_lower.contains("hiring") || text_lower.contains("headcount") {
        score += 25;
        signals.push("Budget confirmed: hiring".to_string());
    }

    (score.min(100), signals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LeadGenConfig {
        LeadGenConfig::default()
    }

    #[test]
    fn test_high_time_cost() {
        let (score, signals) = score_pain("Spending 20+ hours every week on this", &config());
        // 35 (hours) + 20 (recurring)
        assert_eq!(score, 55);
        assert!(signals.iter().any(|s| s.contains("High time cost: 20+")));
    }

    #[test]
    fn test_moderate_and_low_time_tiers() {
        let (score, _) = score_pain("takes 6 hours", &config());
        assert_eq!(score, 25);
        let (score, _) = score_pain("takes 3 hrs", &config());
        assert_eq!(score, 15);
    }

    #[test]
    fn test_first_keyword_category_only() {
        // "manually" and "spreadsheet" both present; only one category fires
        let (score, signals) = score_pain("manually updating the spreadsheet", &config());
        assert_eq!(score, 15);
        assert_eq!(signals, vec!["Keyword: manual".to_string()]);
    }

    #[test]
    fn test_emotion_and_hiring() {
        let (score, _) = score_pain("this is a nightmare, we are hiring help", &config());
        // keyword category "hiring" 15 + emotion 20 + hiring signal 25
        assert_eq!(score, 60);
    }

    #[test]
    fn test_no_signals_scores_zero() {
        let (score, signals) = score_pain("We love our current workflow", &config());
        assert_eq!(score, 0);
        assert!(signals.is_empty());
    }

    #[test]
    fn test_clamped_to_100() {
        let text =
            "Spending 25 hours every day manually copying data, it's hell, hiring more headcount";
        let (score, _) = score_pain(text, &config());
        assert_eq!(score, 100);
    }

    #[test]
    fn test_founder_scenario_pain() {
        let text = "Spending 20+ hours every week manually reconciling inventory, \
                    currently hiring a 4th ops person";
        let (score, _) = score_pain(text, &config());
        // 35 + 20 + 15 + 25 = 95
        assert!(score >= 95);
    }
}
