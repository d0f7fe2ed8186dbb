//! Hook and offer templates.
//!
//! Selection is keyed by pain keywords and industry, so the same signal
//! always yields the same copy.

use nexus_data::Industry;

/// First name from a full name, falling back to "there".
fn first_name(name: Option<&str>) -> &str {
    name.and_then(|n| n.split_whitespace().next())
        .filter(|n| !n.is_empty())
        .unwrap_or("there")
}

/// Generate the personalized outreach hook for a signal.
pub fn generate_hook(author_name: Option<&str>, text: &str) -> String {
    let name = first_name(author_name);
    let text_lower = text.to_lowercase();

    if text_lower.contains("inventory") {
        format!(
            "Hey {name} — saw your post about inventory reconciliation eating your mornings. \
             We built an automation that syncs inventory across platforms in real-time. \
             Want to see it in action (free 2-week pilot)?"
        )
    } else if text_lower.contains("report") || text_lower.contains("client") {
        format!(
            "Hi {name} — 30+ hours on client reports is brutal. We automated a similar \
             workflow for an agency, cut it to 2 hours/week. Happy to build you a free \
             proof-of-concept?"
        )
    } else if text_lower.contains("reconciliation") || text_lower.contains("data") {
        format!(
            "Hey {name} — before you hire that next ops person, want to see if the \
             reconciliation work can just... happen automatically? We'll build it free, \
             you only pay if it works."
        )
    } else {
        format!(
            "Hi {name} — saw your post about manual work. Nexus Automation specializes in \
             eliminating repetitive operations. Worth a 10-min chat to explore?"
        )
    }
}

/// Recommend the freemium offer for a signal.
pub fn recommend_offer(industry: Industry, text: &str) -> String {
    let text_lower = text.to_lowercase();

    if text_lower.contains("inventory") {
        "Multi-platform inventory sync (free 2-week pilot)".to_string()
    } else if text_lower.contains("report") {
        "Client reporting automation (free dashboard + 1 month)".to_string()
    } else if text_lower.contains("reconciliation") {
        "Automated reconciliation workflow (free setup + trial)".to_string()
    } else if text_lower.contains("data entry") {
        "Data entry automation bot (free build + 100 tasks)".to_string()
    } else if industry == Industry::Agency {
        "Client onboarding automation (free workflow + 30 days)".to_string()
    } else if industry == Industry::Saas {
        "User provisioning automation (free integration + trial)".to_string()
    } else {
        "Custom workflow automation (free audit + pilot build)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_is_deterministic_and_keyed() {
        let text = "manually reconciling inventory across platforms";
        let a = generate_hook(Some("Marissa Chen"), text);
        let b = generate_hook(Some("Marissa Chen"), text);
        assert_eq!(a, b);
        assert!(a.starts_with("Hey Marissa"));
        assert!(a.contains("inventory"));
    }

    #[test]
    fn test_hook_falls_back_to_there() {
        let hook = generate_hook(None, "manual work everywhere");
        assert!(hook.starts_with("Hi there"));
    }

    #[test]
    fn test_offer_keyed_by_keyword_then_industry() {
        assert!(recommend_offer(Industry::Other, "inventory counts").contains("inventory sync"));
        assert!(recommend_offer(Industry::Agency, "nothing specific").contains("onboarding"));
        assert!(recommend_offer(Industry::Saas, "nothing specific").contains("provisioning"));
        assert!(recommend_offer(Industry::Other, "nothing specific").contains("Custom workflow"));
    }
}
