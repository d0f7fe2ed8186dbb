//! Industry detection from signal content. First matching cluster wins.

use nexus_data::Industry;

const INDUSTRY_CLUSTERS: &[(&[&str], Industry)] = &[
    (
        &["ecommerce", "shopify", "amazon", "etsy", "inventory", "product"],
        Industry::Ecommerce,
    ),
    (
        &["saas", "software", "api", "platform", "tech company"],
        Industry::Saas,
    ),
    (&["agency", "client", "marketing", "brand"], Industry::Agency),
    (
        &["fintech", "finance", "reconciliation", "payment", "banking"],
        Industry::Fintech,
    ),
    (&["consulting", "advisor", "services"], Industry::Consulting),
];

pub fn detect_industry(text: &str) -> Industry {
    let combined = text.to_lowercase();
    for (keywords, industry) in INDUSTRY_CLUSTERS {
        if keywords.iter().any(|kw| combined.contains(kw)) {
            return *industry;
        }
    }
    Industry::Other
}
