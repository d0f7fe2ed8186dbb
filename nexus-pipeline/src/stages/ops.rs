//! Ops stage: business reporting and invoice requests.
//!
//! The report is recomputed from the whole store on every run and written
//! as a fresh timestamped file; nothing about reporting mutates pipeline
//! state. Invoice generation is opt-in and appends one request per active
//! client per billing cycle.

use chrono::{Duration, Utc};
use tracing::{info, warn};

use nexus_data::{
    CaseStudyDigest, Client, ClientDigest, ClientStatus, ConversionRates, DealStatus, Invoice,
    InvoiceRecipient, InvoiceStatus, LeadTier, LineItem, PipelineStore, Report, ReportSummary,
};

use crate::entropy::Entropy;
use crate::error::Result;
use crate::stages::{Stage, StageContext, StageKind, StageReport};

pub struct OpsStage {
    generate_invoices: bool,
}

impl OpsStage {
    pub fn new(generate_invoices: bool) -> Self {
        Self { generate_invoices }
    }
}

/// Compute the business report from everything currently in the store.
pub fn generate_report(store: &PipelineStore) -> Result<Report> {
    let leads = store.load_leads()?;
    let deals = store.load_deals()?;
    let clients = store.load_clients()?;
    let case_studies = store.load_case_studies()?;

    let closed: Vec<_> = deals
        .iter()
        .filter(|d| d.status == DealStatus::ClosedWon)
        .collect();
    let active: Vec<_> = clients
        .iter()
        .filter(|c| c.status == ClientStatus::Active)
        .collect();

    let lead_to_deal = if leads.is_empty() {
        0.0
    } else {
        let pct = closed.len() as f64 / leads.len() as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    };

    Ok(Report {
        generated_at: Utc::now(),
        summary: ReportSummary {
            total_leads: leads.len(),
            hot_leads: leads
                .iter()
                .filter(|l| l.score.tier == LeadTier::Hot)
                .count(),
            warm_leads: leads
                .iter()
                .filter(|l| l.score.tier == LeadTier::Warm)
                .count(),
            deals_closed: closed.len(),
            total_deal_value: closed.iter().map(|d| d.value).sum(),
            active_clients: active.len(),
            total_mrr: active.iter().map(|c| c.mrr).sum(),
            case_studies: case_studies.len(),
        },
        conversion_rates: ConversionRates { lead_to_deal },
        active_clients: active
            .iter()
            .map(|c| ClientDigest {
                company: c.company.clone(),
                tier: c.tier,
                mrr: c.mrr,
                automation_type: c.automation.kind,
                time_saved_weekly: c.automation.outcome.time_saved_weekly,
            })
            .collect(),
        recent_case_studies: case_studies
            .iter()
            .rev()
            .take(3)
            .rev()
            .map(|cs| CaseStudyDigest {
                client: cs.client.clone(),
                challenge: truncate(&cs.challenge, 50),
                results: cs.results.clone(),
            })
            .collect(),
    })
}

fn truncate(text: &str, max: usize) -> String {
    let prefix: String = text.chars().take(max).collect();
    format!("{prefix}...")
}

/// Build invoice requests for manual billing, one per active client.
/// The id embeds the billing month, but repeated runs in the same month
/// still append duplicates; dedup is a manual-billing concern for now.
pub fn invoice_requests(clients: &[Client]) -> Vec<Invoice> {
    let now = Utc::now();
    clients
        .iter()
        .filter(|c| c.status == ClientStatus::Active)
        .map(|client| {
            let domain = client.company.to_lowercase().replace(' ', "");
            Invoice {
                id: format!("inv_{}_{}", client.id, now.format("%Y%m")),
                generated_at: now,
                status: InvoiceStatus::PendingManualSend,
                recipient: InvoiceRecipient {
                    company: client.company.clone(),
                    contact_name: client.contact.name.clone(),
                    // Placeholder address until clients supply a real one
                    contact_email: format!("finance@{domain}.com"),
                },
                line_items: vec![LineItem {
                    description: format!("Nexus Automation — {} Tier", tier_title(client)),
                    period: now.format("%B %Y").to_string(),
                    amount: client.mrr,
                }],
                total_due: client.mrr,
                due_date: (now + Duration::days(7)).format("%Y-%m-%d").to_string(),
                notes: format!(
                    "Monthly service fee for {}. Automation type: {}. Client since {}.",
                    client.company,
                    client.automation.kind,
                    client.started_at.format("%Y-%m-%d")
                ),
            }
        })
        .collect()
}

fn tier_title(client: &Client) -> String {
    let name = client.tier.to_string();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => name,
    }
}

impl Stage for OpsStage {
    fn kind(&self) -> StageKind {
        StageKind::Ops
    }

    fn run(&mut self, ctx: &StageContext, _entropy: &mut dyn Entropy) -> Result<StageReport> {
        let report = generate_report(ctx.store)?;
        let path = ctx.store.write_report(&report)?;
        info!(
            leads = report.summary.total_leads,
            deals = report.summary.deals_closed,
            mrr = report.summary.total_mrr,
            report = %path.display(),
            "business report written"
        );

        let mut invoiced = 0;
        if self.generate_invoices {
            let clients = ctx.store.load_clients()?;
            let invoices = invoice_requests(&clients);
            invoiced = invoices.len();
            ctx.store.append_invoices(&invoices)?;
            if invoiced > 0 {
                warn!(count = invoiced, "invoice requests pending manual send");
            }
        }

        Ok(StageReport {
            stage: StageKind::Ops,
            produced: 1,
            detail: format!(
                "report written ({} leads, ${} MRR, {} invoices)",
                report.summary.total_leads, report.summary.total_mrr, invoiced
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::ScriptedEntropy;
    use chrono::Utc;
    use nexus_data::{
        Automation, AutomationSpec, BuildOutcome, Contact, DealTier, FulfillmentStatus,
        PipelineConfig, WorkflowKind,
    };

    fn client(id: &str, company: &str, mrr: u32) -> Client {
        Client {
            id: id.to_string(),
            deal_id: format!("deal_{id}"),
            company: company.to_string(),
            contact: Contact {
                name: "Marissa Chen".to_string(),
                handle: "marissa_founder".to_string(),
                bio: "Founder".to_string(),
                followers: 3400,
            },
            tier: DealTier::Growth,
            mrr,
            status: ClientStatus::Active,
            started_at: Utc::now(),
            automation: Automation {
                kind: WorkflowKind::InventorySync,
                spec: AutomationSpec {
                    name: format!("{company} Inventory Sync"),
                    description: "Real-time inventory synchronization".to_string(),
                    components: vec![],
                    triggers: vec![],
                    outputs: vec![],
                },
                outcome: BuildOutcome {
                    status: FulfillmentStatus::Completed,
                    build_hours: 16,
                    time_saved_weekly: Some(20),
                    roi_weeks: Some(3),
                    client_satisfaction: Some(9),
                    issue: None,
                },
            },
        }
    }

    #[test]
    fn test_empty_store_reports_zeroes() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        let report = generate_report(&store).unwrap();

        assert_eq!(report.summary.total_leads, 0);
        assert_eq!(report.summary.total_mrr, 0);
        assert_eq!(report.conversion_rates.lead_to_deal, 0.0);
        assert!(report.active_clients.is_empty());
    }

    #[test]
    fn test_report_aggregates_clients() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        store
            .append_clients(&[client("c1", "RapidCart", 2000), client("c2", "CloudSync", 5000)])
            .unwrap();

        let report = generate_report(&store).unwrap();
        assert_eq!(report.summary.active_clients, 2);
        assert_eq!(report.summary.total_mrr, 7000);
        assert_eq!(report.active_clients.len(), 2);
        assert_eq!(report.active_clients[0].time_saved_weekly, Some(20));
    }

    #[test]
    fn test_report_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        store.append_clients(&[client("c1", "RapidCart", 2000)]).unwrap();

        let first = generate_report(&store).unwrap();
        let second = generate_report(&store).unwrap();
        assert_eq!(first.summary, second.summary);
        assert_eq!(first.conversion_rates, second.conversion_rates);
        assert_eq!(first.active_clients, second.active_clients);
    }

    #[test]
    fn test_invoice_fields() {
        let invoices = invoice_requests(&[client("c1", "Rapid Cart", 2000)]);
        assert_eq!(invoices.len(), 1);
        let inv = &invoices[0];

        let now = Utc::now();
        assert_eq!(inv.id, format!("inv_c1_{}", now.format("%Y%m")));
        assert_eq!(inv.status, InvoiceStatus::PendingManualSend);
        assert_eq!(inv.recipient.contact_email, "finance@rapidcart.com");
        assert_eq!(inv.total_due, 2000);
        assert_eq!(inv.line_items.len(), 1);
        assert_eq!(inv.line_items[0].description, "Nexus Automation — Growth Tier");
        assert_eq!(
            inv.due_date,
            (now + Duration::days(7)).format("%Y-%m-%d").to_string()
        );
    }

    #[test]
    fn test_stage_writes_report_and_optionally_invoices() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        let config = PipelineConfig::default();
        store.append_clients(&[client("c1", "RapidCart", 2000)]).unwrap();

        let ctx = StageContext {
            store: &store,
            config: &config,
            live: false,
        };
        let mut entropy = ScriptedEntropy::constant(0.0);

        let report = OpsStage::new(false).run(&ctx, &mut entropy).unwrap();
        assert_eq!(report.produced, 1);
        assert_eq!(store.load_reports().unwrap().len(), 1);
        assert!(store.load_invoices().unwrap().is_empty());

        OpsStage::new(true).run(&ctx, &mut entropy).unwrap();
        assert_eq!(store.load_reports().unwrap().len(), 2);
        assert_eq!(store.load_invoices().unwrap().len(), 1);
    }

    #[test]
    fn test_recent_case_studies_keeps_last_three() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        let studies: Vec<_> = (0..5)
            .map(|i| nexus_data::CaseStudy {
                id: format!("case_{i}"),
                client: format!("Client {i}"),
                industry: "saas".to_string(),
                challenge: "Manual reporting across many tools takes the team 20 hours weekly"
                    .to_string(),
                solution: "Automated reporting".to_string(),
                results: nexus_data::CaseResults {
                    time_saved: "20 hours/week".to_string(),
                    roi: "3 weeks".to_string(),
                    satisfaction: "9/10".to_string(),
                },
                testimonial: "Great".to_string(),
            })
            .collect();
        store.append_case_studies(&studies).unwrap();

        let report = generate_report(&store).unwrap();
        assert_eq!(report.summary.case_studies, 5);
        assert_eq!(report.recent_case_studies.len(), 3);
        assert_eq!(report.recent_case_studies[0].client, "Client 2");
        assert_eq!(report.recent_case_studies[2].client, "Client 4");
        assert!(report.recent_case_studies[0].challenge.ends_with("..."));
        assert_eq!(report.recent_case_studies[0].challenge.chars().count(), 53);
    }
}
