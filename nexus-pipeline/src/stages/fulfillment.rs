//! Fulfillment stage: classify each unfulfilled deal into a workflow
//! archetype, pick its build spec, simulate the build, and activate
//! clients for the builds that land.

use chrono::Utc;
use tracing::{info, warn};

use nexus_data::{
    Automation, AutomationSpec, BuildOutcome, CaseResults, CaseStudy, Client, ClientStatus, Deal,
    DealTier, FulfillmentStatus, SpecComponent, WorkflowKind,
};

use crate::entropy::Entropy;
use crate::error::Result;
use crate::stages::{Stage, StageContext, StageKind, StageReport};

pub struct FulfillmentStage;

/// Classify a deal's workflow from its discovery notes. Branch order is
/// load-bearing: a note mentioning both billing and data is a
/// reconciliation build, not a data sync.
pub fn classify_workflow(deal: &Deal) -> WorkflowKind {
    let pain_text = deal
        .discovery_notes
        .iter()
        .map(|n| n.answer.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    if pain_text.contains("inventory")
        || pain_text.contains("shopify")
        || pain_text.contains("amazon")
    {
        WorkflowKind::InventorySync
    } else if pain_text.contains("report")
        || (pain_text.contains("client") && pain_text.contains("deck"))
    {
        WorkflowKind::ClientReporting
    } else if pain_text.contains("reconciliation") || pain_text.contains("billing") {
        WorkflowKind::FinancialReconciliation
    } else if pain_text.contains("crm") || pain_text.contains("data") {
        WorkflowKind::DataSync
    } else {
        WorkflowKind::CustomAutomation
    }
}

/// Build the technical spec for a workflow archetype.
pub fn automation_spec(kind: WorkflowKind, company: &str) -> AutomationSpec {
    let component = |name: &str, function: &str| SpecComponent {
        name: name.to_string(),
        function: function.to_string(),
    };
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();

    match kind {
        WorkflowKind::InventorySync => AutomationSpec {
            name: format!("{company} Inventory Sync"),
            description: "Real-time inventory synchronization across e-commerce platforms"
                .to_string(),
            components: vec![
                component("Shopify Webhook Listener", "Capture inventory changes"),
                component("Amazon SP-API Connector", "Sync to Amazon"),
                component("Warehouse API Bridge", "Update WMS"),
                component("Conflict Resolver", "Handle simultaneous updates"),
                component("Alert System", "Notify on sync failures"),
            ],
            triggers: strings(&["Inventory change", "Scheduled sync", "Manual refresh"]),
            outputs: strings(&["Synced inventory counts", "Discrepancy reports", "Audit logs"]),
        },
        WorkflowKind::ClientReporting => AutomationSpec {
            name: format!("{company} Client Reporting"),
            description: "Automated client report generation and delivery".to_string(),
            components: vec![
                component("Data Aggregator", "Pull from 5+ platforms"),
                component("Report Builder", "Generate branded decks"),
                component("Scheduler", "Weekly automated runs"),
                component("Delivery Bot", "Email to clients"),
                component("Analytics", "Track engagement"),
            ],
            triggers: strings(&["Weekly schedule", "Manual request", "Data milestone"]),
            outputs: strings(&["Branded PDF reports", "Email notifications", "Engagement metrics"]),
        },
        WorkflowKind::FinancialReconciliation => AutomationSpec {
            name: format!("{company} Reconciliation Engine"),
            description: "Automated financial data reconciliation across systems".to_string(),
            components: vec![
                component("Transaction Importer", "Ingest from CRM + Billing"),
                component("Matching Engine", "Auto-match transactions"),
                component("Exception Handler", "Flag discrepancies"),
                component("Report Generator", "Daily reconciliation reports"),
                component("Approval Workflow", "Route exceptions for review"),
            ],
            triggers: strings(&["Daily batch", "Real-time webhook", "Manual reconciliation"]),
            outputs: strings(&["Reconciliation reports", "Exception lists", "Audit trails"]),
        },
        WorkflowKind::DataSync => AutomationSpec {
            name: format!("{company} Data Pipeline"),
            description: "Bi-directional data synchronization between platforms".to_string(),
            components: vec![
                component("API Connectors", "Interface with source systems"),
                component("Transform Engine", "Map and clean data"),
                component("Sync Orchestrator", "Manage data flow"),
                component("Conflict Resolution", "Handle collisions"),
                component("Monitoring", "Track sync health"),
            ],
            triggers: strings(&["Real-time", "Scheduled batch", "Manual trigger"]),
            outputs: strings(&["Synced records", "Error logs", "Sync metrics"]),
        },
        WorkflowKind::CustomAutomation => AutomationSpec {
            name: format!("{company} Custom Workflow"),
            description: "Bespoke automation solution for specific operational needs".to_string(),
            components: vec![
                component("Workflow Engine", "Core automation logic"),
                component("Integration Layer", "Connect to client systems"),
                component("Scheduler", "Time-based triggers"),
                component("Notification System", "Alert stakeholders"),
                component("Dashboard", "Monitor performance"),
            ],
            triggers: strings(&["Event-based", "Scheduled", "Manual"]),
            outputs: strings(&["Automated outputs", "Status reports", "Performance metrics"]),
        },
    }
}

/// Simulate a build. Enterprise builds carry a slightly lower success
/// rate; a failed build ships half its hours and escalates for review.
pub fn simulate_build(deal: &Deal, entropy: &mut dyn Entropy) -> BuildOutcome {
    let build_hours = entropy.range(16, 48);
    let success_rate = if deal.tier == DealTier::Enterprise {
        0.85
    } else {
        0.9
    };

    if entropy.chance(success_rate) {
        BuildOutcome {
            status: FulfillmentStatus::Completed,
            build_hours,
            time_saved_weekly: Some(entropy.range(15, 40)),
            roi_weeks: Some(entropy.range(2, 8)),
            client_satisfaction: Some(entropy.range(8, 10)),
            issue: None,
        }
    } else {
        BuildOutcome {
            status: FulfillmentStatus::NeedsReview,
            build_hours: build_hours / 2,
            time_saved_weekly: None,
            roi_weeks: None,
            client_satisfaction: None,
            issue: Some("Complex integration edge case".to_string()),
        }
    }
}

fn case_study(deal: &Deal, spec: &AutomationSpec, outcome: &BuildOutcome) -> CaseStudy {
    let bio = &deal.contact.bio;
    let industry = if bio.contains('|') {
        bio.split('|')
            .next()
            .unwrap_or("unknown")
            .trim()
            .to_string()
    } else {
        "unknown".to_string()
    };

    let challenge = deal
        .discovery_notes
        .first()
        .map(|n| n.answer.clone())
        .unwrap_or_else(|| "Manual operations".to_string());

    let time_saved = outcome.time_saved_weekly.unwrap_or(0);
    CaseStudy {
        id: format!("case_{}", deal.id),
        client: deal.company.clone(),
        industry,
        challenge,
        solution: spec.description.clone(),
        results: CaseResults {
            time_saved: format!("{time_saved} hours/week"),
            roi: format!("{} weeks", outcome.roi_weeks.unwrap_or(0)),
            satisfaction: format!("{}/10", outcome.client_satisfaction.unwrap_or(0)),
        },
        testimonial: format!(
            "Nexus Automation eliminated {time_saved} hours of weekly manual work. \
             ROI in under 2 months."
        ),
    }
}

impl Stage for FulfillmentStage {
    fn kind(&self) -> StageKind {
        StageKind::Fulfillment
    }

    fn run(&mut self, ctx: &StageContext, entropy: &mut dyn Entropy) -> Result<StageReport> {
        let mut deals = ctx.store.load_deals()?;
        let pending: Vec<usize> = deals
            .iter()
            .enumerate()
            .filter(|(_, d)| d.fulfillment_status.is_none())
            .map(|(i, _)| i)
            .collect();

        if pending.is_empty() {
            return Ok(StageReport {
                stage: StageKind::Fulfillment,
                produced: 0,
                detail: "no deals awaiting fulfillment".to_string(),
            });
        }

        let mut clients = Vec::new();
        let mut case_studies = Vec::new();

        for idx in pending {
            let deal = &deals[idx];
            let kind = classify_workflow(deal);
            let spec = automation_spec(kind, &deal.company);
            let outcome = simulate_build(deal, entropy);

            match outcome.status {
                FulfillmentStatus::Completed => {
                    info!(
                        deal = %deal.id,
                        workflow = %kind,
                        build_hours = outcome.build_hours,
                        "build complete, client activated"
                    );
                    case_studies.push(case_study(deal, &spec, &outcome));
                    clients.push(Client {
                        id: format!("client_{}", deal.id),
                        deal_id: deal.id.clone(),
                        company: deal.company.clone(),
                        contact: deal.contact.clone(),
                        tier: deal.tier,
                        mrr: deal.value,
                        status: ClientStatus::Active,
                        started_at: Utc::now(),
                        automation: Automation {
                            kind,
                            spec,
                            outcome: outcome.clone(),
                        },
                    });
                }
                FulfillmentStatus::NeedsReview => {
                    warn!(deal = %deal.id, workflow = %kind, "build escalated for review");
                }
            }

            let deal = &mut deals[idx];
            deal.fulfillment_status = Some(outcome.status);
            deal.fulfillment_outcome = Some(outcome);
        }

        ctx.store.append_clients(&clients)?;
        ctx.store.append_case_studies(&case_studies)?;
        ctx.store.rewrite_deals(&deals)?;

        Ok(StageReport {
            stage: StageKind::Fulfillment,
            produced: clients.len(),
            detail: format!(
                "{} clients activated, {} case studies",
                clients.len(),
                case_studies.len()
            ),
        })
    }
}
