//! Downstream pipeline records: outreach log entries, meetings, deals,
//! clients, case studies, invoices, and reports.
//!
//! All of these are append-only once written, except the fulfillment
//! fields on `Deal` which the Fulfillment stage fills in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lead::{Contact, Lead, OutreachStatus};

/// One row in the outreach activity log. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachLogEntry {
    pub lead_id: String,
    pub started_at: DateTime<Utc>,
    pub sequence_name: String,
    pub steps_count: u32,
    pub status: OutreachStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Positive,
    Curious,
    NotNow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyOutcome {
    MeetingBooked,
    ReplyReceived,
    Nurture,
}

/// A simulated (or live) prospect reply to an outreach step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub kind: ReplyKind,
    pub subject: String,
    pub body: String,
    pub outcome: ReplyOutcome,
}

/// A booked meeting awaiting the Sales stage. Meetings are a queue, not a
/// log: the Sales stage drains the whole collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub lead_id: String,
    pub lead: Lead,
    pub meeting_time: String,
    pub reply: Reply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealTier {
    Starter,
    Growth,
    Enterprise,
}

impl std::fmt::Display for DealTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealTier::Starter => write!(f, "starter"),
            DealTier::Growth => write!(f, "growth"),
            DealTier::Enterprise => write!(f, "enterprise"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    ClosedWon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeline {
    Within30Days,
    Future,
}

/// Qualification breakdown computed during the discovery call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Qualification {
    pub score: u32,
    pub pain_confirmed: bool,
    pub budget_confirmed: bool,
    pub timeline: Timeline,
    pub decision_maker: bool,
}

/// One question/answer pair from discovery, in question order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryNote {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    Completed,
    NeedsReview,
}

/// Build outcome recorded by the Fulfillment stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOutcome {
    pub status: FulfillmentStatus,
    pub build_hours: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_saved_weekly: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi_weeks: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_satisfaction: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
}

/// A closed deal. Created by Sales; Fulfillment fills in the two
/// `fulfillment_*` fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub lead_id: String,
    pub company: String,
    pub contact: Contact,
    pub tier: DealTier,
    /// Monthly amount in dollars.
    pub value: u32,
    pub billing: String,
    pub pilot_duration_days: u32,
    pub status: DealStatus,
    pub closed_at: DateTime<Utc>,
    pub discovery_notes: Vec<DiscoveryNote>,
    pub qualification: Qualification,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_status: Option<FulfillmentStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_outcome: Option<BuildOutcome>,
}

/// One of the five workflow archetypes a deal is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    InventorySync,
    ClientReporting,
    FinancialReconciliation,
    DataSync,
    CustomAutomation,
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowKind::InventorySync => write!(f, "inventory_sync"),
            WorkflowKind::ClientReporting => write!(f, "client_reporting"),
            WorkflowKind::FinancialReconciliation => write!(f, "financial_reconciliation"),
            WorkflowKind::DataSync => write!(f, "data_sync"),
            WorkflowKind::CustomAutomation => write!(f, "custom_automation"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecComponent {
    pub name: String,
    pub function: String,
}

/// Technical specification selected for a workflow archetype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationSpec {
    pub name: String,
    pub description: String,
    pub components: Vec<SpecComponent>,
    pub triggers: Vec<String>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Automation {
    pub kind: WorkflowKind,
    pub spec: AutomationSpec,
    pub outcome: BuildOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
}

/// An active client produced by a successful build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub deal_id: String,
    pub company: String,
    pub contact: Contact,
    pub tier: DealTier,
    pub mrr: u32,
    pub status: ClientStatus,
    pub started_at: DateTime<Utc>,
    pub automation: Automation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResults {
    pub time_saved: String,
    pub roi: String,
    pub satisfaction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStudy {
    pub id: String,
    pub client: String,
    pub industry: String,
    pub challenge: String,
    pub solution: String,
    pub results: CaseResults,
    pub testimonial: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    PendingManualSend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecipient {
    pub company: String,
    pub contact_name: String,
    pub contact_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub period: String,
    pub amount: u32,
}

/// Invoice request for manual billing. One per active client per billing
/// cycle; repeated Ops runs re-append for the same period (known gap).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub status: InvoiceStatus,
    pub recipient: InvoiceRecipient,
    pub line_items: Vec<LineItem>,
    pub total_due: u32,
    pub due_date: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_leads: usize,
    pub hot_leads: usize,
    pub warm_leads: usize,
    pub deals_closed: usize,
    pub total_deal_value: u32,
    pub active_clients: usize,
    pub total_mrr: u32,
    pub case_studies: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRates {
    /// Closed deals over total leads, as a percentage rounded to 0.1.
    pub lead_to_deal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDigest {
    pub company: String,
    pub tier: DealTier,
    pub mrr: u32,
    pub automation_type: WorkflowKind,
    pub time_saved_weekly: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStudyDigest {
    pub client: String,
    pub challenge: String,
    pub results: CaseResults,
}

/// Business performance report, recomputed fresh each Ops run and written
/// as a new timestamped file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub conversion_rates: ConversionRates,
    pub active_clients: Vec<ClientDigest>,
    pub recent_case_studies: Vec<CaseStudyDigest>,
}
