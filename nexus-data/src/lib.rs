pub mod config;
pub mod error;
pub mod lead;
pub mod records;
pub mod store;

// Re-export the record types for convenience
pub use config::{KeywordCategory, LeadGenConfig, OutreachConfig, PipelineConfig, SalesConfig};
pub use error::{DataError, Result};
pub use lead::{
    AuthorityProfile, AuthorityTier, Contact, Industry, Lead, LeadContext, LeadTier,
    OutreachState, OutreachStatus, PainProfile, ScoreSummary, SignalRecord,
};
pub use records::{
    Automation, AutomationSpec, BuildOutcome, CaseResults, CaseStudy, CaseStudyDigest, Client,
    ClientDigest, ClientStatus, ConversionRates, Deal, DealStatus, DealTier, DiscoveryNote,
    FulfillmentStatus, Invoice,
    InvoiceRecipient, InvoiceStatus, LineItem, Meeting, OutreachLogEntry, Qualification, Reply,
    ReplyKind, ReplyOutcome, Report, ReportSummary, SpecComponent, Timeline, WorkflowKind,
};
pub use store::PipelineStore;
