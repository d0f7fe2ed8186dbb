use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use nexus_data::{LeadTier, PipelineConfig, PipelineStore};
use nexus_pipeline::entropy::{Entropy, SeededEntropy, ThreadEntropy};
use nexus_pipeline::orchestrator::Orchestrator;
use nexus_pipeline::runlog::RunLog;
use nexus_pipeline::sources::{self, default_sources};
use nexus_pipeline::stages::{
    FulfillmentStage, LeadGenStage, OpsStage, OutreachStage, SalesStage, Stage, StageContext,
};

#[derive(Parser)]
#[command(name = "nexus-pipeline")]
#[command(about = "Lead scoring and pipeline orchestration for Nexus Automation")]
#[command(version)]
struct Cli {
    /// Pipeline state directory (default: platform data dir)
    #[arg(long, global = true)]
    pipeline_dir: Option<PathBuf>,

    /// Path to a JSON config file (default: built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: lead gen, outreach, sales, fulfillment, ops
    Run {
        /// Use live data sources and transition lead statuses
        #[arg(long)]
        live: bool,

        /// Seed the entropy source for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Collect and score signals into leads
    LeadGen {
        /// Use live data sources
        #[arg(long)]
        live: bool,
    },

    /// Start outreach sequences on pending leads
    Outreach {
        /// Only contact leads of this tier (hot, warm, cool)
        #[arg(long)]
        tier: Option<LeadTier>,

        /// Transition lead statuses (dry run otherwise)
        #[arg(long)]
        live: bool,
    },

    /// Run discovery calls on booked meetings and close deals
    Sales,

    /// Build automations for closed deals and activate clients
    Fulfillment,

    /// Generate the business report (and optionally invoice requests)
    Ops {
        /// Generate invoice requests for active clients
        #[arg(long)]
        invoices: bool,
    },

    /// Print the latest business report
    Status,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let dir = cli
        .pipeline_dir
        .clone()
        .unwrap_or_else(PipelineStore::default_dir);
    let store = PipelineStore::open(&dir)
        .with_context(|| format!("opening pipeline store at {}", dir.display()))?;

    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Run { live, seed } => {
            let live = live || sources::live_mode_from_env();
            let mut entropy: Box<dyn Entropy> = match seed {
                Some(seed) => Box::new(SeededEntropy::new(seed)),
                None => Box::new(ThreadEntropy),
            };
            let orchestrator = Orchestrator::new(store, config).live(live);
            match orchestrator.run(entropy.as_mut()) {
                Ok(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
                Err(err) => {
                    RunLog::record_crash(&orchestrator.store().logs_dir(), &err);
                    return Err(err.into());
                }
            }
        }
        Commands::LeadGen { live } => {
            let live = live || sources::live_mode_from_env();
            let mut stage = LeadGenStage::new(default_sources(live));
            run_single(&mut stage, &store, &config, live)?;
        }
        Commands::Outreach { tier, live } => {
            let mut stage = OutreachStage::new(tier);
            run_single(&mut stage, &store, &config, live)?;
        }
        Commands::Sales => {
            run_single(&mut SalesStage, &store, &config, false)?;
        }
        Commands::Fulfillment => {
            run_single(&mut FulfillmentStage, &store, &config, false)?;
        }
        Commands::Ops { invoices } => {
            run_single(&mut OpsStage::new(invoices), &store, &config, false)?;
        }
        Commands::Status => {
            let reports = store.load_reports()?;
            match reports.last() {
                Some(report) => println!("{}", serde_json::to_string_pretty(report)?),
                None => println!("No reports yet. Run `nexus-pipeline ops` first."),
            }
        }
    }

    Ok(())
}

/// Run one stage outside the orchestrator. Single-stage invocations get
/// thread entropy and surface errors directly instead of containing them.
fn run_single(
    stage: &mut dyn Stage,
    store: &PipelineStore,
    config: &PipelineConfig,
    live: bool,
) -> Result<()> {
    let ctx = StageContext {
        store,
        config,
        live,
    };
    let mut entropy = ThreadEntropy;
    let report = stage.run(&ctx, &mut entropy)?;
    info!(stage = %report.stage, produced = report.produced, "stage complete");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
