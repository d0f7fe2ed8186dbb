//! File-backed pipeline state store.
//!
//! One directory of JSON collection files is the unit of truth between
//! stages. Leads are sharded into timestamp-named files merged on load;
//! the other collections are single JSON arrays appended to as whole-file
//! rewrites. There is no locking: the orchestrator guarantees one run at
//! a time.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DataError, Result};
use crate::lead::Lead;
use crate::records::{CaseStudy, Client, Deal, Invoice, Meeting, OutreachLogEntry, Report};

const LEAD_PREFIX: &str = "leads_";
const REPORT_PREFIX: &str = "report_";

/// Handle on a pipeline state directory.
#[derive(Debug, Clone)]
pub struct PipelineStore {
    dir: PathBuf,
}

impl PipelineStore {
    /// Open (creating if needed) a store at the given directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| DataError::Write {
            path: dir.display().to_string(),
            source: e,
        })?;
        Ok(Self { dir })
    }

    /// Default pipeline directory under the user data dir.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nexus")
            .join("pipeline")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory for run-scoped logs and the shared error log.
    pub fn logs_dir(&self) -> PathBuf {
        self.dir.join("logs")
    }

    // ---- leads (sharded) ----

    /// Load all leads, merging every `leads_*.json` shard in file order.
    pub fn load_leads(&self) -> Result<Vec<Lead>> {
        let mut leads = Vec::new();
        for path in self.shard_paths(LEAD_PREFIX)? {
            leads.extend(read_array::<Lead>(&path)?);
        }
        Ok(leads)
    }

    /// Append a batch of leads as a new timestamp-named shard.
    /// Returns the shard path.
    pub fn append_leads(&self, leads: &[Lead]) -> Result<PathBuf> {
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let mut path = self.dir.join(format!("{LEAD_PREFIX}{stamp}.json"));
        // Two appends within the same second get distinct shards.
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{LEAD_PREFIX}{stamp}_{n}.json"));
            n += 1;
        }
        write_json(&path, &leads)?;
        Ok(path)
    }

    /// Rewrite lead shards in place, replacing any lead whose id matches
    /// one in `updated`. Used only for the sanctioned in-place status
    /// transitions. Returns how many leads were replaced.
    pub fn rewrite_leads(&self, updated: &[Lead]) -> Result<usize> {
        let mut replaced = 0;
        for path in self.shard_paths(LEAD_PREFIX)? {
            let mut shard = read_array::<Lead>(&path)?;
            let mut dirty = false;
            for lead in shard.iter_mut() {
                if let Some(new) = updated.iter().find(|u| u.id == lead.id) {
                    *lead = new.clone();
                    replaced += 1;
                    dirty = true;
                }
            }
            if dirty {
                write_json(&path, &shard)?;
            }
        }
        Ok(replaced)
    }

    // ---- single-file array collections ----

    pub fn load_outreach(&self) -> Result<Vec<OutreachLogEntry>> {
        read_array(&self.dir.join("outreach.json"))
    }

    pub fn append_outreach(&self, entries: &[OutreachLogEntry]) -> Result<()> {
        append_array(&self.dir.join("outreach.json"), entries)
    }

    pub fn load_meetings(&self) -> Result<Vec<Meeting>> {
        read_array(&self.dir.join("meetings.json"))
    }

    pub fn append_meetings(&self, meetings: &[Meeting]) -> Result<()> {
        append_array(&self.dir.join("meetings.json"), meetings)
    }

    /// Destructive read: load all meetings and delete the collection.
    /// Meetings are a queue, not a log.
    pub fn drain_meetings(&self) -> Result<Vec<Meeting>> {
        let path = self.dir.join("meetings.json");
        let meetings = read_array(&path)?;
        if path.exists() {
            fs::remove_file(&path).map_err(|e| DataError::Write {
                path: path.display().to_string(),
                source: e,
            })?;
        }
        Ok(meetings)
    }

    pub fn load_deals(&self) -> Result<Vec<Deal>> {
        read_array(&self.dir.join("deals.json"))
    }

    pub fn append_deals(&self, deals: &[Deal]) -> Result<()> {
        append_array(&self.dir.join("deals.json"), deals)
    }

    /// Replace the whole deal collection (fulfillment status updates).
    pub fn rewrite_deals(&self, deals: &[Deal]) -> Result<()> {
        write_json(&self.dir.join("deals.json"), &deals)
    }

    pub fn load_clients(&self) -> Result<Vec<Client>> {
        read_array(&self.dir.join("clients.json"))
    }

    pub fn append_clients(&self, clients: &[Client]) -> Result<()> {
        append_array(&self.dir.join("clients.json"), clients)
    }

    pub fn load_case_studies(&self) -> Result<Vec<CaseStudy>> {
        read_array(&self.dir.join("case_studies.json"))
    }

    pub fn append_case_studies(&self, studies: &[CaseStudy]) -> Result<()> {
        append_array(&self.dir.join("case_studies.json"), studies)
    }

    pub fn load_invoices(&self) -> Result<Vec<Invoice>> {
        read_array(&self.dir.join("invoices.json"))
    }

    pub fn append_invoices(&self, invoices: &[Invoice]) -> Result<()> {
        append_array(&self.dir.join("invoices.json"), invoices)
    }

    // ---- reports (one file per run) ----

    /// Write a report as a fresh timestamped file. Returns the path.
    pub fn write_report(&self, report: &Report) -> Result<PathBuf> {
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let mut path = self.dir.join(format!("{REPORT_PREFIX}{stamp}.json"));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{REPORT_PREFIX}{stamp}_{n}.json"));
            n += 1;
        }
        write_json(&path, report)?;
        Ok(path)
    }

    /// Load all reports in file order.
    pub fn load_reports(&self) -> Result<Vec<Report>> {
        let mut reports = Vec::new();
        for path in self.shard_paths(REPORT_PREFIX)? {
            reports.push(read_json(&path)?);
        }
        Ok(reports)
    }

    /// Sorted paths of files matching `<prefix>*.json` in the store dir.
    fn shard_paths(&self, prefix: &str) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| DataError::Read {
            path: self.dir.display().to_string(),
            source: e,
        })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(prefix) && n.ends_with(".json"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();
        Ok(paths)
    }
}

/// Read a JSON array collection. A missing or empty file is an empty
/// collection; a malformed file is a hard error (no partial-parse
/// recovery).
fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = fs::read_to_string(path).map_err(|e| DataError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&contents).map_err(|e| DataError::Malformed {
        path: path.display().to_string(),
        source: e,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| DataError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| DataError::Malformed {
        path: path.display().to_string(),
        source: e,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value).map_err(|e| DataError::Malformed {
        path: path.display().to_string(),
        source: e,
    })?;
    fs::write(path, contents).map_err(|e| DataError::Write {
        path: path.display().to_string(),
        source: e,
    })
}

/// Read the existing array, extend it, rewrite the whole file.
/// All-or-nothing per call, but not atomic across process crashes.
fn append_array<T: Serialize + DeserializeOwned + Clone>(path: &Path, items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    let mut existing: Vec<T> = read_array(path)?;
    existing.extend(items.iter().cloned());
    write_json(path, &existing)
}
