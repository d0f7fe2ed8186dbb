//! Run-scoped logging.
//!
//! Each orchestrator invocation writes its own timestamped log file under
//! `<pipeline>/logs/`, and stage failures are additionally appended to a
//! shared `errors.log` that survives across runs. `tracing` mirrors the
//! same events to stderr.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{error, info};

use crate::error::{PipelineError, Result};

const ERROR_LOG: &str = "errors.log";

pub struct RunLog {
    run_id: String,
    path: PathBuf,
    file: File,
    errors_path: PathBuf,
}

impl RunLog {
    /// Create a new run-scoped log file in the store's logs directory.
    pub fn create(logs_dir: &Path) -> Result<Self> {
        fs::create_dir_all(logs_dir)
            .map_err(|e| PipelineError::RunLog(format!("{}: {}", logs_dir.display(), e)))?;

        let run_id = uuid::Uuid::new_v4().to_string();
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let path = logs_dir.join(format!("run_{stamp}_{}.log", &run_id[..8]));
        let file = File::create(&path)
            .map_err(|e| PipelineError::RunLog(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            run_id,
            path,
            file,
            errors_path: logs_dir.join(ERROR_LOG),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a run event. Write failures are swallowed: logging must
    /// never take a run down.
    pub fn event(&mut self, message: &str) {
        info!(run_id = %self.run_id, "{message}");
        let line = format!("{} [{}] {message}\n", Utc::now().to_rfc3339(), &self.run_id[..8]);
        let _ = self.file.write_all(line.as_bytes());
    }

    /// Record a stage failure with full detail, in both the run log and
    /// the shared error log.
    pub fn stage_error(&mut self, stage: &str, err: &dyn std::fmt::Display) {
        error!(run_id = %self.run_id, stage, "stage failed: {err}");
        self.event(&format!("ERROR stage={stage}: {err}"));
        self.append_shared(&format!(
            "{} run={} stage={stage}: {err}\n",
            Utc::now().to_rfc3339(),
            self.run_id
        ));
    }

    /// Record a fatal error outside all stage boundaries. An associated
    /// function because the usual caller is a run that failed before it
    /// could establish its own log file; best effort, like `event`.
    pub fn record_crash(logs_dir: &Path, err: &dyn std::fmt::Display) {
        error!("pipeline crashed: {err}");
        let _ = fs::create_dir_all(logs_dir);
        if let Ok(mut f) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(logs_dir.join(ERROR_LOG))
        {
            let line = format!("{} CRASH: {err}\n", Utc::now().to_rfc3339());
            let _ = f.write_all(line.as_bytes());
        }
    }

    fn append_shared(&self, line: &str) {
        if let Ok(mut f) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.errors_path)
        {
            let _ = f.write_all(line.as_bytes());
        }
    }
}
