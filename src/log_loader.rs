/// Loads metric logs from disk
///
/// Each file is read to completion in one go; parsing never interleaves with I/O.
use crate::record::MetricKind;
use crate::report_config::ReportConfig;
use crate::traits::LogSource;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;

/// Log directory described by a [`ReportConfig`]
pub struct LogDirectory {
    config: ReportConfig,
    name: String,
}

impl LogDirectory {
    pub fn new(config: ReportConfig) -> Self {
        let name = config.log_directory.display().to_string();
        Self { config, name }
    }
}

impl LogSource for LogDirectory {
    fn load(&self, kind: MetricKind) -> Result<Option<String>> {
        let path = self.config.log_path(kind);

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("{} file not found: {}", kind, path.display());
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read log file: {}", path.display())),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory logs, keyed by family
#[derive(Debug, Clone, Default)]
pub struct InMemoryLogs {
    logs: HashMap<MetricKind, String>,
}

impl InMemoryLogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(mut self, kind: MetricKind, text: impl Into<String>) -> Self {
        self.logs.insert(kind, text.into());
        self
    }
}

impl LogSource for InMemoryLogs {
    fn load(&self, kind: MetricKind) -> Result<Option<String>> {
        Ok(self.logs.get(&kind).cloned())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
