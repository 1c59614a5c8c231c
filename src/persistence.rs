use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

use crate::models::{ClosedTrade, DailyMetrics, Position};

const POSITIONS_FILE: &str = "open_positions.json";
const TRADES_FILE: &str = "trades_history.json";
const METRICS_FILE: &str = "daily_metrics.json";

/// Crash-safe JSON storage shared with the monitoring process.
///
/// Every document is replaced atomically: the new content is written to a
/// temp sibling, parsed back to prove it is valid JSON, and only then renamed
/// over the target. A concurrent reader sees either the old file or the new
/// one, never a half-written mix.
#[derive(Debug, Clone)]
pub struct StateStore {
    data_dir: PathBuf,
}

impl StateStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn positions_path(&self) -> PathBuf {
        self.data_dir.join(POSITIONS_FILE)
    }

    pub fn trades_path(&self) -> PathBuf {
        self.data_dir.join(TRADES_FILE)
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.data_dir.join(METRICS_FILE)
    }

    pub fn save_positions(&self, positions: &HashMap<String, Position>) -> Result<()> {
        self.write_json(&self.positions_path(), positions)
    }

    pub fn load_positions(&self) -> HashMap<String, Position> {
        self.read_json(&self.positions_path())
    }

    pub fn save_trades(&self, trades: &[ClosedTrade]) -> Result<()> {
        self.write_json(&self.trades_path(), &trades)
    }

    pub fn load_trades(&self) -> Vec<ClosedTrade> {
        self.read_json(&self.trades_path())
    }

    pub fn save_metrics(&self, metrics: &DailyMetrics) -> Result<()> {
        self.write_json(&self.metrics_path(), metrics)
    }

    pub fn load_metrics(&self) -> DailyMetrics {
        self.read_json(&self.metrics_path())
    }

    /// Atomically replace `path` with the JSON encoding of `value`.
    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("creating data dir {}", self.data_dir.display()))?;

        let json = serde_json::to_string_pretty(value).context("serializing state")?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)
            .with_context(|| format!("writing temp file {}", tmp_path.display()))?;

        // Re-read and parse the temp file so a torn write can never be
        // promoted to the live document.
        let written = fs::read_to_string(&tmp_path)
            .with_context(|| format!("re-reading temp file {}", tmp_path.display()))?;
        serde_json::from_str::<serde_json::Value>(&written)
            .with_context(|| format!("verifying temp file {}", tmp_path.display()))?;

        // Backups are best-effort; losing one costs a recovery path, not data.
        if path.exists() {
            let backup_path = path.with_extension("json.backup");
            if let Err(e) = fs::copy(path, &backup_path) {
                warn!("Backup of {} failed: {}", path.display(), e);
            }
        }

        fs::rename(&tmp_path, path)
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    /// Load `path`, falling back to the backup and finally to `T::default()`.
    /// Corrupt files are quarantined under a timestamp suffix, never deleted.
    fn read_json<T: DeserializeOwned + Default>(&self, path: &Path) -> T {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                return T::default();
            }
        };

        match serde_json::from_str::<T>(&content) {
            Ok(value) => value,
            Err(e) => {
                error!("Corrupt state file {}: {}", path.display(), e);
                let recovered = self.read_backup(path);
                self.quarantine(path);
                recovered.unwrap_or_default()
            }
        }
    }

    fn read_backup<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        let backup_path = path.with_extension("json.backup");
        let content = fs::read_to_string(&backup_path).ok()?;
        match serde_json::from_str::<T>(&content) {
            Ok(value) => {
                warn!("Recovered {} from backup", path.display());
                Some(value)
            }
            Err(e) => {
                error!("Backup {} also corrupt: {}", backup_path.display(), e);
                None
            }
        }
    }

    fn quarantine(&self, path: &Path) {
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let quarantined = path.with_extension(format!("json.corrupt_{stamp}"));
        match fs::rename(path, &quarantined) {
            Ok(()) => warn!(
                "Quarantined corrupt file as {}",
                quarantined.display()
            ),
            Err(e) => error!("Failed to quarantine {}: {}", path.display(), e),
        }
    }
}
