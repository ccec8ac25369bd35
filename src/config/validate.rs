//! Config validation.

use anyhow::{Result, bail};
use std::fs;
use tracing::debug;

use super::types::Config;

impl Config {
    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_sibling_attempts == 0 {
            bail!("max_sibling_attempts must be greater than 0");
        }
        if self.history_limit == 0 {
            bail!("history_limit must be greater than 0");
        }
        if let Ok(meta) = fs::metadata(&self.storage_dir)
            && !meta.is_dir()
        {
            bail!("storage_dir '{}' exists but is not a directory", self.storage_dir.display());
        }
        if let Some(log) = &self.log_file
            && log.is_dir()
        {
            bail!("log_file '{}' is a directory", log.display());
        }
        debug!(storage_dir = %self.storage_dir.display(), "config validated");
        Ok(())
    }
}
