//! Best score persisted as a single decimal number in a text file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum HighScoreError {
    #[error("failed to write high score to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored best score. A missing, unreadable or non-numeric file reads
    /// as zero.
    pub fn load(&self) -> u32 {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                log::debug!("no high score at {}: {err}", self.path.display());
                return 0;
            }
        };
        match text.trim().parse::<u32>() {
            Ok(score) => score,
            Err(err) => {
                log::debug!("ignoring high score file {}: {err}", self.path.display());
                0
            }
        }
    }

    /// Write `score` if it strictly beats the stored value. Returns whether
    /// the file was written.
    pub fn record(&self, score: u32) -> Result<bool, HighScoreError> {
        let stored = self.load();
        if score <= stored {
            return Ok(false);
        }
        fs::write(&self.path, score.to_string()).map_err(|source| HighScoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::info!(
            "new high score {score} (was {stored}) saved to {}",
            self.path.display()
        );
        Ok(true)
    }
}
