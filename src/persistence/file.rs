//! JSON file backed best score store

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::BestScoreStore;
use crate::error::Result;

/// On-disk layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SaveFile {
    best_score: Option<u32>,
}

/// Best score kept in a small JSON document
///
/// The file is read once on open and rewritten on every update. Read and
/// write failures are logged and otherwise ignored: a broken save file must
/// never stop a session.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    cached: Option<u32>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing or corrupt file reads as absent
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = match Self::read(&path) {
            Ok(save) => {
                log::info!("Loaded best score {:?} from {}", save.best_score, path.display());
                save.best_score
            }
            Err(err) => {
                log::warn!("No best score at {} ({err}), starting fresh", path.display());
                None
            }
        };
        Self { path, cached }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<SaveFile> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn write(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&SaveFile {
            best_score: self.cached,
        })?;
        // Write-then-rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl BestScoreStore for JsonFileStore {
    fn best_score(&self) -> Option<u32> {
        self.cached
    }

    fn set_best_score(&mut self, score: u32) {
        self.cached = Some(score);
        match self.write() {
            Ok(()) => log::info!("Best score {score} saved"),
            Err(err) => log::error!("Failed to save best score to {}: {err}", self.path.display()),
        }
    }
}
