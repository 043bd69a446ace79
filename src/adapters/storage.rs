use crate::domain::model::AppState;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Keeps the whole application state in one JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<AppState> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No data at {}, starting empty", self.path.display());
                return Ok(AppState::default());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(AppState::default());
        }

        match serde_json::from_str::<AppState>(&raw) {
            Ok(state) => {
                tracing::debug!(
                    "Loaded {} groups from {}",
                    state.groups.len(),
                    self.path.display()
                );
                Ok(state)
            }
            Err(e) => {
                // 資料損毀時退回空狀態，不中斷程式
                tracing::error!(
                    "Race data at {} is unreadable, starting from an empty state: {}",
                    self.path.display(),
                    e
                );
                Ok(AppState::default())
            }
        }
    }

    fn save(&self, state: &AppState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec_pretty(state)?;
        let tmp = self.temp_path();
        fs::write(&tmp, &data)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!("Saved {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }
}
