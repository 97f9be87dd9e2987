//! Code/name lookup backed by the shareholder table.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::services::shareholders;

/// One listed stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockEntry {
    pub code: String,
    pub name: String,
}

/// In-memory directory, replaced wholesale on reload.
pub struct StockDirectory {
    path: PathBuf,
    entries: RwLock<Vec<StockEntry>>,
}

impl StockDirectory {
    /// Load from `path`. A missing or unreadable file gives an empty directory.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let directory = Self {
            path: path.into(),
            entries: RwLock::new(Vec::new()),
        };
        if let Err(e) = directory.reload() {
            warn!("Stock directory not loaded: {}", e);
        }
        directory
    }

    /// Build from entries directly.
    pub fn from_entries(entries: Vec<StockEntry>) -> Self {
        Self {
            path: PathBuf::new(),
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file and swap in its entries.
    pub fn reload(&self) -> Result<usize> {
        let entries: Vec<StockEntry> = shareholders::read_csv(&self.path)?
            .into_iter()
            .map(|r| StockEntry {
                code: r.code,
                name: r.name,
            })
            .collect();
        let count = entries.len();
        self.replace(entries)?;
        info!("Loaded {} stocks from {}", count, self.path.display());
        Ok(count)
    }

    pub fn replace(&self, entries: Vec<StockEntry>) -> Result<()> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| AppError::Internal("stock directory lock poisoned".into()))?;
        *guard = entries;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a code or name: exact code, then exact name, then the first
    /// name containing `identifier`.
    pub fn resolve(&self, identifier: &str) -> Result<StockEntry> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AppError::BadRequest("empty stock identifier".into()));
        }

        let entries = self
            .entries
            .read()
            .map_err(|_| AppError::Internal("stock directory lock poisoned".into()))?;
        if entries.is_empty() {
            return Err(AppError::NotFound(format!(
                "stock directory is empty; update {} first",
                self.path.display()
            )));
        }

        let by_code = || {
            identifier
                .chars()
                .all(|c| c.is_ascii_digit())
                .then(|| entries.iter().find(|e| e.code == identifier))
                .flatten()
        };
        let by_name = || entries.iter().find(|e| e.name == identifier);
        let by_partial = || entries.iter().find(|e| e.name.contains(identifier));

        by_code()
            .or_else(by_name)
            .or_else(by_partial)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("no stock matches '{}'", identifier)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> StockDirectory {
        StockDirectory::from_entries(vec![
            StockEntry {
                code: "2330".into(),
                name: "台積電".into(),
            },
            StockEntry {
                code: "2303".into(),
                name: "聯電".into(),
            },
            StockEntry {
                code: "2454".into(),
                name: "聯發科".into(),
            },
        ])
    }

    #[test]
    fn test_resolve_order() {
        let dir = directory();
        assert_eq!(dir.resolve("2330").unwrap().name, "台積電");
        assert_eq!(dir.resolve("聯電").unwrap().code, "2303");
        assert_eq!(dir.resolve("發科").unwrap().code, "2454");
    }

    #[test]
    fn test_exact_name_beats_partial() {
        let dir = StockDirectory::from_entries(vec![
            StockEntry {
                code: "6209".into(),
                name: "今國光".into(),
            },
            StockEntry {
                code: "3406".into(),
                name: "國光".into(),
            },
        ]);
        assert_eq!(dir.resolve("國光").unwrap().code, "3406");
        assert_eq!(dir.resolve("國").unwrap().code, "6209");
    }

    #[test]
    fn test_unknown_and_empty() {
        let dir = directory();
        assert!(matches!(dir.resolve("9999"), Err(AppError::NotFound(_))));
        assert!(matches!(dir.resolve("  "), Err(AppError::BadRequest(_))));
        assert!(matches!(
            StockDirectory::from_entries(Vec::new()).resolve("2330"),
            Err(AppError::NotFound(_))
        ));
    }
}
