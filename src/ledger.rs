use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Bounded list of recently-moved links, used for duplicate suppression.
///
/// Entries are stored normalized (trimmed, lowercased), oldest first and
/// newest last. Once the capacity is exceeded the oldest entries are evicted.
/// The list is persisted as a JSON array of strings so suppression survives
/// restarts.
pub struct Ledger {
    path: PathBuf,
    capacity: usize,
    entries: Vec<String>,
}

impl Ledger {
    /// Load the ledger from `path`. A missing file yields an empty ledger; a
    /// malformed one is logged and reset to empty rather than crashing the
    /// process.
    pub fn load(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        "Malformed ledger file {}, starting empty: {}",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    "Could not read ledger file {}, starting empty: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        };

        let mut ledger = Self {
            path,
            capacity,
            entries,
        };
        ledger.truncate_to_capacity();
        ledger
    }

    /// Whether `link` was already moved.
    pub fn contains(&self, link: &str) -> bool {
        let key = normalize(link);
        self.entries.iter().any(|e| *e == key)
    }

    /// Record `link` as moved. Returns `false` (and leaves the ledger
    /// untouched) when the link is already present. Evicts the oldest
    /// entries once the capacity is exceeded.
    pub fn record(&mut self, link: &str) -> bool {
        let key = normalize(link);
        if self.entries.iter().any(|e| *e == key) {
            return false;
        }
        self.entries.push(key);
        self.truncate_to_capacity();
        true
    }

    /// Write the ledger to its file, creating the parent directory if
    /// needed.
    pub async fn persist(&self) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let raw = serde_json::to_vec(&self.entries)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries oldest first, newest last.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    fn truncate_to_capacity(&mut self) {
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
    }
}

/// The duplicate key for a link: surrounding whitespace and letter case do
/// not make it a different link.
fn normalize(link: &str) -> String {
    link.trim().to_lowercase()
}
