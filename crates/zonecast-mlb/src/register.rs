// Chadwick Bureau player register.
//
// The register is a large CSV (people.csv) mapping every person to ids in
// several systems. Only the MLBAM key and the first/last name columns are
// read; rows without an MLBAM key (pre-Statcast players, umpires, managers)
// are dropped at load time.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use zonecast_core::{PlayerId, PlayerLookup, PlayerName, ProviderError};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("failed to read register {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in register {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPerson {
    #[serde(default)]
    key_mlbam: Option<u64>,
    #[serde(default)]
    name_first: String,
    #[serde(default)]
    name_last: String,
}

// ---------------------------------------------------------------------------
// PlayerRegister
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct RegisterEntry {
    id: PlayerId,
    name: PlayerName,
}

/// In-memory player register, in file order.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegister {
    entries: Vec<RegisterEntry>,
    by_id: HashMap<PlayerId, usize>,
}

impl PlayerRegister {
    pub fn from_entries(entries: impl IntoIterator<Item = (PlayerId, PlayerName)>) -> Self {
        let mut register = PlayerRegister::default();
        for (id, name) in entries {
            register.push(id, name);
        }
        register
    }

    fn push(&mut self, id: PlayerId, name: PlayerName) {
        if self.by_id.contains_key(&id) {
            warn!("duplicate register entry for id {}, keeping the first", id);
            return;
        }
        self.by_id.insert(id, self.entries.len());
        self.entries.push(RegisterEntry { id, name });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn name_of(&self, id: PlayerId) -> Option<&PlayerName> {
        self.by_id.get(&id).map(|&idx| &self.entries[idx].name)
    }

    /// First entry whose names match, ignoring case and surrounding space.
    pub fn id_of(&self, last: &str, first: &str) -> Option<PlayerId> {
        let last = last.trim().to_lowercase();
        let first = first.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name.last.to_lowercase() == last && e.name.first.to_lowercase() == first)
            .map(|e| e.id)
    }
}

fn load_from_reader<R: Read>(rdr: R) -> Result<PlayerRegister, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut register = PlayerRegister::default();
    let mut skipped = 0usize;
    for result in reader.deserialize::<RawPerson>() {
        match result {
            Ok(raw) => {
                let Some(key) = raw.key_mlbam else {
                    skipped += 1;
                    continue;
                };
                register.push(
                    PlayerId(key),
                    PlayerName {
                        first: raw.name_first.trim().to_string(),
                        last: raw.name_last.trim().to_string(),
                    },
                );
            }
            Err(e) => {
                warn!("skipping malformed register row: {}", e);
            }
        }
    }
    if skipped > 0 {
        info!("register: {} rows without an MLBAM key skipped", skipped);
    }
    Ok(register)
}

fn load_file(path: &Path, register: &mut PlayerRegister) -> Result<(), RegisterError> {
    let file = std::fs::File::open(path).map_err(|e| RegisterError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let part = load_from_reader(file).map_err(|e| RegisterError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    for entry in part.entries {
        register.push(entry.id, entry.name);
    }
    Ok(())
}

/// Load the register from a Chadwick `people.csv` file, or from a directory
/// holding the split `people-*.csv` files (read in name order).
pub fn load_register(path: &Path) -> Result<PlayerRegister, RegisterError> {
    let mut register = PlayerRegister::default();

    if path.is_dir() {
        let entries = std::fs::read_dir(path).map_err(|e| RegisterError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut parts: Vec<_> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("people") && n.ends_with(".csv"))
            })
            .collect();
        parts.sort();
        for part in &parts {
            load_file(part, &mut register)?;
        }
    } else {
        load_file(path, &mut register)?;
    }

    info!("Loaded {} players from {}", register.len(), path.display());
    Ok(register)
}

#[async_trait]
impl PlayerLookup for PlayerRegister {
    async fn reverse_lookup(&self, id: PlayerId) -> Result<Option<PlayerName>, ProviderError> {
        Ok(self.name_of(id).cloned())
    }

    async fn forward_lookup(
        &self,
        last: &str,
        first: &str,
    ) -> Result<Option<PlayerId>, ProviderError> {
        Ok(self.id_of(last, first))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
