use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::VmRecord;

/// Owned map of per-VM simulation records.
///
/// The store is passed explicitly to every operation; there is no global
/// instance. Records are created on first reference and never deleted.
#[derive(Clone, Debug, Default)]
pub struct StateStore {
    vms: BTreeMap<String, VmRecord>,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    vms: BTreeMap<String, serde_json::Value>,
}

#[derive(Serialize)]
struct Document<'a> {
    vms: &'a BTreeMap<String, VmRecord>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load persisted state. A missing file is an empty store. A malformed
    /// document is an error; a malformed VM entry inside a well-formed
    /// document is dropped with a warning and lazily reinitialized on next
    /// reference, so one corrupt record never takes down the whole load.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path).map_err(|err| {
            Error::StateIo(format!("failed to read state '{}': {}", path.display(), err))
        })?;
        let raw: RawDocument = serde_json::from_str(&contents).map_err(|err| {
            Error::StateParse(format!(
                "failed to parse state '{}': {}",
                path.display(),
                err
            ))
        })?;

        let mut vms = BTreeMap::new();
        for (identity, value) in raw.vms {
            match serde_json::from_value::<VmRecord>(value) {
                Ok(record) => {
                    vms.insert(identity, record);
                }
                Err(err) => {
                    log::warn!("dropping corrupt record for '{}': {}", identity, err);
                }
            }
        }
        Ok(Self { vms })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let document = Document { vms: &self.vms };
        let contents = serde_json::to_string_pretty(&document)
            .map_err(|err| Error::StateIo(format!("failed to encode state: {}", err)))?;
        fs::write(path, contents).map_err(|err| {
            Error::StateIo(format!(
                "failed to write state '{}': {}",
                path.display(),
                err
            ))
        })
    }

    /// Record for an identity, created as `Deallocated` with empty history
    /// on first reference. Never-seen identities are valid queries.
    pub fn record(&mut self, identity: &str, now: DateTime<Utc>) -> &mut VmRecord {
        self.vms
            .entry(identity.to_string())
            .or_insert_with(|| VmRecord::new(now))
    }

    pub fn get(&self, identity: &str) -> Option<&VmRecord> {
        self.vms.get(identity)
    }

    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.vms.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vms.is_empty()
    }
}
