use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// VM inventory supplied by a collaborator. The simulator itself only needs
/// the identity strings.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Inventory {
    #[serde(default)]
    pub vms: Vec<VmEntry>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VmEntry {
    pub name: String,
    pub resource_group: String,
    pub subscription_id: String,
}

impl VmEntry {
    /// Stable identity: the subscription/resource-group/name tuple collapsed
    /// to one key. Seeds the RNG and indexes all per-VM state.
    pub fn identity(&self) -> String {
        format!(
            "{}/{}/{}",
            self.subscription_id, self.resource_group, self.name
        )
    }
}

impl Inventory {
    /// Single demo VM used when no inventory is configured.
    pub fn demo() -> Self {
        Self {
            vms: vec![VmEntry {
                name: "demo-vm-1".to_string(),
                resource_group: "demo-rg".to_string(),
                subscription_id: "demo-sub".to_string(),
            }],
        }
    }

    /// Resolve a CLI argument to an identity: a bare VM name matches an
    /// inventory entry, anything else is taken as a full identity string.
    pub fn resolve(&self, name_or_identity: &str) -> String {
        self.vms
            .iter()
            .find(|vm| vm.name == name_or_identity || vm.identity() == name_or_identity)
            .map(VmEntry::identity)
            .unwrap_or_else(|| name_or_identity.to_string())
    }
}

pub fn load_inventory(path: &Path) -> Result<Inventory> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!(
            "failed to read config '{}': {}",
            path.display(),
            err
        ))
    })?;
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("");

    match ext {
        "toml" => toml::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse TOML: {}", err))),
        "json" => serde_json::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse JSON: {}", err))),
        "" => Err(Error::UnsupportedConfigFormat("unknown".to_string())),
        _ => Err(Error::UnsupportedConfigFormat(ext.to_string())),
    }
}

/// Inventory from a file, or the demo VM when no path is given or the file
/// lists no VMs.
pub fn load_inventory_or_demo(path: Option<&Path>) -> Result<Inventory> {
    let inventory = match path {
        Some(path) => load_inventory(path)?,
        None => Inventory::default(),
    };
    if inventory.vms.is_empty() {
        Ok(Inventory::demo())
    } else {
        Ok(inventory)
    }
}
