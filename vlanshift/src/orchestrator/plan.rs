//! Which tasks run on which roles.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, Result};
use crate::tasks::search_replace::{DEFAULT_REPLACEMENT, DEFAULT_SEARCH};

/// One step of a device's run.
///
/// In YAML, tasks are tagged by `task`:
///
/// ```yaml
/// - task: migrate_access
///   from: 1
///   to: 128
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum Task {
    /// Fetch and parse the running configuration.
    RunningConfig,

    /// Replace one global configuration line.
    SearchReplace {
        #[serde(default = "default_search")]
        search: String,
        #[serde(default = "default_replacement")]
        replacement: String,
    },

    /// Add the required VLAN to every trunk and prune the unwanted one.
    NormalizeTrunks {
        #[serde(default = "default_required_vlan")]
        required_vlan: u16,
        #[serde(default = "default_pruned_vlan")]
        pruned_vlan: u16,
    },

    /// Re-tag dot1Q sub-interfaces.
    MigrateEncapsulation { from: u16, to: u16 },

    /// Move access ports between VLANs.
    MigrateAccess { from: u16, to: u16 },

    /// Copy the running config to flash, named by the run date.
    SaveConfig,

    /// Move an SVI's configuration to another VLAN interface.
    MigrateSvi { from: String, to: String },
}

fn default_search() -> String {
    DEFAULT_SEARCH.to_string()
}

fn default_replacement() -> String {
    DEFAULT_REPLACEMENT.to_string()
}

fn default_required_vlan() -> u16 {
    128
}

fn default_pruned_vlan() -> u16 {
    1
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::RunningConfig => write!(f, "running-config"),
            Task::SearchReplace { search, .. } => write!(f, "search-replace {search:?}"),
            Task::NormalizeTrunks { .. } => write!(f, "normalize-trunks"),
            Task::MigrateEncapsulation { from, to } => write!(f, "encapsulation {from}->{to}"),
            Task::MigrateAccess { from, to } => write!(f, "access {from}->{to}"),
            Task::SaveConfig => write!(f, "save-config"),
            Task::MigrateSvi { from, to } => write!(f, "svi {from}->{to}"),
        }
    }
}

/// Tasks for every device of one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTasks {
    pub role: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Roles in run order, each with its task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub roles: Vec<RoleTasks>,
}

impl Default for Plan {
    /// Routers are listed only; switches move their management SVI from
    /// Vlan1 to Vlan128.
    fn default() -> Self {
        Self {
            roles: vec![
                RoleTasks {
                    role: "router".to_string(),
                    tasks: Vec::new(),
                },
                RoleTasks {
                    role: "switch".to_string(),
                    tasks: vec![Task::MigrateSvi {
                        from: "Vlan1".to_string(),
                        to: "Vlan128".to_string(),
                    }],
                },
            ],
        }
    }
}

impl Plan {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text).map_err(InventoryError::from)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan() {
        let plan = Plan::default();
        assert_eq!(plan.roles[0].role, "router");
        assert!(plan.roles[0].tasks.is_empty());
        assert_eq!(plan.roles[1].role, "switch");
        assert_eq!(plan.roles[1].tasks[0].to_string(), "svi Vlan1->Vlan128");
    }

    #[test]
    fn test_plan_from_yaml() {
        let plan = Plan::from_yaml_str(
            "
roles:
  - role: switch
    tasks:
      - task: save_config
      - task: normalize_trunks
      - task: search_replace
      - task: migrate_access
        from: 1
        to: 128
  - role: router
    tasks:
      - task: migrate_encapsulation
        from: 1
        to: 128
",
        )
        .unwrap();
        let switch = &plan.roles[0].tasks;
        assert_eq!(switch[0], Task::SaveConfig);
        assert_eq!(
            switch[1],
            Task::NormalizeTrunks {
                required_vlan: 128,
                pruned_vlan: 1
            }
        );
        assert_eq!(
            switch[2],
            Task::SearchReplace {
                search: DEFAULT_SEARCH.to_string(),
                replacement: DEFAULT_REPLACEMENT.to_string(),
            }
        );
        assert_eq!(switch[3], Task::MigrateAccess { from: 1, to: 128 });
        assert_eq!(
            plan.roles[1].tasks,
            vec![Task::MigrateEncapsulation { from: 1, to: 128 }]
        );
    }

    #[test]
    fn test_unknown_task() {
        assert!(Plan::from_yaml_str("roles:\n  - role: switch\n    tasks:\n      - task: reload\n").is_err());
    }
}
