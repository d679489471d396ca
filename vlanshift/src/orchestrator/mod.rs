//! Run a [`Plan`] against an inventory.
//!
//! Roles are visited in plan order, devices in inventory order, and each
//! device's tasks one after another. A task error stops that device; the
//! run carries on with the next one and the error lands in the report.

mod plan;

pub use plan::{Plan, RoleTasks, Task};

use std::fmt;

use chrono::Local;
use log::{info, warn};

use crate::device::DeviceSession;
use crate::error::{Error, Result};
use crate::inventory::Inventory;
use crate::parsers::ConfigTree;
use crate::tasks::{
    SviOutcome, TrunkPolicy, access, encapsulation, running_config, search_replace, snapshot, svi,
    trunk,
};

/// Values shared by every task of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Stamp used in snapshot file names, `YYYY-MM-DD`.
    pub date: String,
}

impl RunContext {
    pub fn new(date: impl Into<String>) -> Self {
        Self { date: date.into() }
    }

    /// Context dated with the local date.
    pub fn today() -> Self {
        Self::new(Local::now().format("%Y-%m-%d").to_string())
    }
}

/// What a finished task produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    RunningConfig(ConfigTree),
    Replaced(bool),
    /// Interfaces that were reconfigured.
    Interfaces(Vec<String>),
    Saved(String),
    Svi(SviOutcome),
    Skipped,
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOutcome::RunningConfig(tree) => {
                write!(f, "running-config has {} top-level lines", tree.len())
            }
            TaskOutcome::Replaced(true) => write!(f, "line replaced"),
            TaskOutcome::Replaced(false) => write!(f, "line not present"),
            TaskOutcome::Interfaces(changed) if changed.is_empty() => {
                write!(f, "no interfaces changed")
            }
            TaskOutcome::Interfaces(changed) => write!(f, "changed {}", changed.join(", ")),
            TaskOutcome::Saved(file) => write!(f, "saved to {file}"),
            TaskOutcome::Svi(outcome) => write!(f, "{outcome}"),
            TaskOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// One device's share of a run.
#[derive(Debug)]
pub struct DeviceReport {
    pub device: String,
    pub role: String,
    /// Tasks that completed, in order.
    pub outcomes: Vec<(Task, TaskOutcome)>,
    /// The task that stopped this device and why.
    pub failure: Option<(Task, Error)>,
}

impl DeviceReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub devices: Vec<DeviceReport>,
}

impl RunReport {
    pub fn failed_devices(&self) -> impl Iterator<Item = &DeviceReport> {
        self.devices.iter().filter(|d| !d.is_success())
    }

    /// `Err` naming every device that stopped on an error.
    pub fn into_result(self) -> Result<Self> {
        let devices: Vec<String> = self
            .failed_devices()
            .map(|report| report.device.clone())
            .collect();
        if devices.is_empty() {
            Ok(self)
        } else {
            Err(Error::RunFailed { devices })
        }
    }
}

/// Sequential task runner.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    plan: Plan,
    context: RunContext,
}

impl Orchestrator {
    pub fn new(plan: Plan, context: RunContext) -> Self {
        Self { plan, context }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Run the plan over every matching device, one at a time.
    pub async fn run<D: DeviceSession>(&self, inventory: &mut Inventory<D>) -> RunReport {
        let mut report = RunReport::default();
        for role in &self.plan.roles {
            let devices = inventory.devices_with_role_mut(&role.role);
            if devices.is_empty() {
                info!("no devices with role {:?}", role.role);
            }
            for device in devices {
                info!("{}: {}", role.role, device.name());
                report
                    .devices
                    .push(self.run_device(device, &role.role, &role.tasks).await);
            }
        }
        report
    }

    /// Run `tasks` in order, stopping at the first error.
    pub async fn run_device<D: DeviceSession>(
        &self,
        device: &mut D,
        role: &str,
        tasks: &[Task],
    ) -> DeviceReport {
        let mut report = DeviceReport {
            device: device.name().to_string(),
            role: role.to_string(),
            outcomes: Vec::with_capacity(tasks.len()),
            failure: None,
        };
        for task in tasks {
            match self.run_task(device, task).await {
                Ok(outcome) => {
                    info!("{}: {}: {}", report.device, task, outcome);
                    report.outcomes.push((task.clone(), outcome));
                }
                Err(e) => {
                    warn!("{}: {} failed: {}", report.device, task, e);
                    report.failure = Some((task.clone(), e));
                    break;
                }
            }
        }
        report
    }

    /// Run a single task.
    pub async fn run_task<D: DeviceSession>(&self, device: &mut D, task: &Task) -> Result<TaskOutcome> {
        let device = Some(device);
        let outcome = match task {
            Task::RunningConfig => running_config::learn(device)
                .await?
                .map_or(TaskOutcome::Skipped, TaskOutcome::RunningConfig),
            Task::SearchReplace {
                search,
                replacement,
            } => TaskOutcome::Replaced(search_replace::apply(device, search, replacement).await?),
            Task::NormalizeTrunks {
                required_vlan,
                pruned_vlan,
            } => {
                let policy = TrunkPolicy {
                    required_vlan: *required_vlan,
                    pruned_vlan: *pruned_vlan,
                };
                TaskOutcome::Interfaces(trunk::normalize(device, &policy).await?)
            }
            Task::MigrateEncapsulation { from, to } => {
                TaskOutcome::Interfaces(encapsulation::migrate(device, *from, *to).await?)
            }
            Task::MigrateAccess { from, to } => {
                TaskOutcome::Interfaces(access::migrate(device, *from, *to).await?)
            }
            Task::SaveConfig => snapshot::save(device, &self.context.date)
                .await?
                .map_or(TaskOutcome::Skipped, TaskOutcome::Saved),
            Task::MigrateSvi { from, to } => TaskOutcome::Svi(svi::migrate(device, from, to).await?),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Testbed;
    use crate::tasks::mock::ScriptedDevice;

    const TESTBED: &str = "
testbed:
  credentials:
    default: { username: admin, password: secret }
devices:
  rtr1:
    os: iosxe
    role: router
    connections:
      ssh: { ip: 10.0.0.1 }
  sw1:
    os: iosxe
    role: switch
    connections:
      ssh: { ip: 10.0.0.2 }
  sw2:
    os: iosxe
    role: switch
    connections:
      ssh: { ip: 10.0.0.3 }
";

    fn inventory(make: impl FnMut(crate::inventory::DeviceSpec) -> ScriptedDevice) -> Inventory<ScriptedDevice> {
        let testbed = Testbed::from_yaml_str(TESTBED).unwrap();
        Inventory::from_testbed_with(&testbed, make).unwrap()
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(TaskOutcome::Interfaces(vec![]).to_string(), "no interfaces changed");
        assert_eq!(
            TaskOutcome::Interfaces(vec!["Gi1".into(), "Gi2".into()]).to_string(),
            "changed Gi1, Gi2"
        );
        assert_eq!(
            TaskOutcome::Saved("flash:sh-run-2024-05-01.txt".into()).to_string(),
            "saved to flash:sh-run-2024-05-01.txt"
        );
    }

    #[test]
    fn test_today_format() {
        let date = RunContext::today().date;
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
    }

    #[tokio::test]
    async fn test_failure_stops_device_not_run() {
        let mut inventory = inventory(|spec| {
            let device = ScriptedDevice::new(&spec.name);
            if spec.name == "sw1" { device.rejecting("shut") } else { device }
        });
        let plan = Plan {
            roles: vec![RoleTasks {
                role: "switch".to_string(),
                tasks: vec![
                    Task::MigrateSvi {
                        from: "Vlan1".to_string(),
                        to: "Vlan128".to_string(),
                    },
                    Task::SaveConfig,
                ],
            }],
        };
        let orchestrator = Orchestrator::new(plan, RunContext::new("2024-05-01"));
        let report = orchestrator.run(&mut inventory).await;

        assert_eq!(report.devices.len(), 2);
        let sw1 = &report.devices[0];
        assert!(sw1.outcomes.is_empty());
        assert!(matches!(sw1.failure, Some((Task::MigrateSvi { .. }, _))));

        let sw2 = &report.devices[1];
        assert!(sw2.is_success());
        assert_eq!(sw2.outcomes.len(), 2);
        assert!(inventory.get("sw1").unwrap().executed.iter().all(|c| !c.starts_with("copy")));

        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Run failed on sw1");
    }

    #[tokio::test]
    async fn test_default_plan_touches_only_switches() {
        let mut inventory = inventory(|spec| ScriptedDevice::new(&spec.name));
        let orchestrator = Orchestrator::new(Plan::default(), RunContext::new("2024-05-01"));
        let report = orchestrator.run(&mut inventory).await;

        let visited: Vec<_> = report.devices.iter().map(|d| d.device.as_str()).collect();
        assert_eq!(visited, vec!["rtr1", "sw1", "sw2"]);
        assert_eq!(inventory.get("rtr1").unwrap().connects, 0);
        assert_eq!(inventory.get("sw1").unwrap().batches.len(), 2);
        assert!(report.into_result().is_ok());
    }
}
