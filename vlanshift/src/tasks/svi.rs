//! SVI migration: move an SVI's configuration to a new VLAN interface.

use std::fmt;

use log::{error, info, warn};

use crate::device::DeviceSession;
use crate::error::Result;

/// Result of replaying the configuration onto the new SVI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SviOutcome {
    /// No device was given.
    Skipped,
    /// The new SVI accepted every line.
    Applied { svi: String },
    /// The replay was rejected; the source SVI is already defaulted.
    Failed { svi: String, message: String },
}

impl fmt::Display for SviOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SviOutcome::Skipped => write!(f, "No device"),
            SviOutcome::Applied { svi } => write!(f, "Configuration successfully applied to {svi}"),
            SviOutcome::Failed { message, .. } => {
                write!(f, "Error during configuration transfer: {message}")
            }
        }
    }
}

pub fn command(svi: &str) -> String {
    format!("show running-config interface {svi}")
}

/// Sub-commands of `interface <svi>` in `output`, trimmed.
///
/// Capture starts after the declaration and stops at the next interface
/// declaration or `end`. Blank lines and `!` separators are skipped.
pub fn capture_body(output: &str, svi: &str) -> Vec<String> {
    let declaration = format!("interface {svi}");
    let mut lines = output.lines().map(str::trim);
    if !lines.any(|line| line == declaration) {
        return Vec::new();
    }
    lines
        .take_while(|line| !line.starts_with("interface ") && *line != "end")
        .filter(|line| !line.is_empty() && !line.starts_with('!'))
        .map(str::to_string)
        .collect()
}

/// Batches that retire `from` and build `to` from `body`.
///
/// The first batch defaults and shuts the old SVI, the second creates the
/// new one with the captured lines.
pub fn plan(from: &str, to: &str, body: &[String]) -> (Vec<String>, Vec<String>) {
    let shutdown = vec![
        format!("default interface {from}"),
        format!("interface {from}"),
        "shut".to_string(),
    ];
    let mut replay = Vec::with_capacity(body.len() + 1);
    replay.push(format!("interface {to}"));
    replay.extend(body.iter().cloned());
    (shutdown, replay)
}

/// Migrate `from` to `to`.
///
/// Errors reading the config or shutting down `from` propagate. A rejected
/// replay onto `to` is reported as [`SviOutcome::Failed`], not an error;
/// nothing is rolled back.
pub async fn migrate<D: DeviceSession>(device: Option<&mut D>, from: &str, to: &str) -> Result<SviOutcome> {
    let Some(device) = device else {
        return Ok(SviOutcome::Skipped);
    };
    device.connect().await?;
    let output = device.execute(&command(from)).await?;
    let body = capture_body(&output, from);
    if body.is_empty() {
        warn!("{}: no configuration captured under {}", device.name(), from);
    }

    let (shutdown, replay) = plan(from, to, &body);
    device.configure(&shutdown).await?;

    match device.configure(&replay).await {
        Ok(_) => {
            info!("{}: {} migrated to {}", device.name(), from, to);
            Ok(SviOutcome::Applied { svi: to.to_string() })
        }
        Err(e) => {
            error!("{}: replay onto {} failed: {}", device.name(), to, e);
            Ok(SviOutcome::Failed {
                svi: to.to_string(),
                message: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::mock::ScriptedDevice;

    const OUTPUT: &str = "\
Building configuration...

Current configuration : 112 bytes
!
interface Vlan1
 description X
 ip address 10.0.0.1 255.255.255.0
!
interface Vlan20
 shutdown
end
";

    #[test]
    fn test_capture_body() {
        assert_eq!(
            capture_body(OUTPUT, "Vlan1"),
            vec!["description X", "ip address 10.0.0.1 255.255.255.0"]
        );
        assert_eq!(capture_body(OUTPUT, "Vlan20"), vec!["shutdown"]);
        assert!(capture_body(OUTPUT, "Vlan128").is_empty());
    }

    #[test]
    fn test_capture_needs_exact_declaration() {
        // Vlan1 must not pick up Vlan10
        let output = "interface Vlan10\n description ten\n";
        assert!(capture_body(output, "Vlan1").is_empty());
    }

    #[test]
    fn test_plan() {
        let body = vec![
            "description X".to_string(),
            " ip address 10.0.0.1 255.255.255.0".to_string(),
        ];
        let (shutdown, replay) = plan("Vlan1", "Vlan128", &body);
        assert_eq!(shutdown, vec!["default interface Vlan1", "interface Vlan1", "shut"]);
        assert_eq!(
            replay,
            vec![
                "interface Vlan128",
                "description X",
                " ip address 10.0.0.1 255.255.255.0"
            ]
        );
    }

    #[tokio::test]
    async fn test_migrate_applied() {
        let mut device =
            ScriptedDevice::new("sw1").with_output("show running-config interface Vlan1", OUTPUT);
        let outcome = migrate(Some(&mut device), "Vlan1", "Vlan128").await.unwrap();
        assert_eq!(outcome.to_string(), "Configuration successfully applied to Vlan128");
        assert_eq!(device.batches.len(), 2);
        assert_eq!(device.configured().len(), 6);
    }

    #[tokio::test]
    async fn test_replay_failure_is_swallowed() {
        let mut device = ScriptedDevice::new("sw1")
            .with_output("show running-config interface Vlan1", OUTPUT)
            .rejecting("interface Vlan128");
        let outcome = migrate(Some(&mut device), "Vlan1", "Vlan128").await.unwrap();
        assert!(matches!(outcome, SviOutcome::Failed { .. }));
        assert!(outcome.to_string().starts_with("Error during configuration transfer: "));
        assert!(outcome.to_string().contains("Invalid input"));
    }

    #[tokio::test]
    async fn test_shutdown_failure_propagates() {
        let mut device = ScriptedDevice::new("sw1")
            .with_output("show running-config interface Vlan1", OUTPUT)
            .rejecting("shut");
        assert!(migrate(Some(&mut device), "Vlan1", "Vlan128").await.is_err());
        assert_eq!(device.batches.len(), 1);
    }
}
