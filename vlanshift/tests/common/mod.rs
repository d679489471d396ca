//! Scripted in-memory device for driving tasks without SSH.

#![allow(dead_code)]

use std::collections::HashMap;

use regex::bytes::Regex;
use vlanshift::driver::DialogStep;
use vlanshift::error::DriverError;
use vlanshift::{Dialog, DeviceSession, DeviceSpec, Result};

#[derive(Debug, Default)]
pub struct FakeSwitch {
    pub name: String,
    pub outputs: HashMap<String, String>,
    pub prompts: HashMap<String, String>,
    pub rejected_lines: Vec<String>,
    pub unreachable: bool,
    pub executed: Vec<String>,
    pub answers: Vec<String>,
    pub configured: Vec<String>,
}

impl FakeSwitch {
    pub fn from_spec(spec: DeviceSpec) -> Self {
        Self {
            name: spec.name,
            ..Default::default()
        }
    }

    pub fn answer(&mut self, command: &str, output: &str) {
        self.outputs.insert(command.to_string(), output.to_string());
    }

    pub fn ask(&mut self, command: &str, question: &str) {
        self.prompts.insert(command.to_string(), question.to_string());
    }
}

impl DeviceSession for FakeSwitch {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&mut self) -> Result<()> {
        if self.unreachable {
            return Err(DriverError::NotConnected.into());
        }
        Ok(())
    }

    async fn execute(&mut self, command: &str) -> Result<String> {
        self.connect().await?;
        self.executed.push(command.to_string());
        Ok(self.outputs.get(command).cloned().unwrap_or_default())
    }

    async fn execute_dialog(&mut self, command: &str, dialog: &Dialog) -> Result<String> {
        if let Some(question) = self.prompts.get(command).cloned() {
            let prompt = Regex::new(r"#\s*$").unwrap();
            if let DialogStep::Answer { reply, .. } = dialog.step(true, question.as_bytes(), &prompt) {
                self.answers.extend(reply);
            }
        }
        self.execute(command).await
    }

    async fn configure(&mut self, commands: &[String]) -> Result<String> {
        self.connect().await?;
        for line in commands {
            if self.rejected_lines.contains(line) {
                return Err(DriverError::CommandFailed {
                    command: line.clone(),
                    message: "% Invalid input detected at '^' marker.".to_string(),
                }
                .into());
            }
            self.configured.push(line.clone());
        }
        Ok(String::new())
    }
}

pub const TESTBED: &str = "
testbed:
  name: lab
  credentials:
    default: { username: admin, password: secret }
devices:
  core-rtr01:
    os: iosxe
    type: router
    role: router
    connections:
      ssh: { protocol: ssh, ip: 10.0.0.1 }
  access-sw01:
    os: iosxe
    type: switch
    role: switch
    connections:
      ssh: { protocol: ssh, ip: 10.0.0.2 }
";

pub const SVI_CONFIG: &str = "\
Building configuration...

Current configuration : 61 bytes
!
interface Vlan1
 ip address 10.0.0.2 255.255.255.0
end
";
