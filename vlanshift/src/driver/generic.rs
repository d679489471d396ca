//! Driver implementation over an SSH shell.

use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use regex::bytes::Regex;
use secrecy::{ExposeSecret, SecretString};

use super::Driver;
use super::dialog::{Dialog, DialogResult, DialogStep};
use super::privilege::PrivilegeManager;
use super::response::Response;
use crate::channel::PromptPattern;
use crate::error::{DriverError, Result};
use crate::platform::PlatformDefinition;
use crate::transport::{SshConfig, SshTransport};

/// Driver for any platform definition.
///
/// Owns the SSH transport while connected, detects prompts, and walks
/// privilege levels on demand.
pub struct GenericDriver {
    ssh_config: SshConfig,
    platform: PlatformDefinition,
    transport: Option<SshTransport>,
    privilege_manager: PrivilegeManager,
    prompt: PromptPattern,
    enable_secret: Option<SecretString>,
    timeout: Duration,
}

impl GenericDriver {
    /// Create a driver. Nothing is sent until [`Driver::open`].
    pub fn new(
        ssh_config: SshConfig,
        platform: PlatformDefinition,
        enable_secret: Option<SecretString>,
    ) -> Result<Self> {
        let prompt = PromptPattern::combine(
            platform
                .privilege_levels
                .values()
                .map(|level| level.pattern.as_str()),
        )?;
        let privilege_manager = PrivilegeManager::new(platform.privilege_levels.clone());
        let timeout = ssh_config.timeout();

        Ok(Self {
            ssh_config,
            platform,
            transport: None,
            privilege_manager,
            prompt,
            enable_secret,
            timeout,
        })
    }

    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    pub fn privilege_manager(&self) -> &PrivilegeManager {
        &self.privilege_manager
    }

    /// Per-command timeout, taken from the SSH config.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn transport_mut(&mut self) -> Result<&mut SshTransport> {
        self.transport
            .as_mut()
            .ok_or_else(|| DriverError::NotConnected.into())
    }

    /// Read to the next prompt and record the privilege level it shows.
    async fn read_prompt(&mut self) -> Result<(Vec<u8>, String)> {
        let timeout = self.timeout;
        let pattern = self.prompt.regex().clone();
        let data = self.transport_mut()?.read_until(&pattern, timeout).await?;
        let prompt = self.prompt.trailing_prompt(&data).unwrap_or_default();
        self.privilege_manager.observe_prompt(&prompt);
        Ok((data, prompt))
    }

    /// Secret sent at the enable password prompt.
    fn escalation_secret(&self) -> Option<&str> {
        if let Some(secret) = &self.enable_secret {
            return Some(secret.expose_secret());
        }
        self.ssh_config
            .password
            .as_ref()
            .map(|password| password.expose_secret())
    }

    async fn hop(&mut self, from: &str, to: &str) -> Result<()> {
        let transition = self
            .privilege_manager
            .transition(from, to)
            .ok_or_else(|| DriverError::NoPrivilegePath {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        debug!("privilege {} -> {} via {:?}", from, to, transition.command);

        let timeout = self.timeout;
        let prompt = self.prompt.regex().clone();
        self.transport_mut()?.send(&transition.command).await?;

        let Some(auth) = &transition.auth_prompt else {
            self.read_prompt().await?;
            return Ok(());
        };

        let (index, data) = self
            .transport_mut()?
            .read_until_any(&[auth, &prompt], timeout)
            .await?;
        if index == 0 {
            let secret = self
                .escalation_secret()
                .map(str::to_string)
                .ok_or_else(|| DriverError::PrivilegeAcquisitionFailed {
                    target: to.to_string(),
                })?;
            self.transport_mut()?.send_hidden(&secret).await?;
            self.read_prompt().await?;
        } else {
            // No password asked, e.g. privilege 15 users.
            let reached = self.prompt.trailing_prompt(&data).unwrap_or_default();
            self.privilege_manager.observe_prompt(&reached);
        }
        Ok(())
    }

    async fn run_on_open_commands(&mut self) -> Result<()> {
        for command in self.platform.on_open_commands.clone() {
            let response = self.send_command(&command).await?;
            if let Some(message) = response.failure_message {
                warn!("on-open command {:?} rejected: {}", command, message);
            }
        }
        Ok(())
    }

    fn finish(&mut self, command: &str, data: &[u8], start: Instant) -> Response {
        let raw = String::from_utf8_lossy(data).into_owned();
        let prompt = self.prompt.trailing_prompt(data).unwrap_or_default();
        self.privilege_manager.observe_prompt(&prompt);

        let result = self.platform.normalize_output(&raw, command);
        let failure = self.platform.detect_failure(&result).map(str::to_string);
        let response = Response::new(command, result, raw, prompt, start.elapsed());
        match failure {
            Some(message) => response.with_failure(message),
            None => response,
        }
    }
}

impl Driver for GenericDriver {
    async fn open(&mut self) -> Result<()> {
        if self.transport.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }

        let transport = SshTransport::connect(&self.ssh_config).await?;
        self.transport = Some(transport);

        let (_, prompt) = self.read_prompt().await?;
        debug!("initial prompt {:?}", prompt);

        let target = self.platform.default_privilege.clone();
        if !target.is_empty() {
            self.acquire_privilege(&target).await?;
        }
        self.run_on_open_commands().await?;

        info!(
            "connected to {} ({})",
            self.ssh_config.endpoint(),
            self.platform.name
        );
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(transport) = self.transport.take() {
            transport.close().await?;
        }
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<Response> {
        let start = Instant::now();
        let timeout = self.timeout;
        let pattern = self.prompt.regex().clone();

        let transport = self.transport_mut()?;
        transport.send(command).await?;
        let data = transport.read_until(&pattern, timeout).await?;

        let response = self.finish(command, &data, start);
        trace!("{:?} -> {} bytes", command, response.result.len());
        Ok(response)
    }

    async fn send_config(&mut self, commands: &[String]) -> Result<Vec<Response>> {
        let original = self
            .privilege_manager
            .current_name()
            .unwrap_or(self.platform.default_privilege.as_str())
            .to_string();
        let config = self.platform.config_privilege.clone();

        self.acquire_privilege(&config).await?;

        let mut responses = Vec::with_capacity(commands.len());
        for command in commands {
            let response = self.send_command(command).await?;
            let failed = !response.is_success();
            responses.push(response);
            if failed {
                break;
            }
        }

        if original != config {
            self.acquire_privilege(&original).await?;
        }
        Ok(responses)
    }

    async fn send_dialog(&mut self, command: &str, dialog: &Dialog) -> Result<DialogResult> {
        let start = Instant::now();
        let timeout = self.timeout;
        let prompt = self.prompt.regex().clone();
        let transport = self
            .transport
            .as_mut()
            .ok_or(DriverError::NotConnected)?;

        transport.send(command).await?;

        let mut raw = Vec::new();
        let mut matched = Vec::new();
        let mut watching = !dialog.is_empty();
        let mut deadline = Instant::now() + timeout;

        loop {
            let mut patterns: Vec<&Regex> = Vec::new();
            if watching {
                patterns.extend(dialog.statements().iter().map(|s| s.pattern()));
            }
            patterns.push(&prompt);

            let remaining = deadline.saturating_duration_since(Instant::now());
            let (_, data) = transport.read_until_any(&patterns, remaining).await?;
            raw.extend_from_slice(&data);

            match dialog.step(watching, &data, &prompt) {
                DialogStep::Done => break,
                DialogStep::Wait => continue,
                DialogStep::Answer {
                    matched: hit,
                    reply,
                    keep_watching,
                    restart_timer,
                } => {
                    debug!("dialog matched {:?}", hit.text);
                    if let Some(reply) = reply {
                        transport.send(&reply).await?;
                    }
                    matched.push(hit.text);
                    watching = keep_watching;
                    if restart_timer {
                        deadline = Instant::now() + timeout;
                    }
                }
            }
        }

        let response = self.finish(command, &raw, start);
        Ok(DialogResult {
            command: response.command,
            output: response.result,
            matched,
            prompt: response.prompt,
            failure_message: response.failure_message,
        })
    }

    async fn acquire_privilege(&mut self, target: &str) -> Result<()> {
        let current = match self.privilege_manager.current_name() {
            Some(name) => name.to_string(),
            None => {
                self.transport_mut()?.send("").await?;
                let (_, prompt) = self.read_prompt().await?;
                self.privilege_manager
                    .determine_from_prompt(&prompt)?
                    .name
                    .clone()
            }
        };
        if current == target {
            return Ok(());
        }

        let path = self.privilege_manager.find_path(&current, target)?;
        for step in path.windows(2) {
            self.hop(&step[0], &step[1]).await?;
        }

        match self.privilege_manager.current_name() {
            Some(reached) if reached == target => Ok(()),
            _ => Err(DriverError::PrivilegeAcquisitionFailed {
                target: target.to_string(),
            }
            .into()),
        }
    }

    fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    fn is_alive(&self) -> bool {
        self.transport.as_ref().is_some_and(SshTransport::is_alive)
    }

    fn current_privilege(&self) -> Option<&str> {
        self.privilege_manager.current_name()
    }
}
