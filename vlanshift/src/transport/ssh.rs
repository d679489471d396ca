//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, trace, warn};
use regex::bytes::Regex;
use russh::client::{self, Handle, Msg};
use russh::keys::PublicKey;
use russh::{Channel, ChannelMsg};
use secrecy::ExposeSecret;

use super::config::{HostKeyPolicy, SshConfig};
use crate::channel::PatternBuffer;
use crate::error::{ChannelError, Result, TransportError};

/// An authenticated SSH session with one interactive shell channel.
pub struct SshTransport {
    session: Handle<SshHandler>,
    channel: Channel<Msg>,
    buffer: PatternBuffer,
}

impl SshTransport {
    /// Connect, authenticate, and open a PTY shell.
    pub async fn connect(config: &SshConfig) -> Result<Self> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout()),
            ..Default::default()
        });

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));
        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            policy: config.options.host_keys,
            known_hosts: config.options.known_hosts.clone(),
            rejection: host_key_error.clone(),
        };

        debug!("connecting to {}", config.endpoint());
        let mut session = tokio::time::timeout(
            config.timeout(),
            client::connect(ssh_config, (config.host.as_str(), config.port), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout()))?
        .map_err(|e| {
            // Prefer the detailed host key rejection over russh's UnknownKey.
            host_key_error
                .lock()
                .ok()
                .and_then(|mut slot| slot.take())
                .unwrap_or(TransportError::Ssh(e))
        })?;

        authenticate(&mut session, config).await?;
        let channel = open_shell(&session, config).await?;

        Ok(Self {
            session,
            channel,
            buffer: PatternBuffer::new(config.search_depth),
        })
    }

    /// Write one line to the shell.
    pub async fn send(&mut self, line: &str) -> Result<()> {
        trace!("send: {:?}", line);
        let payload = format!("{line}\n");
        self.channel
            .data(payload.as_bytes())
            .await
            .map_err(ChannelError::Ssh)?;
        Ok(())
    }

    /// Write one line without logging it.
    pub async fn send_hidden(&mut self, line: &str) -> Result<()> {
        trace!("send: <hidden>");
        let payload = format!("{line}\n");
        self.channel
            .data(payload.as_bytes())
            .await
            .map_err(ChannelError::Ssh)?;
        Ok(())
    }

    /// Read until `pattern` matches the tail of the received output.
    pub async fn read_until(&mut self, pattern: &Regex, timeout: Duration) -> Result<Vec<u8>> {
        let (_, data) = self.read_until_any(&[pattern], timeout).await?;
        Ok(data)
    }

    /// Read until any of `patterns` matches the buffer tail.
    ///
    /// Patterns are tried in order, so earlier entries win when several
    /// match the same output. Returns the index of the winning pattern and
    /// everything consumed up to that point.
    pub async fn read_until_any(
        &mut self,
        patterns: &[&Regex],
        timeout: Duration,
    ) -> Result<(usize, Vec<u8>)> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if let Some(index) = patterns
                .iter()
                .position(|p| self.buffer.search_tail(p).is_some())
            {
                return Ok((index, self.buffer.take()));
            }

            let message = tokio::time::timeout_at(deadline, self.channel.wait())
                .await
                .map_err(|_| ChannelError::PatternTimeout(timeout))?;

            match message {
                Some(ChannelMsg::Data { data }) => self.buffer.extend(&data),
                Some(ChannelMsg::ExtendedData { data, .. }) => self.buffer.extend(&data),
                Some(ChannelMsg::Eof | ChannelMsg::Close) | None => {
                    return Err(ChannelError::Closed.into());
                }
                Some(_) => {}
            }
        }
    }

    /// Whether the russh session task is still running.
    pub fn is_alive(&self) -> bool {
        !self.session.is_closed()
    }

    /// Close the connection.
    pub async fn close(self) -> Result<()> {
        let _ = self.channel.eof().await;
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

async fn authenticate(session: &mut Handle<SshHandler>, config: &SshConfig) -> Result<()> {
    let accepted = match &config.password {
        Some(password) => session
            .authenticate_password(&config.username, password.expose_secret())
            .await
            .map_err(TransportError::Ssh)?
            .success(),
        None => session
            .authenticate_none(&config.username)
            .await
            .map_err(TransportError::Ssh)?
            .success(),
    };

    if !accepted {
        return Err(TransportError::AuthenticationFailed {
            user: config.username.clone(),
        }
        .into());
    }
    Ok(())
}

async fn open_shell(session: &Handle<SshHandler>, config: &SshConfig) -> Result<Channel<Msg>> {
    let channel = session
        .channel_open_session()
        .await
        .map_err(TransportError::Ssh)?;
    channel
        .request_pty(
            true,
            "xterm",
            config.terminal.0,
            config.terminal.1,
            0,
            0,
            &[],
        )
        .await
        .map_err(TransportError::Ssh)?;
    channel
        .request_shell(true)
        .await
        .map_err(TransportError::Ssh)?;
    Ok(channel)
}

struct SshHandler {
    host: String,
    port: u16,
    policy: HostKeyPolicy,
    known_hosts: Option<PathBuf>,
    /// Detailed reason for a rejected key, surfaced by `connect`.
    rejection: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    fn lookup(&self, key: &PublicKey) -> std::result::Result<bool, TransportError> {
        let found = match &self.known_hosts {
            Some(path) => russh::keys::check_known_hosts_path(&self.host, self.port, key, path),
            None => russh::keys::check_known_hosts(&self.host, self.port, key),
        };
        match found {
            Ok(known) => Ok(known),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    fn learn(&self, key: &PublicKey) {
        let learned = match &self.known_hosts {
            Some(path) => {
                russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, key, path)
            }
            None => russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, key),
        };
        if let Err(e) = learned {
            warn!("could not save host key for {}: {}", self.host, e);
        }
    }

    fn reject(&self, reason: TransportError) -> bool {
        if let Ok(mut slot) = self.rejection.lock() {
            *slot = Some(reason);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        if self.policy == HostKeyPolicy::Off {
            return Ok(true);
        }

        let accepted = match self.lookup(server_public_key) {
            Ok(true) => true,
            Ok(false) if self.policy == HostKeyPolicy::AcceptNew => {
                self.learn(server_public_key);
                true
            }
            Ok(false) => self.reject(TransportError::HostKeyUnknown {
                host: self.host.clone(),
                port: self.port,
            }),
            Err(e) => self.reject(e),
        };
        Ok(accepted)
    }
}
