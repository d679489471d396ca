//! Privilege level tracking and navigation.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;
use regex::bytes::Regex;

use crate::error::{DriverError, Result};
use crate::platform::PrivilegeLevel;

/// Tracks the current CLI mode and plans moves between modes.
///
/// Levels are connected to their parent in both directions; moving from
/// one level to another is a shortest path over those edges.
#[derive(Debug)]
pub struct PrivilegeManager {
    levels: IndexMap<String, PrivilegeLevel>,
    neighbors: HashMap<String, Vec<String>>,
    current: Option<String>,
}

/// A single hop between adjacent levels.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Command that performs the hop.
    pub command: String,

    /// Password prompt to answer, for authenticated escalation.
    pub auth_prompt: Option<Regex>,
}

impl PrivilegeManager {
    pub fn new(levels: IndexMap<String, PrivilegeLevel>) -> Self {
        let mut neighbors: HashMap<String, Vec<String>> = HashMap::new();
        for (name, level) in &levels {
            neighbors.entry(name.clone()).or_default();
            if let Some(parent) = level.parent() {
                neighbors.entry(name.clone()).or_default().push(parent.to_string());
                neighbors.entry(parent.to_string()).or_default().push(name.clone());
            }
        }

        Self {
            levels,
            neighbors,
            current: None,
        }
    }

    /// The level whose prompt pattern matches `prompt`.
    pub fn determine_from_prompt(&self, prompt: &str) -> Result<&PrivilegeLevel> {
        self.levels
            .values()
            .find(|level| level.matches(prompt))
            .ok_or_else(|| {
                DriverError::UnknownPrivilege {
                    prompt: prompt.to_string(),
                }
                .into()
            })
    }

    /// Update the current level from a prompt; unknown prompts leave it unchanged.
    pub fn observe_prompt(&mut self, prompt: &str) -> Option<&str> {
        let name = self.determine_from_prompt(prompt).ok()?.name.clone();
        self.current = Some(name);
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&PrivilegeLevel> {
        self.current.as_ref().and_then(|name| self.levels.get(name))
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&PrivilegeLevel> {
        self.levels.get(name)
    }

    /// Shortest sequence of levels from `from` to `to`, both included.
    pub fn find_path(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let no_path = || DriverError::NoPrivilegePath {
            from: from.to_string(),
            to: to.to_string(),
        };
        if !self.levels.contains_key(from) || !self.levels.contains_key(to) {
            return Err(no_path().into());
        }

        let mut came_from: HashMap<&str, &str> = HashMap::new();
        let mut queue = VecDeque::from([from]);
        came_from.insert(from, from);

        while let Some(node) = queue.pop_front() {
            if node == to {
                let mut path = vec![to.to_string()];
                let mut step = to;
                while step != from {
                    step = came_from[step];
                    path.push(step.to_string());
                }
                path.reverse();
                return Ok(path);
            }
            for next in self.neighbors.get(node).into_iter().flatten() {
                let next = next.as_str();
                if !came_from.contains_key(next) {
                    came_from.insert(next, node);
                    queue.push_back(next);
                }
            }
        }

        Err(no_path().into())
    }

    /// The command moving from `from` to the adjacent level `to`.
    pub fn transition(&self, from: &str, to: &str) -> Option<Transition> {
        let source = self.levels.get(from)?;
        let target = self.levels.get(to)?;

        match (&target.entry, &source.entry) {
            (Some(entry), _) if entry.parent == from => Some(Transition {
                command: entry.enter.clone(),
                auth_prompt: entry.password_prompt.clone(),
            }),
            (_, Some(entry)) if entry.parent == to => Some(Transition {
                command: entry.leave.clone(),
                auth_prompt: None,
            }),
            _ => None,
        }
    }
}
