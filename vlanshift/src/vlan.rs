//! VLAN membership sets.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{ParseError, Result};

/// Set of VLAN IDs expanded from an IOS range list such as `1,10-20,128`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VlanSet {
    members: BTreeSet<u16>,
}

impl VlanSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand a trunk VLAN list.
    ///
    /// `A-B` expands to every ID from A to B inclusive. The tokens `all`
    /// and `none` contribute no members. Empty tokens are skipped.
    pub fn parse(list: &str) -> Result<Self> {
        let mut members = BTreeSet::new();
        for token in list.split(',').map(str::trim) {
            if token.is_empty()
                || token.eq_ignore_ascii_case("all")
                || token.eq_ignore_ascii_case("none")
            {
                continue;
            }
            match token.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (vlan_id(start)?, vlan_id(end)?);
                    members.extend(start..=end);
                }
                None => {
                    members.insert(vlan_id(token)?);
                }
            }
        }
        Ok(Self { members })
    }

    pub fn contains(&self, vlan: u16) -> bool {
        self.members.contains(&vlan)
    }

    pub fn insert(&mut self, vlan: u16) -> bool {
        self.members.insert(vlan)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.members.iter().copied()
    }
}

impl FromIterator<u16> for VlanSet {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

/// Compact form: consecutive IDs collapse into ranges.
impl fmt::Display for VlanSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ranges: Vec<(u16, u16)> = Vec::new();
        for vlan in self.iter() {
            match ranges.last_mut() {
                Some((_, end)) if end.checked_add(1) == Some(vlan) => *end = vlan,
                _ => ranges.push((vlan, vlan)),
            }
        }
        let rendered: Vec<String> = ranges
            .into_iter()
            .map(|(start, end)| {
                if start == end {
                    start.to_string()
                } else {
                    format!("{start}-{end}")
                }
            })
            .collect();
        write!(f, "{}", rendered.join(","))
    }
}

fn vlan_id(text: &str) -> Result<u16> {
    text.trim().parse().map_err(|_| {
        ParseError::InvalidNumber {
            command: "show interfaces switchport".to_string(),
            value: text.to_string(),
        }
        .into()
    })
}
