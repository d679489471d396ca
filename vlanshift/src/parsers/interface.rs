//! `show interfaces <name>`, reduced to what VLAN migrations need.

use super::template::{self, Record, field};
use crate::error::{ParseError, Result};

/// How frames on an interface are encapsulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encapsulation {
    /// 802.1Q tagging; `second` is set for QinQ.
    Dot1q { first: u16, second: Option<u16> },
    /// Anything else, lower-cased (`arpa`, `loopback`, ...).
    Other(String),
}

/// Status and encapsulation of one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDetail {
    pub name: String,
    /// `up`, `down`, or `administratively down`.
    pub oper_status: String,
    pub line_protocol: String,
    pub encapsulation: Option<Encapsulation>,
}

impl InterfaceDetail {
    /// Outer 802.1Q tag, if the interface is dot1Q-encapsulated.
    pub fn dot1q_vlan(&self) -> Option<u16> {
        match self.encapsulation {
            Some(Encapsulation::Dot1q { first, .. }) => Some(first),
            _ => None,
        }
    }
}

pub fn command(name: &str) -> String {
    format!("show interfaces {name}")
}

/// Parse the output for a single interface.
pub fn parse(output: &str) -> Result<InterfaceDetail> {
    let rows = template::records("show interfaces", template::SHOW_INTERFACES, output)?;
    let row = rows.first().ok_or_else(|| missing("interface header"))?;
    let name = field(row, "interface").ok_or_else(|| missing("interface header"))?;

    Ok(InterfaceDetail {
        name: name.to_string(),
        oper_status: field(row, "oper_status")
            .unwrap_or_default()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
        line_protocol: field(row, "line_protocol").unwrap_or_default().to_string(),
        encapsulation: encapsulation(row)?,
    })
}

/// `802.1Q` and `QinQ` carry their tags in separate values; anything else
/// is reported by name.
fn encapsulation(row: &Record) -> Result<Option<Encapsulation>> {
    let Some(kind) = field(row, "encapsulation") else {
        return Ok(None);
    };
    let tags = match kind {
        "802.1Q" => (
            number(field(row, "vlan_id"))?.ok_or_else(|| missing("dot1Q VLAN ID"))?,
            number(field(row, "second_dot1q"))?,
        ),
        "QinQ" => (
            number(field(row, "outer_id"))?.ok_or_else(|| missing("outer VLAN ID"))?,
            number(field(row, "inner_id"))?,
        ),
        other => return Ok(Some(Encapsulation::Other(other.to_ascii_lowercase()))),
    };
    Ok(Some(Encapsulation::Dot1q {
        first: tags.0,
        second: tags.1,
    }))
}

fn number(value: Option<&str>) -> Result<Option<u16>> {
    let Some(digits) = value else {
        return Ok(None);
    };
    digits.parse().map(Some).map_err(|_| {
        ParseError::InvalidNumber {
            command: "show interfaces".to_string(),
            value: digits.to_string(),
        }
        .into()
    })
}

fn missing(what: &str) -> crate::Error {
    ParseError::Missing {
        command: "show interfaces".to_string(),
        what: what.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot1q_subinterface() {
        let output = "\
GigabitEthernet0/0.1 is up, line protocol is up 
  Hardware is iGbE, address is 5254.0012.3456 (bia 5254.0012.3456)
  Internet address is 10.1.1.1/24
  MTU 1500 bytes, BW 1000000 Kbit/sec, DLY 10 usec,
     reliability 255/255, txload 1/255, rxload 1/255
  Encapsulation 802.1Q Virtual LAN, Vlan ID  1.
  ARP type: ARPA, ARP Timeout 04:00:00
";
        let detail = parse(output).unwrap();
        assert_eq!(detail.name, "GigabitEthernet0/0.1");
        assert_eq!(detail.oper_status, "up");
        assert_eq!(detail.line_protocol, "up");
        assert_eq!(
            detail.encapsulation,
            Some(Encapsulation::Dot1q {
                first: 1,
                second: None
            })
        );
        assert_eq!(detail.dot1q_vlan(), Some(1));
    }

    #[test]
    fn test_qinq_subinterface() {
        let output = "\
GigabitEthernet0/1.300 is administratively down, line protocol is down
  Encapsulation QinQ Virtual LAN, outer ID  300, inner ID 42
";
        let detail = parse(output).unwrap();
        assert_eq!(detail.oper_status, "administratively down");
        assert_eq!(
            detail.encapsulation,
            Some(Encapsulation::Dot1q {
                first: 300,
                second: Some(42)
            })
        );
    }

    #[test]
    fn test_arpa() {
        let output = "\
GigabitEthernet0/0 is up, line protocol is up
  Encapsulation ARPA, loopback not set
";
        let detail = parse(output).unwrap();
        assert_eq!(
            detail.encapsulation,
            Some(Encapsulation::Other("arpa".to_string()))
        );
        assert_eq!(detail.dot1q_vlan(), None);
    }

    #[test]
    fn test_second_dot1q_and_out_of_range_tag() {
        let output = "\
GigabitEthernet0/0.5 is up, line protocol is up
  Encapsulation 802.1Q Virtual LAN, Vlan ID  5, second-dot1q 77
";
        let detail = parse(output).unwrap();
        assert_eq!(
            detail.encapsulation,
            Some(Encapsulation::Dot1q {
                first: 5,
                second: Some(77)
            })
        );

        let output = "\
GigabitEthernet0/0.5 is up, line protocol is up
  Encapsulation 802.1Q Virtual LAN, Vlan ID  99999.
";
        assert!(parse(output).is_err());
    }

    #[test]
    fn test_garbage() {
        assert!(parse("").is_err());
        assert!(parse("% Invalid input detected").is_err());
    }
}
