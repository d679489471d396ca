//! `show ip interface brief`.

use super::naming::expand_interface_name;
use super::template::{self, field};
use crate::error::Result;

pub const COMMAND: &str = "show ip interface brief";

/// One row of the brief interface table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpInterfaceBrief {
    pub interface: String,
    pub ip_address: String,
    pub ok: bool,
    pub method: String,
    /// `up`, `down`, or `administratively down`.
    pub status: String,
    pub protocol: String,
}

impl IpInterfaceBrief {
    /// Sub-interfaces carry a dot in their name, e.g. `GigabitEthernet0/0.100`.
    pub fn is_subinterface(&self) -> bool {
        self.interface.contains('.')
    }
}

/// Parse the table. The header and anything that is not a row are skipped.
pub fn parse(output: &str) -> Result<Vec<IpInterfaceBrief>> {
    let rows = template::records(COMMAND, template::SHOW_IP_INTERFACE_BRIEF, output)?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            Some(IpInterfaceBrief {
                interface: expand_interface_name(field(row, "interface")?),
                ip_address: field(row, "ip_address")?.to_string(),
                ok: field(row, "ok")? == "YES",
                method: field(row, "method")?.to_string(),
                status: field(row, "status")?
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" "),
                protocol: field(row, "protocol")?.to_string(),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\
Interface              IP-Address      OK? Method Status                Protocol
GigabitEthernet0/0     10.0.0.1        YES NVRAM  up                    up
GigabitEthernet0/0.1   10.1.1.1        YES manual up                    up
GigabitEthernet0/0.20  10.20.0.1       YES manual administratively down down
GigabitEthernet0/1     unassigned      YES unset  down                  down
Loopback0              192.0.2.1       YES NVRAM  up                    up
";

    #[test]
    fn test_parse_rows() {
        let rows = parse(OUTPUT).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].interface, "GigabitEthernet0/0");
        assert!(rows[0].ok);
        assert_eq!(rows[0].method, "NVRAM");

        assert_eq!(rows[2].status, "administratively down");
        assert_eq!(rows[2].protocol, "down");
        assert_eq!(rows[3].ip_address, "unassigned");
    }

    #[test]
    fn test_subinterfaces() {
        let subs: Vec<_> = parse(OUTPUT)
            .unwrap()
            .into_iter()
            .filter(IpInterfaceBrief::is_subinterface)
            .map(|row| row.interface)
            .collect();
        assert_eq!(subs, vec!["GigabitEthernet0/0.1", "GigabitEthernet0/0.20"]);
    }

    #[test]
    fn test_short_names_and_error_text() {
        let output = "\
Interface              IP-Address      OK? Method Status                Protocol
Gi0/0.300              10.3.0.1        YES manual deleted               down
% Invalid input detected at '^' marker.
";
        let rows = parse(output).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].interface, "GigabitEthernet0/0.300");
        assert_eq!(rows[0].status, "deleted");
        assert!(parse("").unwrap().is_empty());
    }
}
