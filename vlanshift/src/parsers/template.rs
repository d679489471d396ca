//! TextFSM templates shipped under `res/templates/`.

use std::collections::HashMap;

use textfsm_rust::Template;

use crate::error::{ParseError, Result};

pub(crate) const SHOW_INTERFACES_SWITCHPORT: &str =
    include_str!("../../res/templates/cisco_ios_show_interfaces_switchport.textfsm");
pub(crate) const SHOW_IP_INTERFACE_BRIEF: &str =
    include_str!("../../res/templates/cisco_ios_show_ip_interface_brief.textfsm");
pub(crate) const SHOW_INTERFACES: &str =
    include_str!("../../res/templates/cisco_ios_show_interfaces.textfsm");

/// One parsed row, keyed by the template's value names.
pub(crate) type Record = HashMap<String, String>;

/// Run `template` over `output`.
pub(crate) fn records(command: &str, template: &str, output: &str) -> Result<Vec<Record>> {
    let template = Template::parse_str(template).map_err(|e| failed(command, e))?;
    let mut parser = template.parser();
    parser
        .parse_text_to_dicts(output)
        .map_err(|e| failed(command, e))
}

/// Non-empty value of `key`.
pub(crate) fn field<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn failed(command: &str, err: impl std::fmt::Display) -> crate::Error {
    ParseError::Template {
        command: command.to_string(),
        message: err.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_templates_compile() {
        for template in [SHOW_INTERFACES_SWITCHPORT, SHOW_IP_INTERFACE_BRIEF, SHOW_INTERFACES] {
            assert!(Template::parse_str(template).is_ok());
        }
    }

    #[test]
    fn test_field_skips_blank_values() {
        let mut record = Record::new();
        record.insert("interface".to_string(), "Gi1/0/1".to_string());
        record.insert("access_vlan".to_string(), String::new());
        assert_eq!(field(&record, "interface"), Some("Gi1/0/1"));
        assert_eq!(field(&record, "access_vlan"), None);
        assert_eq!(field(&record, "native_vlan"), None);
    }

    #[test]
    fn test_bad_template_is_a_parse_error() {
        let err = records("show clock", "Value broken (\n\nStart\n", "").unwrap_err();
        assert!(err.to_string().contains("show clock"));
    }
}
