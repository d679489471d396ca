//! Interface name normalization.

/// Short interface type → full IOS interface type.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("Twe", "TwentyFiveGigE"),
    ("Tw", "TwoGigabitEthernet"),
    ("Te", "TenGigabitEthernet"),
    ("Gi", "GigabitEthernet"),
    ("Fa", "FastEthernet"),
    ("Fo", "FortyGigabitEthernet"),
    ("Hu", "HundredGigE"),
    ("Fi", "FiveGigabitEthernet"),
    ("Et", "Ethernet"),
    ("Po", "Port-channel"),
    ("Vl", "Vlan"),
    ("Lo", "Loopback"),
    ("Tu", "Tunnel"),
];

/// Expand a short interface name (`Gi1/0/1`) to its full form
/// (`GigabitEthernet1/0/1`). Full names pass through unchanged.
pub fn expand_interface_name(name: &str) -> String {
    let split = name
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(name.len());
    let (kind, rest) = name.split_at(split);

    ABBREVIATIONS
        .iter()
        .find(|(short, _)| kind.eq_ignore_ascii_case(short))
        .map(|(_, full)| format!("{full}{rest}"))
        .unwrap_or_else(|| name.to_string())
}
