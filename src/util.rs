use macaddr::MacAddr6;

/// Positions of the five byte delimiters in `XX:XX:XX:XX:XX:XX`.
const DELIMITER_POSITIONS: [usize; 5] = [2, 5, 8, 11, 14];

pub const MAC_STRING_LEN: usize = 17;

/// Locally administered set, multicast cleared.
pub fn local_unicast(byte: u8) -> u8 {
    (byte | 0x02) & 0xFE
}

/// Uppercase, colon separated, two digits per byte.
pub fn format_mac(mac: &MacAddr6) -> String {
    join_hex(mac.as_bytes())
}

pub fn join_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Syntax-only check. Either `:` or `-` may appear at each delimiter
/// position, mixed delimiters included; bit flags are not inspected.
pub fn validate_mac(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != MAC_STRING_LEN {
        return false;
    }
    bytes.iter().enumerate().all(|(i, c)| {
        if DELIMITER_POSITIONS.contains(&i) {
            *c == b':' || *c == b'-'
        } else {
            c.is_ascii_hexdigit()
        }
    })
}

/// Uppercased OUI of a MAC string with `-` normalised to `:`.
pub fn oui_prefix(mac: &str) -> Option<String> {
    let prefix = mac.get(..8)?;
    Some(prefix.replace('-', ":").to_ascii_uppercase())
}
