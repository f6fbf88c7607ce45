// WolPanel - core/validate.rs
//
// Form validation for client configurations.
// Core layer: pure logic, no I/O or UI dependencies.
//
// Every pass validates every field from scratch; the returned `FormErrors`
// replaces whatever errors the form showed before.

use crate::core::model::ClientConfig;
use regex::Regex;
use std::sync::OnceLock;

/// Six hex pairs separated by `:` or `-`.
const MAC_PATTERN: &str = r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$";

/// Dotted quad with each octet bounded to 0-255.
const IPV4_PATTERN: &str =
    r"^((25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$";

pub const MAC_ERROR: &str = "Invalid MAC address; expected XX-XX-XX-XX-XX-XX or XX:XX:XX:XX:XX:XX";
pub const IP_ERROR: &str = "Invalid IP address";
pub const REQUIRED_ERROR: &str = "This field is required";

// Both patterns are constants checked by `test_patterns_compile`, so the
// `expect`s below cannot fire at runtime.
fn mac_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MAC_PATTERN).expect("MAC pattern is a valid regex"))
}

fn ipv4_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IPV4_PATTERN).expect("IPv4 pattern is a valid regex"))
}

/// True if `value` (after trimming) is a MAC address in colon or dash form.
pub fn is_valid_mac(value: &str) -> bool {
    mac_regex().is_match(value.trim())
}

/// True if `value` (after trimming) is a dotted-quad IPv4 address.
pub fn is_valid_ipv4(value: &str) -> bool {
    ipv4_regex().is_match(value.trim())
}

/// Identifies one input of the client form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Topic,
    TargetMac,
    BroadcastIp,
    Ip,
    Username,
    Password,
}

impl Field {
    /// All fields in form order.
    pub fn all() -> &'static [Field] {
        &[
            Field::Topic,
            Field::TargetMac,
            Field::BroadcastIp,
            Field::Ip,
            Field::Username,
            Field::Password,
        ]
    }

    /// Label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Topic => "Topic",
            Field::TargetMac => "MAC address",
            Field::BroadcastIp => "Broadcast IP",
            Field::Ip => "IP address",
            Field::Username => "Username",
            Field::Password => "Password",
        }
    }

    /// The value of this field in `config`.
    pub fn value<'a>(&self, config: &'a ClientConfig) -> &'a str {
        match self {
            Field::Topic => &config.topic,
            Field::TargetMac => &config.target_mac,
            Field::BroadcastIp => &config.broadcast_ip,
            Field::Ip => &config.ip,
            Field::Username => &config.username,
            Field::Password => &config.password,
        }
    }

    /// Mutable access for binding the field to a text input.
    pub fn value_mut<'a>(&self, config: &'a mut ClientConfig) -> &'a mut String {
        match self {
            Field::Topic => &mut config.topic,
            Field::TargetMac => &mut config.target_mac,
            Field::BroadcastIp => &mut config.broadcast_ip,
            Field::Ip => &mut config.ip,
            Field::Username => &mut config.username,
            Field::Password => &mut config.password,
        }
    }
}

/// Per-field error messages from one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<(Field, &'static str)>,
}

impl FormErrors {
    /// True when every field passed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, msg)| *msg)
    }

    /// Fields that failed, in form order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.iter().map(|(f, _)| *f)
    }

    fn push(&mut self, field: Field, msg: &'static str) {
        self.errors.push((field, msg));
    }
}

/// Validate every field of `config`.
///
/// All fields are required. MAC and both IP fields must additionally match
/// their formats; an empty MAC or IP reports the format error.
pub fn validate_client(config: &ClientConfig) -> FormErrors {
    let mut errors = FormErrors::default();
    for &field in Field::all() {
        let value = field.value(config);
        let message = match field {
            Field::TargetMac if !is_valid_mac(value) => Some(MAC_ERROR),
            Field::BroadcastIp | Field::Ip if !is_valid_ipv4(value) => Some(IP_ERROR),
            Field::Topic | Field::Username | Field::Password if value.trim().is_empty() => {
                Some(REQUIRED_ERROR)
            }
            _ => None,
        };
        if let Some(msg) = message {
            errors.push(field, msg);
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert!(Regex::new(MAC_PATTERN).is_ok());
        assert!(Regex::new(IPV4_PATTERN).is_ok());
        assert!(mac_regex().is_match("AA:BB:CC:DD:EE:FF"));
        assert!(ipv4_regex().is_match("10.0.0.1"));
    }

    fn valid_client() -> ClientConfig {
        ClientConfig {
            topic: "office-pc".to_string(),
            target_mac: "60-CF-84-E8-63-93".to_string(),
            broadcast_ip: "192.168.31.255".to_string(),
            ip: "192.168.31.20".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_mac_accepts_colon_and_dash_forms() {
        assert!(is_valid_mac("AA:BB:CC:DD:EE:FF"));
        assert!(is_valid_mac("aa-bb-cc-dd-ee-ff"));
        assert!(is_valid_mac("  aa-bb-cc-dd-ee-ff  "));
    }

    #[test]
    fn test_mac_rejects_short_and_non_hex() {
        assert!(!is_valid_mac("AA:BB:CC:DD:EE"));
        assert!(!is_valid_mac("GG:BB:CC:DD:EE:FF"));
        assert!(!is_valid_mac("AABBCCDDEEFF"));
        assert!(!is_valid_mac(""));
    }

    #[test]
    fn test_ipv4_bounds_octets() {
        assert!(is_valid_ipv4("192.168.1.1"));
        assert!(is_valid_ipv4("255.255.255.255"));
        assert!(is_valid_ipv4("0.0.0.0"));
        assert!(!is_valid_ipv4("256.1.1.1"));
        assert!(!is_valid_ipv4("192.168.1"));
        assert!(!is_valid_ipv4("192.168.1.1.1"));
        assert!(!is_valid_ipv4("a.b.c.d"));
    }

    #[test]
    fn test_valid_client_passes() {
        assert!(validate_client(&valid_client()).is_valid());
    }

    #[test]
    fn test_each_bad_field_reported_independently() {
        let mut c = valid_client();
        c.target_mac = "AA:BB:CC:DD:EE".to_string();
        c.ip = "256.1.1.1".to_string();
        let errors = validate_client(&c);
        assert!(!errors.is_valid());
        assert_eq!(errors.get(Field::TargetMac), Some(MAC_ERROR));
        assert_eq!(errors.get(Field::Ip), Some(IP_ERROR));
        assert_eq!(errors.get(Field::BroadcastIp), None);
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec![Field::TargetMac, Field::Ip]
        );
    }

    #[test]
    fn test_placeholder_client_fails_all_but_topic() {
        let errors = validate_client(&ClientConfig::placeholder(1));
        assert_eq!(errors.get(Field::Topic), None);
        assert_eq!(errors.get(Field::Username), Some(REQUIRED_ERROR));
        assert_eq!(errors.get(Field::TargetMac), Some(MAC_ERROR));
        assert_eq!(errors.fields().count(), 5);
    }

    #[test]
    fn test_whitespace_only_required_field_rejected() {
        let mut c = valid_client();
        c.topic = "   ".to_string();
        assert_eq!(validate_client(&c).get(Field::Topic), Some(REQUIRED_ERROR));
    }
}
