//! Data port parsing
//!
//! The announced port is read the way `atoi` reads it: leading digits only,
//! anything after them ignored.

use crate::error::ProtocolError;
use crate::protocol::port_token;

/// A port in `1..=65535` announced by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortAnnouncement(u16);

impl PortAnnouncement {
    pub fn port(self) -> u16 {
        self.0
    }

    /// Parses a decoded `TRANSFER: <port>` message.
    pub fn from_message(message: &[u8]) -> Result<Self, ProtocolError> {
        validate_port(port_token(message))
    }
}

/// Validates a port token. Zero, values above 65535 and tokens without
/// leading digits are rejected, never clamped.
pub fn validate_port(token: &[u8]) -> Result<PortAnnouncement, ProtocolError> {
    let digits_end = token
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(token.len());
    let digits = &token[..digits_end];

    // Over-long digit runs overflow u32 and are out of range either way.
    let value = std::str::from_utf8(digits)
        .ok()
        .and_then(|d| d.parse::<u32>().ok());
    match value {
        Some(value @ 1..=65535) => Ok(PortAnnouncement(value as u16)),
        _ => Err(ProtocolError::InvalidDataPort(
            String::from_utf8_lossy(token).into_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ports() {
        assert_eq!(validate_port(b"1").unwrap().port(), 1);
        assert_eq!(validate_port(b"30020").unwrap().port(), 30020);
        assert_eq!(validate_port(b"65535").unwrap().port(), 65535);
    }

    #[test]
    fn test_leading_digits_win() {
        assert_eq!(validate_port(b"8080abc").unwrap().port(), 8080);
    }

    #[test]
    fn test_invalid_ports() {
        for token in ["", "0", "65536", "99999999999999999999", "abc", "-1", "+80"] {
            assert!(
                validate_port(token.as_bytes()).is_err(),
                "{token:?} should be invalid"
            );
        }
        assert!(validate_port(b"\xff80").is_err());
    }

    #[test]
    fn test_from_message() {
        assert_eq!(
            PortAnnouncement::from_message(b"TRANSFER: 4040").unwrap().port(),
            4040
        );
        assert!(PortAnnouncement::from_message(b"TRANSFER: zero").is_err());
        assert!(PortAnnouncement::from_message(b"TRANSFER:").is_err());
        assert_eq!(
            PortAnnouncement::from_message(b"\xffRANSFER: 4040\xfe").unwrap().port(),
            4040
        );
    }
}
