//! Message codec
//!
//! Both client messages start with a fixed 9-byte prelude (`"CONTROL: "` or
//! `"TRANSFER:"`). Everything after it is located by byte offset, so the
//! prelude text itself is never inspected. Messages stay raw bytes until
//! they are logged.

/// Length of the `"CONTROL: "` / `"TRANSFER:"` prelude.
pub const PRELUDE_LEN: usize = 9;

/// Length of an operator such as `-l` or `-g`.
pub const OPERATOR_LEN: usize = 2;

/// Offset of the operator letter (`l` / `g`).
pub const OPERATOR_FLAG_OFFSET: usize = PRELUDE_LEN + 1;

/// Offset of the single space between the operator and a filename.
pub const SEPARATOR_OFFSET: usize = PRELUDE_LEN + OPERATOR_LEN;

/// Offset of the first filename byte.
pub const FILENAME_OFFSET: usize = SEPARATOR_OFFSET + 1;

pub const CONTROL_PRELUDE: &str = "CONTROL: ";
pub const TRANSFER_PRELUDE: &str = "TRANSFER: ";

/// The complete list request, newline already stripped.
pub const LIST_MESSAGE: &[u8] = b"CONTROL: -l";

/// Decodes the bytes of one receive call into a message.
///
/// The message ends at the first NUL byte. At most one trailing `\n` is
/// removed; other whitespace, including `\r`, is left alone.
pub fn decode_line(raw: &[u8]) -> Vec<u8> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let mut message = raw[..end].to_vec();
    if message.last() == Some(&b'\n') {
        message.pop();
    }
    message
}

/// Extracts the port token of a `TRANSFER: <port>` message.
///
/// Leading whitespace after the prelude is skipped; the token runs until the
/// next whitespace byte or the end of the message.
pub fn port_token(message: &[u8]) -> &[u8] {
    let rest = message.get(PRELUDE_LEN..).unwrap_or(&[]);
    let start = rest.iter().position(|&b| !is_space(b)).unwrap_or(rest.len());
    let rest = &rest[start..];
    let end = rest.iter().position(|&b| is_space(b)).unwrap_or(rest.len());
    &rest[..end]
}

/// C `isspace` over ASCII, which also counts vertical tab.
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

pub fn encode_list() -> String {
    format!("{}-l\n", CONTROL_PRELUDE)
}

pub fn encode_get(filename: &str) -> String {
    format!("{}-g {}\n", CONTROL_PRELUDE, filename)
}

pub fn encode_transfer(port: u16) -> String {
    format!("{}{}\n", TRANSFER_PRELUDE, port)
}
