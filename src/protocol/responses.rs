//! Control-channel replies
//!
//! `OK: <n>` announces how many units the data channel will carry,
//! `ERROR: <text>` ends the session.

use std::fmt;

const OK_HEADER: &str = "OK: ";
const ERROR_HEADER: &str = "ERROR: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok(usize),
    Error(String),
}

impl Reply {
    /// Parses a reply line, with or without its trailing newline.
    pub fn parse(line: &str) -> Option<Reply> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        if let Some(text) = line.strip_prefix(ERROR_HEADER) {
            return Some(Reply::Error(text.to_string()));
        }
        line.strip_prefix(OK_HEADER)?
            .trim()
            .parse()
            .ok()
            .map(Reply::Ok)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok(count) => writeln!(f, "{}{}", OK_HEADER, count),
            Reply::Error(text) => writeln!(f, "{}{}", ERROR_HEADER, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(Reply::Ok(2).to_string(), "OK: 2\n");
        assert_eq!(
            Reply::Error("File doesn't exist".into()).to_string(),
            "ERROR: File doesn't exist\n"
        );
    }

    #[test]
    fn test_count_round_trip() {
        for n in [1, 2, 17, 65_536, usize::MAX] {
            assert_eq!(Reply::parse(&Reply::Ok(n).to_string()), Some(Reply::Ok(n)));
        }
    }

    #[test]
    fn test_parse_error_reply() {
        assert_eq!(
            Reply::parse("ERROR: data port number is invalid\n"),
            Some(Reply::Error("data port number is invalid".into()))
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(Reply::parse("OK: many"), None);
        assert_eq!(Reply::parse("hello"), None);
        assert_eq!(Reply::parse(""), None);
    }
}
