//! Configuration management for the Alpha FTP server
//!
//! Values are layered: built-in defaults, then `config.toml` (or the file
//! given on the command line), then `AFTP_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::protocol::codec::OPERATOR_FLAG_OFFSET;

/// Server configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// IP address the control listener binds to
    pub bind_address: String,

    /// Port for control connections; the command line overrides it
    pub control_port: u16,

    /// Directory served to clients, standing in for the working directory
    pub server_root: String,

    /// Buffer size of the single read used for each control message
    pub max_message_size: usize,

    /// Sessions served concurrently
    pub max_clients: usize,

    /// Prepend `.` and `..` to directory listings.
    ///
    /// Off by default, so listings and their `OK: n` counts leave out `.`
    /// and `..` even though a raw directory enumeration reports them. With
    /// `true` both entries come first and count toward `n`.
    pub list_dot_entries: bool,

    /// Seconds to wait when dialing the data channel, 0 waits forever
    pub dial_timeout_secs: u64,

    /// Seconds to wait for a control message, 0 waits forever
    pub read_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            control_port: 2121,
            server_root: ".".to_string(),
            max_message_size: 1024,
            max_clients: 10,
            list_dot_entries: false,
            dial_timeout_secs: 0,
            read_timeout_secs: 0,
        }
    }
}

impl ServerConfig {
    /// Load configuration with environment overrides.
    ///
    /// Without an explicit `path`, `./config.toml` is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("config").required(false),
        };

        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("control_port", i64::from(defaults.control_port))?
            .set_default("server_root", defaults.server_root)?
            .set_default("max_message_size", defaults.max_message_size as i64)?
            .set_default("max_clients", defaults.max_clients as i64)?
            .set_default("list_dot_entries", defaults.list_dot_entries)?
            .set_default("dial_timeout_secs", defaults.dial_timeout_secs as i64)?
            .set_default("read_timeout_secs", defaults.read_timeout_secs as i64)?
            .add_source(file)
            .add_source(Environment::with_prefix("AFTP").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.control_port == 0 {
            return Err(ConfigError::Message("Control port cannot be 0".into()));
        }

        if self.server_root.is_empty() {
            return Err(ConfigError::Message("server_root cannot be empty".into()));
        }

        // A buffer that cannot hold the prelude and operator can never
        // carry a valid command.
        if self.max_message_size <= OPERATOR_FLAG_OFFSET {
            return Err(ConfigError::Message(format!(
                "max_message_size must be larger than {}",
                OPERATOR_FLAG_OFFSET
            )));
        }

        if self.max_clients == 0 {
            return Err(ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Bind address and control port as a socket address string
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }

    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    pub fn dial_timeout(&self) -> Option<Duration> {
        secs_to_timeout(self.dial_timeout_secs)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        secs_to_timeout(self.read_timeout_secs)
    }
}

fn secs_to_timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
