//! Alpha FTP Server - Entry Point
//!
//! Serves directory listings and text files over a control/data connection
//! pair.

use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use alpha_ftp::Server;
use alpha_ftp::config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "aftp-server", about = "Alpha FTP server")]
struct Args {
    /// Port to listen on for control connections
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    config.control_port = args.port;

    info!("Launching Alpha FTP server...");

    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    server.start().await;

    ExitCode::SUCCESS
}
