//! Alpha FTP client
//!
//! usage: aftp-client <server_host> <server_port> <data_port> <-l | -g file_name>

use clap::{ArgGroup, Parser};
use log::error;
use std::path::Path;
use std::process::ExitCode;
use tokio::fs::OpenOptions;

use alpha_ftp::client::{Request, fetch, save_file_name};
use alpha_ftp::error::ClientError;

#[derive(Parser, Debug)]
#[command(name = "aftp-client", about = "Lists or downloads files from an Alpha FTP server")]
#[command(group(ArgGroup::new("request").required(true).args(["list", "get"])))]
struct Args {
    /// Server host name or IP address
    server_host: String,

    /// Server control port
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    server_port: u16,

    /// Local port the server connects back to
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    data_port: u16,

    /// List the server's directory
    #[arg(short = 'l')]
    list: bool,

    /// Download a file
    #[arg(short = 'g', value_name = "FILE_NAME")]
    get: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if args.server_port == args.data_port {
        eprintln!("Server port and data port numbers must be different");
        return ExitCode::FAILURE;
    }

    let server = format!("{}:{}", args.server_host, args.server_port);
    let result = match args.get.as_deref() {
        Some(file_name) if !args.list => download(&server, args.data_port, file_name).await,
        _ => fetch(&server, args.data_port, &Request::List, &mut tokio::io::stdout())
            .await
            .map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(ClientError::Server(text)) => {
            println!("{}", text);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn download(server: &str, data_port: u16, file_name: &str) -> Result<(), ClientError> {
    let save_name = save_file_name(Path::new(file_name));
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&save_name)
        .await?;

    // The save file is always new; drop it if the transfer fails.
    let request = Request::Get(file_name.to_string());
    if let Err(e) = fetch(server, data_port, &request, &mut file).await {
        drop(file);
        let _ = tokio::fs::remove_file(&save_name).await;
        return Err(e);
    }
    println!("Transfer complete: file saved as \"{}\"", save_name.display());
    Ok(())
}
