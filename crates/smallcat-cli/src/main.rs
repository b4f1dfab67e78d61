use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, warn};
use serde_json::json;
use smallcat_core::{Expiry, SmallcatError, SyncBridge};

#[derive(Debug, Parser)]
#[clap(name = "smallcat", version, about = "Shorten URLs with small.cat")]
struct Cli {
    /// Give up after this many seconds (default: wait indefinitely)
    #[arg(long, global = true, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Do not copy the short URL to the clipboard
    #[arg(long, global = true)]
    no_copy: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Shorten a URL for 10 minutes
    #[command(name = "10m")]
    TenMinutes {
        /// URL to shorten
        url: String,
    },
    /// Shorten a URL for 1 hour
    #[command(name = "1h")]
    OneHour {
        /// URL to shorten
        url: String,
    },
    /// Shorten a URL for 1 day
    #[command(name = "1d")]
    OneDay {
        /// URL to shorten
        url: String,
    },
    /// Shorten a URL for 1 week
    #[command(name = "1w")]
    OneWeek {
        /// URL to shorten
        url: String,
    },
}

impl Commands {
    fn request(&self) -> (&str, Expiry) {
        match self {
            Commands::TenMinutes { url } => (url.as_str(), Expiry::TenMinutes),
            Commands::OneHour { url } => (url.as_str(), Expiry::OneHour),
            Commands::OneDay { url } => (url.as_str(), Expiry::OneDay),
            Commands::OneWeek { url } => (url.as_str(), Expiry::OneWeek),
        }
    }
}

fn build_bridge(timeout: Option<u64>) -> Result<SyncBridge> {
    let bridge = SyncBridge::new().context("Failed to set up HTTP client")?;
    Ok(match timeout {
        Some(secs) => bridge.with_timeout(Duration::from_secs(secs)),
        None => bridge,
    })
}

/// Put the short URL on the system clipboard
fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
    clipboard
        .set_text(text)
        .context("Failed to write to clipboard")?;
    Ok(())
}

/// Rendered outcome of one invocation
#[derive(Debug, PartialEq, Eq)]
enum Output {
    Success(String),
    Failure(String),
}

fn render(
    url: &str,
    expiry: Expiry,
    result: &Result<String, SmallcatError>,
    copied: bool,
    as_json: bool,
) -> Output {
    match (result, as_json) {
        (Ok(short), false) if copied => {
            Output::Success(format!("URL: {}\nCopied to clipboard!", short))
        }
        (Ok(short), false) => Output::Success(format!("URL: {}", short)),
        (Ok(short), true) => Output::Success(
            json!({
                "short_url": short,
                "url": url,
                "expiry_minutes": expiry.minutes(),
                "copied": copied,
            })
            .to_string(),
        ),
        (Err(e), false) => Output::Failure(format!("Error: {}", e)),
        (Err(e), true) => Output::Failure(json!({ "error": e, "url": url }).to_string()),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let (url, expiry) = cli.command.request();

    let bridge = match build_bridge(cli.timeout) {
        Ok(bridge) => bridge,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = bridge.run(url, expiry);
    let copied = match &result {
        Ok(short) if !cli.no_copy => match copy_to_clipboard(short) {
            Ok(()) => true,
            Err(e) => {
                warn!("{:#}", e);
                false
            }
        },
        Ok(_) => false,
        Err(e) => {
            error!("shortening {} failed: {}", url, e);
            false
        }
    };

    match render(url, expiry, &result, copied, cli.json) {
        Output::Success(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Output::Failure(text) if cli.json => {
            println!("{}", text);
            ExitCode::FAILURE
        }
        Output::Failure(text) => {
            eprintln!("{}", text);
            ExitCode::FAILURE
        }
    }
}
