//! CLI argument parsing using clap derive

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

/// Mirror remote workspace spaces into a normalized local file tree
#[derive(Parser, Debug)]
#[command(name = "docmirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub service: ServiceArgs,

    /// Run a tool instead of the sync service
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Settings of the sync service. Every option can also come from the
/// environment.
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Remote service URL
    #[arg(long, env = "DOCMIRROR_BASE_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Login email
    #[arg(long, env = "DOCMIRROR_EMAIL")]
    pub email: Option<String>,

    /// Login password
    #[arg(long, env = "DOCMIRROR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Root directory the spaces are published under
    #[arg(long, env = "OUTPUT_DIR", default_value = "./output")]
    pub output: PathBuf,

    /// Time between runs, e.g. 30m, 1h, 1h30m or 45s; 0 runs once
    #[arg(long, env = "SYNC_INTERVAL", value_parser = parse_interval)]
    pub interval: Option<Duration>,

    /// Run once even when an interval is configured
    #[arg(long)]
    pub once: bool,

    /// Listen address of the health endpoint (periodic mode only)
    #[arg(long, env = "HTTP_ADDR", default_value = "0.0.0.0:8080")]
    pub http_addr: SocketAddr,

    /// Process lock file [default: <temp dir>/docmirror.lock]
    #[arg(long, env = "DOCMIRROR_LOCK_FILE")]
    pub lock_file: Option<PathBuf>,

    /// Repeat reconciliation until it settles
    #[arg(long)]
    pub converge: bool,
}

impl ServiceArgs {
    /// The effective interval: `None` means one-shot.
    pub fn effective_interval(&self) -> Option<Duration> {
        if self.once {
            return None;
        }
        self.interval.filter(|d| !d.is_zero())
    }

    pub fn lock_path(&self) -> PathBuf {
        self.lock_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("docmirror.lock"))
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Reconcile an existing working tree in place
    ///
    /// The directory should hold the `_metadata.json` written by a sync;
    /// without it the metadata-driven passes are skipped.
    Reconcile {
        /// Working tree to reconcile
        dir: PathBuf,

        /// Repeat the pass sequence until it settles
        #[arg(long)]
        converge: bool,
    },

    /// Print the romanization of each argument
    Translit {
        /// Text to transliterate
        #[arg(required = true)]
        text: Vec<String>,
    },
}

/// Parse an interval such as `1h30m`, `45s` or `250ms`. `0` is zero.
pub fn parse_interval(text: &str) -> Result<Duration, String> {
    let text = text.trim();
    if text == "0" {
        return Ok(Duration::ZERO);
    }
    if text.is_empty() {
        return Err("empty interval".to_string());
    }

    let mut total = Duration::ZERO;
    let mut rest = text;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(format!("invalid interval {text:?}: expected a number"));
        }
        let value: u64 = rest[..digits]
            .parse()
            .map_err(|_| format!("invalid interval {text:?}: number too large"))?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let unit = match &rest[..unit_len] {
            "h" => Duration::from_secs(3600),
            "m" => Duration::from_secs(60),
            "s" => Duration::from_secs(1),
            "ms" => Duration::from_millis(1),
            "" => return Err(format!("invalid interval {text:?}: missing unit")),
            other => return Err(format!("invalid interval {text:?}: unknown unit {other:?}")),
        };
        rest = &rest[unit_len..];

        let part = u32::try_from(value)
            .ok()
            .and_then(|v| unit.checked_mul(v))
            .ok_or_else(|| format!("invalid interval {text:?}: too long"))?;
        total = total
            .checked_add(part)
            .ok_or_else(|| format!("invalid interval {text:?}: too long"))?;
    }
    Ok(total)
}
