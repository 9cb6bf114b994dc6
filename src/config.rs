use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Session Atlas - logon session dashboard
#[derive(Parser, Debug)]
#[command(name = "session-atlas")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Base URL of the session API
    #[arg(long, env = "SESSION_ATLAS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Preselect this user in the user filter
    #[arg(short, long)]
    pub user: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Open an events export instead of querying the API
    #[arg(long)]
    pub open: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error) or an `EnvFilter` directive
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub user: Option<String>,
    pub timeout: Duration,
    pub open: Option<PathBuf>,
}

impl Args {
    pub fn into_config(self) -> Result<Config> {
        let api_url = self.api_url.trim().trim_end_matches('/').to_string();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            bail!("--api-url must be an http(s) URL, got {:?}", self.api_url);
        }
        if self.timeout_secs == 0 {
            bail!("--timeout-secs must be greater than zero");
        }

        Ok(Config {
            api_url,
            user: self.user.filter(|u| !u.trim().is_empty()),
            timeout: Duration::from_secs(self.timeout_secs),
            open: self.open,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config> {
        let mut argv = vec!["session-atlas"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv)?.into_config()
    }

    #[test]
    fn defaults() {
        let config = parse(&["--api-url", DEFAULT_API_URL]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user.is_none());
        assert!(config.open.is_none());
    }

    #[test]
    fn trims_trailing_slash_and_blank_user() {
        let config = parse(&["--api-url", "https://dash.local/", "--user", " "]).unwrap();
        assert_eq!(config.api_url, "https://dash.local");
        assert!(config.user.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse(&["--api-url", "ftp://x"]).is_err());
        assert!(parse(&["--api-url", DEFAULT_API_URL, "--timeout-secs", "0"]).is_err());
    }

    #[test]
    fn open_export() {
        let config = parse(&["--api-url", DEFAULT_API_URL, "--open", "events.json", "-u", "alice"])
            .unwrap();
        assert_eq!(config.open, Some(PathBuf::from("events.json")));
        assert_eq!(config.user.as_deref(), Some("alice"));
    }
}
