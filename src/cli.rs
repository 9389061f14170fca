use crate::app::Page;
use clap::{Parser, ValueEnum};
use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9080/openliberty-demo/api";

#[derive(Parser, Debug)]
#[command(
    name = "adminw",
    version,
    about = "Terminal admin console for the user and test-runner API"
)]
pub struct Cli {
    /// API base URL; endpoint paths are appended to it
    #[arg(short, long, default_value = DEFAULT_BASE_URL, value_parser = parse_base_url)]
    pub base_url: Url,

    /// Page shown at startup
    #[arg(short, long, value_enum, default_value_t = StartPage::Users)]
    pub page: StartPage,

    /// Execution poll interval in milliseconds
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(100..))]
    pub poll_ms: u64,

    /// How long each toast stays on screen, in milliseconds
    #[arg(long, default_value_t = 3000, value_parser = clap::value_parser!(u64).range(1..))]
    pub toast_ms: u64,

    /// Number of recent executions to list
    #[arg(short, long, default_value_t = 5)]
    pub recent: usize,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Enable verbose logging to $XDG_STATE_HOME/adminw/debug.log
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StartPage {
    Users,
    Tests,
}

impl From<StartPage> for Page {
    fn from(page: StartPage) -> Self {
        match page {
            StartPage::Users => Page::Users,
            StartPage::Tests => Page::Tests,
        }
    }
}

/// Accepts absolute http(s) URLs that can take extra path segments.
pub fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("Invalid base URL '{raw}': {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!(
            "Invalid base URL '{raw}'. Expected an http:// or https:// URL."
        ));
    }
    if url.cannot_be_a_base() {
        return Err(format!("Invalid base URL '{raw}'. It cannot carry a path."));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(format!(
            "Invalid base URL '{raw}'. Query strings and fragments are not supported."
        ));
    }
    Ok(url)
}
