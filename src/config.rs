use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const VERYCHIC_ENDPOINT: &str = "https://api.verychic.com/verychic-endpoints/v1/products.json";
pub const VOYAGE_PRIVE_LOGIN_URL: &str = "https://www.voyage-prive.co.uk/login/index#signin";
pub const VOYAGE_PRIVE_BASE_URL: &str = "https://www.voyage-prive.co.uk";

/// Query sent to the products endpoint. One page, large enough for the whole
/// catalogue.
pub const VERYCHIC_PARAMS: &[(&str, &str)] = &[
    ("branding", "VRC"),
    ("currency", "EUR"),
    ("detailed", "false"),
    ("language", "fr"),
    ("opinionCount", "0"),
    ("page", "0"),
    ("size", "2000"),
    ("memberStatus", "PROSPECT"),
    ("channel", "B2C_HOTEL"),
    ("publishingStatus", "nonexpired"),
    ("channelVersion", "24.12.0"),
];

pub const VERYCHIC_HEADERS: &[(&str, &str)] = &[
    ("sec-ch-ua-platform", "\"macOS\""),
    ("Referer", "https://www.verychic.fr/"),
    ("User-Agent", "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"),
    ("Accept", "application/json, text/plain, */*"),
    ("sec-ch-ua", "\"Google Chrome\";v=\"131\", \"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\""),
    ("sec-ch-ua-mobile", "?0"),
];

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub output_dir: PathBuf,
    /// Overrides the dated file name when set.
    pub output: Option<PathBuf>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            output: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerychicConfig {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    pub raw_json: Option<PathBuf>,
}

impl Default for VerychicConfig {
    fn default() -> Self {
        Self {
            endpoint: VERYCHIC_ENDPOINT.to_string(),
            params: VERYCHIC_PARAMS
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            raw_json: None,
        }
    }
}

impl VerychicConfig {
    /// Replaces parameters that already exist and appends the others.
    pub fn with_param_overrides(mut self, overrides: &[(String, String)]) -> Self {
        for (key, value) in overrides {
            match self.params.iter_mut().find(|(existing, _)| existing == key) {
                Some(param) => param.1 = value.clone(),
                None => self.params.push((key.clone(), value.clone())),
            }
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    pub window_size: (u32, u32),
    /// Upper bound for any single wait on the page.
    pub timeout: Duration,
    /// How long the page height may stay unchanged before scrolling stops.
    pub scroll_settle: Duration,
    pub poll_interval: Duration,
    pub max_scroll_rounds: usize,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_size: (1920, 1080),
            timeout: Duration::from_secs(20),
            scroll_settle: Duration::from_secs(5),
            poll_interval: Duration::from_millis(250),
            max_scroll_rounds: 200,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VoyagePriveConfig {
    pub login_url: String,
    pub base_url: String,
    pub credentials: Credentials,
    pub browser: BrowserOptions,
}

impl VoyagePriveConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            login_url: VOYAGE_PRIVE_LOGIN_URL.to_string(),
            base_url: VOYAGE_PRIVE_BASE_URL.to_string(),
            credentials,
            browser: BrowserOptions::default(),
        }
    }
}

/// Parses `key=value`, used for query parameter overrides on the command line.
pub fn parse_key_value(input: &str) -> Result<(String, String)> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", input))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("empty parameter name in '{}'", input));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
