//! Byte fetching for model sources
//!
//! Sources are either http(s) URLs, fetched through a shared `ureq` agent,
//! or local paths (plain or `file://`).

use plinth_core::{PlinthError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRIES: usize = 2;
const RETRY_BASE_DELAY_MS: u64 = 250;

/// Where a source URL points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Remote(String),
    Local(PathBuf),
}

impl SourceLocation {
    pub fn classify(url: &str) -> Self {
        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Remote(url.to_string())
        } else if let Some(path) = url.strip_prefix("file://") {
            Self::Local(PathBuf::from(path))
        } else {
            Self::Local(PathBuf::from(url))
        }
    }

    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Local(p) => Some(p),
            Self::Remote(_) => None,
        }
    }
}

/// Fetches model bytes. Cheap to clone; clones share the HTTP agent.
#[derive(Clone)]
pub struct Fetcher {
    agent: ureq::Agent,
    retries: usize,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
            retries: DEFAULT_RETRIES,
        }
    }

    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    /// Read the full payload behind `url`
    pub fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        match SourceLocation::classify(url) {
            SourceLocation::Local(path) => std::fs::read(&path).map_err(|e| {
                PlinthError::Fetch(format!("Failed to read {}: {}", path.display(), e))
            }),
            SourceLocation::Remote(url) => self.fetch_remote(&url),
        }
    }

    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
        let mut attempt = 0;
        loop {
            match self.agent.get(url).call() {
                Ok(ok) => {
                    let mut reader = ok.into_body().into_reader();
                    let mut bytes = Vec::new();
                    std::io::Read::read_to_end(&mut reader, &mut bytes).map_err(|e| {
                        PlinthError::Fetch(format!("Failed to read body of {}: {}", url, e))
                    })?;
                    log::debug!("Fetched {} bytes from {}", bytes.len(), url);
                    return Ok(bytes);
                }
                Err(e) if attempt < self.retries && is_retryable(&e) => {
                    log::debug!("Retrying {} after error: {}", url, e);
                    std::thread::sleep(Duration::from_millis(
                        RETRY_BASE_DELAY_MS.saturating_mul(1u64 << attempt),
                    ));
                    attempt += 1;
                }
                Err(ureq::Error::StatusCode(code)) => {
                    return Err(PlinthError::Fetch(format!("{} returned HTTP {}", url, code)));
                }
                Err(e) => return Err(PlinthError::Fetch(format!("Failed to fetch {}: {}", url, e))),
            }
        }
    }
}

fn is_retryable(e: &ureq::Error) -> bool {
    match e {
        ureq::Error::Timeout(_) | ureq::Error::Io(_) | ureq::Error::ConnectionFailed => true,
        ureq::Error::StatusCode(code) => matches!(code, 429 | 502 | 503 | 504),
        _ => false,
    }
}
