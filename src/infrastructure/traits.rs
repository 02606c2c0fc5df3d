//! I/O boundary traits for testability
//!
//! The seed payload is the only thing the outline reads from the outside
//! world. Abstracting it lets the bootstrap be tested without a network.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, ResultExt};

/// Source of the raw sheet JSON.
pub trait SeedSource: Send + Sync {
    /// Fetch the payload body.
    fn fetch(&self) -> ApplicationResult<String>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

/// Blocking HTTP GET against the sheet endpoint.
#[derive(Debug, Clone)]
pub struct HttpSeedSource {
    url: String,
    timeout: Duration,
}

impl HttpSeedSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SeedSource for HttpSeedSource {
    fn fetch(&self) -> ApplicationResult<String> {
        debug!(url = %self.url, timeout = ?self.timeout, "fetching seed");
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .with_context(|| "build http client".to_string())?;

        let response = client
            .get(&self.url)
            .send()
            .with_context(|| format!("GET {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApplicationError::OperationFailed {
                context: format!("GET {}", self.url),
                source: format!("unexpected status {}", status).into(),
            });
        }

        response
            .text()
            .with_context(|| format!("read body of {}", self.url))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the payload from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileSeedSource {
    path: PathBuf,
}

impl FileSeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeedSource for FileSeedSource {
    fn fetch(&self) -> ApplicationResult<String> {
        debug!(path = %self.path.display(), "reading seed file");
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("read seed file: {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fixed in-memory payload.
#[derive(Debug, Clone)]
pub struct StaticSeedSource {
    payload: String,
}

impl StaticSeedSource {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

impl SeedSource for StaticSeedSource {
    fn fetch(&self) -> ApplicationResult<String> {
        Ok(self.payload.clone())
    }

    fn describe(&self) -> String {
        "static payload".to_string()
    }
}
