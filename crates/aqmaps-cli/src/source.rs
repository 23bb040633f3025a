//! Where survey data comes from: the web server or a local mirror of it.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use std::fs;
use std::path::PathBuf;

/// Fetches a resource by its server-relative path, e.g. `buildings/no-fly-zones.geojson`.
pub trait DataSource {
    fn fetch(&self, path: &str) -> Result<String>;

    /// Human-readable origin for log lines.
    fn describe(&self) -> String;
}

/// Blocking HTTP client against the survey web server.
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    /// Create a new HTTP source.
    ///
    /// # Arguments
    /// * `base_url` - Scheme, host and port (e.g., "http://localhost:9898")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl DataSource for HttpSource {
    fn fetch(&self, path: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to request {url}"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("GET {url} returned {status}");
        }

        response
            .text()
            .with_context(|| format!("Failed to read response body from {url}"))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// A directory laid out exactly like the web server.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DataSource for DirectorySource {
    fn fetch(&self, path: &str) -> Result<String> {
        let file = path
            .split('/')
            .fold(self.root.clone(), |acc, part| acc.join(part));
        fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

impl<S: DataSource + ?Sized> DataSource for Box<S> {
    fn fetch(&self, path: &str) -> Result<String> {
        (**self).fetch(path)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
