//! Run configuration from environment.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Scheme and host of the data server, without the port
    pub server_host: String,
    pub server_port: u16,
    /// Local mirror of the server layout; used instead of HTTP when set
    pub data_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "http://localhost".to_string(),
            server_port: 80,
            data_dir: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_host: env::var("AQMAPS_SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: env::var("AQMAPS_SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            data_dir: env::var("AQMAPS_DATA_DIR").ok().map(PathBuf::from),
            output_dir: env::var("AQMAPS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }

    /// Base URL every resource path is appended to.
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.server_host.trim_end_matches('/'), self.server_port)
    }
}
