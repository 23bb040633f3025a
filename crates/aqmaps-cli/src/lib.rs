//! aqmaps CLI - loading survey data, running flights and writing results.
//!
//! The `aqmaps` binary wraps these modules:
//! - loader/source: sensor lists, what3words details and no-fly zones
//! - mission: one day or the twelve-day batch
//! - output: readings GeoJSON and flight-path log

pub mod config;
pub mod loader;
pub mod mission;
pub mod output;
pub mod source;

pub use config::Config;
pub use loader::Loader;
pub use source::{DataSource, DirectorySource, HttpSource};
