//! Core data models for the air-quality survey.

use crate::geometry::Point;
use serde::{Deserialize, Deserializer, Serialize};

/// Sensors at or below this battery percentage report unreliable readings.
pub const LOW_BATTERY_THRESHOLD: f64 = 10.0;

/// An air-quality sensor the drone has to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// What3words location, e.g. "slips.mass.baking"
    pub location: String,
    /// Battery charge in percent
    pub battery: f64,
    /// Pollution reading; `None` when the sensor reported "null" or "NaN"
    #[serde(default, deserialize_with = "deserialize_reading")]
    pub reading: Option<f64>,
    /// Coordinates resolved from the location by the loader
    #[serde(default)]
    pub position: Option<Point>,
    #[serde(default)]
    pub visited: bool,
}

impl Sensor {
    /// Create an unresolved, unvisited sensor.
    pub fn new(location: impl Into<String>, battery: f64, reading: Option<f64>) -> Self {
        Self {
            location: location.into(),
            battery,
            reading,
            position: None,
            visited: false,
        }
    }

    /// Set the resolved coordinates.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn is_low_battery(&self) -> bool {
        self.battery <= LOW_BATTERY_THRESHOLD
    }

    /// Mark the sensor as read.
    pub fn visit(&mut self) {
        self.visited = true;
    }
}

/// Readings arrive as strings ("123.45", "null", "NaN"), occasionally as numbers.
fn deserialize_reading<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawReading {
        Number(f64),
        Text(String),
    }

    let raw = Option::<RawReading>::deserialize(deserializer)?;
    let value = match raw {
        Some(RawReading::Number(value)) => Some(value),
        Some(RawReading::Text(text)) => text.trim().parse::<f64>().ok(),
        None => None,
    };
    Ok(value.filter(|value| value.is_finite()))
}
