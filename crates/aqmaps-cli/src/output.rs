//! Renders a planned flight: the readings map and the flight-path log.

use anyhow::{Context, Result};
use aqmaps_core::{FlightPath, FlightReport, Sensor};
use chrono::NaiveDate;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const NOT_VISITED_COLOUR: &str = "#aaaaaa";
const NO_DATA_COLOUR: &str = "#000000";
const NO_DATA_SYMBOL: &str = "cross";

/// Colour and symbol per 32-unit reading band, lowest first.
const READING_BANDS: [(&str, &str); 8] = [
    ("#00ff00", "lighthouse"),
    ("#40ff00", "lighthouse"),
    ("#80ff00", "lighthouse"),
    ("#c0ff00", "lighthouse"),
    ("#ffc000", "danger"),
    ("#ff8000", "danger"),
    ("#ff4000", "danger"),
    ("#ff0000", "danger"),
];
const BAND_WIDTH: f64 = 32.0;

/// How a sensor is drawn on the readings map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub colour: &'static str,
    pub symbol: Option<&'static str>,
}

pub fn marker_for(sensor: &Sensor) -> Marker {
    if !sensor.visited {
        return Marker {
            colour: NOT_VISITED_COLOUR,
            symbol: None,
        };
    }

    match sensor.reading {
        Some(reading) if !sensor.is_low_battery() => {
            // Out-of-range readings take the nearest band.
            let band = (reading / BAND_WIDTH).floor().clamp(0.0, 7.0) as usize;
            let (colour, symbol) = READING_BANDS[band];
            Marker {
                colour,
                symbol: Some(symbol),
            }
        }
        _ => Marker {
            colour: NO_DATA_COLOUR,
            symbol: Some(NO_DATA_SYMBOL),
        },
    }
}

fn sensor_feature(sensor: &Sensor) -> Option<Feature> {
    let position = sensor.position?;
    let marker = marker_for(sensor);

    let mut feature = Feature::from(Geometry::new(Value::Point(vec![position.x, position.y])));
    feature.set_property("location", sensor.location.as_str());
    feature.set_property("rgb-string", marker.colour);
    feature.set_property("marker-color", marker.colour);
    if let Some(symbol) = marker.symbol {
        feature.set_property("marker-symbol", symbol);
    }
    Some(feature)
}

/// The flight line followed by one marker per sensor, in input order.
pub fn readings_geojson(path: &FlightPath, sensors: &[Sensor]) -> FeatureCollection {
    let line = path
        .polyline()
        .into_iter()
        .map(|point| vec![point.x, point.y])
        .collect();

    let features = std::iter::once(Feature::from(Geometry::new(Value::LineString(line))))
        .chain(sensors.iter().filter_map(sensor_feature))
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// One step report line per move.
pub fn flight_path_text(path: &FlightPath) -> String {
    let mut text = path.step_report().join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

pub fn readings_file_name(date: NaiveDate) -> String {
    format!("readings-{}.geojson", date.format("%d-%m-%Y"))
}

pub fn flight_path_file_name(date: NaiveDate) -> String {
    format!("flightpath-{}.txt", date.format("%d-%m-%Y"))
}

/// Files written for one flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub readings: PathBuf,
    pub flight_path: PathBuf,
}

/// Write both output files for `date` into `dir`, creating it if needed.
pub fn write_outputs(dir: &Path, date: NaiveDate, report: &FlightReport) -> Result<WrittenFiles> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let readings = dir.join(readings_file_name(date));
    let collection = readings_geojson(&report.path, &report.sensors);
    let body = serde_json::to_string_pretty(&collection).context("Failed to serialize readings")?;
    fs::write(&readings, body).with_context(|| format!("Failed to write {}", readings.display()))?;

    let flight_path = dir.join(flight_path_file_name(date));
    fs::write(&flight_path, flight_path_text(&report.path))
        .with_context(|| format!("Failed to write {}", flight_path.display()))?;

    info!(
        readings = %readings.display(),
        flight_path = %flight_path.display(),
        "wrote flight outputs"
    );
    Ok(WrittenFiles {
        readings,
        flight_path,
    })
}

/// Marker summary for a report, usable in log lines and JSON output.
pub fn marker_counts(sensors: &[Sensor]) -> serde_json::Value {
    let mut counts = serde_json::Map::new();
    for sensor in sensors {
        let colour = marker_for(sensor).colour;
        let entry = counts.entry(colour.to_string()).or_insert(json!(0));
        *entry = json!(entry.as_u64().unwrap_or(0) + 1);
    }
    serde_json::Value::Object(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqmaps_core::Point;

    fn visited(battery: f64, reading: Option<f64>) -> Sensor {
        let mut sensor = Sensor::new("a.b.c", battery, reading).with_position(Point::new(1.0, 2.0));
        sensor.visit();
        sensor
    }

    #[test]
    fn unvisited_sensor_is_grey_without_symbol() {
        let sensor = Sensor::new("a.b.c", 90.0, Some(50.0)).with_position(Point::new(1.0, 2.0));
        assert_eq!(
            marker_for(&sensor),
            Marker {
                colour: "#aaaaaa",
                symbol: None
            }
        );
    }

    #[test]
    fn low_battery_or_missing_reading_is_a_black_cross() {
        let expected = Marker {
            colour: "#000000",
            symbol: Some("cross"),
        };
        assert_eq!(marker_for(&visited(10.0, Some(50.0))), expected);
        assert_eq!(marker_for(&visited(80.0, None)), expected);
    }

    #[test]
    fn readings_map_to_bands() {
        let cases = [
            (0.0, "#00ff00", "lighthouse"),
            (31.99, "#00ff00", "lighthouse"),
            (32.0, "#40ff00", "lighthouse"),
            (100.0, "#c0ff00", "lighthouse"),
            (128.0, "#ffc000", "danger"),
            (191.5, "#ff8000", "danger"),
            (223.0, "#ff4000", "danger"),
            (255.9, "#ff0000", "danger"),
            (300.0, "#ff0000", "danger"),
        ];
        for (reading, colour, symbol) in cases {
            let marker = marker_for(&visited(50.0, Some(reading)));
            assert_eq!(marker.colour, colour, "reading {reading}");
            assert_eq!(marker.symbol, Some(symbol), "reading {reading}");
        }
    }

    #[test]
    fn readings_collection_starts_with_flight_line() {
        let mut path = FlightPath::new(Point::new(0.0, 0.0));
        path.append(Point::new(0.0003, 0.0));
        let sensors = vec![visited(50.0, Some(40.0))];

        let collection = readings_geojson(&path, &sensors);
        assert_eq!(collection.features.len(), 2);

        let line = collection.features[0].geometry.as_ref().unwrap();
        assert_eq!(
            line.value,
            Value::LineString(vec![vec![0.0, 0.0], vec![0.0003, 0.0]])
        );

        let marker = &collection.features[1];
        assert_eq!(marker.property("location"), Some(&json!("a.b.c")));
        assert_eq!(marker.property("marker-color"), Some(&json!("#40ff00")));
        assert_eq!(marker.property("rgb-string"), Some(&json!("#40ff00")));
        assert_eq!(marker.property("marker-symbol"), Some(&json!("lighthouse")));
    }

    #[test]
    fn file_names_use_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        assert_eq!(readings_file_name(date), "readings-02-01-2020.geojson");
        assert_eq!(flight_path_file_name(date), "flightpath-02-01-2020.txt");
    }

    #[test]
    fn flight_path_text_has_one_line_per_step() {
        let mut path = FlightPath::new(Point::new(1.5, 2.5));
        assert_eq!(flight_path_text(&path), "");
        path.append(Point::new(2.5, 2.5));
        assert_eq!(flight_path_text(&path), "0,1.5,2.5,0,2.5,2.5,\n");
    }

    #[test]
    fn marker_counts_group_by_colour() {
        let sensors = vec![
            visited(50.0, Some(40.0)),
            visited(50.0, Some(41.0)),
            visited(5.0, Some(41.0)),
        ];
        assert_eq!(
            marker_counts(&sensors),
            json!({"#40ff00": 2, "#000000": 1})
        );
    }
}
