//! Loads a day's sensors, their coordinates and the no-fly zones.

use crate::source::DataSource;
use anyhow::{anyhow, bail, Context, Result};
use aqmaps_core::{ExclusionZone, Point, Sensor};
use chrono::{Datelike, NaiveDate};
use geojson::{FeatureCollection, GeoJson, Value};
use serde::Deserialize;
use tracing::{debug, info};

pub const NO_FLY_ZONES_PATH: &str = "buildings/no-fly-zones.geojson";

/// Server path of the sensor list for `date`.
pub fn day_data_path(date: NaiveDate) -> String {
    format!(
        "maps/{:04}/{:02}/{:02}/air-quality-data.json",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Server path of the details for a what3words location ("a.b.c" -> "words/a/b/c/details.json").
pub fn details_path(location: &str) -> String {
    format!("words/{}/details.json", location.replace('.', "/"))
}

pub fn parse_sensor_list(json: &str) -> Result<Vec<Sensor>> {
    serde_json::from_str(json).context("Failed to parse sensor list")
}

#[derive(Debug, Deserialize)]
struct LocationDetails {
    coordinates: Coordinates,
}

#[derive(Debug, Deserialize)]
struct Coordinates {
    lng: f64,
    lat: f64,
}

/// Coordinates from a what3words details document.
pub fn parse_details(json: &str) -> Result<Point> {
    let details: LocationDetails =
        serde_json::from_str(json).context("Failed to parse location details")?;
    Ok(Point::new(details.coordinates.lng, details.coordinates.lat))
}

/// No-fly zones from a GeoJSON FeatureCollection of named polygons.
///
/// Only the outer ring of each polygon is used. Any other geometry is an error.
pub fn parse_no_fly_zones(text: &str) -> Result<Vec<ExclusionZone>> {
    let geojson = text
        .parse::<GeoJson>()
        .context("Failed to parse no-fly zones GeoJSON")?;
    let collection =
        FeatureCollection::try_from(geojson).context("No-fly zones must be a FeatureCollection")?;

    collection
        .features
        .iter()
        .enumerate()
        .map(|(idx, feature)| {
            let name = feature
                .property("name")
                .and_then(|value| value.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("zone-{idx}"));

            let geometry = feature
                .geometry
                .as_ref()
                .ok_or_else(|| anyhow!("no-fly zone '{name}' has no geometry"))?;

            let ring = match &geometry.value {
                Value::Polygon(rings) => rings
                    .first()
                    .ok_or_else(|| anyhow!("no-fly zone '{name}' has an empty polygon"))?,
                other => bail!(
                    "no-fly zone '{name}' is a {}, expected a Polygon",
                    geometry_kind(other)
                ),
            };

            let points = ring
                .iter()
                .map(|position| match position.as_slice() {
                    [lng, lat, ..] => Ok(Point::new(*lng, *lat)),
                    _ => Err(anyhow!("no-fly zone '{name}' has a position without two coordinates")),
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(ExclusionZone::new(name, points)?)
        })
        .collect()
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Reads survey inputs from a [`DataSource`].
pub struct Loader<S> {
    source: S,
}

impl<S: DataSource> Loader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The day's sensors with their coordinates resolved, in file order.
    pub fn load_sensors(&self, date: NaiveDate) -> Result<Vec<Sensor>> {
        let path = day_data_path(date);
        let text = self
            .source
            .fetch(&path)
            .with_context(|| format!("Failed to load sensor list for {date}"))?;
        let sensors = parse_sensor_list(&text).with_context(|| format!("in {path}"))?;

        let resolved = sensors
            .into_iter()
            .map(|sensor| {
                let position = self.resolve_position(&sensor.location)?;
                Ok(sensor.with_position(position))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(%date, sensors = resolved.len(), source = %self.source.describe(), "loaded sensors");
        Ok(resolved)
    }

    pub fn resolve_position(&self, location: &str) -> Result<Point> {
        let path = details_path(location);
        let text = self
            .source
            .fetch(&path)
            .with_context(|| format!("Failed to load details for '{location}'"))?;
        let point = parse_details(&text).with_context(|| format!("in {path}"))?;
        debug!(location, %point, "resolved sensor");
        Ok(point)
    }

    pub fn load_no_fly_zones(&self) -> Result<Vec<ExclusionZone>> {
        let text = self
            .source
            .fetch(NO_FLY_ZONES_PATH)
            .context("Failed to load no-fly zones")?;
        let zones = parse_no_fly_zones(&text).with_context(|| format!("in {NO_FLY_ZONES_PATH}"))?;
        info!(zones = zones.len(), "loaded no-fly zones");
        Ok(zones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_server_layout() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 7).unwrap();
        assert_eq!(day_data_path(date), "maps/2020/03/07/air-quality-data.json");
        assert_eq!(
            details_path("slips.mass.baking"),
            "words/slips/mass/baking/details.json"
        );
    }

    #[test]
    fn details_give_lng_lat_point() {
        let json = r#"{
            "country": "GB",
            "square": {"southwest": {"lng": -3.1, "lat": 55.9}, "northeast": {"lng": -3.0, "lat": 56.0}},
            "nearestPlace": "Edinburgh",
            "coordinates": {"lng": -3.186874, "lat": 55.944494},
            "words": "slips.mass.baking"
        }"#;
        assert_eq!(parse_details(json).unwrap(), Point::new(-3.186874, 55.944494));
    }

    #[test]
    fn no_fly_zones_use_name_and_outer_ring() {
        let text = r##"{
          "type": "FeatureCollection",
          "features": [
            {
              "type": "Feature",
              "properties": {"name": "Appleton Tower", "fill": "#ff0000"},
              "geometry": {"type": "Polygon", "coordinates": [[
                [-3.1867, 55.9446], [-3.1867, 55.9444], [-3.1863, 55.9444],
                [-3.1863, 55.9446], [-3.1867, 55.9446]
              ]]}
            },
            {
              "type": "Feature",
              "properties": {},
              "geometry": {"type": "Polygon", "coordinates": [[
                [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]
              ]]}
            }
          ]
        }"##;
        let zones = parse_no_fly_zones(text).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].name(), "Appleton Tower");
        assert_eq!(zones[0].boundaries().len(), 4);
        assert_eq!(zones[1].name(), "zone-1");
    }

    #[test]
    fn non_polygon_zone_is_rejected() {
        let text = r#"{
          "type": "FeatureCollection",
          "features": [
            {
              "type": "Feature",
              "properties": {"name": "Lamp post"},
              "geometry": {"type": "Point", "coordinates": [-3.19, 55.94]}
            }
          ]
        }"#;
        let err = parse_no_fly_zones(text).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Lamp post"), "{message}");
        assert!(message.contains("Point"), "{message}");
    }

    #[test]
    fn open_ring_is_rejected() {
        let text = r#"{
          "type": "FeatureCollection",
          "features": [
            {
              "type": "Feature",
              "properties": {"name": "Open"},
              "geometry": {"type": "Polygon", "coordinates": [[
                [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]
              ]]}
            }
          ]
        }"#;
        assert!(parse_no_fly_zones(text).is_err());
    }
}
