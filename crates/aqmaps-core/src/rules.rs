//! Flight rules and thresholds for the drone.

use crate::error::PlanError;
use crate::geometry::Point;
use crate::zones::ExclusionZone;
use serde::{Deserialize, Serialize};

/// Configuration for a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRules {
    /// Maximum number of moves in one flight
    pub move_budget: u32,
    /// Distance covered by every move, in degrees
    pub step_length: f64,
    /// A sensor is read when the drone ends a move closer than this
    pub sensor_range: f64,
    /// The area the drone must stay inside
    pub confinement: ConfinementArea,
}

impl Default for FlightRules {
    fn default() -> Self {
        Self {
            move_budget: 150,
            step_length: 0.0003,
            sensor_range: 0.0002,
            confinement: ConfinementArea::default(),
        }
    }
}

impl FlightRules {
    /// Validate the rules.
    /// Returns list of validation errors (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.step_length.is_finite() && self.step_length > 0.0) {
            errors.push(format!("step length must be positive, got {}", self.step_length));
        }
        if !(self.sensor_range.is_finite() && self.sensor_range > 0.0) {
            errors.push(format!("sensor range must be positive, got {}", self.sensor_range));
        }
        if self.confinement.west >= self.confinement.east {
            errors.push(format!(
                "confinement west edge ({}) must be less than east edge ({})",
                self.confinement.west, self.confinement.east
            ));
        }
        if self.confinement.south >= self.confinement.north {
            errors.push(format!(
                "confinement south edge ({}) must be less than north edge ({})",
                self.confinement.south, self.confinement.north
            ));
        }

        errors
    }

    pub fn ensure_valid(&self) -> Result<(), PlanError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PlanError::InvalidRules(errors.join("; ")))
        }
    }
}

/// Axis-aligned flight envelope in longitude/latitude degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfinementArea {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Default for ConfinementArea {
    fn default() -> Self {
        // George Square campus, Edinburgh
        Self {
            west: -3.192473,
            south: 55.942617,
            east: -3.184319,
            north: 55.946233,
        }
    }
}

impl ConfinementArea {
    pub const ZONE_NAME: &'static str = "Confinement area";

    /// Closed ring: top-left, bottom-left, bottom-right, top-right, top-left.
    pub fn ring(&self) -> Vec<Point> {
        let top_left = Point::new(self.west, self.north);
        vec![
            top_left,
            Point::new(self.west, self.south),
            Point::new(self.east, self.south),
            Point::new(self.east, self.north),
            top_left,
        ]
    }

    /// Strict interior check; the boundary itself is not flyable.
    pub fn contains(&self, point: Point) -> bool {
        point.x > self.west && point.x < self.east && point.y > self.south && point.y < self.north
    }

    pub fn to_zone(&self) -> Result<ExclusionZone, PlanError> {
        ExclusionZone::new(Self::ZONE_NAME, self.ring())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_are_valid() {
        let rules = FlightRules::default();
        assert!(rules.validate().is_empty());
        assert_eq!(rules.move_budget, 150);
        assert!(rules.ensure_valid().is_ok());
    }

    #[test]
    fn invalid_rules_report_every_problem() {
        let rules = FlightRules {
            step_length: 0.0,
            sensor_range: -1.0,
            confinement: ConfinementArea {
                west: 1.0,
                south: 1.0,
                east: 0.0,
                north: 0.0,
            },
            ..FlightRules::default()
        };
        assert_eq!(rules.validate().len(), 4);
        assert!(matches!(rules.ensure_valid(), Err(PlanError::InvalidRules(_))));
    }

    #[test]
    fn confinement_ring_is_closed_rectangle() {
        let area = ConfinementArea::default();
        let ring = area.ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());

        let zone = area.to_zone().expect("confinement ring should be valid");
        assert_eq!(zone.name(), ConfinementArea::ZONE_NAME);
        assert_eq!(zone.boundaries().len(), 4);
    }

    #[test]
    fn confinement_contains_interior_only() {
        let area = ConfinementArea::default();
        assert!(area.contains(Point::new(-3.1878, 55.9444)));
        assert!(!area.contains(Point::new(-3.1800, 55.9444)));
        assert!(!area.contains(Point::new(area.west, 55.9444)));
    }

    #[test]
    fn rules_parse_from_json() {
        let json = serde_json::json!({
            "move_budget": 20,
            "step_length": 0.0003,
            "sensor_range": 0.0002,
            "confinement": { "west": 0.0, "south": 0.0, "east": 0.01, "north": 0.01 }
        });
        let rules: FlightRules = serde_json::from_value(json).expect("rules should parse");
        assert_eq!(rules.move_budget, 20);
        assert_eq!(rules.confinement.east, 0.01);
    }
}
