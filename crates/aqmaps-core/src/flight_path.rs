//! Append-only record of the moves a drone makes.

use crate::error::PlanError;
use crate::geometry::{degrees_between, normalize_angle, normalize_heading, quantize, Point};
use serde::Serialize;
use std::fmt;

/// A single move of the drone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStep {
    /// 0-based position in the flight
    pub index: usize,
    pub start: Point,
    /// Heading in degrees, a multiple of the heading quantum in [0, 360)
    pub heading_deg: i32,
    pub end: Point,
    /// Location of the sensor read at the end of this move
    pub sensor: Option<String>,
}

impl fmt::Display for PathStep {
    /// `index,startX,startY,heading,endX,endY,sensor` with an empty last field
    /// when no sensor was read.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{}",
            self.index,
            self.start.x,
            self.start.y,
            self.heading_deg,
            self.end.x,
            self.end.y,
            self.sensor.as_deref().unwrap_or("")
        )
    }
}

/// The flight log: a starting point followed by every move taken.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightPath {
    start: Point,
    steps: Vec<PathStep>,
}

impl FlightPath {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            steps: Vec::new(),
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    /// Where the drone currently is: the last end point, or the start.
    pub fn position(&self) -> Point {
        self.steps.last().map(|step| step.end).unwrap_or(self.start)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Record a move from the current position to `point`.
    pub fn append(&mut self, point: Point) -> &PathStep {
        let start = self.position();
        let bearing = degrees_between(start, point);
        let heading_deg = normalize_heading(quantize(bearing));

        let drift = normalize_angle(bearing - heading_deg as f64);
        debug_assert!(
            drift.min(360.0 - drift) < 1e-6,
            "move {start} -> {point} has bearing {bearing}, not a quantized heading"
        );

        let index = self.steps.len();
        self.steps.push(PathStep {
            index,
            start,
            heading_deg,
            end: point,
            sensor: None,
        });
        &self.steps[index]
    }

    /// Attach a sensor read to the most recent move.
    pub fn attach_visit(&mut self, location: impl Into<String>) -> Result<(), PlanError> {
        let step = self.steps.last_mut().ok_or(PlanError::NoSteps)?;
        step.sensor = Some(location.into());
        Ok(())
    }

    /// Start point followed by every move's end point.
    pub fn polyline(&self) -> Vec<Point> {
        std::iter::once(self.start)
            .chain(self.steps.iter().map(|step| step.end))
            .collect()
    }

    /// One comma-joined line per move, in flight order.
    pub fn step_report(&self) -> Vec<String> {
        self.steps.iter().map(PathStep::to_string).collect()
    }

    /// Locations of the sensors read during the flight, in visit order.
    pub fn visited_sensors(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| step.sensor.as_deref())
    }
}
