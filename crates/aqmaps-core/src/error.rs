//! Errors raised while building a flight or planning it.

use crate::geometry::Point;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// A polygon ring failed validation at zone construction.
    #[error("no-fly zone '{name}' is malformed: {reason}")]
    InvalidZone { name: String, reason: String },

    /// Flight rules that cannot drive a planner (non-positive step, empty area...).
    #[error("invalid flight rules: {0}")]
    InvalidRules(String),

    /// A sensor reached the planner without coordinates.
    #[error("sensor '{location}' has no resolved position")]
    UnresolvedSensor { location: String },

    /// None of the candidate headings clears the blocking zone.
    #[error("no legal heading from {position} around '{zone}'")]
    NoLegalHeading { position: Point, zone: String },

    #[error("cannot record a sensor visit before the first step")]
    NoSteps,
}
