pub mod error;
pub mod flight_path;
pub mod geometry;
pub mod models;
pub mod navigation;
pub mod planner;
pub mod rules;
pub mod zones;

pub use error::PlanError;
pub use flight_path::{FlightPath, PathStep};
pub use geometry::{
    angle_between, candidate_headings, degrees_between, normalize_angle, normalize_heading,
    projected_segment, quantize, segments_intersect, Point, Segment, HEADING_QUANTUM_DEG,
};
pub use models::{Sensor, LOW_BATTERY_THRESHOLD};
pub use navigation::Navigator;
pub use planner::{Drone, FlightOutcome, FlightReport, FlightSummary};
pub use rules::{ConfinementArea, FlightRules};
pub use zones::{validate_ring, ExclusionZone, ZoneSet};
