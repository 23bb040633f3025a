//! Heading selection: straight-line headings and the fly-around search.
//!
//! The navigator never plans more than one move ahead. When the straight line
//! to the destination is blocked it scans the 36 quantized headings for the
//! one closest to the direct bearing that clears the offending zone.

use crate::error::PlanError;
use crate::geometry::{
    angle_between, candidate_headings, degrees_between, normalize_angle, normalize_heading,
    projected_segment, quantize, Point, Segment,
};
use crate::zones::{ExclusionZone, ZoneSet};
use tracing::trace;

/// Chooses legal headings against a fixed zone set.
#[derive(Debug, Clone, Copy)]
pub struct Navigator<'a> {
    zones: &'a ZoneSet,
    step_length: f64,
}

impl<'a> Navigator<'a> {
    pub fn new(zones: &'a ZoneSet, step_length: f64) -> Self {
        Self { zones, step_length }
    }

    /// Heading for the next move from `current` towards `destination`.
    ///
    /// Returns a multiple of the heading quantum in `[0, 360)`. The first zone
    /// (in set order) that blocks the straight line decides the fly-around.
    pub fn best_heading(&self, current: Point, destination: Point) -> Result<i32, PlanError> {
        let direct = angle_between(current, destination);

        // Aim one full step out when the destination is closer than a step,
        // so the blocking test still covers the whole move.
        let aim = if current.distance(destination) < self.step_length {
            current.offset(direct.to_degrees(), self.step_length)
        } else {
            destination
        };

        let naive = Segment::new(current, aim);
        if let Some(zone) = self.zones.first_blocking(&naive) {
            trace!(zone = zone.name(), "straight line blocked");
            return self.best_heading_around(current, aim, zone);
        }

        let heading = normalize_heading(quantize(direct.to_degrees()));

        // Rounding to the quantum can swing the move onto an edge the
        // straight line cleared.
        let step = projected_segment(current, heading as f64, self.step_length);
        if let Some(zone) = self.zones.first_blocking(&step) {
            trace!(zone = zone.name(), heading, "quantized move blocked");
            return self.best_heading_around(current, aim, zone);
        }

        Ok(heading)
    }

    /// Heading closest to the direct bearing that clears `zone`.
    ///
    /// A candidate must clear `zone` over the distance to its farthest vertex
    /// and must keep the next move clear of every zone in the set. Survivors
    /// are ranked by counter-clockwise offset from the direct bearing, so a
    /// blocked left-hand arc sends the drone the long way round.
    pub fn best_heading_around(
        &self,
        current: Point,
        destination: Point,
        zone: &ExclusionZone,
    ) -> Result<i32, PlanError> {
        let direct_deg = degrees_between(current, destination);
        let probe_length = zone.farthest_vertex_distance(current);

        let best = candidate_headings()
            .filter(|&heading| {
                zone.is_legal(&projected_segment(current, heading as f64, probe_length))
            })
            .filter(|&heading| {
                self.zones
                    .is_legal(&projected_segment(current, heading as f64, self.step_length))
            })
            .min_by(|&a, &b| {
                ccw_offset(a, direct_deg)
                    .total_cmp(&ccw_offset(b, direct_deg))
                    .then(a.cmp(&b))
            });

        match best {
            Some(heading) => {
                trace!(zone = zone.name(), direct_deg, heading, "fly-around heading");
                Ok(heading)
            }
            None => Err(PlanError::NoLegalHeading {
                position: current,
                zone: zone.name().to_string(),
            }),
        }
    }
}

/// Counter-clockwise offset of `heading` from `direct_deg`, in `[0, 360)`.
fn ccw_offset(heading: i32, direct_deg: f64) -> f64 {
    normalize_angle(heading as f64 - direct_deg)
}
