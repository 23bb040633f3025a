//! Planar geometry for flight planning.
//!
//! Coordinates are longitude/latitude degrees treated as a flat plane. At the
//! scale of a single campus the distortion does not change any planning
//! decision, so headings are measured counter-clockwise from east (0 = east,
//! 90 = north) exactly as `atan2` reports them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Angular step every flown heading is rounded to, in degrees.
pub const HEADING_QUANTUM_DEG: i32 = 10;

/// A planar position (x = longitude, y = latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in coordinate units.
    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point `length` units away along `heading_deg`.
    pub fn offset(&self, heading_deg: f64, length: f64) -> Point {
        let radians = heading_deg.to_radians();
        Point {
            x: self.x + length * radians.cos(),
            y: self.y + length * radians.sin(),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An ordered pair of points: a candidate move or a zone boundary edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Closed intersection test: touching or overlapping counts.
    pub fn intersects(&self, other: &Segment) -> bool {
        segments_intersect(self, other)
    }
}

/// Bearing from `a` to `b` in radians, in `[0, 2π)`.
pub fn angle_between(a: Point, b: Point) -> f64 {
    let angle = (b.y - a.y).atan2(b.x - a.x);
    if angle >= 0.0 {
        angle
    } else {
        angle + 2.0 * std::f64::consts::PI
    }
}

/// Bearing from `a` to `b` in degrees, in `[0, 360)`.
pub fn degrees_between(a: Point, b: Point) -> f64 {
    angle_between(a, b).to_degrees()
}

/// Round a heading to the nearest multiple of [`HEADING_QUANTUM_DEG`].
///
/// The result is not wrapped, so 356° quantizes to 360; use
/// [`normalize_heading`] to bring it back into `[0, 360)`.
pub fn quantize(degrees: f64) -> i32 {
    let quantum = HEADING_QUANTUM_DEG as f64;
    (degrees / quantum).round() as i32 * HEADING_QUANTUM_DEG
}

/// Wrap an angle into `[0, 360)`.
pub fn normalize_angle(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an integer heading into `[0, 360)`.
pub fn normalize_heading(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

/// The segment from `start` running `length` units along `heading_deg`.
pub fn projected_segment(start: Point, heading_deg: f64, length: f64) -> Segment {
    Segment::new(start, start.offset(heading_deg, length))
}

/// All headings the drone may fly, in ascending order: 0, 10, ..., 350.
pub fn candidate_headings() -> impl Iterator<Item = i32> {
    (0..360).step_by(HEADING_QUANTUM_DEG as usize)
}

/// Orientation/straddle intersection test for two segments.
///
/// Endpoints touching the other segment and collinear overlaps both count
/// as intersections, so a move that grazes a zone corner is rejected.
pub fn segments_intersect(a: &Segment, b: &Segment) -> bool {
    // Coordinates are degrees and steps are ~3e-4, so orientation values are
    // ~1e-8 for real crossings; these tolerances only absorb rounding noise.
    const ORIENT_EPS: f64 = 1e-18;
    const COORD_EPS: f64 = 1e-12;

    fn orient(p: Point, q: Point, r: Point) -> f64 {
        (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
    }

    fn within(a: f64, b: f64, value: f64) -> bool {
        let min = a.min(b) - COORD_EPS;
        let max = a.max(b) + COORD_EPS;
        value >= min && value <= max
    }

    fn on_segment(p: Point, q: Point, r: Point) -> bool {
        within(p.x, q.x, r.x) && within(p.y, q.y, r.y)
    }

    let (a1, a2) = (a.start, a.end);
    let (b1, b2) = (b.start, b.end);

    let o1 = orient(a1, a2, b1);
    let o2 = orient(a1, a2, b2);
    let o3 = orient(b1, b2, a1);
    let o4 = orient(b1, b2, a2);

    if o1.abs() <= ORIENT_EPS && on_segment(a1, a2, b1) {
        return true;
    }
    if o2.abs() <= ORIENT_EPS && on_segment(a1, a2, b2) {
        return true;
    }
    if o3.abs() <= ORIENT_EPS && on_segment(b1, b2, a1) {
        return true;
    }
    if o4.abs() <= ORIENT_EPS && on_segment(b1, b2, a2) {
        return true;
    }

    let a_crosses = (o1 > ORIENT_EPS && o2 < -ORIENT_EPS) || (o1 < -ORIENT_EPS && o2 > ORIENT_EPS);
    let b_crosses = (o3 > ORIENT_EPS && o4 < -ORIENT_EPS) || (o3 < -ORIENT_EPS && o4 > ORIENT_EPS);
    a_crosses && b_crosses
}
