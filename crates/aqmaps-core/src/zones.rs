//! No-fly zones and the zone set the planner checks moves against.

use crate::error::PlanError;
use crate::geometry::{Point, Segment};
use crate::rules::ConfinementArea;

/// One polygonal obstacle, stored as its boundary edges.
///
/// The confinement area is an `ExclusionZone` too: crossing its edges is
/// illegal in exactly the same way as crossing a building's edges.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionZone {
    name: String,
    vertices: Vec<Point>,
    boundaries: Vec<Segment>,
}

impl ExclusionZone {
    /// Build a zone from a closed ring (first point == last point).
    pub fn new(name: impl Into<String>, ring: Vec<Point>) -> Result<Self, PlanError> {
        let name = name.into();
        let errors = validate_ring(&ring);
        if !errors.is_empty() {
            return Err(PlanError::InvalidZone {
                name,
                reason: errors.join("; "),
            });
        }

        let boundaries = ring
            .windows(2)
            .map(|pair| Segment::new(pair[0], pair[1]))
            .collect();

        Ok(Self {
            name,
            vertices: ring,
            boundaries,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The closed ring, including the repeated first vertex.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn boundaries(&self) -> &[Segment] {
        &self.boundaries
    }

    /// True if `movement` touches none of this zone's edges.
    pub fn is_legal(&self, movement: &Segment) -> bool {
        !self
            .boundaries
            .iter()
            .any(|boundary| boundary.intersects(movement))
    }

    /// Distance from `from` to the zone's farthest vertex.
    pub fn farthest_vertex_distance(&self, from: Point) -> f64 {
        self.vertices
            .iter()
            .map(|vertex| from.distance(*vertex))
            .fold(0.0, f64::max)
    }
}

/// Validate a polygon ring.
/// Returns list of validation errors (empty = valid).
pub fn validate_ring(ring: &[Point]) -> Vec<String> {
    let mut errors = Vec::new();

    if ring.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        errors.push("ring contains non-finite coordinates".to_string());
    }

    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 => {
            if first != last {
                errors.push("ring must be closed (first vertex must equal last)".to_string());
            }
        }
        _ => errors.push("ring must have at least 4 points".to_string()),
    }

    let open = &ring[..ring.len().saturating_sub(1)];
    let mut distinct: Vec<Point> = Vec::with_capacity(open.len());
    for point in open {
        if !distinct.contains(point) {
            distinct.push(*point);
        }
    }
    if distinct.len() < 3 {
        errors.push(format!(
            "ring must have at least 3 distinct vertices, got {}",
            distinct.len()
        ));
    }

    errors
}

/// Every zone the drone must not cross, confinement area first.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSet {
    zones: Vec<ExclusionZone>,
}

impl ZoneSet {
    /// Zones are kept in insertion order after the confinement boundary.
    pub fn new(confinement: ExclusionZone, zones: impl IntoIterator<Item = ExclusionZone>) -> Self {
        let mut all = vec![confinement];
        all.extend(zones);
        Self { zones: all }
    }

    /// Zone set bounded by `area`.
    pub fn with_confinement(
        area: &ConfinementArea,
        zones: impl IntoIterator<Item = ExclusionZone>,
    ) -> Result<Self, PlanError> {
        Ok(Self::new(area.to_zone()?, zones))
    }

    pub fn zones(&self) -> &[ExclusionZone] {
        &self.zones
    }

    pub fn confinement(&self) -> &ExclusionZone {
        &self.zones[0]
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// True if `movement` is legal against every zone.
    pub fn is_legal(&self, movement: &Segment) -> bool {
        self.zones.iter().all(|zone| zone.is_legal(movement))
    }

    /// The first zone, in set order, that `movement` would cross.
    pub fn first_blocking(&self, movement: &Segment) -> Option<&ExclusionZone> {
        self.zones.iter().find(|zone| !zone.is_legal(movement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::projected_segment;

    fn square(name: &str, x0: f64, y0: f64, side: f64) -> ExclusionZone {
        ExclusionZone::new(
            name,
            vec![
                Point::new(x0, y0 + side),
                Point::new(x0, y0),
                Point::new(x0 + side, y0),
                Point::new(x0 + side, y0 + side),
                Point::new(x0, y0 + side),
            ],
        )
        .expect("square ring should be valid")
    }

    fn test_area() -> ConfinementArea {
        ConfinementArea {
            west: 0.0,
            south: 0.0,
            east: 0.01,
            north: 0.01,
        }
    }

    #[test]
    fn boundary_count_is_ring_length_minus_one() {
        let zone = square("Library", 0.004, 0.004, 0.001);
        assert_eq!(zone.vertices().len(), 5);
        assert_eq!(zone.boundaries().len(), 4);
    }

    #[test]
    fn unclosed_ring_is_rejected() {
        let err = ExclusionZone::new(
            "Open",
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 1.0),
            ],
        )
        .unwrap_err();
        match err {
            PlanError::InvalidZone { name, reason } => {
                assert_eq!(name, "Open");
                assert!(reason.contains("closed"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn degenerate_ring_is_rejected() {
        let result = ExclusionZone::new(
            "Sliver",
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(0.0, 0.0),
            ],
        );
        assert!(matches!(result, Err(PlanError::InvalidZone { .. })));
        assert!(!validate_ring(&[]).is_empty());
    }

    #[test]
    fn move_across_edge_is_illegal() {
        let zone = square("Library", 0.004, 0.004, 0.001);
        let crossing = Segment::new(Point::new(0.003, 0.0045), Point::new(0.0042, 0.0045));
        let clear = Segment::new(Point::new(0.003, 0.0035), Point::new(0.006, 0.0035));
        assert!(!zone.is_legal(&crossing));
        assert!(zone.is_legal(&clear));
    }

    #[test]
    fn grazing_a_corner_is_illegal() {
        let zone = square("Library", 0.004, 0.004, 0.001);
        let grazing = Segment::new(Point::new(0.003, 0.003), Point::new(0.004, 0.004));
        assert!(!zone.is_legal(&grazing));
    }

    #[test]
    fn farthest_vertex_distance_picks_opposite_corner() {
        let zone = square("Library", 0.004, 0.004, 0.001);
        let from = Point::new(0.003, 0.0045);
        let expected = from.distance(Point::new(0.005, 0.005));
        assert!((zone.farthest_vertex_distance(from) - expected).abs() < 1e-15);
    }

    #[test]
    fn zone_set_keeps_confinement_first_and_input_order() {
        let set = ZoneSet::with_confinement(
            &test_area(),
            vec![
                square("A", 0.002, 0.002, 0.001),
                square("B", 0.006, 0.006, 0.001),
            ],
        )
        .expect("zone set should build");
        let names: Vec<&str> = set.zones().iter().map(|zone| zone.name()).collect();
        assert_eq!(names, vec![ConfinementArea::ZONE_NAME, "A", "B"]);
        assert_eq!(set.confinement().name(), ConfinementArea::ZONE_NAME);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn leaving_confinement_is_illegal() {
        let set = ZoneSet::with_confinement(&test_area(), Vec::new()).unwrap();
        let inside = projected_segment(Point::new(0.005, 0.005), 0.0, 0.0003);
        let outward = projected_segment(Point::new(0.0099, 0.005), 0.0, 0.0003);
        assert!(set.is_legal(&inside));
        assert!(!set.is_legal(&outward));
        assert_eq!(
            set.first_blocking(&outward).map(|zone| zone.name()),
            Some(ConfinementArea::ZONE_NAME)
        );
    }

    #[test]
    fn first_blocking_follows_set_order() {
        let set = ZoneSet::with_confinement(
            &test_area(),
            vec![
                square("Near", 0.003, 0.0045, 0.001),
                square("Far", 0.006, 0.0045, 0.001),
            ],
        )
        .unwrap();
        let long_move = Segment::new(Point::new(0.001, 0.005), Point::new(0.009, 0.005));
        assert!(!set.is_legal(&long_move));
        assert_eq!(set.first_blocking(&long_move).map(|z| z.name()), Some("Near"));
    }
}
