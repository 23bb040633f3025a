//! Greedy flight planner.
//!
//! Each tick the drone heads for the nearest unread sensor (or back to its
//! start once every sensor is read), takes one fixed-length move along a
//! legal quantized heading, and reads the sensor if the move ends in range.
//! The flight ends when the drone is home with nothing left to read, when
//! the move budget runs out, or when no legal heading exists.

use crate::error::PlanError;
use crate::flight_path::FlightPath;
use crate::geometry::Point;
use crate::models::Sensor;
use crate::navigation::Navigator;
use crate::rules::FlightRules;
use crate::zones::ZoneSet;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// How a flight ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FlightOutcome {
    /// Every sensor was read and the drone is back within range of its start.
    ReturnedToStart,
    /// The move budget ran out first; some sensors may be unread.
    BudgetExhausted,
    /// Planning stopped before taking an illegal move.
    Aborted(PlanError),
}

impl FlightOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, FlightOutcome::ReturnedToStart)
    }
}

/// Everything a finished flight produced.
#[derive(Debug, Clone)]
pub struct FlightReport {
    pub path: FlightPath,
    /// Sensors in input order, with `visited` set for those read
    pub sensors: Vec<Sensor>,
    pub outcome: FlightOutcome,
}

impl FlightReport {
    pub fn unvisited(&self) -> impl Iterator<Item = &Sensor> {
        self.sensors.iter().filter(|sensor| !sensor.visited)
    }

    pub fn visited_count(&self) -> usize {
        self.sensors.iter().filter(|sensor| sensor.visited).count()
    }

    pub fn summary(&self) -> FlightSummary {
        FlightSummary {
            moves: self.path.len(),
            sensors_read: self.visited_count(),
            sensors_missed: self.sensors.len() - self.visited_count(),
            returned_to_start: self.outcome.is_complete(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlightSummary {
    pub moves: usize,
    pub sensors_read: usize,
    pub sensors_missed: usize,
    pub returned_to_start: bool,
}

/// The drone: position, remaining moves and the sensors still to read.
#[derive(Debug)]
pub struct Drone<'a> {
    navigator: Navigator<'a>,
    rules: FlightRules,
    start: Point,
    position: Point,
    moves_left: u32,
    sensors: Vec<Sensor>,
    /// Resolved position of `sensors[i]`
    targets: Vec<Point>,
    /// Indices into `sensors` not yet read, in input order
    unvisited: BTreeSet<usize>,
}

impl<'a> Drone<'a> {
    /// Create a drone at `start`.
    ///
    /// Fails if the rules are invalid or any sensor lacks coordinates.
    /// Sensors already marked visited are not flown to again.
    pub fn new(
        start: Point,
        zones: &'a ZoneSet,
        sensors: Vec<Sensor>,
        rules: FlightRules,
    ) -> Result<Self, PlanError> {
        rules.ensure_valid()?;

        let targets = sensors
            .iter()
            .map(|sensor| {
                sensor.position.ok_or_else(|| PlanError::UnresolvedSensor {
                    location: sensor.location.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let unvisited = sensors
            .iter()
            .enumerate()
            .filter(|(_, sensor)| !sensor.visited)
            .map(|(idx, _)| idx)
            .collect();

        Ok(Self {
            navigator: Navigator::new(zones, rules.step_length),
            moves_left: rules.move_budget,
            rules,
            start,
            position: start,
            sensors,
            targets,
            unvisited,
        })
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    /// Number of sensors still to read.
    pub fn remaining(&self) -> usize {
        self.unvisited.len()
    }

    /// Fly until done and hand back the flight log.
    pub fn plan(mut self) -> FlightReport {
        let mut path = FlightPath::new(self.start);
        info!(
            start = %self.start,
            sensors = self.unvisited.len(),
            budget = self.moves_left,
            "planning flight"
        );

        let outcome = if self.moves_left == 0 {
            FlightOutcome::BudgetExhausted
        } else {
            loop {
                match self.tick(&mut path) {
                    Ok(Some(outcome)) => break outcome,
                    Ok(None) => continue,
                    Err(err) => {
                        warn!(error = %err, moves = path.len(), "flight aborted");
                        break FlightOutcome::Aborted(err);
                    }
                }
            }
        };

        info!(
            moves = path.len(),
            unread = self.unvisited.len(),
            outcome = ?outcome,
            "flight planned"
        );

        FlightReport {
            path,
            sensors: self.sensors,
            outcome,
        }
    }

    /// One move. Returns the outcome once the flight is over.
    fn tick(&mut self, path: &mut FlightPath) -> Result<Option<FlightOutcome>, PlanError> {
        let target = self.closest_sensor();
        let destination = match target {
            Some(idx) => self.targets[idx],
            None => self.start,
        };

        let heading = self.navigator.best_heading(self.position, destination)?;
        self.position = self.position.offset(heading as f64, self.rules.step_length);
        path.append(self.position);
        debug!(
            step = path.len() - 1,
            heading,
            position = %self.position,
            "move"
        );

        if let Some(idx) = target {
            if self.position.distance(self.targets[idx]) < self.rules.sensor_range {
                let sensor = &mut self.sensors[idx];
                sensor.visit();
                self.unvisited.remove(&idx);
                path.attach_visit(sensor.location.clone())?;
                debug!(location = %sensor.location, remaining = self.unvisited.len(), "sensor read");
            }
        }

        self.moves_left -= 1;

        if self.unvisited.is_empty()
            && self.position.distance(self.start) < self.rules.sensor_range
        {
            return Ok(Some(FlightOutcome::ReturnedToStart));
        }
        if self.moves_left == 0 {
            return Ok(Some(FlightOutcome::BudgetExhausted));
        }
        Ok(None)
    }

    /// Nearest unread sensor; ties go to the earliest in input order.
    fn closest_sensor(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &idx in &self.unvisited {
            let distance = self.position.distance(self.targets[idx]);
            match best {
                Some((_, closest)) if distance >= closest => {}
                _ => best = Some((idx, distance)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}
