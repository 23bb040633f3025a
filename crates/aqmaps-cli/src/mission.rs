//! One survey day end to end: load, plan, write.

use crate::loader::Loader;
use crate::output::{marker_counts, write_outputs, WrittenFiles};
use crate::source::DataSource;
use anyhow::{Context, Result};
use aqmaps_core::{Drone, FlightOutcome, FlightRules, FlightSummary, Point, ZoneSet};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{error, info, warn};

/// Year of the twelve reference survey days.
pub const BATCH_YEAR: i32 = 2020;

/// Result of flying one day.
#[derive(Debug, Clone)]
pub struct DayResult {
    pub date: NaiveDate,
    pub summary: FlightSummary,
    pub outcome: FlightOutcome,
    pub files: WrittenFiles,
}

/// Load `date`'s survey, plan the flight from `start` and write both outputs.
pub fn run_day<S: DataSource>(
    loader: &Loader<S>,
    date: NaiveDate,
    start: Point,
    rules: &FlightRules,
    output_dir: &Path,
) -> Result<DayResult> {
    if !rules.confinement.contains(start) {
        warn!(%start, "start point is outside the confinement area");
    }

    let sensors = loader.load_sensors(date)?;
    let zones = loader.load_no_fly_zones()?;
    let zones = ZoneSet::with_confinement(&rules.confinement, zones)
        .context("Failed to build zone set")?;

    let drone = Drone::new(start, &zones, sensors, rules.clone())
        .with_context(|| format!("Failed to prepare flight for {date}"))?;
    let report = drone.plan();
    let summary = report.summary();

    match &report.outcome {
        FlightOutcome::ReturnedToStart => {}
        FlightOutcome::BudgetExhausted => warn!(
            %date,
            missed = summary.sensors_missed,
            "move budget ran out before the survey finished"
        ),
        FlightOutcome::Aborted(err) => warn!(%date, error = %err, "flight stopped early"),
    }

    let files = write_outputs(output_dir, date, &report)?;
    info!(
        %date,
        moves = summary.moves,
        read = summary.sensors_read,
        markers = %marker_counts(&report.sensors),
        "day complete"
    );

    Ok(DayResult {
        date,
        summary,
        outcome: report.outcome,
        files,
    })
}

/// The reference days: 01/01, 02/02, ... 12/12 of [`BATCH_YEAR`].
pub fn batch_dates() -> Vec<NaiveDate> {
    (1..=12)
        .filter_map(|n| NaiveDate::from_ymd_opt(BATCH_YEAR, n, n))
        .collect()
}

/// Fly every day in `dates` in order. A failing day is logged and skipped.
pub fn run_batch<S: DataSource>(
    loader: &Loader<S>,
    dates: &[NaiveDate],
    start: Point,
    rules: &FlightRules,
    output_dir: &Path,
) -> Vec<(NaiveDate, Result<DayResult>)> {
    dates
        .iter()
        .map(|&date| {
            let result = run_day(loader, date, start, rules, output_dir);
            if let Err(err) = &result {
                error!(%date, error = %format!("{err:#}"), "day failed");
            }
            (date, result)
        })
        .collect()
}
