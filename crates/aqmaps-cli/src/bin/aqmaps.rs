//! Plan air-quality survey flights over the campus.
//!
//! Loads the day's sensors and no-fly zones from the survey web server (or a
//! local mirror of it), plans the drone's flight and writes the readings map
//! and flight-path log.

use anyhow::{bail, Context, Result};
use aqmaps_cli::mission::{batch_dates, run_batch, run_day};
use aqmaps_cli::{Config, DataSource, DirectorySource, HttpSource, Loader};
use aqmaps_core::{FlightRules, Point};
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Air-quality drone flight planner
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Survey server host, including scheme [env: AQMAPS_SERVER_HOST]
    #[arg(long, global = true)]
    server: Option<String>,

    /// Survey server port [env: AQMAPS_SERVER_PORT]
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Read data from this directory instead of the server [env: AQMAPS_DATA_DIR]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Where output files are written [env: AQMAPS_OUTPUT_DIR]
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan the flight for one day
    Fly {
        /// Day of month
        day: u32,
        /// Month
        month: u32,
        /// Year
        year: i32,

        #[command(flatten)]
        start: StartArgs,
    },
    /// Plan the twelve reference days (01/01/2020 to 12/12/2020)
    Batch {
        #[command(flatten)]
        start: StartArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct StartArgs {
    /// Start latitude (default: George Square)
    #[arg(long, default_value_t = 55.9444)]
    lat: f64,

    /// Start longitude (default: George Square)
    #[arg(long, default_value_t = -3.1878, allow_negative_numbers = true)]
    lng: f64,
}

impl StartArgs {
    fn point(&self) -> Point {
        Point::new(self.lng, self.lat)
    }
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("aqmaps=info".parse()?)
        .add_directive("aqmaps_cli=info".parse()?)
        .add_directive("aqmaps_core=info".parse()?);

    if json {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(filter)
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json)?;

    let mut config = Config::from_env();
    if let Some(server) = args.server {
        config.server_host = server;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }

    let source: Box<dyn DataSource> = match &config.data_dir {
        Some(dir) => Box::new(DirectorySource::new(dir)),
        None => Box::new(HttpSource::new(config.server_url())),
    };
    tracing::info!(source = %source.describe(), "Starting aqmaps...");
    let loader = Loader::new(source);
    let rules = FlightRules::default();

    match args.command {
        Command::Fly {
            day,
            month,
            year,
            start,
        } => {
            let date = NaiveDate::from_ymd_opt(year, month, day)
                .with_context(|| format!("{day:02}/{month:02}/{year} is not a valid date"))?;
            let result = run_day(&loader, date, start.point(), &rules, &config.output_dir)?;
            println!(
                "{}: {} moves, {} sensors read, {} missed -> {}",
                date,
                result.summary.moves,
                result.summary.sensors_read,
                result.summary.sensors_missed,
                result.files.readings.display()
            );
        }
        Command::Batch { start } => {
            let results = run_batch(
                &loader,
                &batch_dates(),
                start.point(),
                &rules,
                &config.output_dir,
            );
            let failed = results.iter().filter(|(_, result)| result.is_err()).count();
            for (date, result) in &results {
                match result {
                    Ok(day) => println!(
                        "{}: {} moves, {} sensors read, {} missed",
                        date, day.summary.moves, day.summary.sensors_read, day.summary.sensors_missed
                    ),
                    Err(err) => println!("{date}: failed: {err:#}"),
                }
            }
            if failed > 0 {
                bail!("{failed} of {} days failed", results.len());
            }
        }
    }

    Ok(())
}
