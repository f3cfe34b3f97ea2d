use anyhow::{Context, anyhow, bail};
use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use kma_core::{
    Config, ForecastError, GeoPoint, WeatherRequest, base_date, current_base_time,
    provider_from_config,
};

use crate::render;

const TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "kma-weather", version, about = "Korean village forecast CLI")]
pub struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the data portal service key.
    Configure,

    /// Print the forecast grid cell for a coordinate.
    Grid {
        #[command(flatten)]
        coords: Coordinates,
    },

    /// Print the base date and base time that would be requested.
    BaseTime {
        /// Local time as "YYYY-MM-DD HH:MM"; if absent, means "now".
        #[arg(long)]
        at: Option<String>,
    },

    /// Show current conditions and precipitation probability for a coordinate.
    Show {
        #[command(flatten)]
        coords: Coordinates,

        /// Local time as "YYYY-MM-DD HH:MM"; if absent, means "now".
        #[arg(long)]
        at: Option<String>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct Coordinates {
    /// Latitude in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

impl Coordinates {
    fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Grid { coords } => {
                let cell = coords.point().to_grid();
                println!("nx={} ny={}", cell.x, cell.y);
                Ok(())
            }
            Command::BaseTime { at } => {
                let when = parse_at(at.as_deref())?.unwrap_or_else(|| Local::now().naive_local());
                println!("base_date={} base_time={}", base_date(&when), current_base_time(&when));
                Ok(())
            }
            Command::Show { coords, at, json } => show(coords.point(), at.as_deref(), json).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("Service key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message("Decoded key for VilageFcstInfoService_2.0 from data.go.kr")
        .without_confirmation()
        .prompt()
        .context("Failed to read service key")?;

    if key.trim().is_empty() {
        bail!("Service key must not be empty");
    }

    config.set_service_key(key);
    config.save()?;

    println!("Saved service key to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(point: GeoPoint, at: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?.with_env_overrides();
    let provider = provider_from_config(&config)?;
    let request = WeatherRequest::new(point, parse_at(at)?);

    tracing::info!(lat = point.latitude, lon = point.longitude, "fetching forecast");

    let report = match provider.get_weather(&request).await {
        Ok(report) => report,
        Err(ForecastError::NoData) => {
            bail!("No forecast data available for grid {}", point.to_grid())
        }
        Err(err) => return Err(err).context("Failed to fetch forecast"),
    };

    if json {
        let text =
            serde_json::to_string_pretty(&report).context("Failed to serialize report to JSON")?;
        println!("{text}");
    } else {
        print!("{}", render::report(&report));
    }

    Ok(())
}

fn parse_at(at: Option<&str>) -> anyhow::Result<Option<NaiveDateTime>> {
    let Some(raw) = at else {
        return Ok(None);
    };

    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
        .map(Some)
        .ok_or_else(|| anyhow!("Invalid time '{raw}'. Expected \"YYYY-MM-DD HH:MM\"."))
}
