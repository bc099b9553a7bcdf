//! NDVI field map renderer.
//!
//! Loads an NDVI export, colors every field polygon from a 256-entry color
//! table for one observation date, and writes a styled GeoJSON layer with a
//! fitted viewport and satellite basemap reference.

mod composition;
mod config;
mod geojson_map;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::{ConfigOverrides, ErrorPolicy, MapConfig};
use field_geojson::{adapt, parse_export, DateSelector};
use geojson_map::GeoJsonMap;
use symbology::ColorTable;

#[derive(Parser, Debug)]
#[command(name = "field-map")]
#[command(about = "Render NDVI-symbolized field polygons as styled GeoJSON")]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "FIELD_MAP_CONFIG")]
    config: Option<PathBuf>,

    /// NDVI export document
    #[arg(short, long, env = "FIELD_MAP_DATA")]
    data: Option<PathBuf>,

    /// Color table asset (256 RGB entries)
    #[arg(long, env = "FIELD_MAP_COLOR_TABLE")]
    color_table: Option<PathBuf>,

    /// Output GeoJSON path
    #[arg(short, long, env = "FIELD_MAP_OUTPUT")]
    output: Option<PathBuf>,

    /// Index into each field's NDVI series
    #[arg(long, env = "FIELD_MAP_DATE_INDEX")]
    date_index: Option<usize>,

    /// Observation date (YYYY-MM-DD); overrides --date-index
    #[arg(long, env = "FIELD_MAP_DATE")]
    date: Option<NaiveDate>,

    /// Handling of fields that cannot be styled
    #[arg(long, value_enum, env = "FIELD_MAP_ON_ERROR")]
    on_error: Option<ErrorPolicy>,

    /// Basemap tile URL template
    #[arg(long, env = "FIELD_MAP_BASEMAP_URL")]
    basemap_url: Option<String>,

    /// Basemap access token
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_path: self.data.clone(),
            color_table_path: self.color_table.clone(),
            output_path: self.output.clone(),
            date_index: self.date_index,
            date: self.date,
            on_error: self.on_error,
            basemap_url: self.basemap_url.clone(),
            access_token: self.access_token.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = MapConfig::load(args.config.as_deref(), args.overrides())?;
    info!(
        data = %config.data_path.display(),
        output = %config.output_path.display(),
        on_error = ?config.on_error,
        "Loaded configuration"
    );

    run(&config)
}

fn run(config: &MapConfig) -> Result<()> {
    let export = std::fs::read_to_string(&config.data_path)
        .with_context(|| format!("Failed to read NDVI export {}", config.data_path.display()))?;
    let collection = adapt(parse_export(&export)?)?;
    info!(fields = collection.len(), "Adapted field records");

    let selector = match config.date {
        Some(date) => DateSelector::for_date(&collection, date)?,
        None => DateSelector::new(config.date_index),
    };
    info!(
        date_index = selector.date_index,
        date = selector.date_label(&collection).unwrap_or("unknown"),
        "Selected display date"
    );

    let table = match &config.color_table_path {
        Some(path) => ColorTable::from_file(path)
            .with_context(|| format!("Failed to load color table {}", path.display()))?,
        None => {
            info!("No color table configured, using built-in NDVI ramp");
            ColorTable::ndvi_default()?
        }
    };

    let mut map = GeoJsonMap::new(config.basemap.tile_template());
    let report = composition::render(&mut map, collection, selector, &table, config.on_error)?;

    if !report.skipped.is_empty() {
        warn!(skipped = report.skipped.len(), "Some fields were left unstyled");
    }
    if let Some(bounds) = map.viewport() {
        info!(
            west = bounds.min_x,
            south = bounds.min_y,
            east = bounds.max_x,
            north = bounds.max_y,
            "Viewport fitted to fields"
        );
    }

    map.write_to(&config.output_path)?;
    info!(styled = report.styled, "Field map rendering completed");

    Ok(())
}
