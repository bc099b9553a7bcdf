//! Field map configuration.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Display date used by the NDVI tutorial data: the 28th observation.
pub const DEFAULT_DATE_INDEX: usize = 27;

/// Mapbox satellite tiles, requested with an access token.
pub const DEFAULT_BASEMAP_URL: &str =
    "http://api.tiles.mapbox.com/v4/mapbox.satellite/{z}/{x}/{y}.png";

/// Top-level field map configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// NDVI export document (`{ "results": [...] }`)
    pub data_path: PathBuf,

    /// 256-entry color table asset; the built-in NDVI ramp when absent
    pub color_table_path: Option<PathBuf>,

    /// Where the styled GeoJSON is written
    pub output_path: PathBuf,

    /// Series entry used for every field
    pub date_index: usize,

    /// Observation date; overrides `date_index` when set
    pub date: Option<NaiveDate>,

    /// What to do with fields that cannot be styled
    pub on_error: ErrorPolicy,

    /// Basemap tile layer
    pub basemap: BasemapConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/ndvi.json"),
            color_table_path: None,
            output_path: PathBuf::from("fields.geojson"),
            date_index: DEFAULT_DATE_INDEX,
            date: None,
            on_error: ErrorPolicy::default(),
            basemap: BasemapConfig::default(),
        }
    }
}

/// Basemap tile layer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasemapConfig {
    /// XYZ tile URL template
    pub url: String,

    /// Access token appended as `?access_token=`
    pub access_token: Option<String>,
}

impl Default for BasemapConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BASEMAP_URL.to_string(),
            access_token: None,
        }
    }
}

impl BasemapConfig {
    /// Tile URL template with the access token applied.
    pub fn tile_template(&self) -> String {
        match &self.access_token {
            Some(token) if !token.is_empty() => {
                let sep = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{}access_token={}", self.url, sep, token)
            }
            _ => self.url.clone(),
        }
    }
}

/// Handling of per-field styling failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Log and leave the field unstyled
    #[default]
    Skip,

    /// Fail the render pass on the first error
    Abort,
}

/// Values that override the file configuration (CLI flags and environment).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_path: Option<PathBuf>,
    pub color_table_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub date_index: Option<usize>,
    pub date: Option<NaiveDate>,
    pub on_error: Option<ErrorPolicy>,
    pub basemap_url: Option<String>,
    pub access_token: Option<String>,
}

impl MapConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Defaults, then the optional YAML file, then overrides.
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(v) = overrides.data_path {
            self.data_path = v;
        }
        if let Some(v) = overrides.color_table_path {
            self.color_table_path = Some(v);
        }
        if let Some(v) = overrides.output_path {
            self.output_path = v;
        }
        if let Some(v) = overrides.date_index {
            self.date_index = v;
        }
        if let Some(v) = overrides.date {
            self.date = Some(v);
        }
        if let Some(v) = overrides.on_error {
            self.on_error = v;
        }
        if let Some(v) = overrides.basemap_url {
            self.basemap.url = v;
        }
        if let Some(v) = overrides.access_token {
            self.basemap.access_token = Some(v);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_path.as_os_str().is_empty() {
            bail!("data_path must not be empty");
        }
        if self.output_path.as_os_str().is_empty() {
            bail!("output_path must not be empty");
        }
        if self.basemap.url.is_empty() {
            bail!("basemap.url must not be empty");
        }
        Ok(())
    }
}
