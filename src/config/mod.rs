//! Configuration for the dashboard pipeline.

use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};

/// Environment variable overriding the death-records source path
pub const ENV_DEATHS: &str = "MORTALITY_DEATHS";
/// Environment variable overriding the cause-code source path
pub const ENV_CAUSES: &str = "MORTALITY_CAUSES";
/// Environment variable overriding the geography source path
pub const ENV_GEOGRAPHY: &str = "MORTALITY_GEOGRAPHY";
/// Environment variable overriding the department boundary GeoJSON path
pub const ENV_BOUNDARIES: &str = "MORTALITY_BOUNDARIES";

/// Locations of the input files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    /// Death records (one row per fatality)
    pub deaths: PathBuf,
    /// ICD-10 cause-code reference
    pub causes: PathBuf,
    /// DIVIPOLA geography reference
    pub geography: PathBuf,
    /// Department boundary polygons, only read when geography has no centroids
    pub boundaries: Option<PathBuf>,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            deaths: PathBuf::from("data/NoFetal2019.csv"),
            causes: PathBuf::from("data/CodigosDeMuerte.csv"),
            geography: PathBuf::from("data/Divipola.csv"),
            boundaries: Some(PathBuf::from("data/colombia.geo.json")),
        }
    }
}

/// Bounds of the department marker radius, in metres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusBounds {
    /// Radius of the department with the fewest deaths
    pub min: f64,
    /// Radius of the department with the most deaths
    pub max: f64,
}

impl RadiusBounds {
    /// Radius used for every marker when all departments are tied
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

impl Default for RadiusBounds {
    fn default() -> Self {
        Self {
            min: 20_000.0,
            max: 130_000.0,
        }
    }
}

/// Configuration for the dashboard pipeline
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Input files
    pub sources: SourcePaths,
    /// Marker radius bounds for the map view
    pub radius: RadiusBounds,
    /// Map centre as (latitude, longitude)
    pub map_center: (f64, f64),
    /// Number of cities in the violent-death ranking
    pub violent_city_limit: usize,
    /// Number of cities in the lowest-mortality ranking
    pub lowest_city_limit: usize,
    /// Number of causes in the cause ranking
    pub cause_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sources: SourcePaths::default(),
            radius: RadiusBounds::default(),
            map_center: (4.5709, -74.2973),
            violent_city_limit: 5,
            lowest_city_limit: 10,
            cause_limit: 10,
        }
    }
}

impl DashboardConfig {
    /// Default configuration with source paths overridden from the environment
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = env_path(ENV_DEATHS) {
            config.sources.deaths = path;
        }
        if let Some(path) = env_path(ENV_CAUSES) {
            config.sources.causes = path;
        }
        if let Some(path) = env_path(ENV_GEOGRAPHY) {
            config.sources.geography = path;
        }
        if let Some(path) = env_path(ENV_BOUNDARIES) {
            config.sources.boundaries = Some(path);
        }
        config
    }

    /// Replace the source paths
    #[must_use]
    pub fn with_sources(mut self, sources: SourcePaths) -> Self {
        self.sources = sources;
        self
    }

    /// Check value ranges that would otherwise produce nonsense views
    pub fn validate(&self) -> Result<()> {
        if !(self.radius.min.is_finite() && self.radius.max.is_finite()) {
            return Err(DashboardError::Config("radius bounds must be finite".into()));
        }
        if self.radius.min > self.radius.max {
            return Err(DashboardError::Config(format!(
                "minimum radius {} exceeds maximum radius {}",
                self.radius.min, self.radius.max
            )));
        }
        if self.violent_city_limit == 0 || self.lowest_city_limit == 0 || self.cause_limit == 0 {
            return Err(DashboardError::Config("ranking limits must be positive".into()));
        }
        Ok(())
    }

    /// Path of the boundary file, if configured and present on disk
    #[must_use]
    pub fn existing_boundaries(&self) -> Option<&Path> {
        self.sources
            .boundaries
            .as_deref()
            .filter(|path| path.exists())
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}
