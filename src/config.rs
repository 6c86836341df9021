//! Run configuration, loaded from TOML and overridable field by field.
//!
//! ```toml
//! districts = 6
//! tolerance = 0.15
//! isolation = "warn"
//!
//! [units]
//! path = "Washington_County_Data.csv"
//! population_column = "pop2024"
//!
//! [adjacency]
//! path = "county_adjacency.txt"
//! format = "census-tab"
//!
//! [names]
//! suffixes = ["county"]
//! region = "WA"
//!
//! [overrides]
//! "King County" = 7
//! "Pierce County" = 8
//! ```

use std::{collections::BTreeMap, path::{Path, PathBuf}};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    graph::IsolationPolicy,
    io::csv::AdjacencyFormat,
    solver::{DistrictParams, SolverOptions, DEFAULT_TOLERANCE},
    unit::NameConvention,
};

fn default_tolerance() -> f64 { DEFAULT_TOLERANCE }
fn default_name_column() -> String { "name".into() }
fn default_population_column() -> String { "pop2024".into() }
fn default_csv_output() -> PathBuf { "redistricted_counties.csv".into() }

/// Where the unit table comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitSource {
    pub path: PathBuf,
    #[serde(default = "default_name_column")]
    pub name_column: String,
    #[serde(default = "default_population_column")]
    pub population_column: String,
}

impl UnitSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name_column: default_name_column(),
            population_column: default_population_column(),
        }
    }
}

/// Where the border-sharing list comes from: a local file or a URL.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdjacencySource {
    pub path: Option<PathBuf>,
    pub url: Option<String>,
    #[serde(default)]
    pub format: AdjacencyFormat,
}

impl AdjacencySource {
    pub fn file(path: impl Into<PathBuf>, format: AdjacencyFormat) -> Self {
        Self { path: Some(path.into()), url: None, format }
    }

    pub fn url(url: impl Into<String>, format: AdjacencyFormat) -> Self {
        Self { path: None, url: Some(url.into()), format }
    }
}

/// Output locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Assignment table (`name,population,district`).
    pub csv: PathBuf,
    /// Optional JSON summary.
    pub summary: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self { Self { csv: default_csv_output(), summary: None } }
}

/// Everything one redistricting run needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedistrictConfig {
    /// Number of districts for the working (non-override) units.
    pub districts: u32,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    pub units: UnitSource,
    pub adjacency: AdjacencySource,
    #[serde(default)]
    pub names: NameConvention,
    #[serde(default)]
    pub isolation: IsolationPolicy,
    /// Units pinned to fixed district labels, outside the optimization.
    #[serde(default)]
    pub overrides: BTreeMap<String, u32>,
    #[serde(default)]
    pub solver: SolverOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RedistrictConfig {
    /// Minimal configuration with defaults for everything but the inputs.
    pub fn new(districts: u32, units: UnitSource, adjacency: AdjacencySource) -> Self {
        Self {
            districts,
            tolerance: DEFAULT_TOLERANCE,
            units,
            adjacency,
            names: NameConvention::default(),
            isolation: IsolationPolicy::default(),
            overrides: BTreeMap::new(),
            solver: SolverOptions::default(),
            output: OutputConfig::default(),
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("[config] Invalid TOML configuration")
    }

    /// Load a configuration file. Relative input and output paths are
    /// resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml_str(&text)
            .with_context(|| format!("[config] Failed to load {}", path.display()))?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| if p.is_relative() { *p = base.join(&*p) };
        resolve(&mut self.units.path);
        resolve(&mut self.output.csv);
        if let Some(p) = self.adjacency.path.as_mut() { resolve(p) }
        if let Some(p) = self.output.summary.as_mut() { resolve(p) }
    }

    /// Problem parameters for the solver.
    pub fn params(&self) -> DistrictParams { DistrictParams::new(self.districts, self.tolerance) }

    /// Check the configuration before any input is read.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.districts >= 1, "[config] districts must be at least 1");
        ensure!(self.tolerance.is_finite() && self.tolerance >= 0.0,
            "[config] tolerance must be a finite non-negative fraction (found {})", self.tolerance);
        ensure!(self.adjacency.path.is_some() != self.adjacency.url.is_some(),
            "[config] exactly one of adjacency.path and adjacency.url must be set");
        ensure!(self.solver.backend.is_available(),
            "[config] solver backend {:?} is not compiled in", self.solver.backend);
        if let Some(limit) = self.solver.time_limit {
            ensure!(limit.is_finite() && limit > 0.0, "[config] solver.time_limit must be positive");
        }
        for (name, &district) in &self.overrides {
            ensure!(district > self.districts,
                "[config] override {name:?} uses district {district}, which collides with optimized districts 1..={}", self.districts);
        }
        Ok(())
    }
}
