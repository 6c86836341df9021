use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use crate::{
    config::RedistrictConfig,
    graph::{build_adjacency, check_isolated},
    io::{csv::{read_adjacency, read_unit_table}, json::write_json_file},
    plan::Plan,
    solver::{solve_districts, Failure, Outcome, SolveStatus},
    unit::UnitTable,
};

/// Terminal result of a run: a plan, or the reason there is none.
#[derive(Clone, Debug, PartialEq)]
pub enum Redistricting {
    Plan(Plan),
    NoSolution(Failure),
}

impl Redistricting {
    pub fn status(&self) -> SolveStatus {
        match self {
            Redistricting::Plan(_) => SolveStatus::Optimal,
            Redistricting::NoSolution(failure) => failure.status,
        }
    }

    /// The plan, if one was found.
    pub fn plan(&self) -> Option<&Plan> {
        match self {
            Redistricting::Plan(plan) => Some(plan),
            Redistricting::NoSolution(_) => None,
        }
    }

    /// Write the plan summary, or the failure details, as JSON.
    pub fn write_summary(&self, path: &Path) -> Result<()> {
        match self {
            Redistricting::Plan(plan) => plan.write_summary(path),
            Redistricting::NoSolution(failure) => {
                crate::common::ensure_parent_dir(path)?;
                write_json_file(path, failure)
            }
        }
    }
}

/// Load the raw border pairs named by the configuration.
fn load_pairs(config: &RedistrictConfig) -> Result<Vec<(String, String)>> {
    let source = &config.adjacency;
    match (&source.path, &source.url) {
        (Some(path), None) => read_adjacency(path, source.format),
        #[cfg(feature = "download")]
        (None, Some(url)) => {
            let bytes = crate::common::fetch_bytes(url)?;
            crate::io::csv::read_adjacency_bytes(&bytes, source.format)
                .with_context(|| format!("[pipeline] Invalid adjacency list from {url}"))
        }
        #[cfg(not(feature = "download"))]
        (None, Some(url)) => bail!("[pipeline] Cannot fetch {url}: built without the download feature"),
        _ => bail!("[pipeline] Exactly one of adjacency.path and adjacency.url must be set"),
    }
}

/// Run the whole pipeline: read inputs, build the adjacency relation, solve.
///
/// Setup problems (unreadable inputs, bad configuration, isolated units under
/// [`IsolationPolicy::Error`](crate::IsolationPolicy::Error)) are errors; a
/// model without an optimal solution is a normal [`Redistricting::NoSolution`].
pub fn redistrict(config: &RedistrictConfig) -> Result<Redistricting> {
    config.validate()?;
    let names = config.names.compile()?;

    info!("[pipeline] loading units from {}", config.units.path.display());
    let records = read_unit_table(&config.units.path, &config.units.name_column, &config.units.population_column)?;
    let table = UnitTable::new(records, &names)?;
    let (working, fixed) = table.split_overrides(&config.overrides, &names, config.districts)?;
    info!("[pipeline] {} working units, {} fixed by override", working.len(), fixed.len());

    let pairs = load_pairs(config)?;
    let (adjacency, _) = build_adjacency(&working, pairs, &names);
    check_isolated(&working, &adjacency, config.isolation)?;

    let outcome = solve_districts(&working, &adjacency, config.params(), &config.solver)
        .context("[pipeline] Failed to build the district model")?;

    Ok(match outcome {
        Outcome::Optimal(assignment) => Redistricting::Plan(Plan::new(assignment, fixed)),
        Outcome::NoSolution(failure) => Redistricting::NoSolution(failure),
    })
}

/// Run the pipeline and write the outputs named by the configuration.
pub fn redistrict_and_write(config: &RedistrictConfig) -> Result<Redistricting> {
    let result = redistrict(config)?;

    if let Redistricting::Plan(plan) = &result {
        info!("[pipeline] writing plan to {}", config.output.csv.display());
        plan.to_csv(&config.output.csv)?;
    }
    if let Some(summary) = &config.output.summary {
        info!("[pipeline] writing summary to {}", summary.display());
        result.write_summary(summary)?;
    }

    Ok(result)
}
