use anyhow::{bail, Context, Result};
use countymander::{
    redistrict_and_write, AdjacencyFormat, AdjacencySource, RedistrictConfig, Redistricting, UnitSource,
};
use tracing::{error, info};

use crate::cli::RedistrictArgs;

/// Start from the config file (if any), then apply command-line flags on top.
fn build_config(args: &RedistrictArgs) -> Result<RedistrictConfig> {
    let mut config = match &args.config {
        Some(path) => RedistrictConfig::from_file(path)?,
        None => {
            let units = args.units.clone().context("[redistrict] --units is required without --config")?;
            let districts = args.districts.context("[redistrict] --districts is required without --config")?;
            let adjacency = match (&args.adjacency, &args.adjacency_url) {
                (Some(path), _) => AdjacencySource::file(path, AdjacencyFormat::default()),
                (None, Some(url)) => AdjacencySource::url(url, AdjacencyFormat::default()),
                (None, None) => bail!("[redistrict] --adjacency or --adjacency-url is required without --config"),
            };
            RedistrictConfig::new(districts, UnitSource::new(units), adjacency)
        }
    };

    if let Some(path) = &args.units { config.units.path = path.clone() }
    if let Some(column) = &args.name_column { config.units.name_column = column.clone() }
    if let Some(column) = &args.population_column { config.units.population_column = column.clone() }
    if let Some(path) = &args.adjacency {
        config.adjacency.path = Some(path.clone());
        config.adjacency.url = None;
    }
    if let Some(url) = &args.adjacency_url {
        config.adjacency.url = Some(url.clone());
        config.adjacency.path = None;
    }
    if let Some(format) = args.format { config.adjacency.format = format.into() }
    if let Some(districts) = args.districts { config.districts = districts }
    if let Some(tolerance) = args.tolerance { config.tolerance = tolerance }
    if !args.suffixes.is_empty() { config.names.suffixes = args.suffixes.clone() }
    if let Some(region) = &args.region { config.names.region = Some(region.clone()) }
    config.overrides.extend(args.overrides.iter().cloned());
    if let Some(isolation) = args.isolation { config.isolation = isolation.into() }
    if let Some(backend) = args.backend { config.solver.backend = backend.into() }
    if let Some(limit) = args.time_limit { config.solver.time_limit = Some(limit) }
    if let Some(path) = &args.output { config.output.csv = path.clone() }
    if let Some(path) = &args.summary { config.output.summary = Some(path.clone()) }

    Ok(config)
}

pub fn run(_cli: &crate::cli::Cli, args: &RedistrictArgs) -> Result<()> {
    let config = build_config(args)?;

    info!("[redistrict] {} districts, tolerance {}", config.districts, config.tolerance);
    match redistrict_and_write(&config)? {
        Redistricting::Plan(plan) => {
            for (district, population) in plan.district_totals() {
                info!("[redistrict] district {district}: population {population}");
            }
            info!("[redistrict] objective {:.1}, plan written to {}", plan.objective(), config.output.csv.display());
            Ok(())
        }
        Redistricting::NoSolution(failure) => {
            error!("[redistrict] {failure}");
            bail!("[redistrict] no plan found ({})", failure.status)
        }
    }
}
