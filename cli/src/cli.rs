use std::path::PathBuf;

use countymander::{AdjacencyFormat, Backend, IsolationPolicy};

/// County redistricting CLI
#[derive(clap::Parser, Debug)]
#[command(name = "countymander", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Download the Census county adjacency file
    Download(DownloadArgs),

    /// Assign counties to contiguous, population-balanced districts
    Redistrict(RedistrictArgs),
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// Source URL, defaults to the Census county adjacency file
    #[arg(long)]
    pub url: Option<String>,

    /// Output file, defaults to "./county_adjacency.txt"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum FormatArg {
    CensusTab,
    CensusPipe,
    Pairs,
}

impl From<FormatArg> for AdjacencyFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::CensusTab => AdjacencyFormat::CensusTab,
            FormatArg::CensusPipe => AdjacencyFormat::CensusPipe,
            FormatArg::Pairs => AdjacencyFormat::Pairs,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum BackendArg {
    Microlp,
    Cbc,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Microlp => Backend::MicroLp,
            BackendArg::Cbc => Backend::Cbc,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum IsolationArg {
    Ignore,
    Warn,
    Error,
}

impl From<IsolationArg> for IsolationPolicy {
    fn from(arg: IsolationArg) -> Self {
        match arg {
            IsolationArg::Ignore => IsolationPolicy::Ignore,
            IsolationArg::Warn => IsolationPolicy::Warn,
            IsolationArg::Error => IsolationPolicy::Error,
        }
    }
}

/// Flags override values from `--config`; without a config file,
/// `--units`, `--districts` and one adjacency source are required.
#[derive(clap::Args, Debug)]
pub struct RedistrictArgs {
    /// TOML run configuration
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Unit table CSV (one row per county)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub units: Option<PathBuf>,

    /// Column holding unit names
    #[arg(long)]
    pub name_column: Option<String>,

    /// Column holding populations
    #[arg(long)]
    pub population_column: Option<String>,

    /// Local adjacency file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath, conflicts_with = "adjacency_url")]
    pub adjacency: Option<PathBuf>,

    /// Remote adjacency file
    #[arg(long)]
    pub adjacency_url: Option<String>,

    /// Adjacency file layout
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Number of districts
    #[arg(short, long)]
    pub districts: Option<u32>,

    /// Allowed deviation from the ideal district population, as a fraction
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// Name suffix dropped when matching (repeatable), e.g. "county"
    #[arg(long = "suffix")]
    pub suffixes: Vec<String>,

    /// Region qualifier adjacency names must carry, e.g. "WA"
    #[arg(long)]
    pub region: Option<String>,

    /// Pin a unit to a district outside the optimization, as NAME=DISTRICT
    #[arg(long = "override", value_parser = parse_override)]
    pub overrides: Vec<(String, u32)>,

    /// What to do with units that have no neighbors
    #[arg(long, value_enum)]
    pub isolation: Option<IsolationArg>,

    /// MILP backend
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Solver time limit in seconds
    #[arg(long)]
    pub time_limit: Option<f64>,

    /// Output plan file, defaults to "./redistricted_counties.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Optional JSON summary file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub summary: Option<PathBuf>,
}

fn parse_override(s: &str) -> Result<(String, u32), String> {
    let (name, district) = s.rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=DISTRICT, found {s:?}"))?;
    let district = district.trim().parse::<u32>()
        .map_err(|e| format!("invalid district in {s:?}: {e}"))?;
    Ok((name.trim().to_string(), district))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_overrides() {
        assert_eq!(parse_override("King County=7").unwrap(), ("King County".into(), 7));
        assert!(parse_override("King County").is_err());
        assert!(parse_override("King County=seven").is_err());
    }

    #[test]
    fn redistrict_flags() {
        let cli = Cli::parse_from([
            "countymander", "-v", "redistrict",
            "--units", "counties.csv", "--adjacency", "adj.txt",
            "-d", "6", "--suffix", "county", "--override", "King County=7",
        ]);
        assert_eq!(cli.verbose, 1);
        let Commands::Redistrict(args) = cli.command else { panic!("expected redistrict") };
        assert_eq!(args.districts, Some(6));
        assert_eq!(args.suffixes, vec!["county".to_string()]);
        assert_eq!(args.overrides, vec![("King County".to_string(), 7)]);
    }

    #[test]
    fn adjacency_sources_conflict() {
        let parsed = Cli::try_parse_from([
            "countymander", "redistrict", "--adjacency", "a.txt", "--adjacency-url", "https://x",
        ]);
        assert!(parsed.is_err());
    }
}
