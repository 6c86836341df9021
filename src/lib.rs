#![doc = "countymander public API"]
mod common;
mod config;
mod graph;
mod io;
mod pipeline;
mod plan;
mod solver;
mod unit;

#[doc(inline)]
pub use unit::{FixedUnit, NameConvention, NameNormalizer, Unit, UnitRecord, UnitTable};

#[doc(inline)]
pub use graph::{build_adjacency, check_isolated, Adjacency, AdjacencyBuilder, BuildReport, IsolationPolicy};

#[doc(inline)]
pub use solver::{
    solve_districts, AssignedUnit, Backend, ComponentSummary, Diagnostics, DistrictAssignment, DistrictModel,
    DistrictParams, Failure, ModelError, ModelStats, Outcome, SolveStatus, SolverOptions, DEFAULT_TOLERANCE,
};

#[doc(inline)]
pub use plan::{DistrictSummary, Plan, PlanRow, PlanSummary};

#[doc(inline)]
pub use io::csv::{
    read_adjacency, read_adjacency_bytes, read_adjacency_string, read_unit_table, read_unit_table_string,
    AdjacencyFormat,
};

#[doc(inline)]
pub use config::{AdjacencySource, OutputConfig, RedistrictConfig, UnitSource};

#[doc(inline)]
pub use pipeline::{redistrict, redistrict_and_write, Redistricting};

#[cfg(feature = "download")]
#[doc(inline)]
pub use common::{download_file, fetch_bytes, CENSUS_ADJACENCY_URL};
