mod diagnostics;
mod error;
mod model;
mod options;
mod outcome;
mod solve;

pub use diagnostics::{ComponentSummary, Diagnostics};
pub use error::ModelError;
pub use model::{DistrictModel, ModelStats};
pub use options::{Backend, DistrictParams, SolverOptions, DEFAULT_TOLERANCE};
pub use outcome::{AssignedUnit, DistrictAssignment, Failure, Outcome, SolveStatus};
pub use solve::solve_districts;
