use thiserror::Error;

/// Invalid input to model construction. Solver termination is never reported
/// through this type; see [`Outcome`](crate::Outcome).
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("number of districts must be at least 1")]
    NoDistricts,
    #[error("tolerance must be a finite non-negative fraction (found {0})")]
    InvalidTolerance(f64),
    #[error("unit set is empty")]
    NoUnits,
    #[error("adjacency has {nodes} nodes but the unit table has {units} units")]
    SizeMismatch { units: usize, nodes: usize },
    #[error("backend {0:?} is not compiled in")]
    BackendUnavailable(crate::Backend),
}
