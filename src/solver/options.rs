use serde::{Deserialize, Serialize};

use crate::solver::ModelError;

/// Default allowed fractional deviation of a district from the ideal population.
pub const DEFAULT_TOLERANCE: f64 = 0.15;

/// Problem parameters: number of districts and population tolerance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistrictParams {
    pub districts: u32,
    pub tolerance: f64,
}

impl DistrictParams {
    pub fn new(districts: u32, tolerance: f64) -> Self { Self { districts, tolerance } }

    /// Parameters with [`DEFAULT_TOLERANCE`].
    pub fn with_districts(districts: u32) -> Self { Self::new(districts, DEFAULT_TOLERANCE) }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.districts == 0 { return Err(ModelError::NoDistricts) }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ModelError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }

    /// Population bounds `(ideal * (1 - tol), ideal * (1 + tol))`.
    pub fn bounds(&self, ideal: f64) -> (f64, f64) {
        (ideal * (1.0 - self.tolerance), ideal * (1.0 + self.tolerance))
    }
}

/// MILP backend used to solve the model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Pure-Rust branch and bound.
    #[default]
    MicroLp,
    /// COIN-OR CBC; requires the `cbc` feature.
    Cbc,
}

impl Backend {
    /// Whether this backend was compiled in.
    pub fn is_available(&self) -> bool {
        match self {
            Backend::MicroLp => true,
            Backend::Cbc => cfg!(feature = "cbc"),
        }
    }
}

/// Options handed to the solver before the (blocking) solve call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverOptions {
    pub backend: Backend,
    /// Wall-clock limit in seconds (CBC only).
    pub time_limit: Option<f64>,
    /// Worker threads (CBC only).
    pub threads: Option<u32>,
    /// Let the backend print its own log.
    pub log: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_scale_ideal() {
        let params = DistrictParams::new(2, 0.1);
        assert_eq!(params.bounds(1000.0), (900.0, 1100.0));
        assert_eq!(DistrictParams::new(2, 0.0).bounds(150.0), (150.0, 150.0));
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(matches!(DistrictParams::new(0, 0.1).validate(), Err(ModelError::NoDistricts)));
        assert!(matches!(DistrictParams::new(2, -0.1).validate(), Err(ModelError::InvalidTolerance(_))));
        assert!(matches!(DistrictParams::new(2, f64::NAN).validate(), Err(ModelError::InvalidTolerance(_))));
        assert!(DistrictParams::with_districts(6).validate().is_ok());
    }

    #[test]
    fn backend_names_deserialize() {
        let options: SolverOptions = toml::from_str("backend = \"cbc\"\ntime_limit = 30.0").unwrap();
        assert_eq!(options.backend, Backend::Cbc);
        assert_eq!(options.time_limit, Some(30.0));
        assert!(Backend::MicroLp.is_available());
    }
}
