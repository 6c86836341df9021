use std::fmt;

use good_lp::ResolutionError;
use serde::Serialize;

use crate::solver::{Diagnostics, ModelStats};

/// Solver termination status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Stopped without a proven optimum (time limit, numerical trouble, ...).
    NotSolved,
}

impl From<&ResolutionError> for SolveStatus {
    fn from(err: &ResolutionError) -> Self {
        match err {
            ResolutionError::Infeasible => SolveStatus::Infeasible,
            ResolutionError::Unbounded => SolveStatus::Unbounded,
            _ => SolveStatus::NotSolved,
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::NotSolved => "Not Solved",
        };
        f.write_str(name)
    }
}

/// A unit together with the district it was assigned to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssignedUnit {
    pub name: String,
    pub population: u64,
    /// District label in `1..=D`.
    pub district: u32,
}

/// A complete optimal assignment: one row per unit, in canonical order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistrictAssignment {
    pub rows: Vec<AssignedUnit>,
    pub objective: f64,
    pub stats: ModelStats,
}

impl DistrictAssignment {
    /// Population assigned to each district; index `j` holds district `j + 1`.
    pub fn district_populations(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.stats.districts as usize];
        self.rows.iter().for_each(|row| totals[row.district as usize - 1] += row.population);
        totals
    }

    /// District label of the named unit.
    pub fn district_of(&self, name: &str) -> Option<u32> {
        self.rows.iter().find(|row| row.name == name).map(|row| row.district)
    }
}

/// Why no assignment was produced, with enough detail to diagnose it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Failure {
    pub status: SolveStatus,
    pub message: String,
    pub stats: ModelStats,
    pub diagnostics: Diagnostics,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no optimal solution (status: {}): {}; {} units, {} districts, {} variables, {} constraints \
             ({} exactly-one, {} balance, {} contiguity); {}",
            self.status, self.message,
            self.stats.units, self.stats.districts, self.stats.variables, self.stats.constraints(),
            self.stats.exactly_one_constraints, self.stats.balance_constraints, self.stats.contiguity_constraints,
            self.diagnostics.describe(),
        )
    }
}

/// Terminal result of one solve. Never a partial assignment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Outcome {
    Optimal(DistrictAssignment),
    NoSolution(Failure),
}

impl Outcome {
    pub fn status(&self) -> SolveStatus {
        match self {
            Outcome::Optimal(_) => SolveStatus::Optimal,
            Outcome::NoSolution(failure) => failure.status,
        }
    }

    #[inline] pub fn is_optimal(&self) -> bool { matches!(self, Outcome::Optimal(_)) }

    /// The assignment, if the solve was optimal.
    pub fn assignment(&self) -> Option<&DistrictAssignment> {
        match self {
            Outcome::Optimal(assignment) => Some(assignment),
            Outcome::NoSolution(_) => None,
        }
    }

    /// Objective value, if the solve was optimal.
    pub fn objective(&self) -> Option<f64> { self.assignment().map(|a| a.objective) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_errors_map_to_status() {
        assert_eq!(SolveStatus::from(&ResolutionError::Infeasible), SolveStatus::Infeasible);
        assert_eq!(SolveStatus::from(&ResolutionError::Unbounded), SolveStatus::Unbounded);
        assert_eq!(SolveStatus::from(&ResolutionError::Other("limit reached")), SolveStatus::NotSolved);
    }

    #[test]
    fn status_display_names() {
        assert_eq!(SolveStatus::Optimal.to_string(), "Optimal");
        assert_eq!(SolveStatus::NotSolved.to_string(), "Not Solved");
    }
}
