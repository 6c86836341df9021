use good_lp::{Constraint, ResolutionError, Solution, SolverModel, Variable};
use tracing::{info, warn};

use crate::{
    graph::Adjacency,
    solver::{
        AssignedUnit, Backend, Diagnostics, DistrictAssignment, DistrictModel, DistrictParams,
        Failure, ModelError, Outcome, SolveStatus, SolverOptions,
    },
    unit::UnitTable,
};

impl DistrictModel<'_> {
    /// Solve the model. Blocks until the backend terminates.
    ///
    /// Returns `Err` only when the requested backend is not compiled in;
    /// infeasibility and other non-optimal terminations are reported as
    /// [`Outcome::NoSolution`].
    pub fn solve(self, options: &SolverOptions) -> Result<Outcome, ModelError> {
        if !options.backend.is_available() {
            return Err(ModelError::BackendUnavailable(options.backend));
        }

        let DistrictModel { table, adjacency, params, vars, assign, costs, objective, constraints, stats } = self;
        let unsolved = vars.minimise(objective);

        info!("[solver::solve] solving with {:?}", options.backend);
        let values = match options.backend {
            Backend::MicroLp => {
                if options.time_limit.is_some() || options.threads.is_some() {
                    warn!("[solver::solve] microlp ignores time_limit and threads");
                }
                run(good_lp::solvers::microlp::microlp(unsolved), constraints, &assign)
            }
            #[cfg(feature = "cbc")]
            Backend::Cbc => {
                let mut model = good_lp::solvers::coin_cbc::coin_cbc(unsolved);
                model.set_parameter("log", if options.log { "1" } else { "0" });
                if let Some(seconds) = options.time_limit {
                    model.set_parameter("seconds", &seconds.to_string());
                }
                if let Some(threads) = options.threads {
                    model.set_parameter("threads", &threads.to_string());
                }
                run(model, constraints, &assign)
            }
            #[cfg(not(feature = "cbc"))]
            Backend::Cbc => return Err(ModelError::BackendUnavailable(Backend::Cbc)),
        };

        let failure = |status: SolveStatus, message: String| {
            let diagnostics = Diagnostics::compute(table, adjacency, &stats);
            Outcome::NoSolution(Failure { status, message, stats: stats.clone(), diagnostics })
        };

        let values = match values {
            Ok(values) => values,
            Err(err) => {
                let status = SolveStatus::from(&err);
                info!("[solver::solve] terminated with status {status}");
                return Ok(failure(status, err.to_string()));
            }
        };

        let Some(districts) = decode(&values, params.districts as usize) else {
            warn!("[solver::solve] backend returned a non-integral assignment");
            return Ok(failure(SolveStatus::NotSolved, "backend returned a non-integral assignment".into()));
        };

        let rows = table.units().iter().zip(&districts)
            .map(|(unit, &district)| AssignedUnit {
                name: unit.name().to_string(),
                population: unit.population(),
                district,
            })
            .collect::<Vec<_>>();

        // Each unit sits in exactly one district, so its cost is counted once.
        let objective = costs.iter().sum::<f64>();

        info!("[solver::solve] optimal, objective {objective:.1}");
        Ok(Outcome::Optimal(DistrictAssignment { rows, objective, stats }))
    }
}

/// Add constraints to a backend model, solve it, and read back the variable values.
fn run<M>(mut model: M, constraints: Vec<Constraint>, assign: &[Variable]) -> Result<Vec<f64>, ResolutionError>
where
    M: SolverModel<Error = ResolutionError>,
{
    for constraint in constraints { model.add_constraint(constraint); }
    let solution = model.solve()?;
    Ok(assign.iter().map(|&v| solution.value(v)).collect())
}

/// District label (1-based) per unit, or `None` unless every unit has exactly
/// one district set.
fn decode(values: &[f64], num_districts: usize) -> Option<Vec<u32>> {
    values.chunks(num_districts)
        .map(|row| {
            let mut chosen = row.iter().enumerate().filter(|&(_, &v)| v > 0.5).map(|(j, _)| j);
            match (chosen.next(), chosen.next()) {
                (Some(j), None) => Some(j as u32 + 1),
                _ => None,
            }
        })
        .collect()
}

/// Build and solve the district assignment problem in one call.
pub fn solve_districts(
    table: &UnitTable,
    adjacency: &Adjacency,
    params: DistrictParams,
    options: &SolverOptions,
) -> Result<Outcome, ModelError> {
    DistrictModel::build(table, adjacency, params)?.solve(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_picks_single_district_per_unit() {
        let values = [0.0, 1.0, 0.0, 1.0, 0.0, 0.0];
        assert_eq!(decode(&values, 3), Some(vec![2, 1]));
    }

    #[test]
    fn decode_tolerates_numerical_noise() {
        let values = [1e-9, 0.999_999, 1.000_001, -1e-9];
        assert_eq!(decode(&values, 2), Some(vec![2, 1]));
    }

    #[test]
    fn decode_rejects_fractional_or_missing_rows() {
        assert_eq!(decode(&[0.5, 0.5], 2), None);
        assert_eq!(decode(&[1.0, 1.0], 2), None);
        assert_eq!(decode(&[0.0, 0.0], 2), None);
    }
}
