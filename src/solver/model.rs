use good_lp::{constraint, variable, variables, Constraint, Expression, ProblemVariables, Variable};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    graph::Adjacency,
    solver::{Diagnostics, DistrictParams, ModelError},
    unit::UnitTable,
};

/// Size and bound summary of a built model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelStats {
    pub units: usize,
    pub districts: u32,
    pub adjacent_pairs: usize,
    pub variables: usize,
    pub exactly_one_constraints: usize,
    pub balance_constraints: usize,
    pub contiguity_constraints: usize,
    pub total_population: u64,
    pub ideal_population: f64,
    pub tolerance: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl ModelStats {
    /// Total number of linear constraints.
    pub fn constraints(&self) -> usize {
        self.exactly_one_constraints + self.balance_constraints + self.contiguity_constraints
    }
}

/// The district assignment integer program, built once and solved once.
///
/// Variables `x[u][j]` are binary, one per unit and district, stored
/// unit-major. The model encodes:
/// - exactly one district per unit,
/// - every district's population within `[ideal(1-tol), ideal(1+tol)]`,
/// - `x[u][d] == x[v][d]` for every adjacent pair and every district, as two
///   opposing inequalities, so that adjacent units always share a district,
///
/// and minimizes `sum |pop(u) - ideal| * x[u][j]`. That objective is the same
/// for every feasible assignment; balance comes from the constraints alone.
pub struct DistrictModel<'a> {
    pub(super) table: &'a UnitTable,
    pub(super) adjacency: &'a Adjacency,
    pub(super) params: DistrictParams,
    pub(super) vars: ProblemVariables,
    pub(super) assign: Vec<Variable>,
    pub(super) costs: Vec<f64>,
    pub(super) objective: Expression,
    pub(super) constraints: Vec<Constraint>,
    pub(super) stats: ModelStats,
}

impl<'a> DistrictModel<'a> {
    /// Build the model for `table`, whose canonical order `adjacency` must share.
    pub fn build(table: &'a UnitTable, adjacency: &'a Adjacency, params: DistrictParams) -> Result<Self, ModelError> {
        params.validate()?;
        if table.is_empty() { return Err(ModelError::NoUnits) }
        if adjacency.node_count() != table.len() {
            return Err(ModelError::SizeMismatch { units: table.len(), nodes: adjacency.node_count() });
        }

        let num_units = table.len();
        let num_districts = params.districts as usize;
        let ideal = table.ideal_population(params.districts);
        let (lower, upper) = params.bounds(ideal);

        let mut vars = variables!();
        let assign = (0..num_units * num_districts)
            .map(|_| vars.add(variable().binary()))
            .collect::<Vec<_>>();
        let x = |u: usize, j: usize| assign[u * num_districts + j];

        let costs = table.units().iter()
            .map(|unit| (unit.population() as f64 - ideal).abs())
            .collect::<Vec<_>>();

        let mut objective = Expression::with_capacity(assign.len());
        for (u, &cost) in costs.iter().enumerate() {
            for j in 0..num_districts { objective.add_mul(cost, x(u, j)) }
        }

        let mut constraints = Vec::with_capacity(
            num_units + 2 * num_districts + 2 * adjacency.pair_count() * num_districts
        );

        // Exactly one district per unit.
        for u in 0..num_units {
            let mut row = Expression::with_capacity(num_districts);
            for j in 0..num_districts { row.add_mul(1.0, x(u, j)) }
            constraints.push(constraint!(row == 1.0));
        }
        let exactly_one_constraints = constraints.len();

        // Population balance per district.
        for j in 0..num_districts {
            let mut load = Expression::with_capacity(num_units);
            for (u, unit) in table.units().iter().enumerate() {
                load.add_mul(unit.population() as f64, x(u, j));
            }
            constraints.push(constraint!(load.clone() >= lower));
            constraints.push(constraint!(load <= upper));
        }
        let balance_constraints = constraints.len() - exactly_one_constraints;

        // Adjacent units are coupled in every district.
        for (u, v) in adjacency.pairs() {
            for d in 0..num_districts {
                constraints.push(constraint!(x(u, d) - x(v, d) <= 0.0));
                constraints.push(constraint!(x(v, d) - x(u, d) <= 0.0));
            }
        }
        let contiguity_constraints = constraints.len() - exactly_one_constraints - balance_constraints;

        let stats = ModelStats {
            units: num_units,
            districts: params.districts,
            adjacent_pairs: adjacency.pair_count(),
            variables: assign.len(),
            exactly_one_constraints,
            balance_constraints,
            contiguity_constraints,
            total_population: table.total_population(),
            ideal_population: ideal,
            tolerance: params.tolerance,
            lower_bound: lower,
            upper_bound: upper,
        };

        info!(
            "[solver::model] {} units x {} districts: {} variables, {} constraints (bounds {:.1}..={:.1})",
            stats.units, stats.districts, stats.variables, stats.constraints(), lower, upper,
        );
        debug!(
            "[solver::model] {} exactly-one, {} balance, {} contiguity constraints",
            exactly_one_constraints, balance_constraints, contiguity_constraints,
        );

        let diagnostics = Diagnostics::compute(table, adjacency, &stats);
        if diagnostics.structurally_infeasible() {
            warn!("[solver::model] model is structurally infeasible: {}", diagnostics.describe());
        }

        Ok(Self { table, adjacency, params, vars, assign, costs, objective, constraints, stats })
    }

    /// Size and bound summary.
    #[inline] pub fn stats(&self) -> &ModelStats { &self.stats }

    /// Parameters the model was built with.
    #[inline] pub fn params(&self) -> DistrictParams { self.params }
}
