use serde::Serialize;

use crate::{graph::Adjacency, solver::ModelStats, unit::UnitTable};

/// One connected component of the adjacency relation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentSummary {
    pub units: Vec<String>,
    pub population: u64,
}

/// Feasibility hints derived from the adjacency components.
///
/// Adjacent units always share a district, so each connected component is
/// placed whole. A component heavier than the upper bound, or fewer
/// components than districts while the lower bound is positive, rules out
/// any solution before the solver runs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostics {
    pub components: Vec<ComponentSummary>,
    /// Indices into `components` whose population exceeds the upper bound.
    pub oversized: Vec<usize>,
    /// Fewer components than districts with a positive lower bound.
    pub too_few_components: bool,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Diagnostics {
    pub fn compute(table: &UnitTable, adjacency: &Adjacency, stats: &ModelStats) -> Self {
        let components = adjacency.components().into_iter()
            .map(|nodes| ComponentSummary {
                population: nodes.iter().map(|&u| table.units()[u].population()).sum(),
                units: nodes.iter().map(|&u| table.units()[u].name().to_string()).collect(),
            })
            .collect::<Vec<_>>();

        let oversized = components.iter().enumerate()
            .filter(|(_, c)| c.population as f64 > stats.upper_bound)
            .map(|(i, _)| i)
            .collect();

        let too_few_components = stats.lower_bound > 0.0 && components.len() < stats.districts as usize;

        Self {
            components,
            oversized,
            too_few_components,
            lower_bound: stats.lower_bound,
            upper_bound: stats.upper_bound,
        }
    }

    /// Whether the component structure alone rules out every assignment.
    pub fn structurally_infeasible(&self) -> bool {
        !self.oversized.is_empty() || self.too_few_components
    }

    /// One-line human readable summary.
    pub fn describe(&self) -> String {
        let largest = self.components.iter().map(|c| c.population).max().unwrap_or(0);
        let mut text = format!(
            "{} adjacency components (largest population {}), district bounds {:.1}..={:.1}",
            self.components.len(), largest, self.lower_bound, self.upper_bound,
        );
        if !self.oversized.is_empty() {
            text += &format!("; {} component(s) exceed the upper bound", self.oversized.len());
        }
        if self.too_few_components {
            text += "; fewer components than districts";
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::build_adjacency, solver::{DistrictModel, DistrictParams}, unit::{NameConvention, UnitRecord}};

    fn diagnose(pops: &[(&str, u64)], pairs: &[(&str, &str)], params: DistrictParams) -> Diagnostics {
        let names = NameConvention::default().compile().unwrap();
        let table = UnitTable::new(pops.iter().map(|&(n, p)| UnitRecord::new(n, p)), &names).unwrap();
        let (adjacency, _) = build_adjacency(&table, pairs.iter().copied(), &names);
        let model = DistrictModel::build(&table, &adjacency, params).unwrap();
        Diagnostics::compute(&table, &adjacency, model.stats())
    }

    #[test]
    fn dense_graph_collapses_into_one_component() {
        let diagnostics = diagnose(
            &[("a", 100), ("b", 100), ("c", 100), ("d", 100)],
            &[("a", "b"), ("b", "c"), ("c", "d")],
            DistrictParams::new(2, 0.1),
        );
        assert_eq!(diagnostics.components.len(), 1);
        assert_eq!(diagnostics.components[0].population, 400);
        assert_eq!(diagnostics.oversized, vec![0]);
        assert!(diagnostics.too_few_components);
        assert!(diagnostics.structurally_infeasible());
        assert!(diagnostics.describe().contains("exceed the upper bound"));
    }

    #[test]
    fn separable_components_are_not_flagged() {
        let diagnostics = diagnose(
            &[("a", 100), ("b", 100), ("c", 200)],
            &[("a", "b")],
            DistrictParams::new(2, 0.0),
        );
        assert_eq!(diagnostics.components.len(), 2);
        assert_eq!(diagnostics.components[0].units, vec!["a", "b"]);
        assert!(!diagnostics.structurally_infeasible());
    }
}
