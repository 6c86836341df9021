use std::{collections::{BTreeMap, HashMap}, path::Path};

use anyhow::Result;
use serde::Serialize;

use crate::{
    common::ensure_parent_dir,
    io::{csv::{write_plan_rows, write_plan_rows_string}, json::{to_json_string, write_json_file}},
    solver::{DistrictAssignment, ModelStats, SolveStatus},
    unit::FixedUnit,
};

/// One row of the output assignment table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlanRow {
    pub name: String,
    pub population: u64,
    pub district: u32,
    /// Pinned by an override rather than chosen by the solver.
    pub fixed: bool,
}

/// Per-district line of a [`PlanSummary`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistrictSummary {
    pub district: u32,
    pub units: usize,
    pub population: u64,
    /// Fractional deviation from the ideal; `None` for override districts.
    pub deviation: Option<f64>,
    pub fixed: bool,
}

/// Machine readable report of a plan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlanSummary {
    pub status: SolveStatus,
    pub objective: f64,
    pub ideal_population: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub districts: Vec<DistrictSummary>,
    pub stats: ModelStats,
}

/// A districting plan: the optimal assignment of the working units merged
/// with the units pinned by overrides.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    rows: Vec<PlanRow>,
    objective: f64,
    stats: ModelStats,
}

impl Plan {
    /// Merge a solved assignment with the fixed units. Rows are sorted by name.
    pub fn new(assignment: DistrictAssignment, fixed: Vec<FixedUnit>) -> Self {
        let DistrictAssignment { rows, objective, stats } = assignment;

        let mut rows = rows.into_iter()
            .map(|row| PlanRow { name: row.name, population: row.population, district: row.district, fixed: false })
            .chain(fixed.into_iter().map(|f| PlanRow {
                name: f.unit.name().to_string(),
                population: f.unit.population(),
                district: f.district,
                fixed: true,
            }))
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| a.name.cmp(&b.name));

        Self { rows, objective, stats }
    }

    /// All rows, sorted by name.
    #[inline] pub fn rows(&self) -> &[PlanRow] { &self.rows }

    /// Number of optimized districts (excluding override labels).
    #[inline] pub fn num_districts(&self) -> u32 { self.stats.districts }

    #[inline] pub fn objective(&self) -> f64 { self.objective }

    #[inline] pub fn stats(&self) -> &ModelStats { &self.stats }

    /// Map from unit name to district.
    pub fn get_assignments(&self) -> HashMap<String, u32> {
        self.rows.iter().map(|row| (row.name.clone(), row.district)).collect()
    }

    /// Total population of every district label in the plan, overrides included.
    pub fn district_totals(&self) -> BTreeMap<u32, u64> {
        let mut totals = BTreeMap::new();
        self.rows.iter().for_each(|row| *totals.entry(row.district).or_default() += row.population);
        totals
    }

    /// Fractional deviation from the ideal of each optimized district.
    pub fn deviations(&self) -> BTreeMap<u32, f64> {
        let ideal = self.stats.ideal_population;
        let totals = self.district_totals();
        (1..=self.num_districts())
            .map(|d| {
                let total = totals.get(&d).copied().unwrap_or(0) as f64;
                (d, if ideal > 0.0 { (total - ideal) / ideal } else { 0.0 })
            })
            .collect()
    }

    /// Whether every optimized district lies within the population bounds.
    pub fn within_bounds(&self) -> bool {
        let totals = self.district_totals();
        (1..=self.num_districts()).all(|d| {
            let total = totals.get(&d).copied().unwrap_or(0) as f64;
            total >= self.stats.lower_bound - 1e-6 && total <= self.stats.upper_bound + 1e-6
        })
    }

    /// Build the machine readable summary.
    pub fn summary(&self) -> PlanSummary {
        let deviations = self.deviations();
        let mut counts = BTreeMap::<u32, usize>::new();
        self.rows.iter().for_each(|row| *counts.entry(row.district).or_default() += 1);

        let districts = self.district_totals().into_iter()
            .map(|(district, population)| DistrictSummary {
                district,
                units: counts[&district],
                population,
                deviation: deviations.get(&district).copied(),
                fixed: district > self.num_districts(),
            })
            .collect();

        PlanSummary {
            status: SolveStatus::Optimal,
            objective: self.objective,
            ideal_population: self.stats.ideal_population,
            lower_bound: self.stats.lower_bound,
            upper_bound: self.stats.upper_bound,
            districts,
            stats: self.stats.clone(),
        }
    }

    /// Write the `name,population,district` table to a CSV file.
    pub fn to_csv(&self, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        write_plan_rows(&self.rows, path)
    }

    /// Render the `name,population,district` table as CSV text.
    pub fn to_csv_string(&self) -> Result<String> {
        write_plan_rows_string(&self.rows)
    }

    /// Write the summary as JSON.
    pub fn write_summary(&self, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        write_json_file(path, &self.summary())
    }

    /// Render the summary as JSON text.
    pub fn summary_json(&self) -> Result<String> {
        to_json_string(&self.summary())
    }
}
