use std::collections::{BTreeMap, HashMap};

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::unit::NameNormalizer;

/// A raw `{name, population}` row as read from the unit table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub name: String,
    pub population: u64,
}

impl UnitRecord {
    pub fn new(name: impl Into<String>, population: u64) -> Self {
        Self { name: name.into(), population }
    }
}

/// An atomic region: display name, normalized key and population.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    name: String,
    key: String,
    population: u64,
}

impl Unit {
    /// Name as it appeared in the input table (trimmed).
    #[inline] pub fn name(&self) -> &str { &self.name }

    /// Normalized name used for matching.
    #[inline] pub fn key(&self) -> &str { &self.key }

    #[inline] pub fn population(&self) -> u64 { self.population }
}

/// A unit pinned to a district outside the optimization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedUnit {
    pub unit: Unit,
    pub district: u32,
}

/// The set of units, in the canonical order shared by the adjacency relation
/// and the solver (sorted by normalized key).
#[derive(Clone, Debug, Default)]
pub struct UnitTable {
    units: Vec<Unit>,
    index: HashMap<String, u32>,
}

impl UnitTable {
    /// Build a table from raw records, normalizing names with `names`.
    pub fn new(records: impl IntoIterator<Item = UnitRecord>, names: &NameNormalizer) -> Result<Self> {
        let mut units = Vec::new();
        for record in records {
            let name = record.name.trim().to_string();
            let Some(key) = names.normalize(&name) else {
                anyhow::bail!("[unit::table] Unit name {:?} does not normalize to a valid key", record.name);
            };
            units.push(Unit { name, key, population: record.population });
        }

        Self::from_units(units)
    }

    fn from_units(mut units: Vec<Unit>) -> Result<Self> {
        units.sort_by(|a, b| a.key.cmp(&b.key));

        let mut index = HashMap::with_capacity(units.len());
        for (i, unit) in units.iter().enumerate() {
            let previous = index.insert(unit.key.clone(), i as u32);
            ensure!(previous.is_none(), "[unit::table] Duplicate unit name after normalization: {:?}", unit.key);
        }

        Ok(Self { units, index })
    }

    /// Number of units.
    #[inline] pub fn len(&self) -> usize { self.units.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.units.is_empty() }

    /// Units in canonical order.
    #[inline] pub fn units(&self) -> &[Unit] { &self.units }

    /// Get the unit at canonical position `i`.
    #[inline] pub fn get(&self, i: usize) -> Option<&Unit> { self.units.get(i) }

    /// Canonical position of a normalized key.
    #[inline] pub fn index_of(&self, key: &str) -> Option<usize> { self.index.get(key).map(|&i| i as usize) }

    /// Total population of all units.
    pub fn total_population(&self) -> u64 {
        self.units.iter().map(|u| u.population).sum()
    }

    /// Ideal per-district population, `total / districts`.
    pub fn ideal_population(&self, districts: u32) -> f64 {
        self.total_population() as f64 / districts as f64
    }

    /// Split off manually assigned units, returning the working table and the
    /// fixed units. Fixed labels must not collide with the optimized labels
    /// `1..=districts`, and every override must name a unit in the table.
    pub fn split_overrides(
        self,
        overrides: &BTreeMap<String, u32>,
        names: &NameNormalizer,
        districts: u32,
    ) -> Result<(UnitTable, Vec<FixedUnit>)> {
        let mut pinned = HashMap::with_capacity(overrides.len());
        for (name, &district) in overrides {
            let Some(key) = names.normalize(name) else {
                anyhow::bail!("[unit::table] Override name {name:?} does not normalize to a valid key");
            };
            ensure!(self.index.contains_key(&key), "[unit::table] Override {name:?} does not match any unit");
            ensure!(district > districts,
                "[unit::table] Override {name:?} uses district {district}, which collides with optimized districts 1..={districts}");
            let previous = pinned.insert(key, district);
            ensure!(previous.is_none_or(|prev| prev == district),
                "[unit::table] Override {name:?} conflicts with another override for the same unit");
        }

        let (fixed, working): (Vec<_>, Vec<_>) = self.units.into_iter()
            .partition(|unit| pinned.contains_key(&unit.key));

        let fixed = fixed.into_iter()
            .map(|unit| {
                let district = pinned[&unit.key];
                FixedUnit { unit, district }
            })
            .collect();

        Ok((Self::from_units(working)?, fixed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::NameConvention;

    fn names() -> NameNormalizer {
        NameConvention::with_suffix("county").compile().unwrap()
    }

    fn table() -> UnitTable {
        UnitTable::new([
            UnitRecord::new("Whitman County", 47_000),
            UnitRecord::new("Adams County", 20_000),
            UnitRecord::new("King County", 2_270_000),
            UnitRecord::new("Lincoln County", 11_000),
        ], &names()).unwrap()
    }

    #[test]
    fn units_are_sorted_by_key() {
        let table = table();
        let keys = table.units().iter().map(|u| u.key()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["adams", "king", "lincoln", "whitman"]);
        assert_eq!(table.index_of("lincoln"), Some(2));
        assert_eq!(table.get(0).unwrap().name(), "Adams County");
    }

    #[test]
    fn ideal_population_divides_total() {
        let table = table();
        assert_eq!(table.total_population(), 2_348_000);
        assert_eq!(table.ideal_population(4), 587_000.0);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = UnitTable::new([
            UnitRecord::new("Adams County", 1),
            UnitRecord::new("ADAMS", 2),
        ], &names()).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(UnitTable::new([UnitRecord::new("  ", 1)], &names()).is_err());
    }

    #[test]
    fn overrides_are_split_out() {
        let overrides = BTreeMap::from([("King County".to_string(), 4)]);
        let (working, fixed) = table().split_overrides(&overrides, &names(), 3).unwrap();

        assert_eq!(working.len(), 3);
        assert_eq!(working.index_of("king"), None);
        assert_eq!(working.index_of("whitman"), Some(2));
        assert_eq!(working.total_population(), 78_000);

        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed[0].unit.name(), "King County");
        assert_eq!(fixed[0].district, 4);
    }

    #[test]
    fn overrides_must_match_and_not_collide() {
        let unknown = BTreeMap::from([("Pierce".to_string(), 9)]);
        assert!(table().split_overrides(&unknown, &names(), 3).is_err());

        let colliding = BTreeMap::from([("King".to_string(), 2)]);
        assert!(table().split_overrides(&colliding, &names(), 3).is_err());
    }

    #[test]
    fn overrides_naming_the_same_unit_must_agree() {
        let conflicting = BTreeMap::from([("King".to_string(), 7), ("King County".to_string(), 8)]);
        let err = table().split_overrides(&conflicting, &names(), 3).unwrap_err();
        assert!(err.to_string().contains("conflicts"));

        let agreeing = BTreeMap::from([("King".to_string(), 7), ("King County".to_string(), 7)]);
        let (working, fixed) = table().split_overrides(&agreeing, &names(), 3).unwrap();
        assert_eq!(working.len(), 3);
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed[0].district, 7);
    }
}
