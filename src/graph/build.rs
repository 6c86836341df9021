use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::{graph::Adjacency, unit::{NameNormalizer, UnitTable}};

/// Counters collected while matching raw border records against the table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Records seen.
    pub records: usize,
    /// Records with both names in the table, self pairs excluded.
    pub matched: usize,
    /// Records naming the same unit twice.
    pub self_pairs: usize,
    /// Records dropped because a name is blank or qualified with another region.
    pub rejected: usize,
    /// Normalized names absent from the table, with the number of records naming them.
    pub unknown_names: BTreeMap<String, usize>,
}

/// Accumulates border-sharing records into an [`Adjacency`] relation over a table.
#[derive(Debug)]
pub struct AdjacencyBuilder<'a> {
    table: &'a UnitTable,
    names: &'a NameNormalizer,
    neighbors: Vec<BTreeSet<u32>>,
    report: BuildReport,
}

impl<'a> AdjacencyBuilder<'a> {
    pub fn new(table: &'a UnitTable, names: &'a NameNormalizer) -> Self {
        Self {
            table,
            names,
            neighbors: vec![BTreeSet::new(); table.len()],
            report: BuildReport::default(),
        }
    }

    /// Record that `a` and `b` share a border. Order does not matter.
    pub fn add_pair(&mut self, a: &str, b: &str) {
        self.report.records += 1;

        let (Some(a), Some(b)) = (self.names.normalize(a), self.names.normalize(b)) else {
            self.report.rejected += 1;
            return;
        };

        let (u, v) = match (self.table.index_of(&a), self.table.index_of(&b)) {
            (Some(u), Some(v)) => (u, v),
            (u, v) => {
                if u.is_none() { *self.report.unknown_names.entry(a).or_default() += 1 }
                if v.is_none() { *self.report.unknown_names.entry(b).or_default() += 1 }
                return;
            }
        };

        if u == v {
            self.report.self_pairs += 1;
            return;
        }

        self.report.matched += 1;
        self.neighbors[u].insert(v as u32);
        self.neighbors[v].insert(u as u32);
    }

    /// Record every pair from an iterator.
    pub fn extend<A, B>(&mut self, pairs: impl IntoIterator<Item = (A, B)>)
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        pairs.into_iter().for_each(|(a, b)| self.add_pair(a.as_ref(), b.as_ref()));
    }

    /// Freeze the relation.
    pub fn finish(self) -> (Adjacency, BuildReport) {
        let edges = self.neighbors.into_iter()
            .map(|set| set.into_iter().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let adjacency = Adjacency::new(self.table.len(), &edges);

        info!(
            "[graph::build] {} units, {} adjacent pairs from {} records ({} matched, {} self, {} rejected)",
            adjacency.node_count(), adjacency.pair_count(),
            self.report.records, self.report.matched, self.report.self_pairs, self.report.rejected,
        );
        if !self.report.unknown_names.is_empty() {
            debug!("[graph::build] {} names not in the unit table", self.report.unknown_names.len());
        }

        (adjacency, self.report)
    }
}

/// Build the adjacency relation for `table` from raw `(a, b)` border records.
pub fn build_adjacency<A, B>(
    table: &UnitTable,
    pairs: impl IntoIterator<Item = (A, B)>,
    names: &NameNormalizer,
) -> (Adjacency, BuildReport)
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut builder = AdjacencyBuilder::new(table, names);
    builder.extend(pairs);
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{NameConvention, UnitRecord};

    fn setup() -> (UnitTable, NameNormalizer) {
        let names = NameConvention::with_suffix("county").in_region("WA").compile().unwrap();
        let table = UnitTable::new(
            ["Adams", "Franklin", "Grant", "Lincoln", "Whitman"].map(|n| UnitRecord::new(n, 10)),
            &names,
        ).unwrap();
        (table, names)
    }

    #[test]
    fn pairs_in_either_order_produce_symmetric_edges() {
        let (table, names) = setup();
        let (adjacency, report) = build_adjacency(&table, [
            ("Adams County, WA", "Franklin County, WA"),
            ("Grant County, WA", "Adams County, WA"),
        ], &names);

        let adams = table.index_of("adams").unwrap();
        let franklin = table.index_of("franklin").unwrap();
        let grant = table.index_of("grant").unwrap();

        assert!(adjacency.adjacent(adams, franklin) && adjacency.adjacent(franklin, adams));
        assert!(adjacency.adjacent(adams, grant) && adjacency.adjacent(grant, adams));
        assert!(!adjacency.adjacent(franklin, grant));
        assert_eq!(report.matched, 2);
    }

    #[test]
    fn duplicates_and_self_pairs_are_ignored() {
        let (table, names) = setup();
        let (adjacency, report) = build_adjacency(&table, [
            ("Adams", "Lincoln"),
            ("Lincoln", "Adams"),
            ("Adams", "Adams"),
        ], &names);

        assert_eq!(adjacency.pair_count(), 1);
        assert_eq!(report.self_pairs, 1);
        assert!(adjacency.pairs().all(|(u, v)| u != v));
    }

    #[test]
    fn foreign_and_unknown_names_are_reported() {
        let (table, names) = setup();
        let (adjacency, report) = build_adjacency(&table, [
            ("Whitman County, WA", "Latah County, ID"),
            ("Whitman County, WA", "Spokane County, WA"),
            ("Adams County, ID", "Whitman County, WA"),
        ], &names);

        assert_eq!(adjacency.pair_count(), 0);
        assert_eq!(report.rejected, 2);
        assert_eq!(report.unknown_names.get("spokane"), Some(&1));
        assert_eq!(adjacency.isolated().count(), table.len());
    }

    #[test]
    fn accepts_owned_records_from_a_reader() {
        let (table, names) = setup();
        let pairs: Vec<(String, String)> = vec![
            ("Adams County, WA".into(), "Lincoln County, WA".into()),
            ("Lincoln County, WA".into(), "Whitman County, WA".into()),
        ];
        let (adjacency, report) = build_adjacency(&table, pairs, &names);

        assert_eq!(adjacency.pair_count(), 2);
        assert_eq!(report.matched, 2);
    }

    #[test]
    fn relation_is_symmetric_for_arbitrary_input() {
        let (table, names) = setup();
        let all = ["Adams", "Franklin", "Grant", "Lincoln", "Whitman"];
        let pairs = all.iter().enumerate()
            .flat_map(|(i, a)| all.iter().skip(i * 2 % 5).map(move |b| (*a, *b)))
            .collect::<Vec<_>>();
        let (adjacency, _) = build_adjacency(&table, pairs, &names);

        for u in 0..table.len() {
            assert!(!adjacency.adjacent(u, u));
            for v in 0..table.len() {
                assert_eq!(adjacency.adjacent(u, v), adjacency.adjacent(v, u));
            }
        }
    }
}
