use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{graph::Adjacency, unit::UnitTable};

/// What to do with units that have no recorded neighbor.
///
/// An isolated unit usually means the unit table and the adjacency source
/// disagree on naming.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationPolicy {
    Ignore,
    #[default]
    Warn,
    Error,
}

/// Names of units with no neighbor, handled according to `policy`.
pub fn check_isolated(table: &UnitTable, adjacency: &Adjacency, policy: IsolationPolicy) -> Result<Vec<String>> {
    ensure!(adjacency.node_count() == table.len(),
        "[graph::isolation] Adjacency has {} nodes but the unit table has {} units", adjacency.node_count(), table.len());

    let isolated = adjacency.isolated()
        .map(|u| table.units()[u].name().to_string())
        .collect::<Vec<_>>();

    if isolated.is_empty() || adjacency.node_count() < 2 { return Ok(isolated) }

    match policy {
        IsolationPolicy::Ignore => {}
        IsolationPolicy::Warn => warn!(
            "[graph::isolation] {} of {} units have no neighbor (check name normalization): {}",
            isolated.len(), table.len(), isolated.join(", "),
        ),
        IsolationPolicy::Error => bail!(
            "[graph::isolation] {} of {} units have no neighbor (check name normalization): {}",
            isolated.len(), table.len(), isolated.join(", "),
        ),
    }

    Ok(isolated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::build_adjacency, unit::{NameConvention, UnitRecord}};

    fn fixture() -> (UnitTable, Adjacency) {
        let names = NameConvention::default().compile().unwrap();
        let table = UnitTable::new(["a", "b", "c"].map(|n| UnitRecord::new(n, 1)), &names).unwrap();
        let (adjacency, _) = build_adjacency(&table, [("a", "b")], &names);
        (table, adjacency)
    }

    #[test]
    fn warn_and_ignore_return_isolated_names() {
        let (table, adjacency) = fixture();
        assert_eq!(check_isolated(&table, &adjacency, IsolationPolicy::Warn).unwrap(), vec!["c"]);
        assert_eq!(check_isolated(&table, &adjacency, IsolationPolicy::Ignore).unwrap(), vec!["c"]);
    }

    #[test]
    fn error_policy_fails_fast() {
        let (table, adjacency) = fixture();
        let err = check_isolated(&table, &adjacency, IsolationPolicy::Error).unwrap_err();
        assert!(err.to_string().contains("c"));
    }

    #[test]
    fn mismatched_table_is_an_error() {
        let (_, adjacency) = fixture();
        let names = NameConvention::default().compile().unwrap();
        let other = UnitTable::new(["a", "b"].map(|n| UnitRecord::new(n, 1)), &names).unwrap();
        let err = check_isolated(&other, &adjacency, IsolationPolicy::Ignore).unwrap_err();
        assert!(err.to_string().contains("3 nodes"));
    }

    #[test]
    fn single_unit_is_never_an_error() {
        let names = NameConvention::default().compile().unwrap();
        let table = UnitTable::new([UnitRecord::new("solo", 5)], &names).unwrap();
        let (adjacency, _) = build_adjacency(&table, Vec::<(&str, &str)>::new(), &names);
        assert!(check_isolated(&table, &adjacency, IsolationPolicy::Error).is_ok());
    }
}
