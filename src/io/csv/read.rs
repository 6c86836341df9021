//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result, ensure};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, CsvReader, DataType}};
use serde::{Deserialize, Serialize};

use crate::unit::UnitRecord;

/// Layout of a border-sharing list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdjacencyFormat {
    /// Legacy Census `county_adjacency.txt`: tab separated, no header, four
    /// columns (name, FIPS, neighbor name, neighbor FIPS). The first column is
    /// only filled on the first row of each group.
    #[default]
    CensusTab,
    /// 2020+ Census adjacency file: pipe separated with a header row, same
    /// four columns.
    CensusPipe,
    /// Comma separated `a,b` pairs with a header row.
    Pairs,
}

impl AdjacencyFormat {
    /// Column indices of the two names in a row.
    fn name_columns(&self) -> (usize, usize) {
        match self {
            AdjacencyFormat::CensusTab | AdjacencyFormat::CensusPipe => (0, 2),
            AdjacencyFormat::Pairs => (0, 1),
        }
    }

    fn read_options(&self) -> CsvReadOptions {
        let options = match self {
            AdjacencyFormat::CensusTab => CsvReadOptions::default()
                .with_has_header(false)
                .map_parse_options(|po| po.with_separator(b'\t')),
            AdjacencyFormat::CensusPipe => CsvReadOptions::default()
                .with_has_header(true)
                .map_parse_options(|po| po.with_separator(b'|')),
            AdjacencyFormat::Pairs => CsvReadOptions::default()
                .with_has_header(true),
        };
        // Read every column as a string.
        options.with_infer_schema_length(Some(0))
    }
}

/// Reads a CSV file from `path` into a Polars DataFrame.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    CsvReader::new(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

/// Reads a CSV from a string.
pub(crate) fn read_csv_string(csv: &str) -> Result<DataFrame> {
    CsvReader::new(Cursor::new(csv.as_bytes()))
        .finish()
        .with_context(|| "[io::csv::read] Failed to read CSV from string")
}

/// Read the unit table (`name`, `population` columns) from a CSV file.
pub fn read_unit_table(path: &Path, name_column: &str, population_column: &str) -> Result<Vec<UnitRecord>> {
    unit_records(read_csv(path)?, name_column, population_column)
        .with_context(|| format!("[io::csv::read] Invalid unit table {}", path.display()))
}

/// Read the unit table from CSV text.
pub fn read_unit_table_string(csv: &str, name_column: &str, population_column: &str) -> Result<Vec<UnitRecord>> {
    unit_records(read_csv_string(csv)?, name_column, population_column)
}

fn unit_records(df: DataFrame, name_column: &str, population_column: &str) -> Result<Vec<UnitRecord>> {
    ensure!(df.height() > 0, "[io::csv::read] Unit table is empty");

    let names = df.column(name_column)
        .with_context(|| format!("[io::csv::read] Unit table has no column {name_column:?}"))?
        .cast(&DataType::String)?;
    let populations = df.column(population_column)
        .with_context(|| format!("[io::csv::read] Unit table has no column {population_column:?}"))?
        .cast(&DataType::Int64)?;

    names.str()?.into_iter()
        .zip(populations.i64()?.into_iter())
        .enumerate()
        .map(|(row, (name, population))| {
            let name = name
                .with_context(|| format!("[io::csv::read] Row {row}: missing unit name"))?;
            let population = population
                .with_context(|| format!("[io::csv::read] Row {row} ({name}): missing or non-numeric population"))?;
            ensure!(population >= 0, "[io::csv::read] Row {row} ({name}): negative population {population}");
            Ok(UnitRecord::new(name, population as u64))
        })
        .collect()
}

/// Read border-sharing name pairs from a file.
pub fn read_adjacency(path: &Path, format: AdjacencyFormat) -> Result<Vec<(String, String)>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("[io::csv::read] Failed to open adjacency file: {}", path.display()))?;
    read_adjacency_bytes(&bytes, format)
        .with_context(|| format!("[io::csv::read] Invalid adjacency file {}", path.display()))
}

/// Read border-sharing name pairs from raw bytes. Invalid UTF-8 (the legacy
/// Census file is Latin-1) is replaced rather than rejected.
pub fn read_adjacency_bytes(bytes: &[u8], format: AdjacencyFormat) -> Result<Vec<(String, String)>> {
    read_adjacency_string(&String::from_utf8_lossy(bytes), format)
}

/// Read border-sharing name pairs from text.
pub fn read_adjacency_string(text: &str, format: AdjacencyFormat) -> Result<Vec<(String, String)>> {
    let df = format.read_options()
        .into_reader_with_file_handle(Cursor::new(text.as_bytes()))
        .finish()
        .context("[io::csv::read] Failed to parse adjacency list")?;

    adjacency_pairs(&df, format)
}

fn adjacency_pairs(df: &DataFrame, format: AdjacencyFormat) -> Result<Vec<(String, String)>> {
    let (a, b) = format.name_columns();
    ensure!(df.width() > a.max(b), "[io::csv::read] Adjacency list has {} columns, expected at least {}", df.width(), a.max(b) + 1);

    let columns = df.get_columns();
    let firsts = columns[a].str()?;
    let seconds = columns[b].str()?;

    let non_blank = |s: &&str| !s.trim().is_empty();
    let mut current: Option<String> = None;
    let mut pairs = Vec::with_capacity(df.height());
    for (first, second) in firsts.into_iter().zip(seconds.into_iter()) {
        match first.filter(non_blank) {
            Some(first) => current = Some(first.to_string()),
            // Continuation rows inherit the previous name.
            None if format == AdjacencyFormat::CensusTab => {}
            None => current = None,
        }

        if let (Some(first), Some(second)) = (current.as_deref(), second.filter(non_blank)) {
            pairs.push((first.to_string(), second.to_string()));
        }
    }

    Ok(pairs)
}
