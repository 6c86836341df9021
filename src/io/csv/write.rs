//! CSV writing operations.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{CsvWriter, NamedFrom}, series::Series};

use crate::plan::PlanRow;

/// Write a DataFrame to a CSV file.
pub(crate) fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::csv::write] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(df)
        .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
}

/// Write a DataFrame to a CSV string.
pub(crate) fn write_csv_string(df: &mut DataFrame) -> Result<String> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .finish(df)
        .with_context(|| "[io::csv::write] Failed to write CSV to string")?;
    String::from_utf8(buffer)
        .with_context(|| "[io::csv::write] CSV output is not valid UTF-8")
}

/// Assignment table as a `name,population,district` DataFrame.
fn plan_frame(rows: &[PlanRow]) -> Result<DataFrame> {
    let names = rows.iter().map(|row| row.name.clone()).collect::<Vec<_>>();
    let populations = rows.iter().map(|row| row.population).collect::<Vec<_>>();
    let districts = rows.iter().map(|row| row.district).collect::<Vec<_>>();

    Ok(DataFrame::new(vec![
        Series::new("name".into(), names).into(),
        Series::new("population".into(), populations).into(),
        Series::new("district".into(), districts).into(),
    ])?)
}

/// Write plan rows to a CSV file.
pub(crate) fn write_plan_rows(rows: &[PlanRow], path: &Path) -> Result<()> {
    write_csv(&mut plan_frame(rows)?, path)
}

/// Write plan rows to a CSV string.
pub(crate) fn write_plan_rows_string(rows: &[PlanRow]) -> Result<String> {
    write_csv_string(&mut plan_frame(rows)?)
}
