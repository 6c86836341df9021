//! CSV format reading and writing operations.

mod read;
mod write;

pub use read::{
    read_adjacency, read_adjacency_bytes, read_adjacency_string, read_unit_table,
    read_unit_table_string, AdjacencyFormat,
};
pub(crate) use write::{write_plan_rows, write_plan_rows_string};
