//! Format-specific reading and writing for the pipeline's collaborators.
//!
//! - `csv` - unit tables, adjacency lists and assignment tables
//! - `json` - plan summaries

pub(crate) mod csv;
pub(crate) mod json;
