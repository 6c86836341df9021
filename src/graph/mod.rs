mod build;
mod components;
mod graph;
mod isolation;

pub use build::{build_adjacency, AdjacencyBuilder, BuildReport};
pub use graph::Adjacency;
pub use isolation::{check_isolated, IsolationPolicy};
