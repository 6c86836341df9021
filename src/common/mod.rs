mod fs;
#[cfg(feature = "download")]
mod download;

pub(crate) use fs::*;
#[cfg(feature = "download")]
pub use download::{download_file, fetch_bytes, CENSUS_ADJACENCY_URL};
