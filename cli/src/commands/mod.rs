pub mod download;
pub mod redistrict;
