// ScanLogs - core/mod.rs
//
// Core business logic layer: parse -> normalise -> filter/paginate -> export.
// Must NOT depend on: app or platform, and never touches the filesystem.

pub mod export;
pub mod filter;
pub mod label;
pub mod line;
pub mod model;
pub mod paginate;
pub mod parser;
pub mod scan_result;
pub mod store;
