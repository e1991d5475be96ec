// ScanLogs - app/mod.rs
//
// Application layer: per-report session state (filters, page, export).
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod session;
