// ScanLogs - platform/mod.rs
//
// Platform abstraction layer: config location and file I/O.
// Dependencies: standard library, directories crate, core export types.

pub mod config;
pub mod fs;
