// geofilter - app/mod.rs
//
// Application layer: flight config loading and run orchestration.
// Dependencies: core and platform layers.

pub mod flight;
pub mod pipeline;
pub mod transfer;
