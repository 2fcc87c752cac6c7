// geofilter - core/mod.rs
//
// Core correlation logic layer.
// Must NOT depend on: app or platform. Filesystem access is limited to
// metadata reads in discovery; nothing in this layer writes to disk.

pub mod bounds;
pub mod classify;
pub mod discovery;
pub mod export;
pub mod filter;
pub mod model;
pub mod record;
