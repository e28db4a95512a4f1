//! CLI command implementations

pub mod measure;
pub mod open;
pub mod search;
pub mod tile;
pub mod zones;
