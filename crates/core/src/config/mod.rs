//! Configuration loading and schema definitions
//!
//! Every section has defaults, so an empty or missing file yields a working
//! viewer centred on the default map view.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
