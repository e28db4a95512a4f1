//! Endpoint-specific API implementations
//!
//! | Module | Service | Description |
//! |--------|---------|-------------|
//! | `search` | geocoder `/search` | Free-text place search for the search box |
//! | `dispatch` | operator endpoint | Receives drawn polygon information |

pub mod dispatch;
pub mod search;

pub use dispatch::{DispatchApi, DispatchOutcome};
pub use search::{Place, SearchApi};
