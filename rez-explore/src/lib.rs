//! Zone exploration: the zones request lifecycle, the explore page
//! coordinator and exports.
//!
//! - `fetch`: `Idle -> Loading -> Ready | Failed`, last submit wins
//! - `coordinator`: URL-bound selection, layer URLs, `maxLCOE` derivation
//! - `layers`: tile URL templates
//! - `export`: raw-data export requests and zones CSV
//! - `api` (feature `api`): the `reqwest` backend client

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod coordinator;
pub mod export;
pub mod fetch;
pub mod layers;

#[cfg(feature = "api")]
pub use api::ApiClient;
pub use config::ExploreConfig;
pub use coordinator::{generate_zones, ExploreCoordinator};
pub use fetch::{FetchError, FetchRequest, FetchState, Ticket, ZoneFetchMachine, ZoneSource};
