//! Typed two-way binding between explorer state and the URL query string.
//!
//! - `codec`: one field, one query parameter, with fallback to defaults
//! - `store`: many fields over one string, re-synced on navigation
//! - `host`: where the string lives
//! - `schema`: the explorer's own fields (`areaId`, `maxLCOE`, ...)

pub mod codec;
pub mod host;
pub mod query;
pub mod schema;
pub mod store;

pub use codec::{QsField, Validator};
pub use host::{QueryHost, SharedQuery};
pub use store::{QsKey, QueryStateStore};
