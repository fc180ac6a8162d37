//! Core types and filter encoding for renewable-energy zone exploration.
//!
//! This crate provides:
//! - `resource`, `area`, `zone_type`: what the user selects
//! - `filter`, `units`, `catalog`: the tunable criteria
//! - `encoder`: filter state to backend query fragment
//! - `zone`: scored zones returned by the backend

pub mod area;
pub mod catalog;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod resource;
pub mod units;
pub mod zone;
pub mod zone_type;

pub use error::{Result, RezError};
