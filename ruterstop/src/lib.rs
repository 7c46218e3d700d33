//! Realtime departure boards for Norwegian public transport stops.
//!
//! Fetches upcoming calls from the Entur JourneyPlanner, caches them for a
//! short while, and renders fixed-width text lines suitable for small
//! displays and terminals.

pub mod cache;
pub mod clock;
pub mod domain;
pub mod entur;
pub mod error;
pub mod pipeline;
pub mod web;

pub use error::Error;
