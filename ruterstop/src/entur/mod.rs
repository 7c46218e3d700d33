//! Entur API client.
//!
//! This module talks to the Entur JourneyPlanner and stop-place GraphQL
//! APIs, which provide realtime departure information for Norwegian public
//! transport.
//!
//! Key characteristics:
//! - Stops are addressed by the numeric part of their NSR id
//!   (`NSR:StopPlace:6013` is stop `6013`)
//! - An unknown stop is not an HTTP error; the response carries a null
//!   `stopPlace`
//! - Timestamps look like `2020-01-01T10:00:00+0100` and are kept as
//!   local wall-clock times

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{EnturClient, EnturConfig, StopFetcher};
pub use convert::{
    Departures, StopPlace, TIMESTAMP_FORMAT, parse_departures, parse_stops, parse_timestamp,
};
pub use error::{EnturError, ParseError};
pub use mock::MockEnturClient;
pub use types::{
    DestinationDisplay, EstimatedCall, Line, LocalizedName, ServiceJourney, StopData,
    StopPlaceCalls, StopPlaceHit, StopResponse, StopSearchData, StopSearchResponse,
    TopographicPlace,
};
