//! Conversion from Entur DTOs to domain types.

use std::fmt;
use std::slice;

use chrono::{DateTime, NaiveDateTime};
use tracing::debug;

use crate::domain::{Departure, Direction, norwegian_ascii};

use super::error::ParseError;
use super::types::{EstimatedCall, StopPlaceHit, StopResponse, StopSearchResponse};

/// The only timestamp layout the journey planner is trusted to send.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parse departures out of a stop document, lazily and in upstream order.
///
/// An unknown stop (`stopPlace: null`) yields nothing. The returned iterator
/// is single-pass; call this again on the same document for a second pass.
pub fn parse_departures(doc: &StopResponse) -> Departures<'_> {
    let calls = doc
        .data
        .stop_place
        .as_ref()
        .map(|stop| stop.estimated_calls.as_slice())
        .unwrap_or(&[]);

    Departures {
        calls: calls.iter(),
    }
}

/// Iterator over the departures in a stop document.
///
/// Yields an error for a call whose timestamp is malformed. Calls whose
/// direction is neither inbound nor outbound are not departures we can show
/// and are skipped.
pub struct Departures<'a> {
    calls: slice::Iter<'a, EstimatedCall>,
}

impl Iterator for Departures<'_> {
    type Item = Result<Departure, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        for call in self.calls.by_ref() {
            match convert_call(call) {
                Ok(Some(departure)) => return Some(Ok(departure)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

fn convert_call(call: &EstimatedCall) -> Result<Option<Departure>, ParseError> {
    let eta = parse_timestamp(&call.expected_arrival_time)?;

    let Ok(direction) = call.service_journey.direction_type.parse::<Direction>() else {
        debug!(
            direction = %call.service_journey.direction_type,
            line = %call.service_journey.line.public_code,
            "Skipping call with unsupported direction"
        );
        return Ok(None);
    };

    let name = call
        .destination_display
        .front_text
        .as_deref()
        .map(norwegian_ascii)
        .unwrap_or_default();

    Ok(Some(
        Departure::new(
            call.service_journey.line.public_code.clone(),
            name,
            eta,
            direction,
        )
        .with_realtime(call.realtime),
    ))
}

/// Parse an upstream timestamp, keeping the wall-clock time as written.
///
/// The offset must be present but is otherwise discarded, so
/// "2020-01-01T10:00:00+0100" becomes 10:00.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ParseError> {
    DateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|dt| dt.naive_local())
        .map_err(|source| ParseError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

/// A stop place found by name search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopPlace {
    /// Numeric part of the NSR id, usable as `--stop-id`.
    pub id: String,
    pub name: String,
    pub region: String,
    pub parent_region: String,
}

impl fmt::Display for StopPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<8}{} ({}, {})",
            self.id, self.name, self.region, self.parent_region
        )
    }
}

/// Convert a stop name search response into stop places.
pub fn parse_stops(doc: &StopSearchResponse) -> impl Iterator<Item = StopPlace> + '_ {
    doc.data.stop_place.iter().map(convert_stop)
}

fn convert_stop(hit: &StopPlaceHit) -> StopPlace {
    let id = hit.id.rsplit(':').next().unwrap_or(hit.id.as_str()).to_string();

    let region = hit.topographic_place.as_ref();
    let parent_region = region.and_then(|r| r.parent_topographic_place.as_deref());

    StopPlace {
        id,
        name: hit.name.value.clone(),
        region: region.map(|r| r.name.value.clone()).unwrap_or_default(),
        parent_region: parent_region
            .map(|r| r.name.value.clone())
            .unwrap_or_default(),
    }
}
