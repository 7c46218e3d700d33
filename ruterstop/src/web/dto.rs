//! Request DTOs for the web API.

use serde::Deserialize;

use crate::domain::{Direction, InvalidDirection};
use crate::pipeline::DepartureOptions;

/// Query string accepted by the departure board route.
///
/// Values are kept as strings so that bad input can be reported with our
/// own response instead of the extractor's. Empty values count as absent.
/// Unknown parameters are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartureQuery {
    /// "inbound" or "outbound"
    pub direction: Option<String>,
    /// Minimum ETA in minutes
    pub min_eta: Option<String>,
    /// Long ETA threshold in minutes
    pub long_eta: Option<String>,
    /// Presence flag; any value, even empty, turns grouping on
    pub grouped: Option<String>,
}

/// A query parameter that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidQuery {
    #[error(transparent)]
    Direction(#[from] InvalidDirection),

    #[error("invalid integer for {param}: {value}")]
    Integer { param: &'static str, value: String },
}

impl DepartureQuery {
    /// Apply the query on top of `defaults`.
    pub fn apply(&self, defaults: &DepartureOptions) -> Result<DepartureOptions, InvalidQuery> {
        let mut options = defaults.clone();

        if let Some(direction) = non_empty(&self.direction) {
            options.directions = Some(vec![direction.parse::<Direction>()?]);
        }
        if let Some(value) = non_empty(&self.min_eta) {
            options.min_eta_mins = parse_minutes("min_eta", value)?;
        }
        if let Some(value) = non_empty(&self.long_eta) {
            options.long_eta_mins = parse_minutes("long_eta", value)?;
        }
        if self.grouped.is_some() {
            options.grouped = true;
        }

        Ok(options)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_minutes(param: &'static str, value: &str) -> Result<i64, InvalidQuery> {
    value.parse().map_err(|_| InvalidQuery::Integer {
        param,
        value: value.to_string(),
    })
}
