//! Entur GraphQL response DTOs.
//!
//! These types map directly to the JSON returned by the journey planner and
//! stop-place APIs for the queries in [`super::client`]. Only the fields we
//! ask for are modelled.

use serde::Deserialize;

/// Response to the realtime stop query.
#[derive(Debug, Clone, Deserialize)]
pub struct StopResponse {
    pub data: StopData,
}

impl StopResponse {
    /// Whether the journey planner knows the requested stop.
    pub fn stop_exists(&self) -> bool {
        self.data.stop_place.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopData {
    /// `null` when no stop place has the requested id.
    pub stop_place: Option<StopPlaceCalls>,
}

/// A stop place and its upcoming calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPlaceCalls {
    pub name: Option<String>,

    /// Upcoming calls, already in time order.
    #[serde(default)]
    pub estimated_calls: Vec<EstimatedCall>,
}

/// One vehicle calling at the stop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedCall {
    /// e.g. "2020-01-01T10:00:00+0100"
    pub expected_arrival_time: String,

    /// Whether the time is backed by live tracking.
    #[serde(default)]
    pub realtime: bool,

    pub destination_display: DestinationDisplay,

    pub service_journey: ServiceJourney,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationDisplay {
    pub front_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceJourney {
    /// "inbound" or "outbound".
    pub direction_type: String,
    pub line: Line,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub public_code: String,
}

/// Response to the stop name search query.
#[derive(Debug, Clone, Deserialize)]
pub struct StopSearchResponse {
    pub data: StopSearchData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSearchData {
    #[serde(default)]
    pub stop_place: Vec<StopPlaceHit>,
}

/// A stop place matching a name search.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPlaceHit {
    /// NSR id, e.g. "NSR:StopPlace:6013".
    pub id: String,
    pub name: LocalizedName,
    pub topographic_place: Option<TopographicPlace>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopographicPlace {
    pub name: LocalizedName,
    pub parent_topographic_place: Option<Box<TopographicPlace>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedName {
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_stop_place_means_unknown_stop() {
        let doc: StopResponse = serde_json::from_str(r#"{"data": {"stopPlace": null}}"#).unwrap();
        assert!(!doc.stop_exists());
    }

    #[test]
    fn deserializes_estimated_calls() {
        let json = r#"{
            "data": {
                "stopPlace": {
                    "name": "Stortinget",
                    "estimatedCalls": [{
                        "expectedArrivalTime": "2020-01-01T10:00:00+0100",
                        "realtime": true,
                        "destinationDisplay": {"frontText": "Snarøya"},
                        "serviceJourney": {
                            "directionType": "outbound",
                            "line": {"publicCode": "31"}
                        }
                    }]
                }
            }
        }"#;
        let doc: StopResponse = serde_json::from_str(json).unwrap();
        assert!(doc.stop_exists());

        let stop = doc.data.stop_place.unwrap();
        assert_eq!(stop.name.as_deref(), Some("Stortinget"));
        assert_eq!(stop.estimated_calls.len(), 1);

        let call = &stop.estimated_calls[0];
        assert!(call.realtime);
        assert_eq!(call.service_journey.line.public_code, "31");
        assert_eq!(call.destination_display.front_text.as_deref(), Some("Snarøya"));
    }

    #[test]
    fn missing_realtime_defaults_to_false() {
        let json = r#"{
            "expectedArrivalTime": "2020-01-01T10:00:00+0100",
            "destinationDisplay": {"frontText": null},
            "serviceJourney": {"directionType": "inbound", "line": {"publicCode": "25"}}
        }"#;
        let call: EstimatedCall = serde_json::from_str(json).unwrap();
        assert!(!call.realtime);
        assert!(call.destination_display.front_text.is_none());
    }
}
