//! Serde model of the location history export document, as written by the
//! phone. Timestamps and coordinates are kept as text here; they become typed
//! values when the document is normalized into a [`crate::timeline::Timeline`].
//!
//! Coordinates look like `"30.0485295°, 31.3557779°"` and timestamps are
//! ISO-8601, e.g. `"2024-03-01T08:15:00.000+01:00"`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineExport {
    #[serde(default)]
    pub semantic_segments: Vec<RawSemanticSegment>,
    #[serde(default)]
    pub raw_signals: Vec<RawSignal>,
    #[serde(default)]
    pub user_location_profile: Option<UserLocationProfile>,
}

/// One entry of `semanticSegments`. Exactly one of the variant keys is
/// expected to be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSemanticSegment {
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_timezone_utc_offset_minutes: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_timezone_utc_offset_minutes: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline_path: Option<Vec<RawPathPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit: Option<RawVisit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<RawActivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline_memory: Option<TimelineMemory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPathPoint {
    pub point: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVisit {
    #[serde(default)]
    pub hierarchy_level: Option<i32>,
    #[serde(default)]
    pub probability: Option<f64>,
    pub top_candidate: VisitCandidate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitCandidate {
    #[serde(default)]
    pub place_id: Option<String>,
    /// e.g. `HOME`, `WORK`, `INFERRED_HOME`, `UNKNOWN`.
    #[serde(default)]
    pub semantic_type: Option<String>,
    #[serde(default)]
    pub probability: Option<f64>,
    pub place_location: PlaceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceLocation {
    pub lat_lng: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivity {
    pub start: PlaceLocation,
    pub end: PlaceLocation,
    #[serde(default)]
    pub distance_meters: Option<f64>,
    #[serde(default)]
    pub top_candidate: Option<ActivityCandidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCandidate {
    /// e.g. `WALKING`, `IN_PASSENGER_VEHICLE`, `FLYING`.
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub probability: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMemory {
    #[serde(default)]
    pub trip: Option<Trip>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default)]
    pub distance_from_origin_kms: Option<f64>,
    #[serde(default)]
    pub destinations: Vec<TripDestination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDestination {
    pub identifier: TripDestinationIdentifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDestinationIdentifier {
    pub place_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawSignal {
    Position(Position),
    WifiScan(WifiScan),
    ActivityRecord(ActivityRecord),
    /// Anything we don't know about yet is kept verbatim.
    #[serde(untagged)]
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(rename = "LatLng")]
    pub lat_lng: String,
    #[serde(default)]
    pub accuracy_meters: Option<f64>,
    #[serde(default)]
    pub altitude_meters: Option<f64>,
    /// `WIFI`, `CELL`, `GPS` or `UNKNOWN`.
    #[serde(default)]
    pub source: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub speed_meters_per_second: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiScan {
    pub delivery_time: String,
    #[serde(default)]
    pub devices_records: Vec<WifiDeviceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiDeviceRecord {
    pub mac: u64,
    pub raw_rssi: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    #[serde(default)]
    pub probable_activities: Vec<ProbableActivity>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbableActivity {
    #[serde(rename = "type")]
    pub type_: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLocationProfile {
    #[serde(default)]
    pub frequent_places: Vec<FrequentPlace>,
    #[serde(default)]
    pub persona: Option<Persona>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequentPlace {
    pub place_id: String,
    pub place_location: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    #[serde(default)]
    pub travel_mode_affinities: Vec<TravelModeAffinity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelModeAffinity {
    pub mode: String,
    pub affinity: f64,
}
