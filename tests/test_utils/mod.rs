#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use timeline_geotag::export_format::{RawSemanticSegment, TimelineExport};
use timeline_geotag::import_data;
use timeline_geotag::segment::{parse_timestamp, Segment};
use timeline_geotag::timeline::Timeline;

pub const TEST_TIMELINE: &str = "./tests/data/timeline.json";

pub fn utc(s: &str) -> DateTime<Utc> {
    parse_timestamp(s).unwrap()
}

pub fn load_test_export() -> TimelineExport {
    import_data::load_export(TEST_TIMELINE).unwrap()
}

pub fn load_test_timeline() -> Arc<Timeline> {
    Arc::new(import_data::load_timeline(TEST_TIMELINE).unwrap())
}

fn segment(value: serde_json::Value) -> Segment {
    let raw: RawSemanticSegment = serde_json::from_value(value).unwrap();
    Segment::from_raw(0, raw).unwrap()
}

/// `samples` are `(lat_lng, time)` pairs.
pub fn path_segment(start: &str, end: &str, samples: &[(&str, &str)]) -> Segment {
    let samples: Vec<_> = samples
        .iter()
        .map(|(point, time)| json!({ "point": point, "time": time }))
        .collect();
    segment(json!({
        "startTime": start,
        "endTime": end,
        "timelinePath": samples,
    }))
}

pub fn visit_segment(start: &str, end: &str, lat_lng: &str) -> Segment {
    segment(json!({
        "startTime": start,
        "endTime": end,
        "visit": {
            "topCandidate": {
                "placeId": "test-place",
                "semanticType": "UNKNOWN",
                "placeLocation": { "latLng": lat_lng }
            }
        }
    }))
}

pub fn activity_segment(start: &str, end: &str, from: &str, to: &str) -> Segment {
    segment(json!({
        "startTime": start,
        "endTime": end,
        "activity": {
            "start": { "latLng": from },
            "end": { "latLng": to },
            "topCandidate": { "type": "WALKING" }
        }
    }))
}

pub fn memory_segment(start: &str, end: &str) -> Segment {
    segment(json!({
        "startTime": start,
        "endTime": end,
        "timelineMemory": {}
    }))
}

pub fn timeline_of(segments: Vec<Segment>) -> Arc<Timeline> {
    Arc::new(Timeline {
        segments,
        ..Timeline::default()
    })
}
