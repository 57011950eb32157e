use chrono::{DateTime, TimeDelta, Utc};
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::error::ParseError;
use crate::export_format::{
    ActivityCandidate, RawActivity, RawPathPoint, RawSemanticSegment, RawVisit, TimelineMemory,
    VisitCandidate,
};

/// Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathSample {
    /// Coordinate text, parsed lazily by the estimator.
    pub point: String,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub time_range: TimeRange,
    /// Ascending by time.
    pub samples: Vec<PathSample>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitSegment {
    pub time_range: TimeRange,
    pub utc_offset_minutes: UtcOffsets,
    pub hierarchy_level: Option<i32>,
    pub probability: Option<f64>,
    pub top_candidate: VisitCandidate,
}

impl VisitSegment {
    pub fn lat_lng(&self) -> &str {
        &self.top_candidate.place_location.lat_lng
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySegment {
    pub time_range: TimeRange,
    pub utc_offset_minutes: UtcOffsets,
    pub start_lat_lng: String,
    pub end_lat_lng: String,
    pub distance_meters: Option<f64>,
    pub top_candidate: Option<ActivityCandidate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemorySegment {
    pub time_range: TimeRange,
    pub memory: TimelineMemory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UtcOffsets {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Path(PathSegment),
    Visit(VisitSegment),
    Activity(ActivitySegment),
    Memory(MemorySegment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum SegmentKind {
    TimelinePath,
    Visit,
    Activity,
    TimelineMemory,
}

impl Segment {
    pub fn time_range(&self) -> &TimeRange {
        match self {
            Segment::Path(x) => &x.time_range,
            Segment::Visit(x) => &x.time_range,
            Segment::Activity(x) => &x.time_range,
            Segment::Memory(x) => &x.time_range,
        }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.time_range().start
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.time_range().end
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.time_range().contains(timestamp)
    }

    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Path(_) => SegmentKind::TimelinePath,
            Segment::Visit(_) => SegmentKind::Visit,
            Segment::Activity(_) => SegmentKind::Activity,
            Segment::Memory(_) => SegmentKind::TimelineMemory,
        }
    }

    /// Converts the textual instants of a raw segment. `index` is the position
    /// in `semanticSegments`, only used for error reporting. Coordinates stay
    /// as text.
    pub fn from_raw(index: usize, raw: RawSemanticSegment) -> Result<Self, ParseError> {
        let time_range = TimeRange {
            start: parse_timestamp(&raw.start_time)?,
            end: parse_timestamp(&raw.end_time)?,
        };
        let utc_offset_minutes = UtcOffsets {
            start: raw.start_time_timezone_utc_offset_minutes,
            end: raw.end_time_timezone_utc_offset_minutes,
        };
        // Key precedence follows the export: a path wins over everything else.
        if let Some(path) = raw.timeline_path {
            let samples = path
                .into_iter()
                .map(|RawPathPoint { point, time }| {
                    Ok(PathSample {
                        point,
                        time: parse_timestamp(&time)?,
                    })
                })
                .collect::<Result<Vec<_>, ParseError>>()?;
            Ok(Segment::Path(PathSegment {
                time_range,
                samples,
            }))
        } else if let Some(RawVisit {
            hierarchy_level,
            probability,
            top_candidate,
        }) = raw.visit
        {
            Ok(Segment::Visit(VisitSegment {
                time_range,
                utc_offset_minutes,
                hierarchy_level,
                probability,
                top_candidate,
            }))
        } else if let Some(RawActivity {
            start,
            end,
            distance_meters,
            top_candidate,
        }) = raw.activity
        {
            Ok(Segment::Activity(ActivitySegment {
                time_range,
                utc_offset_minutes,
                start_lat_lng: start.lat_lng,
                end_lat_lng: end.lat_lng,
                distance_meters,
                top_candidate,
            }))
        } else if let Some(memory) = raw.timeline_memory {
            Ok(Segment::Memory(MemorySegment { time_range, memory }))
        } else {
            Err(ParseError::UnknownSegmentKind { index })
        }
    }
}

/// ISO-8601 with any offset, normalized to UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(text)
        .map(|x| x.with_timezone(&Utc))
        .map_err(|source| ParseError::InvalidTimestamp {
            input: text.to_owned(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export_format::PlaceLocation;
    use chrono::TimeZone;

    fn raw(start: &str, end: &str) -> RawSemanticSegment {
        RawSemanticSegment {
            start_time: start.to_owned(),
            end_time: end.to_owned(),
            start_time_timezone_utc_offset_minutes: Some(60),
            end_time_timezone_utc_offset_minutes: Some(60),
            timeline_path: None,
            visit: None,
            activity: None,
            timeline_memory: None,
        }
    }

    #[test]
    fn timestamp_offsets_are_normalized() {
        assert_eq!(
            parse_timestamp("2024-03-01T09:15:00.000+01:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 15, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("2024-03-01T08:15:00Z").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 15, 0).unwrap()
        );
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(ParseError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn path_samples_are_converted() {
        let mut segment = raw("2024-03-01T08:00:00Z", "2024-03-01T10:00:00Z");
        segment.timeline_path = Some(vec![
            RawPathPoint {
                point: "1.0°, 2.0°".to_owned(),
                time: "2024-03-01T08:00:00Z".to_owned(),
            },
            RawPathPoint {
                point: "1.5°, 2.5°".to_owned(),
                time: "2024-03-01T11:00:00+01:00".to_owned(),
            },
        ]);
        let Segment::Path(path) = Segment::from_raw(0, segment).unwrap() else {
            panic!("expected a path segment");
        };
        assert_eq!(path.samples.len(), 2);
        assert_eq!(path.samples[0].point, "1.0°, 2.0°");
        assert_eq!(
            path.samples[1].time,
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn activity_keeps_metadata() {
        let mut segment = raw("2024-03-01T08:00:00Z", "2024-03-01T10:00:00Z");
        segment.activity = Some(RawActivity {
            start: PlaceLocation {
                lat_lng: "1°, 2°".to_owned(),
            },
            end: PlaceLocation {
                lat_lng: "3°, 4°".to_owned(),
            },
            distance_meters: Some(1200.5),
            top_candidate: Some(ActivityCandidate {
                type_: "WALKING".to_owned(),
                probability: Some(0.8),
            }),
        });
        let segment = Segment::from_raw(0, segment).unwrap();
        assert_eq!(segment.kind(), SegmentKind::Activity);
        let Segment::Activity(activity) = segment else {
            unreachable!()
        };
        assert_eq!(activity.start_lat_lng, "1°, 2°");
        assert_eq!(activity.distance_meters, Some(1200.5));
        assert_eq!(activity.utc_offset_minutes.start, Some(60));
    }

    #[test]
    fn unknown_kind() {
        let segment = raw("2024-03-01T08:00:00Z", "2024-03-01T10:00:00Z");
        assert!(matches!(
            Segment::from_raw(7, segment),
            Err(ParseError::UnknownSegmentKind { index: 7 })
        ));
    }

    #[test]
    fn inclusive_bounds() {
        let range = TimeRange {
            start: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        };
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(range.end + TimeDelta::milliseconds(1)));
        assert_eq!(range.duration(), TimeDelta::hours(1));
    }

    #[test]
    fn kind_names() {
        assert_eq!(SegmentKind::TimelinePath.to_string(), "timelinePath");
        assert_eq!(SegmentKind::TimelineMemory.as_ref(), "timelineMemory");
    }
}
