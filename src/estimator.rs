use std::ops::Range;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use crate::error::Result;
use crate::geo::{interpolate_location, parse_lat_lng, LatLng, LocationPoint};
use crate::segment::{ActivitySegment, PathSegment, Segment, VisitSegment};
use crate::segment_index::{find_nearest_segment, find_segments_containing};
use crate::settings::{EstimatorSettings, MergeStrategy};
use crate::timeline::Timeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum EstimateSource {
    /// Only path segments were used.
    Path,
    Others,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMatch {
    /// The segments contain the requested instant.
    Containing,
    /// Nothing contains the instant, a neighbouring segment `gap` away from it
    /// was used instead and the estimate is for its closest boundary.
    Nearest { gap: TimeDelta },
}

#[derive(Debug, Clone)]
pub struct LocationEstimate {
    pub best_estimate: Option<LocationPoint>,
    pub estimate_source: EstimateSource,
    pub segment_match: SegmentMatch,
    timeline: Arc<Timeline>,
    matched: Range<usize>,
}

impl LocationEstimate {
    /// The matched segments, in timeline order. This includes segments that
    /// were left out of the estimate (e.g. visits when a path was present).
    pub fn segments(&self) -> &[Segment] {
        &self.timeline.segments[self.matched.clone()]
    }

    /// The snapshot this estimate was computed against.
    pub fn timeline(&self) -> &Arc<Timeline> {
        &self.timeline
    }
}

fn estimate_point_from_path_segment(
    timestamp: DateTime<Utc>,
    path: &PathSegment,
) -> Result<Option<LocationPoint>> {
    let samples = &path.samples;
    // first sample that is strictly after the timestamp
    let high = samples.partition_point(|x| x.time <= timestamp);
    let before = high.checked_sub(1).map(|i| &samples[i]);
    let after = samples.get(high);

    let point = match (before, after) {
        (None, None) => return Ok(None),
        (None, Some(only)) | (Some(only), None) => LocationPoint::parse(&only.point, only.time)?,
        (Some(before), Some(after)) => interpolate_location(
            timestamp,
            &LocationPoint::parse(&before.point, before.time)?,
            &LocationPoint::parse(&after.point, after.time)?,
        )?,
    };
    Ok(Some(point))
}

fn estimate_point_from_visit_segment(
    timestamp: DateTime<Utc>,
    visit: &VisitSegment,
) -> Result<LocationPoint> {
    Ok(LocationPoint {
        point: parse_lat_lng(visit.lat_lng())?,
        time: timestamp,
    })
}

fn estimate_point_from_activity_segment(
    timestamp: DateTime<Utc>,
    activity: &ActivitySegment,
) -> Result<LocationPoint> {
    interpolate_location(
        timestamp,
        &LocationPoint::parse(&activity.start_lat_lng, activity.time_range.start)?,
        &LocationPoint::parse(&activity.end_lat_lng, activity.time_range.end)?,
    )
}

/// `timestamp` is expected to be inside the segment.
pub fn estimate_point_from_segment(
    timestamp: DateTime<Utc>,
    segment: &Segment,
) -> Result<Option<LocationPoint>> {
    match segment {
        Segment::Path(path) => estimate_point_from_path_segment(timestamp, path),
        Segment::Visit(visit) => estimate_point_from_visit_segment(timestamp, visit).map(Some),
        Segment::Activity(activity) => {
            estimate_point_from_activity_segment(timestamp, activity).map(Some)
        }
        Segment::Memory(_) => Ok(None),
    }
}

/// Estimates every segment and merges the resulting points. Segments that
/// don't produce a point (memories, empty paths) are skipped.
pub fn estimate_point_from_segments<'a>(
    timestamp: DateTime<Utc>,
    segments: impl IntoIterator<Item = &'a Segment>,
    merge_strategy: MergeStrategy,
) -> Result<Option<LocationPoint>> {
    let mut candidates = Vec::new();
    for segment in segments {
        if let Some(point) = estimate_point_from_segment(timestamp, segment)? {
            candidates.push((point, segment.time_range().duration()));
        }
    }
    match merge_strategy {
        MergeStrategy::LeftFold => left_fold(timestamp, candidates),
        MergeStrategy::WeightedMean => Ok(weighted_mean(timestamp, &candidates)),
    }
}

fn left_fold(
    timestamp: DateTime<Utc>,
    candidates: Vec<(LocationPoint, TimeDelta)>,
) -> Result<Option<LocationPoint>> {
    let mut points = candidates.into_iter().map(|(point, _)| point);
    let Some(first) = points.next() else {
        return Ok(None);
    };
    points
        .try_fold(first, |acc, point| {
            interpolate_location(timestamp, &acc, &point)
        })
        .map(Some)
}

fn weighted_mean(
    timestamp: DateTime<Utc>,
    candidates: &[(LocationPoint, TimeDelta)],
) -> Option<LocationPoint> {
    if candidates.is_empty() {
        return None;
    }
    let (mut lat, mut lng, mut total_weight) = (0., 0., 0.);
    for (point, duration) in candidates {
        let weight = 1. / (1. + duration.num_milliseconds().max(0) as f64 / 1000.);
        lat += point.point.lat * weight;
        lng += point.point.lng * weight;
        total_weight += weight;
    }
    Some(LocationPoint {
        point: LatLng {
            lat: lat / total_weight,
            lng: lng / total_weight,
        },
        time: timestamp,
    })
}

/// Path segments are dense raw samples, so whenever one is available the
/// coarser visit/activity segments are ignored.
fn merge_matched(
    timestamp: DateTime<Utc>,
    segments: &[Segment],
    merge_strategy: MergeStrategy,
) -> Result<(Option<LocationPoint>, EstimateSource)> {
    if segments.iter().any(|x| matches!(x, Segment::Path(_))) {
        let paths = segments.iter().filter(|x| matches!(x, Segment::Path(_)));
        let point = estimate_point_from_segments(timestamp, paths, merge_strategy)?;
        Ok((point, EstimateSource::Path))
    } else {
        let point = estimate_point_from_segments(timestamp, segments, merge_strategy)?;
        Ok((point, EstimateSource::Others))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocationEstimator {
    settings: EstimatorSettings,
}

impl LocationEstimator {
    pub fn new(settings: EstimatorSettings) -> Self {
        LocationEstimator { settings }
    }

    pub fn settings(&self) -> &EstimatorSettings {
        &self.settings
    }

    pub fn estimate_location_at_time(
        &self,
        timeline: &Arc<Timeline>,
        timestamp: DateTime<Utc>,
    ) -> Result<LocationEstimate> {
        let segments = &timeline.segments;
        let merge_strategy = self.settings.merge_strategy;

        let mut matched = find_segments_containing(segments, timestamp);
        let mut segment_match = SegmentMatch::Containing;
        let mut estimate_at = timestamp;

        if matched.is_empty() {
            if let Some(max_gap) = self.settings.gap_policy.max_gap() {
                if let Some((index, gap)) = find_nearest_segment(segments, timestamp, max_gap) {
                    let range = segments[index].time_range();
                    warn!(
                        "[estimator] no segment contains {timestamp}, using segment #{index} {gap} away"
                    );
                    matched = index..index + 1;
                    segment_match = SegmentMatch::Nearest { gap };
                    estimate_at = timestamp.clamp(range.start, range.end);
                }
            }
        }

        let (best_estimate, estimate_source) =
            merge_matched(estimate_at, &segments[matched.clone()], merge_strategy)?;
        debug!(
            "[estimator] {timestamp}: {} segments matched, source={estimate_source}, estimate={best_estimate:?}",
            matched.len()
        );

        Ok(LocationEstimate {
            best_estimate,
            estimate_source,
            segment_match,
            timeline: Arc::clone(timeline),
            matched,
        })
    }
}

/// Estimation with the default settings: no gap fallback, left-fold merge.
pub fn estimate_location_at_time(
    timeline: &Arc<Timeline>,
    timestamp: DateTime<Utc>,
) -> Result<LocationEstimate> {
    LocationEstimator::default().estimate_location_at_time(timeline, timestamp)
}
