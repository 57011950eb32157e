use std::ops::Range;

use chrono::{DateTime, TimeDelta, Utc};

use crate::segment::Segment;

/// Returns the index range of the segments containing `timestamp`.
///
/// `segments` must be sorted by start time. Binary search finds the first
/// segment starting strictly after `timestamp`, then we walk backwards while
/// segments still contain it. Only the contiguous run right before that point
/// is considered, overlaps elsewhere in the timeline are not searched for.
/// A timestamp that falls in a gap yields an empty range.
pub fn find_segments_containing(segments: &[Segment], timestamp: DateTime<Utc>) -> Range<usize> {
    let high = segments.partition_point(|x| x.start_time() <= timestamp);
    let mut low = high;
    while low > 0 && segments[low - 1].contains(timestamp) {
        low -= 1;
    }
    low..high
}

/// When `timestamp` is in a gap, picks whichever neighbour (the segment right
/// before or right after it) has the closer boundary, as long as that distance
/// is at most `max_gap`. Returns the segment index and the gap.
pub fn find_nearest_segment(
    segments: &[Segment],
    timestamp: DateTime<Utc>,
    max_gap: TimeDelta,
) -> Option<(usize, TimeDelta)> {
    let high = segments.partition_point(|x| x.start_time() <= timestamp);
    let before = high
        .checked_sub(1)
        .map(|i| (i, timestamp - segments[i].end_time()));
    let after = segments
        .get(high)
        .map(|x| (high, x.start_time() - timestamp));

    [before, after]
        .into_iter()
        .flatten()
        .filter(|(_, gap)| *gap >= TimeDelta::zero() && *gap <= max_gap)
        // ties go to the earlier segment
        .min_by_key(|(_, gap)| *gap)
}
