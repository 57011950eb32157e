use geo_types::{LineString, Point};

use crate::error::ParseError;
use crate::geo::{parse_lat_lng, LatLng, LocationPoint};
use crate::segment::{Segment, TimeRange};

/// Drawable shape of a segment, with coordinates already parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Path {
        points: Vec<LocationPoint>,
    },
    Visit {
        point: LatLng,
        time_range: TimeRange,
    },
    Activity {
        activity_type: Option<String>,
        start: LocationPoint,
        end: LocationPoint,
    },
}

pub fn segment_to_geometry(segment: &Segment) -> Result<Option<Geometry>, ParseError> {
    let geometry = match segment {
        Segment::Path(path) => Geometry::Path {
            points: path
                .samples
                .iter()
                .map(|x| LocationPoint::parse(&x.point, x.time))
                .collect::<Result<_, _>>()?,
        },
        Segment::Visit(visit) => Geometry::Visit {
            point: parse_lat_lng(visit.lat_lng())?,
            time_range: visit.time_range,
        },
        Segment::Activity(activity) => Geometry::Activity {
            activity_type: activity.top_candidate.as_ref().map(|x| x.type_.clone()),
            start: LocationPoint::parse(&activity.start_lat_lng, activity.time_range.start)?,
            end: LocationPoint::parse(&activity.end_lat_lng, activity.time_range.end)?,
        },
        Segment::Memory(_) => return Ok(None),
    };
    Ok(Some(geometry))
}

impl Geometry {
    /// Visits become a single point line.
    pub fn to_line_string(&self) -> LineString<f64> {
        match self {
            Geometry::Path { points } => points.iter().map(|x| x.point).collect(),
            Geometry::Visit { point, .. } => vec![*point].into_iter().collect(),
            Geometry::Activity { start, end, .. } => {
                vec![start.point, end.point].into_iter().collect()
            }
        }
    }

    /// `None` for paths without samples.
    pub fn representative_point(&self) -> Option<Point<f64>> {
        match self {
            Geometry::Path { points } => points.first().map(|x| x.point.into()),
            Geometry::Visit { point, .. } => Some((*point).into()),
            Geometry::Activity { start, .. } => Some(start.point.into()),
        }
    }
}
