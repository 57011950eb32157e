use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::error::{Error, ParseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationPoint {
    pub point: LatLng,
    pub time: DateTime<Utc>,
}

/// Parses the export's coordinate text, e.g. `"30.0485295°, 31.3557779°"`.
pub fn parse_lat_lng(text: &str) -> std::result::Result<LatLng, ParseError> {
    let invalid = || ParseError::InvalidLatLng(text.to_owned());
    let (lat, lng) = text.split_once(", ").ok_or_else(invalid)?;
    let parse_part = |part: &str| {
        let part = part.trim();
        part.strip_suffix('°')
            .unwrap_or(part)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
    };
    match (parse_part(lat), parse_part(lng)) {
        (Some(lat), Some(lng)) => Ok(LatLng { lat, lng }),
        _ => Err(invalid()),
    }
}

impl FromStr for LatLng {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_lat_lng(s)
    }
}

impl From<LatLng> for geo_types::Point<f64> {
    fn from(lat_lng: LatLng) -> Self {
        geo_types::Point::new(lat_lng.lng, lat_lng.lat)
    }
}

impl From<LatLng> for geo_types::Coord<f64> {
    fn from(lat_lng: LatLng) -> Self {
        geo_types::coord! { x: lat_lng.lng, y: lat_lng.lat }
    }
}

impl LocationPoint {
    pub fn parse(point: &str, time: DateTime<Utc>) -> std::result::Result<Self, ParseError> {
        Ok(LocationPoint {
            point: parse_lat_lng(point)?,
            time,
        })
    }
}

fn seconds_f64(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9
}

/// Linear interpolation between two points at `timestamp`. The points may be
/// given in any order, but `timestamp` must lie within their time range.
pub fn interpolate_location(
    timestamp: DateTime<Utc>,
    point1: &LocationPoint,
    point2: &LocationPoint,
) -> Result<LocationPoint> {
    let (point1, point2) = if point2.time < point1.time {
        (point2, point1)
    } else {
        (point1, point2)
    };
    if timestamp < point1.time || timestamp > point2.time {
        return Err(Error::OutOfRange {
            timestamp,
            start: point1.time,
            end: point2.time,
        });
    }

    let total = seconds_f64(point2.time - point1.time);
    let elapsed = seconds_f64(timestamp - point1.time);
    let ratio = if total == 0. { 0. } else { elapsed / total };

    let lat = point1.point.lat + (point2.point.lat - point1.point.lat) * ratio;
    let lng = point1.point.lng + (point2.point.lng - point1.point.lng) * ratio;

    // `point1.time + ratio * total` is `timestamp` itself for any in-range input.
    Ok(LocationPoint {
        point: LatLng { lat, lng },
        time: timestamp,
    })
}
