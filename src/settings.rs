use std::{fs::File, io::BufReader, path::Path};

use anyhow::Result;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// What to do when no segment contains the requested instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GapPolicy {
    /// No estimate.
    #[default]
    Empty,
    /// Use the closest neighbouring segment if its boundary is within
    /// `max_gap_seconds`.
    #[serde(rename_all = "camelCase")]
    Nearest { max_gap_seconds: u32 },
}

impl GapPolicy {
    pub fn max_gap(&self) -> Option<TimeDelta> {
        match self {
            GapPolicy::Empty => None,
            GapPolicy::Nearest { max_gap_seconds } => {
                Some(TimeDelta::seconds(i64::from(*max_gap_seconds)))
            }
        }
    }
}

/// How candidate points from several overlapping segments are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeStrategy {
    /// Pairwise interpolation, left to right. With more than two candidates
    /// the later ones get more weight, so this is only an approximation of an
    /// average.
    #[default]
    LeftFold,
    /// Order independent mean, weighted by `1 / (1 + duration in seconds)` of
    /// each candidate's segment.
    WeightedMean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimatorSettings {
    pub gap_policy: GapPolicy,
    pub merge_strategy: MergeStrategy,
}

pub fn load(path: impl AsRef<Path>) -> Result<EstimatorSettings> {
    let settings: EstimatorSettings = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    debug!("[settings] loaded {settings:?}");
    Ok(settings)
}
