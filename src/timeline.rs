use std::sync::{Arc, RwLock};

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::error::ParseError;
use crate::export_format::{RawSignal, TimelineExport, UserLocationProfile};
use crate::segment::{Segment, SegmentKind};

/// One immutable, normalized view of an export.
///
/// `segments` keep the order of the source document, which is expected to be
/// ascending by start time. That order is not checked or re-established here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    pub segments: Vec<Segment>,
    pub raw_signals: Vec<RawSignal>,
    pub user_location_profile: Option<UserLocationProfile>,
}

impl Timeline {
    pub fn from_export(export: TimelineExport) -> Result<Self, ParseError> {
        let TimelineExport {
            semantic_segments,
            raw_signals,
            user_location_profile,
        } = export;
        let segments = semantic_segments
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Segment::from_raw(index, raw))
            .collect::<Result<Vec<_>, _>>()?;

        let counts = segments.iter().counts_by(|x| x.kind());
        info!(
            "[timeline] normalized {} segments ({}), {} raw signals",
            segments.len(),
            SegmentKind::iter()
                .map(|kind| format!("{}: {}", kind, counts.get(&kind).unwrap_or(&0)))
                .join(", "),
            raw_signals.len()
        );

        Ok(Timeline {
            segments,
            raw_signals,
            user_location_profile,
        })
    }
}

/// Holds the current snapshot. Readers get an `Arc` to whichever snapshot was
/// current at the time; a reload swaps the whole reference at once, so a
/// reader never sees a mix of old and new data and results computed against an
/// old snapshot stay valid.
#[derive(Debug, Default)]
pub struct TimelineStore {
    current: RwLock<Arc<Timeline>>,
}

impl TimelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Arc<Timeline> {
        // `replace` is a single assignment, so even a poisoned lock holds a
        // whole snapshot.
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, timeline: Arc<Timeline>) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = timeline;
    }

    /// Normalizes `export` fully before publishing it. On error the current
    /// snapshot is left untouched.
    pub fn load(&self, export: TimelineExport) -> Result<Arc<Timeline>, ParseError> {
        let timeline = Arc::new(Timeline::from_export(export)?);
        self.replace(Arc::clone(&timeline));
        debug!("[timeline] snapshot replaced");
        Ok(timeline)
    }
}
