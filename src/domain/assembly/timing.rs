use crate::domain::script::Speaker;
use serde::{Deserialize, Serialize};

/// Inferred `[start, end)` window, in seconds, during which a line is
/// audible in the assembled track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentTiming {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub speaker: Speaker,
}

impl SegmentTiming {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}

/// End of the last segment, i.e. the track length the timings assume
pub fn estimated_duration(timings: &[SegmentTiming]) -> f64 {
    timings.last().map(|t| t.end).unwrap_or(0.0)
}

/// Stretch or shrink every timing by `actual_duration / estimated_duration`
/// so the last segment ends where the decoded audio actually ends.
///
/// Only total drift is corrected; pacing differences inside a chunk are not
/// visible to the byte-rate model. A non-positive or non-finite factor
/// leaves the timings unchanged.
pub fn rescale(timings: &[SegmentTiming], actual_duration: f64) -> Vec<SegmentTiming> {
    let estimated = estimated_duration(timings);
    let factor = actual_duration / estimated;

    if !(factor.is_finite() && factor > 0.0) {
        tracing::warn!(
            estimated_duration_secs = estimated,
            actual_duration_secs = actual_duration,
            "Skipping timing rescale"
        );
        return timings.to_vec();
    }

    tracing::debug!(
        estimated_duration_secs = estimated,
        actual_duration_secs = actual_duration,
        factor,
        "Rescaling segment timings"
    );

    timings
        .iter()
        .map(|t| SegmentTiming {
            start: t.start * factor,
            end: t.end * factor,
            ..*t
        })
        .collect()
}

/// `start <= end` for every segment and both never go backwards
pub fn is_monotonic(timings: &[SegmentTiming]) -> bool {
    timings.iter().all(|t| t.start <= t.end)
        && timings
            .windows(2)
            .all(|w| w[0].start <= w[1].start && w[0].end <= w[1].start)
}
