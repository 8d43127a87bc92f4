use crate::domain::assembly::SegmentTiming;

/// Index of the line audible at `time`.
///
/// Past the last segment the last index is returned, before the first the
/// first; inside a pause the line that just finished keeps the cursor.
/// `None` only for an empty timing list.
pub fn resolve(time: f64, timings: &[SegmentTiming]) -> Option<usize> {
    let first = timings.first()?;
    let last_index = timings.len() - 1;

    if let Some(index) = timings.iter().position(|t| t.contains(time)) {
        return Some(index);
    }
    if time >= timings[last_index].end {
        return Some(last_index);
    }
    if time < first.start {
        return Some(0);
    }

    Some(timings.iter().rposition(|t| t.start <= time).unwrap_or(0))
}

/// Follows the cursor across ticks and reports only changes of the active
/// line
#[derive(Debug, Default)]
pub struct CursorTracker {
    current: Option<usize>,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// `Some(index)` when the active line changed since the last update
    pub fn update(&mut self, time: f64, timings: &[SegmentTiming]) -> Option<usize> {
        let index = resolve(time, timings);
        if index == self.current {
            return None;
        }
        self.current = index;
        index
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}
