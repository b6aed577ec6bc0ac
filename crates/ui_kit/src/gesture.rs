//! Threshold policy turning a finished drag into a discrete intent.

/// Dead zone around the drag start, in logical pixels.
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Cumulative vertical offset since the gesture started. Positive is downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragSample {
    pub offset_y: f64,
}

impl DragSample {
    pub fn new(offset_y: f64) -> Self {
        Self { offset_y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Dismiss,
    Expand,
    None,
}

/// Both comparisons are strict, so an offset of exactly `threshold` snaps back.
/// A NaN offset never crosses either side.
pub fn decide(sample: DragSample, threshold: f64) -> Intent {
    if sample.offset_y > threshold {
        Intent::Dismiss
    } else if sample.offset_y < -threshold {
        Intent::Expand
    } else {
        Intent::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GesturePolicy {
    threshold: f64,
}

impl GesturePolicy {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: threshold.abs(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn decide(&self, sample: DragSample) -> Intent {
        decide(sample, self.threshold)
    }
}

impl Default for GesturePolicy {
    fn default() -> Self {
        Self::with_threshold(DRAG_THRESHOLD)
    }
}
