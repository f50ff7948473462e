//! Utility functions and types.
use crate::core::{MAX_NUM_BINS, RATIO_TOLERANCE};
use crate::error::RasterError;

/// Checks that a time parameter is finite and strictly positive.
pub fn check_positive(name: &str, value: f64) -> Result<(), RasterError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(RasterError::InvalidParameter(format!(
            "{} must be a positive number, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Returns the number of whole `step`s fitting in `span`.
/// Ratios within a relative tolerance of an integer are snapped to it first, so that `0.3 / 0.1` counts 3 steps.
pub fn floor_ratio(span: f64, step: f64) -> f64 {
    let ratio = span / step;
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= RATIO_TOLERANCE * nearest.abs().max(1.0) {
        nearest
    } else {
        ratio.floor()
    }
}

/// Converts a number of bins computed from time parameters into a count, failing if it is not finite or exceeds
/// [`MAX_NUM_BINS`].
pub fn check_num_bins(name: &str, num_bins: f64) -> Result<usize, RasterError> {
    if !num_bins.is_finite() || num_bins > MAX_NUM_BINS as f64 {
        return Err(RasterError::InvalidParameter(format!(
            "{} must be at most {}, got {}",
            name, MAX_NUM_BINS, num_bins
        )));
    }
    Ok(num_bins as usize)
}

/// An open time window (start, stop).
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct TimeWindow {
    start: f64,
    stop: f64,
}

impl TimeWindow {
    /// Create a window, failing if it is empty or not finite.
    pub fn build(start: f64, stop: f64) -> Result<Self, RasterError> {
        if !start.is_finite() || !stop.is_finite() {
            return Err(RasterError::InvalidParameter(format!(
                "Window bounds must be finite, got ({}, {})",
                start, stop
            )));
        }
        if start >= stop {
            return Err(RasterError::InvalidParameter(format!(
                "Window start {} must be before its stop {}",
                start, stop
            )));
        }
        Ok(TimeWindow { start, stop })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn length(&self) -> f64 {
        self.stop - self.start
    }

    /// Returns true if the time lies strictly inside the window; both bounds are excluded.
    pub fn contains(&self, time: f64) -> bool {
        time > self.start && time < self.stop
    }
}
