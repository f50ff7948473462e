//! Rasterization of event timestamps into fixed-bin count histograms.
use serde::{Deserialize, Serialize};

use crate::core::utils::{check_num_bins, check_positive, TimeWindow};
use crate::error::RasterError;

/// Per-bin event counts over a window starting at `start` with bins of width `dt`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawRaster")]
pub struct Raster {
    /// The number of events falling in each time bin.
    counts: Vec<usize>,
    /// The start time of the first bin.
    start: f64,
    /// The width of the time bins.
    dt: f64,
}

#[derive(Deserialize)]
struct RawRaster {
    counts: Vec<usize>,
    start: f64,
    dt: f64,
}

impl TryFrom<RawRaster> for Raster {
    type Error = RasterError;

    fn try_from(raw: RawRaster) -> Result<Self, Self::Error> {
        check_positive("dt", raw.dt)?;
        if !raw.start.is_finite() {
            return Err(RasterError::InvalidParameter(format!(
                "Raster start must be finite, got {}",
                raw.start
            )));
        }
        Ok(Raster {
            counts: raw.counts,
            start: raw.start,
            dt: raw.dt,
        })
    }
}

impl Raster {
    /// Returns the event counts, one per time bin.
    pub fn counts(&self) -> &[usize] {
        &self.counts[..]
    }

    /// Consumes the raster and returns the counts.
    pub fn into_counts(self) -> Vec<usize> {
        self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    /// Returns the end time of the last bin.
    pub fn stop(&self) -> f64 {
        self.start + self.counts.len() as f64 * self.dt
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the total number of counted events.
    pub fn num_events(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Returns the event rate in each bin, i.e., the counts divided by the bin width.
    pub fn rate(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64 / self.dt).collect()
    }

    /// Returns the left edge of every bin.
    pub fn bin_times(&self) -> Vec<f64> {
        (0..self.counts.len())
            .map(|i| self.start + i as f64 * self.dt)
            .collect()
    }
}

/// Returns the number of bins of width `dt` covering `duration`, rounded to the nearest integer (ties to even).
/// A duration shorter than half a bin, or holding more than [`MAX_NUM_BINS`](crate::core::MAX_NUM_BINS) bins, is
/// rejected.
pub fn num_bins(duration: f64, dt: f64) -> Result<usize, RasterError> {
    check_positive("dt", dt)?;
    check_positive("window length", duration)?;
    let num_bins = (duration / dt).round_ties_even();
    if num_bins < 1.0 {
        return Err(RasterError::InvalidParameter(format!(
            "A window of length {} holds no bin of width {}",
            duration, dt
        )));
    }
    check_num_bins("Number of bins", num_bins)
}

/// Transforms event times into a raster with bins of width `dt` over the window (start, stop).
///
/// Only events strictly inside the window are counted: events exactly at `start` or `stop` are dropped.
/// The number of bins is `(stop - start) / dt` rounded to the nearest integer.
/// An event lying beyond the last full bin (window not a multiple of `dt`) is counted in the last bin.
///
/// # Examples
///
/// ```rust
/// use rusty_raster::core::raster::rasterize;
///
/// let raster = rasterize(&[0.1, 0.5, 1.2], 0.0, 2.0, 0.5).unwrap();
/// assert_eq!(raster.counts(), &[1, 1, 1, 0]);
///
/// // Events on the window bounds are excluded
/// let raster = rasterize(&[0.0, 2.0], 0.0, 2.0, 1.0).unwrap();
/// assert_eq!(raster.counts(), &[0, 0]);
/// ```
pub fn rasterize(events: &[f64], start: f64, stop: f64, dt: f64) -> Result<Raster, RasterError> {
    let window = TimeWindow::build(start, stop)?;
    let num_bins = num_bins(window.length(), dt)?;
    Ok(Raster {
        counts: bin_events(events, &window, dt, num_bins),
        start,
        dt,
    })
}

/// Counts the events inside the window into exactly `num_bins` bins.
pub(crate) fn bin_events(
    events: &[f64],
    window: &TimeWindow,
    dt: f64,
    num_bins: usize,
) -> Vec<usize> {
    let mut counts = vec![0; num_bins];
    for &time in events.iter().filter(|&&time| window.contains(time)) {
        let bin = ((time - window.start()) / dt).floor() as usize;
        if bin >= num_bins {
            log::debug!(
                "Event at {} lies past the last bin of ({}, {}), counted in bin {}",
                time,
                window.start(),
                window.stop(),
                num_bins - 1
            );
        }
        counts[bin.min(num_bins - 1)] += 1;
    }
    counts
}
