//! Alignment of event trains and continuous series on per-trial onsets.
use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::core::raster::{bin_events, num_bins};
use crate::core::trials::IntoTrials;
use crate::core::utils::{check_num_bins, check_positive, floor_ratio, TimeWindow};
use crate::core::MIN_PARALLEL_TRIALS;
use crate::error::RasterError;

/// Rasterizes the event times over `(onset, onset + length)` for every onset and stacks the rasters row-wise.
///
/// The result has one row per onset, in the order of the onsets, and `round(length / dt)` columns.
/// No onset is ever dropped: onsets far from any event simply give all-zero rows.
///
/// # Examples
///
/// ```rust
/// use rusty_raster::core::align::align_rasters;
///
/// let rasters = align_rasters(&[0.25, 1.25, 1.75, 9.0], &[0.0, 1.0, 5.0], 0.5, 1.0).unwrap();
/// assert_eq!(rasters.shape(), (3, 2));
/// assert_eq!(rasters.row(0).iter().copied().collect::<Vec<_>>(), vec![1, 0]);
/// assert_eq!(rasters.row(1).iter().copied().collect::<Vec<_>>(), vec![1, 1]);
/// assert_eq!(rasters.row(2).iter().copied().collect::<Vec<_>>(), vec![0, 0]);
/// ```
pub fn align_rasters(
    events: &[f64],
    onsets: &[f64],
    dt: f64,
    length: f64,
) -> Result<DMatrix<usize>, RasterError> {
    if onsets.is_empty() {
        return Err(RasterError::EmptyInput(
            "At least one onset is required to align rasters".to_string(),
        ));
    }
    let num_bins = num_bins(length, dt)?;
    let windows = onsets
        .iter()
        .map(|&onset| TimeWindow::build(onset, onset + length))
        .collect::<Result<Vec<TimeWindow>, RasterError>>()?;

    let rows: Vec<Vec<usize>> = if windows.len() >= MIN_PARALLEL_TRIALS {
        windows
            .par_iter()
            .map(|window| bin_events(events, window, dt, num_bins))
            .collect()
    } else {
        windows
            .iter()
            .map(|window| bin_events(events, window, dt, num_bins))
            .collect()
    };

    Ok(DMatrix::from_fn(rows.len(), num_bins, |i, j| rows[i][j]))
}

/// Aligns several units (event trains) on the same onsets, returning one raster matrix per unit.
pub fn align_units(
    units: &[Vec<f64>],
    onsets: &[f64],
    dt: f64,
    length: f64,
) -> Result<Vec<DMatrix<usize>>, RasterError> {
    if units.len() >= MIN_PARALLEL_TRIALS {
        units
            .par_iter()
            .map(|events| align_rasters(events, onsets, dt, length))
            .collect()
    } else {
        units
            .iter()
            .map(|events| align_rasters(events, onsets, dt, length))
            .collect()
    }
}

/// Windows of a continuous series aligned on onsets.
///
/// Some onsets may have been dropped during the alignment, hence the number of trials can be smaller than the number
/// of onsets. The `kept` indices map every row back to its onset.
#[derive(Debug, PartialEq, Clone)]
pub struct Alignment {
    /// The aligned windows, one row per kept onset.
    values: DMatrix<f64>,
    /// The indices (in the supplied onsets) of the kept onsets, in row order.
    kept: Vec<usize>,
    /// The number of onsets supplied.
    num_onsets: usize,
}

impl Alignment {
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn into_values(self) -> DMatrix<f64> {
        self.values
    }

    pub fn kept(&self) -> &[usize] {
        &self.kept[..]
    }

    pub fn num_trials(&self) -> usize {
        self.kept.len()
    }

    pub fn num_onsets(&self) -> usize {
        self.num_onsets
    }

    /// Returns the number of onsets whose window did not fit inside the series.
    pub fn num_dropped(&self) -> usize {
        self.num_onsets - self.kept.len()
    }
}

impl IntoTrials for Alignment {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        Ok(self.values)
    }
}

impl IntoTrials for &Alignment {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        Ok(self.values.clone())
    }
}

/// Slices a continuous series sampled every `dt` into windows of `floor(length / dt)` samples starting at each onset.
///
/// The window of an onset `s` covers the samples `[floor(s / dt), floor(s / dt) + floor(length / dt))`.
/// Both ratios are snapped to the nearest integer first when within tolerance, so that an onset on the sampling grid
/// starts at the same sample whatever the time unit, e.g., `0.3 / 0.1` and `300 / 100` both start at sample 3.
/// An onset is silently dropped when its window starts at or before the first sample, or reaches the last sample.
/// The number of rows of the result therefore depends on the data: use [`Alignment::kept`] or
/// [`Alignment::num_dropped`] to relate rows to onsets.
///
/// # Examples
///
/// ```rust
/// use rusty_raster::core::align::align;
///
/// let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
/// let alignment = align(&values, &[0.0, 2.0, 5.0, 8.0], 1.0, 3.0).unwrap();
///
/// // The first onset starts at sample 0 and the last one overflows the series
/// assert_eq!(alignment.kept(), &[1, 2]);
/// assert_eq!(alignment.num_dropped(), 2);
/// assert_eq!(alignment.values()[(0, 0)], 2.0);
/// assert_eq!(alignment.values()[(1, 2)], 7.0);
/// ```
pub fn align(
    values: &[f64],
    onsets: &[f64],
    dt: f64,
    length: f64,
) -> Result<Alignment, RasterError> {
    check_positive("dt", dt)?;
    check_positive("alignment length", length)?;
    if onsets.is_empty() {
        return Err(RasterError::EmptyInput(
            "At least one onset is required to align a series".to_string(),
        ));
    }
    let width = floor_ratio(length, dt);
    if width < 1.0 {
        return Err(RasterError::InvalidParameter(format!(
            "An alignment of length {} holds no sample of width {}",
            length, dt
        )));
    }
    let width = check_num_bins("Alignment width", width)?;

    let mut kept = Vec::with_capacity(onsets.len());
    let mut start_bins = Vec::with_capacity(onsets.len());
    for (i, &onset) in onsets.iter().enumerate() {
        let start_bin = floor_ratio(onset, dt);
        let stop_bin = start_bin + width as f64;
        if onset.is_finite() && start_bin > 0.0 && stop_bin < values.len() as f64 {
            kept.push(i);
            start_bins.push(start_bin as usize);
        } else {
            log::debug!(
                "Onset {} at {} dropped: window [{}, {}) does not fit in a series of {} samples",
                i,
                onset,
                start_bin,
                stop_bin,
                values.len()
            );
        }
    }

    if kept.len() < onsets.len() {
        log::info!(
            "{} of {} onsets dropped while aligning the series",
            onsets.len() - kept.len(),
            onsets.len()
        );
    }

    Ok(Alignment {
        values: DMatrix::from_fn(kept.len(), width, |i, j| values[start_bins[i] + j]),
        kept,
        num_onsets: onsets.len(),
    })
}
