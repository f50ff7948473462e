//! Smoothing filters for 1-D series and trial-stacked series.
//!
//! Three kernels are available, all parametrized by a characteristic time `deltat` and the sampling interval `dt`:
//!
//! - Gaussian: symmetric (acausal) Gaussian kernel with standard deviation `deltat / dt` samples
//! - Linear: centered moving average over `floor(deltat / dt)` samples, shrinking near the edges
//! - Alpha: causal exponential smoothing amortizing past values by 90% after `deltat`
//!
//! Filters preserve the shape of their input and operate along the time axis, i.e., along each trial (row).
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::trials::{from_rows, row_to_vec, IntoTrials};
use crate::core::utils::{check_num_bins, check_positive, floor_ratio};
use crate::core::MIN_PARALLEL_TRIALS;
use crate::error::RasterError;

/// The Gaussian kernel is truncated at this many standard deviations.
pub const GAUSSIAN_TRUNCATE: f64 = 4.0;
/// The fraction of a past value remaining after `deltat` in the alpha filter.
pub const ALPHA_REMAINDER: f64 = 0.9;

/// The kind of smoothing kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Gaussian,
    Linear,
    Alpha,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FilterKind::Gaussian => write!(f, "gaussian"),
            FilterKind::Linear => write!(f, "linear"),
            FilterKind::Alpha => write!(f, "alpha"),
        }
    }
}

impl FromStr for FilterKind {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gaussian" | "gauss" => Ok(FilterKind::Gaussian),
            "linear" | "moving-average" => Ok(FilterKind::Linear),
            "alpha" | "exponential" => Ok(FilterKind::Alpha),
            other => Err(RasterError::InvalidParameter(format!(
                "Unknown filter kind '{}', expected one of gaussian, linear or alpha",
                other
            ))),
        }
    }
}

/// A smoothing filter with its parameters.
///
/// # Examples
///
/// ```rust
/// use assert_approx_eq::assert_approx_eq;
/// use rusty_raster::core::filter::{Filter, FilterKind};
///
/// // An alpha filter amortizing past values by 90% after one time bin
/// let filter = Filter::new(FilterKind::Alpha, 0.1, 0.1).unwrap();
/// assert!(filter.is_causal());
///
/// let smoothed = filter.apply(&[1.0, 0.0, 0.0, 0.0]).unwrap();
/// for (a, b) in smoothed.iter().zip([1.0, 0.9, 0.81, 0.729]) {
///     assert_approx_eq!(*a, b, 1e-12);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Filter {
    /// Gaussian kernel with standard deviation `deltat`.
    Gaussian { deltat: f64, dt: f64 },
    /// Moving average over a window of length `deltat`.
    Linear { deltat: f64, dt: f64 },
    /// Causal exponential smoothing with 90% amortization at `deltat`.
    Alpha { deltat: f64, dt: f64 },
}

impl Filter {
    /// Create a new filter of the given kind, failing for non-positive `deltat` or `dt`.
    pub fn new(kind: FilterKind, deltat: f64, dt: f64) -> Result<Self, RasterError> {
        check_positive("deltat", deltat)?;
        check_positive("dt", dt)?;
        Ok(match kind {
            FilterKind::Gaussian => Filter::Gaussian { deltat, dt },
            FilterKind::Linear => Filter::Linear { deltat, dt },
            FilterKind::Alpha => Filter::Alpha { deltat, dt },
        })
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::Gaussian { .. } => FilterKind::Gaussian,
            Filter::Linear { .. } => FilterKind::Linear,
            Filter::Alpha { .. } => FilterKind::Alpha,
        }
    }

    pub fn deltat(&self) -> f64 {
        match self {
            Filter::Gaussian { deltat, .. }
            | Filter::Linear { deltat, .. }
            | Filter::Alpha { deltat, .. } => *deltat,
        }
    }

    pub fn dt(&self) -> f64 {
        match self {
            Filter::Gaussian { dt, .. }
            | Filter::Linear { dt, .. }
            | Filter::Alpha { dt, .. } => *dt,
        }
    }

    /// Returns true if the output at any time only depends on the inputs up to that time.
    pub fn is_causal(&self) -> bool {
        matches!(self, Filter::Alpha { .. })
    }

    /// Returns a filtered copy of the series.
    pub fn apply(&self, values: &[f64]) -> Result<Vec<f64>, RasterError> {
        let (deltat, dt) = (self.deltat(), self.dt());
        match self {
            Filter::Gaussian { .. } => gaussian_filter(values, deltat, dt),
            Filter::Linear { .. } => linear_filter(values, deltat, dt),
            Filter::Alpha { .. } => alpha_filter(values, deltat, dt),
        }
    }

    /// Returns a filtered copy of every trial, each trial being filtered independently along time.
    pub fn apply_trials<T: IntoTrials>(&self, trials: T) -> Result<DMatrix<f64>, RasterError> {
        let trials = trials.into_trials()?;
        let (num_trials, num_bins) = trials.shape();
        let filter_row = |i: usize| self.apply(&row_to_vec(&trials, i));

        let rows: Vec<Vec<f64>> = if num_trials >= MIN_PARALLEL_TRIALS {
            (0..num_trials)
                .into_par_iter()
                .map(filter_row)
                .collect::<Result<_, _>>()?
        } else {
            (0..num_trials).map(filter_row).collect::<Result<_, _>>()?
        };

        Ok(from_rows(rows, num_bins))
    }
}

/// Maps any index onto the series by mirroring about its edges, i.e., `(d c b a | a b c d | d c b a)`.
fn reflect_index(index: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let index = index.rem_euclid(period);
    if index < len as isize {
        index as usize
    } else {
        (period - 1 - index) as usize
    }
}

/// Returns the normalized Gaussian kernel with standard deviation `sigma` samples, of length `2 * radius + 1`.
fn gaussian_kernel(sigma: f64) -> Result<Vec<f64>, RasterError> {
    check_positive("Gaussian standard deviation in samples", sigma)?;
    let radius = check_num_bins(
        "Gaussian kernel radius",
        (GAUSSIAN_TRUNCATE * sigma + 0.5).floor(),
    )? as isize;
    let kernel: Vec<f64> = (-radius..=radius)
        .map(|k| (-0.5 * (k as f64 / sigma).powi(2)).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    Ok(kernel.into_iter().map(|w| w / sum).collect())
}

/// A Gaussian kernel moving average with standard deviation `deltat`, i.e., `deltat / dt` samples.
/// The series is extended by reflection about its edges.
///
/// The filter is acausal: each output depends on past and future values.
pub fn gaussian_filter(values: &[f64], deltat: f64, dt: f64) -> Result<Vec<f64>, RasterError> {
    check_positive("deltat", deltat)?;
    check_positive("dt", dt)?;
    if values.is_empty() {
        return Ok(vec![]);
    }

    let kernel = gaussian_kernel(deltat / dt)?;
    let radius = (kernel.len() / 2) as isize;
    Ok((0..values.len() as isize)
        .map(|i| {
            kernel
                .iter()
                .zip_eq(-radius..=radius)
                .map(|(w, k)| w * values[reflect_index(i + k, values.len())])
                .sum()
        })
        .collect())
}

/// A simple moving average over a window of length `deltat`.
///
/// The output at index `i` is the mean of the values in `[i - w, i + w]` with `w = floor(deltat / dt) / 2`.
/// Near the edges the window is clipped to the series rather than padded, so edge values are averaged over fewer samples.
///
/// # Examples
///
/// ```rust
/// use rusty_raster::core::filter::linear_filter;
///
/// let smoothed = linear_filter(&[0.0, 3.0, 0.0, 3.0, 0.0], 3.0, 1.0).unwrap();
/// assert_eq!(smoothed, vec![1.5, 1.0, 2.0, 1.0, 1.5]);
/// ```
pub fn linear_filter(values: &[f64], deltat: f64, dt: f64) -> Result<Vec<f64>, RasterError> {
    check_positive("deltat", deltat)?;
    check_positive("dt", dt)?;

    let half_width = floor_ratio(deltat, dt) as usize / 2;
    let last = values.len().saturating_sub(1);
    Ok((0..values.len())
        .map(|i| {
            let window = &values[i.saturating_sub(half_width)..=(i + half_width).min(last)];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect())
}

/// A causal moving average amortizing past values by 90% after `deltat`.
///
/// With `alpha = 1 - 0.9^(dt / deltat)`, the output is `s[0] = v[0]` and `s[t] = alpha * v[t] + (1 - alpha) * s[t - 1]`.
/// The output at any index never depends on later values.
pub fn alpha_filter(values: &[f64], deltat: f64, dt: f64) -> Result<Vec<f64>, RasterError> {
    check_positive("deltat", deltat)?;
    check_positive("dt", dt)?;

    let alpha = 1.0 - ALPHA_REMAINDER.powf(dt / deltat);
    let mut smoothed: Vec<f64> = Vec::with_capacity(values.len());
    for &value in values.iter() {
        let next = match smoothed.last() {
            Some(&previous) => alpha * value + (1.0 - alpha) * previous,
            None => value,
        };
        smoothed.push(next);
    }
    Ok(smoothed)
}
