//! Decimation of series to a coarser sampling interval.
use nalgebra::{DMatrix, Scalar};

use crate::core::utils::{check_positive, floor_ratio};
use crate::core::RATIO_TOLERANCE;
use crate::error::RasterError;

/// A series that can be decimated by keeping a subset of its samples along an axis.
pub trait Decimate: Clone {
    /// Returns the number of samples along the axis, failing if the axis does not exist.
    fn axis_len(&self, axis: usize) -> Result<usize, RasterError>;
    /// Keeps the samples at the given indices along the axis.
    fn select(&self, axis: usize, indices: &[usize]) -> Self;
}

impl<T: Clone> Decimate for Vec<T> {
    fn axis_len(&self, axis: usize) -> Result<usize, RasterError> {
        match axis {
            0 => Ok(self.len()),
            _ => Err(RasterError::InvalidParameter(format!(
                "Axis {} does not exist for a 1-D series",
                axis
            ))),
        }
    }

    fn select(&self, _axis: usize, indices: &[usize]) -> Self {
        indices.iter().map(|&i| self[i].clone()).collect()
    }
}

/// Axis 0 runs along the trials and axis 1 along time.
impl<T: Scalar> Decimate for DMatrix<T> {
    fn axis_len(&self, axis: usize) -> Result<usize, RasterError> {
        match axis {
            0 => Ok(self.nrows()),
            1 => Ok(self.ncols()),
            _ => Err(RasterError::InvalidParameter(format!(
                "Axis {} does not exist for trial-stacked series",
                axis
            ))),
        }
    }

    fn select(&self, axis: usize, indices: &[usize]) -> Self {
        if axis == 0 {
            self.select_rows(indices.iter())
        } else {
            self.select_columns(indices.iter())
        }
    }
}

/// A decimated series together with the sampling interval it actually has.
#[derive(Debug, Clone, PartialEq)]
pub struct Downsampled<D> {
    /// The decimated series.
    pub values: D,
    /// One sample out of `stride` was kept.
    pub stride: usize,
    /// The sampling interval of the decimated series, i.e., `old_dt * stride`.
    pub effective_dt: f64,
}

impl<D> Downsampled<D> {
    /// Returns true if the effective sampling interval matches the requested one.
    pub fn is_exact(&self, new_dt: f64) -> bool {
        (self.effective_dt - new_dt).abs() <= RATIO_TOLERANCE * new_dt.abs()
    }
}

/// Downsamples a series sampled every `old_dt` to a sampling interval of `new_dt`, along the given axis.
///
/// Every `floor(new_dt / old_dt)`-th sample is kept, starting from the first one; samples are not averaged.
/// If `new_dt <= old_dt` the series is returned unchanged: upsampling is not supported.
/// When `new_dt` is not a multiple of `old_dt`, the realized interval `old_dt * stride` differs from `new_dt`:
/// it is reported in [`Downsampled::effective_dt`] and a warning is logged.
///
/// # Examples
///
/// ```rust
/// use rusty_raster::core::downsample::downsample;
///
/// let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
/// let downsampled = downsample(&values, 1.0, 3.0, 0).unwrap();
/// assert_eq!(downsampled.values, vec![0.0, 3.0, 6.0, 9.0]);
/// assert_eq!(downsampled.effective_dt, 3.0);
///
/// // No upsampling
/// let downsampled = downsample(&values, 2.0, 1.0, 0).unwrap();
/// assert_eq!(downsampled.values, values);
/// ```
pub fn downsample<D: Decimate>(
    values: &D,
    old_dt: f64,
    new_dt: f64,
    axis: usize,
) -> Result<Downsampled<D>, RasterError> {
    check_positive("old_dt", old_dt)?;
    check_positive("new_dt", new_dt)?;
    let len = values.axis_len(axis)?;

    if new_dt <= old_dt {
        return Ok(Downsampled {
            values: values.clone(),
            stride: 1,
            effective_dt: old_dt,
        });
    }

    let stride = floor_ratio(new_dt, old_dt) as usize;
    let effective_dt = old_dt * stride as f64;
    if (effective_dt - new_dt).abs() > RATIO_TOLERANCE * new_dt {
        log::warn!(
            "Downsampling from {} to {} is not an integer ratio, keeping 1 sample out of {} (time bin {})",
            old_dt,
            new_dt,
            stride,
            effective_dt
        );
    }

    let indices: Vec<usize> = (0..len).step_by(stride).collect();
    Ok(Downsampled {
        values: values.select(axis, &indices),
        stride,
        effective_dt,
    })
}
