//! Trial-aggregate statistics of aligned rasters and series.
use itertools::Itertools;
use nalgebra::DMatrix;

use crate::core::filter::gaussian_filter;
use crate::core::trials::IntoTrials;
use crate::core::utils::{check_num_bins, check_positive};
use crate::error::RasterError;

/// Converts the input into trials, failing if there is none.
fn non_empty_trials<T: IntoTrials>(rasters: T) -> Result<DMatrix<f64>, RasterError> {
    let trials = rasters.into_trials()?;
    if trials.nrows() == 0 {
        return Err(RasterError::EmptyInput(
            "At least one trial is required".to_string(),
        ));
    }
    Ok(trials)
}

/// Optionally smooths a rate with a Gaussian kernel of standard deviation `smoothing_resolution`.
fn smooth(
    rate: Vec<f64>,
    dt: f64,
    smoothing_resolution: Option<f64>,
) -> Result<Vec<f64>, RasterError> {
    match smoothing_resolution {
        Some(deltat) => gaussian_filter(&rate, deltat, dt),
        None => Ok(rate),
    }
}

/// Computes the trial-averaged firing rate of aligned rasters, of shape (trials x time bins).
///
/// The counts are divided by the bin width `dt` to give a rate. A single raster is treated as a single trial.
/// If `smoothing_resolution` is set, the rate is smoothed by a Gaussian kernel with that standard deviation.
///
/// # Examples
///
/// ```rust
/// use nalgebra::DMatrix;
/// use rusty_raster::core::stats::trial_average_fr;
///
/// let rasters = DMatrix::from_row_slice(2, 3, &[1_usize, 0, 2, 3, 0, 0]);
/// let rate = trial_average_fr(&rasters, 0.5, None).unwrap();
/// assert_eq!(rate, vec![4.0, 0.0, 2.0]);
/// ```
pub fn trial_average_fr<T: IntoTrials>(
    rasters: T,
    dt: f64,
    smoothing_resolution: Option<f64>,
) -> Result<Vec<f64>, RasterError> {
    check_positive("dt", dt)?;
    let trials = non_empty_trials(rasters)?;
    let num_trials = trials.nrows() as f64;
    let rate = trials
        .column_iter()
        .map(|column| column.iter().sum::<f64>() / num_trials / dt)
        .collect();
    smooth(rate, dt, smoothing_resolution)
}

/// Computes the (population) standard deviation across trials of aligned rasters, converted to a rate.
///
/// Same conventions as [`trial_average_fr`].
pub fn std_between_traces<T: IntoTrials>(
    rasters: T,
    dt: f64,
    smoothing_resolution: Option<f64>,
) -> Result<Vec<f64>, RasterError> {
    check_positive("dt", dt)?;
    let trials = non_empty_trials(rasters)?;
    let num_trials = trials.nrows() as f64;
    let deviation = trials
        .column_iter()
        .map(|column| {
            let mean = column.iter().sum::<f64>() / num_trials;
            let variance = column.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / num_trials;
            variance.sqrt() / dt
        })
        .collect();
    smooth(deviation, dt, smoothing_resolution)
}

/// Averages every trial over consecutive bins of `binsize` samples, e.g., to draw a (trials x time) heatmap.
///
/// Samples are indexed by their position `0..n`. The `ceil((n - 1) / binsize)` bins evenly split `[0, n - 1]` and
/// each bin averages the samples `t` with `lo <= t < hi`, hence the last sample is never included.
/// An empty bin gives `NaN`.
pub fn bin_average<T: IntoTrials>(data: T, binsize: f64) -> Result<DMatrix<f64>, RasterError> {
    check_positive("binsize", binsize)?;
    let trials = non_empty_trials(data)?;
    let num_samples = trials.ncols();
    if num_samples < 2 {
        return Err(RasterError::EmptyInput(
            "At least two samples per trial are required to bin a series".to_string(),
        ));
    }

    let total_time = (num_samples - 1) as f64;
    let num_bins = check_num_bins("Number of bins", (total_time / binsize).ceil())?;
    // Samples t with lo <= t < hi are exactly ceil(lo)..ceil(hi)
    let ranges: Vec<(usize, usize)> = (0..=num_bins)
        .map(|k| total_time * k as f64 / num_bins as f64)
        .map(|edge| (edge.ceil() as usize).min(num_samples))
        .tuple_windows()
        .collect();

    Ok(DMatrix::from_fn(trials.nrows(), num_bins, |i, k| {
        let (first, last) = ranges[k];
        if first >= last {
            return f64::NAN;
        }
        (first..last).map(|t| trials[(i, t)]).sum::<f64>() / (last - first) as f64
    }))
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::core::align::align_rasters;
    use crate::core::raster::rasterize;

    const SEED: u64 = 42;

    #[test]
    fn test_trial_average_fr() {
        let rasters = DMatrix::from_row_slice(3, 4, &[1_usize, 0, 2, 0, 3, 0, 0, 1, 2, 0, 1, 2]);
        let rate = trial_average_fr(&rasters, 0.1, None).unwrap();
        let expected = [20.0, 0.0, 10.0, 10.0];
        for (a, b) in rate.iter().zip(expected) {
            assert_approx_eq!(*a, b, 1e-9);
        }

        let rows = vec![vec![1_usize, 0, 2, 0], vec![3, 0, 0, 1], vec![2, 0, 1, 2]];
        assert_eq!(trial_average_fr(&rows, 0.1, None).unwrap(), rate);
    }

    #[test]
    fn test_identical_trials() {
        let row = vec![0.3, 1.7, 0.0, 2.2, 5.1];
        let rows = vec![row.clone(); 7];

        let rate = trial_average_fr(&rows, 0.01, None).unwrap();
        for (a, b) in rate.iter().zip(row.iter()) {
            assert_approx_eq!(*a, b / 0.01, 1e-9);
        }

        let deviation = std_between_traces(&rows, 0.01, None).unwrap();
        assert_eq!(deviation.len(), 5);
        for value in deviation {
            assert_approx_eq!(value, 0.0, 1e-9);
        }
    }

    #[test]
    fn test_std_between_traces() {
        // Population standard deviation, i.e., normalized by the number of trials
        let rows = vec![vec![1.0, 0.0], vec![3.0, 0.0]];
        let deviation = std_between_traces(&rows, 0.5, None).unwrap();
        assert_approx_eq!(deviation[0], 2.0, 1e-12);
        assert_approx_eq!(deviation[1], 0.0, 1e-12);
    }

    #[test]
    fn test_single_series_is_one_trial() {
        let raster = rasterize(&[0.05, 0.15, 0.16], 0.0, 0.3, 0.1).unwrap();
        let rate = trial_average_fr(&raster, 0.1, None).unwrap();
        assert_eq!(rate, raster.rate());

        let deviation = std_between_traces(raster.counts(), 0.1, None).unwrap();
        assert_eq!(deviation, vec![0.0; 3]);
    }

    #[test]
    fn test_single_onset_round_trip() {
        let events = vec![1.02, 1.33, 1.35, 1.91, 2.4];
        let rasters = align_rasters(&events, &[1.0], 0.1, 1.0).unwrap();
        let rate = trial_average_fr(&rasters, 0.1, None).unwrap();
        let raster = rasterize(&events, 1.0, 2.0, 0.1).unwrap();
        assert_eq!(rate, raster.rate());
    }

    #[test]
    fn test_smoothing() {
        let rows = vec![vec![0.0, 0.0, 1.0, 0.0, 0.0], vec![0.0, 0.0, 3.0, 0.0, 0.0]];
        let raw = trial_average_fr(&rows, 1.0, None).unwrap();
        let smoothed = trial_average_fr(&rows, 1.0, Some(1.0)).unwrap();
        assert_eq!(smoothed, gaussian_filter(&raw, 1.0, 1.0).unwrap());
        assert!(smoothed[2] < raw[2]);
        assert!(smoothed[1] > 0.0);

        let raw = std_between_traces(&rows, 1.0, None).unwrap();
        let smoothed = std_between_traces(&rows, 1.0, Some(2.0)).unwrap();
        assert_eq!(smoothed, gaussian_filter(&raw, 2.0, 1.0).unwrap());
    }

    #[test]
    fn test_invalid_inputs() {
        let ragged = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
        assert!(matches!(
            trial_average_fr(&ragged, 0.1, None),
            Err(RasterError::ShapeMismatch(_))
        ));
        assert!(matches!(
            std_between_traces(&ragged, 0.1, None),
            Err(RasterError::ShapeMismatch(_))
        ));

        let empty: Vec<Vec<f64>> = vec![];
        assert!(matches!(
            trial_average_fr(&empty, 0.1, None),
            Err(RasterError::EmptyInput(_))
        ));

        let rows = vec![vec![1.0, 2.0]];
        assert!(matches!(
            trial_average_fr(&rows, 0.0, None),
            Err(RasterError::InvalidParameter(_))
        ));
        assert!(matches!(
            std_between_traces(&rows, 0.1, Some(-1.0)),
            Err(RasterError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_bin_average() {
        // 7 samples at times 0..6, bins of 2 samples: [0, 2), [2, 4), [4, 6)
        let rows = vec![
            vec![1.0, 3.0, 5.0, 7.0, 9.0, 11.0, 100.0],
            vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 100.0],
        ];
        let binned = bin_average(&rows, 2.0).unwrap();
        assert_eq!(binned.shape(), (2, 3));
        assert_eq!(binned.row(0).iter().copied().collect::<Vec<f64>>(), vec![2.0, 6.0, 10.0]);
        assert_eq!(binned.row(1).iter().copied().collect::<Vec<f64>>(), vec![0.0, 1.0, 2.0]);

        // Bins narrower than a sample can be empty
        let binned = bin_average(&vec![vec![1.0, 2.0, 3.0]], 0.5).unwrap();
        assert_eq!(binned.ncols(), 4);
        assert_eq!(binned[(0, 0)], 1.0);
        assert!(binned[(0, 1)].is_nan());
        assert_eq!(binned[(0, 2)], 2.0);
        assert!(binned[(0, 3)].is_nan());

        assert!(matches!(
            bin_average(&vec![vec![1.0]], 1.0),
            Err(RasterError::EmptyInput(_))
        ));
        assert!(matches!(
            bin_average(&vec![vec![1.0, 2.0]], 1e-300),
            Err(RasterError::InvalidParameter(_))
        ));
    }

    /// Averages every bin by scanning all the samples.
    fn bin_average_by_scan(row: &[f64], binsize: f64) -> Vec<f64> {
        let total_time = (row.len() - 1) as f64;
        let num_bins = (total_time / binsize).ceil() as usize;
        (0..num_bins)
            .map(|k| {
                let lo = total_time * k as f64 / num_bins as f64;
                let hi = total_time * (k + 1) as f64 / num_bins as f64;
                let inside: Vec<f64> = (0..row.len())
                    .filter(|&t| t as f64 >= lo && (t as f64) < hi)
                    .map(|t| row[t])
                    .collect();
                inside.iter().sum::<f64>() / inside.len() as f64
            })
            .collect()
    }

    #[test]
    fn test_bin_average_matches_scan() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let cases = [(7, 2.0), (3, 0.5), (101, 10.0), (50, 3.7), (1000, 0.3), (12, 11.0)];
        for (num_samples, binsize) in cases {
            let rows: Vec<Vec<f64>> = (0..3)
                .map(|_| (0..num_samples).map(|_| rng.gen_range(-1.0..1.0)).collect())
                .collect();
            let binned = bin_average(&rows, binsize).unwrap();
            for (i, row) in rows.iter().enumerate() {
                let expected = bin_average_by_scan(row, binsize);
                assert_eq!(binned.ncols(), expected.len());
                for (k, value) in expected.into_iter().enumerate() {
                    if value.is_nan() {
                        assert!(binned[(i, k)].is_nan());
                    } else {
                        assert_approx_eq!(binned[(i, k)], value, 1e-12);
                    }
                }
            }
        }
    }
}
