//! Core module defining the signal-processing stages of the Rusty Raster library.
//!
//! Every stage is a pure function over immutable inputs. The stages are, leaves first:
//!
//! - [`raster`]: Turns event timestamps into fixed-bin count histograms
//! - [`align`]: Stacks rasterized or sliced trials around per-trial onsets
//! - [`filter`]: Gaussian, moving-average and causal exponential smoothing
//! - [`downsample`]: Decimates a series by an integer stride
//! - [`stats`]: Trial-aggregate firing rate and variability
//!
//! # Examples
//!
//! ```
//! use rusty_raster::core::align::align_rasters;
//! use rusty_raster::core::stats::trial_average_fr;
//!
//! // Spikes of one unit and the onsets of three trials
//! let spike_times = vec![0.15, 0.4, 1.2, 1.45, 2.3, 2.35];
//! let onsets = vec![0.0, 1.0, 2.0];
//!
//! // Align the spikes on the onsets with 100 ms bins over 500 ms
//! let rasters = align_rasters(&spike_times, &onsets, 0.1, 0.5).unwrap();
//! assert_eq!(rasters.shape(), (3, 5));
//!
//! // Trial-averaged firing rate, in spikes per unit of time
//! let rate = trial_average_fr(&rasters, 0.1, None).unwrap();
//! assert_eq!(rate.len(), 5);
//! ```
pub mod align;
pub mod downsample;
pub mod filter;
pub mod raster;
pub mod stats;
pub mod trials;
pub mod utils;

/// Minimum number of trials (or units) to consider parallel processing.
pub const MIN_PARALLEL_TRIALS: usize = 64;
/// Relative tolerance for a ratio of time parameters to be considered an integer.
pub const RATIO_TOLERANCE: f64 = 1e-9;
/// Maximum number of time bins (or kernel taps) a stage may allocate per trial.
pub const MAX_NUM_BINS: usize = 1 << 30;
