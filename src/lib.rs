//! This crate provides tools for turning spike times and sampled signals into aligned, binned and smoothed trials.
//!
//! # Rasterizing Spike Trains
//!
//! ```rust
//! use rusty_raster::core::raster::rasterize;
//!
//! // Count the spikes in bins of 0.5 over (0, 2)
//! let raster = rasterize(&[0.1, 0.5, 1.2], 0.0, 2.0, 0.5).unwrap();
//! assert_eq!(raster.counts(), &[1, 1, 1, 0]);
//! ```
//!
//! # Aligning Trials
//!
//! ```rust
//! use rusty_raster::core::align::{align, align_rasters};
//!
//! // Spike trains are rasterized around every onset, no trial is ever dropped
//! let rasters = align_rasters(&[0.2, 1.3, 5.1], &[0.0, 1.0, 5.0], 0.1, 0.5).unwrap();
//! assert_eq!(rasters.shape(), (3, 5));
//!
//! // Continuous series are sliced around every onset, trials running out of the series are dropped
//! let values: Vec<f64> = (0..100).map(|i| (i as f64 * 0.1).sin()).collect();
//! let alignment = align(&values, &[0.0, 2.0, 9.5], 0.1, 1.0).unwrap();
//! assert_eq!(alignment.num_trials(), 1);
//! assert_eq!(alignment.num_dropped(), 2);
//! ```
//!
//! # Smoothing and Averaging
//!
//! ```rust
//! use rusty_raster::core::align::align_rasters;
//! use rusty_raster::core::filter::{Filter, FilterKind};
//! use rusty_raster::core::stats::{std_between_traces, trial_average_fr};
//!
//! let spike_times = vec![0.12, 0.14, 1.13, 1.35, 2.11, 2.42, 2.43];
//! let rasters = align_rasters(&spike_times, &[0.0, 1.0, 2.0], 0.05, 0.5).unwrap();
//!
//! // Trial-averaged firing rate, smoothed by a Gaussian kernel of standard deviation 0.1
//! let rate = trial_average_fr(&rasters, 0.05, Some(0.1)).unwrap();
//! let deviation = std_between_traces(&rasters, 0.05, None).unwrap();
//! assert_eq!(rate.len(), 10);
//! assert_eq!(deviation.len(), 10);
//!
//! // A causal smoothing of the same rate
//! let filter = Filter::new(FilterKind::Alpha, 0.1, 0.05).unwrap();
//! let causal_rate = filter.apply(&rate).unwrap();
//! assert_eq!(causal_rate.len(), 10);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
