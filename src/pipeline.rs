//! A processing pipeline bound to one configuration, so that every stage of a run shares the same time bin and unit.
use nalgebra::DMatrix;

use crate::config::{Config, TimeUnit};
use crate::core::align::{align, align_rasters, align_units, Alignment};
use crate::core::downsample::{downsample, Decimate, Downsampled};
use crate::core::filter::{Filter, FilterKind};
use crate::core::raster::{rasterize, Raster};
use crate::core::stats::{bin_average, std_between_traces, trial_average_fr};
use crate::core::trials::IntoTrials;
use crate::error::RasterError;

/// The processing stages with the time bin taken from the configuration.
///
/// # Examples
///
/// ```rust
/// use rusty_raster::config::{Config, TimeUnit};
/// use rusty_raster::core::filter::FilterKind;
/// use rusty_raster::pipeline::Pipeline;
///
/// let pipeline = Pipeline::new(Config::new(10.0, TimeUnit::Milliseconds).unwrap()).unwrap();
///
/// // Spike times and trial onsets in milliseconds
/// let spike_times = vec![12.0, 31.0, 55.0, 1012.0, 1018.0, 1075.0];
/// let onsets = vec![0.0, 1000.0];
///
/// let rasters = pipeline.align_rasters(&spike_times, &onsets, 100.0).unwrap();
/// let rate = pipeline.trial_average_fr(&rasters, None).unwrap();
/// let smoothed = pipeline.smooth(&rate, FilterKind::Alpha, 30.0).unwrap();
/// assert_eq!(smoothed.len(), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a new pipeline, failing for an invalid configuration.
    pub fn new(config: Config) -> Result<Self, RasterError> {
        config.validate()?;
        Ok(Pipeline { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dt(&self) -> f64 {
        self.config.dt
    }

    pub fn unit(&self) -> TimeUnit {
        self.config.unit
    }

    /// Converts times expressed in another unit into the unit of the pipeline.
    pub fn to_pipeline_unit(&self, times: &[f64], unit: TimeUnit) -> Vec<f64> {
        times
            .iter()
            .map(|&time| unit.convert(time, self.config.unit))
            .collect()
    }

    pub fn rasterize(&self, events: &[f64], start: f64, stop: f64) -> Result<Raster, RasterError> {
        rasterize(events, start, stop, self.config.dt)
    }

    pub fn align_rasters(
        &self,
        events: &[f64],
        onsets: &[f64],
        length: f64,
    ) -> Result<DMatrix<usize>, RasterError> {
        align_rasters(events, onsets, self.config.dt, length)
    }

    pub fn align_units(
        &self,
        units: &[Vec<f64>],
        onsets: &[f64],
        length: f64,
    ) -> Result<Vec<DMatrix<usize>>, RasterError> {
        align_units(units, onsets, self.config.dt, length)
    }

    pub fn align(
        &self,
        values: &[f64],
        onsets: &[f64],
        length: f64,
    ) -> Result<Alignment, RasterError> {
        align(values, onsets, self.config.dt, length)
    }

    /// Returns a filter of the given kind sampled at the pipeline time bin.
    pub fn filter(&self, kind: FilterKind, deltat: f64) -> Result<Filter, RasterError> {
        Filter::new(kind, deltat, self.config.dt)
    }

    pub fn smooth(
        &self,
        values: &[f64],
        kind: FilterKind,
        deltat: f64,
    ) -> Result<Vec<f64>, RasterError> {
        self.filter(kind, deltat)?.apply(values)
    }

    pub fn smooth_trials<T: IntoTrials>(
        &self,
        trials: T,
        kind: FilterKind,
        deltat: f64,
    ) -> Result<DMatrix<f64>, RasterError> {
        self.filter(kind, deltat)?.apply_trials(trials)
    }

    /// Downsamples a series of the pipeline to the time bin `new_dt`.
    pub fn downsample<D: Decimate>(
        &self,
        values: &D,
        new_dt: f64,
        axis: usize,
    ) -> Result<Downsampled<D>, RasterError> {
        downsample(values, self.config.dt, new_dt, axis)
    }

    pub fn trial_average_fr<T: IntoTrials>(
        &self,
        rasters: T,
        smoothing_resolution: Option<f64>,
    ) -> Result<Vec<f64>, RasterError> {
        trial_average_fr(rasters, self.config.dt, smoothing_resolution)
    }

    pub fn std_between_traces<T: IntoTrials>(
        &self,
        rasters: T,
        smoothing_resolution: Option<f64>,
    ) -> Result<Vec<f64>, RasterError> {
        std_between_traces(rasters, self.config.dt, smoothing_resolution)
    }

    pub fn bin_average<T: IntoTrials>(
        &self,
        data: T,
        binsize: f64,
    ) -> Result<DMatrix<f64>, RasterError> {
        bin_average(data, binsize)
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_pipeline_new() {
        assert!(Pipeline::new(Config {
            dt: 0.0,
            unit: TimeUnit::Seconds
        })
        .is_err());

        let pipeline = Pipeline::new(Config::new(0.1, TimeUnit::Seconds).unwrap()).unwrap();
        assert_eq!(pipeline.dt(), 0.1);
        assert_eq!(pipeline.unit(), TimeUnit::Seconds);
    }

    #[test]
    fn test_pipeline_unit_conversion() {
        let pipeline = Pipeline::new(Config::new(1.0, TimeUnit::Milliseconds).unwrap()).unwrap();
        let times = pipeline.to_pipeline_unit(&[0.5, 1.25], TimeUnit::Seconds);
        assert_approx_eq!(times[0], 500.0, 1e-9);
        assert_approx_eq!(times[1], 1250.0, 1e-9);
    }

    #[test]
    fn test_pipeline_uses_config_dt() {
        let pipeline = Pipeline::new(Config::new(0.5, TimeUnit::Seconds).unwrap()).unwrap();
        let events = vec![0.1, 0.5, 1.2, 2.2, 2.6, 3.9];

        let raster = pipeline.rasterize(&events, 0.0, 2.0).unwrap();
        assert_eq!(raster, rasterize(&events, 0.0, 2.0, 0.5).unwrap());

        let rasters = pipeline.align_rasters(&events, &[0.0, 2.0], 2.0).unwrap();
        assert_eq!(rasters, align_rasters(&events, &[0.0, 2.0], 0.5, 2.0).unwrap());

        let rate = pipeline.trial_average_fr(&rasters, Some(0.5)).unwrap();
        assert_eq!(rate, trial_average_fr(&rasters, 0.5, Some(0.5)).unwrap());

        let deviation = pipeline.std_between_traces(&rasters, None).unwrap();
        assert_eq!(deviation, std_between_traces(&rasters, 0.5, None).unwrap());

        let smoothed = pipeline.smooth(&rate, FilterKind::Linear, 1.5).unwrap();
        let filter = Filter::new(FilterKind::Linear, 1.5, 0.5).unwrap();
        assert_eq!(smoothed, filter.apply(&rate).unwrap());

        let downsampled = pipeline.downsample(&rate, 1.0, 0).unwrap();
        assert_eq!(downsampled.stride, 2);
        assert_eq!(downsampled.values.len(), 2);
    }

    #[test]
    fn test_pipeline_align() {
        let pipeline = Pipeline::new(Config::new(1.0, TimeUnit::Seconds).unwrap()).unwrap();
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let alignment = pipeline.align(&values, &[0.0, 2.0, 4.0], 3.0).unwrap();
        assert_eq!(alignment.kept(), &[1, 2]);

        let smoothed = pipeline
            .smooth_trials(&alignment, FilterKind::Gaussian, 1.0)
            .unwrap();
        assert_eq!(smoothed.shape(), (2, 3));

        let units = pipeline
            .align_units(&[vec![0.5, 2.5], vec![]], &[0.0, 2.0], 2.0)
            .unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].shape(), (2, 2));
    }
}
