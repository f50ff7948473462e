use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use rusty_raster::config::{Config, TimeUnit};
use rusty_raster::core::filter::FilterKind;
use rusty_raster::error::RasterError;
use rusty_raster::pipeline::Pipeline;

#[derive(Parser, Debug)]
#[command(about = "Align spike times on trial onsets and compute the trial-averaged firing rate")]
struct Args {
    /// JSON file with the spike times and the trial onsets
    #[arg(short, long)]
    input: PathBuf,
    /// JSON file with the pipeline configuration (overrides --dt and --unit)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// The time bin
    #[arg(long, default_value = "0.001")]
    dt: f64,
    /// The unit of the input times, and of the pipeline when no configuration file is given
    #[arg(long, default_value = "s")]
    unit: TimeUnit,
    /// The duration of every trial, starting at its onset, in the pipeline unit
    #[arg(short, long)]
    length: f64,
    /// The smoothing kernel, gaussian if omitted
    #[arg(long, requires = "smoothing")]
    filter: Option<FilterKind>,
    /// The characteristic time of the smoothing kernel, no smoothing if omitted
    #[arg(long)]
    smoothing: Option<f64>,
    /// The time bin of the output, no downsampling if omitted
    #[arg(long)]
    downsample: Option<f64>,
    /// Where to write the JSON summary, stdout if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Deserialize, Debug)]
struct Input {
    spike_times: Vec<f64>,
    onsets: Vec<f64>,
}

#[derive(Serialize, Debug)]
struct Summary {
    dt: f64,
    unit: TimeUnit,
    num_trials: usize,
    num_spikes: usize,
    filter: Option<FilterKind>,
    mean_rate: Vec<f64>,
    std_rate: Vec<f64>,
}

fn run(args: &Args) -> Result<Summary, RasterError> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::new(args.dt, args.unit)?,
    };
    let pipeline = Pipeline::new(config)?;
    log::info!(
        "Pipeline with time bin {} {}",
        pipeline.dt(),
        pipeline.unit()
    );

    let input: Input = serde_json::from_str(&fs::read_to_string(&args.input)?)?;
    let spike_times = pipeline.to_pipeline_unit(&input.spike_times, args.unit);
    let onsets = pipeline.to_pipeline_unit(&input.onsets, args.unit);
    log::info!(
        "Loaded {} spikes and {} onsets from {}",
        spike_times.len(),
        onsets.len(),
        args.input.display()
    );

    let rasters = pipeline.align_rasters(&spike_times, &onsets, args.length)?;
    let num_spikes: usize = rasters.iter().sum();
    log::info!(
        "Aligned {} spikes over {} trials of {} bins",
        num_spikes,
        rasters.nrows(),
        rasters.ncols()
    );

    let mut mean_rate = pipeline.trial_average_fr(&rasters, None)?;
    let mut std_rate = pipeline.std_between_traces(&rasters, None)?;
    let filter = match args.smoothing {
        Some(deltat) => {
            let kind = args.filter.unwrap_or(FilterKind::Gaussian);
            let filter = pipeline.filter(kind, deltat)?;
            log::info!("Smoothing with a {} filter over {}", filter.kind(), deltat);
            mean_rate = filter.apply(&mean_rate)?;
            std_rate = filter.apply(&std_rate)?;
            Some(filter.kind())
        }
        None => None,
    };

    let mut dt = pipeline.dt();
    if let Some(new_dt) = args.downsample {
        let downsampled = pipeline.downsample(&mean_rate, new_dt, 0)?;
        mean_rate = downsampled.values;
        std_rate = pipeline.downsample(&std_rate, new_dt, 0)?.values;
        dt = downsampled.effective_dt;
        log::info!("Downsampled to a time bin of {}", dt);
    }

    Ok(Summary {
        dt,
        unit: pipeline.unit(),
        num_trials: rasters.nrows(),
        num_spikes,
        filter,
        mean_rate,
        std_rate,
    })
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let summary = match run(&args) {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let written = serde_json::to_string_pretty(&summary)
        .map_err(RasterError::from)
        .and_then(|json| match &args.output {
            Some(path) => fs::write(path, json).map_err(RasterError::from),
            None => {
                println!("{}", json);
                Ok(())
            }
        });
    if let Err(e) = written {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
