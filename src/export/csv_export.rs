//! CSV time-series export for simulation metrics.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::state::SimulationMetrics;

/// Record for CSV time-series export
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesRecord {
    /// Simulation time (minutes)
    pub time_min: f64,
    /// Completed steps
    pub step: u64,
    /// Total cell mass (fg)
    pub cell_mass_fg: f64,
    /// Total EPS mass (fg)
    pub eps_mass_fg: f64,
    /// Particle count
    pub particles: usize,
    /// Down-regulated cells
    pub num_down: u64,
    /// Up-regulated cells
    pub num_up: u64,
    /// Mean substrate concentration (g/l)
    pub mean_subst: f64,
    /// Mean QSM concentration (g/l)
    pub mean_qsm: f64,
    /// Mean QSI concentration (g/l)
    pub mean_qsi: f64,
}

impl From<&SimulationMetrics> for TimeSeriesRecord {
    fn from(m: &SimulationMetrics) -> Self {
        Self {
            time_min: m.time_min,
            step: m.step,
            cell_mass_fg: m.total_cell_mass_fg,
            eps_mass_fg: m.total_eps_mass_fg,
            particles: m.particle_count,
            num_down: m.num_down,
            num_up: m.num_up,
            mean_subst: m.mean_conc_subst,
            mean_qsm: m.mean_conc_qsm,
            mean_qsi: m.mean_conc_qsi,
        }
    }
}

/// CSV exporter for time-series data
pub struct CsvExporter {
    writer: csv::Writer<File>,
    /// Sample interval in steps
    sample_interval_steps: u64,
    /// Last sampled step
    last_sample_step: Option<u64>,
    /// Path to output file
    path: PathBuf,
}

impl CsvExporter {
    /// Create a new CSV exporter with the given sample interval
    ///
    /// Creates the exports directory if it doesn't exist.
    /// Filename is auto-generated with timestamp.
    pub fn new(sample_interval_steps: u64) -> Result<Self> {
        let dir = PathBuf::from("exports");
        std::fs::create_dir_all(&dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("timeseries_{}.csv", timestamp);
        let path = dir.join(&filename);

        let file = File::create(&path)?;
        let writer = csv::Writer::from_writer(file);

        log::info!("CSV export started: {}", path.display());

        Ok(Self {
            writer,
            sample_interval_steps: sample_interval_steps.max(1),
            last_sample_step: None,
            path,
        })
    }

    /// Record a sample if the interval has elapsed
    pub fn maybe_record(&mut self, metrics: &SimulationMetrics) -> Result<bool> {
        let due = match self.last_sample_step {
            None => true,
            Some(last) => metrics.step >= last + self.sample_interval_steps,
        };
        if due {
            self.record(metrics)?;
        }
        Ok(due)
    }

    /// Force record a sample regardless of interval
    pub fn record(&mut self, metrics: &SimulationMetrics) -> Result<()> {
        let record = TimeSeriesRecord::from(metrics);
        self.writer.serialize(&record)?;
        self.last_sample_step = Some(metrics.step);
        Ok(())
    }

    /// Finish writing and return the output path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        log::info!("CSV export completed: {}", self.path.display());
        Ok(self.path)
    }

    /// Get the output path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
