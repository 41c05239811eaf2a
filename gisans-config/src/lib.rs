//! JSON configuration for the event-exchange server and the batch pipeline.
//!
//! Every field has a default, so a partial file (or none at all) still
//! yields a working configuration; loading validates the values that the
//! pipelines assume to be sane.

use serde::Deserialize;
use std::path::Path;
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file")]
    Io(#[from] io::Error),
    #[error("failed to parse config file")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}

// --- Server section ---

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_interface")]
    pub interface: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Sleep between polls of a worker's output channel, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// How long to wait for a worker to drain on shutdown, in milliseconds.
    #[serde(default = "default_join_timeout_ms")]
    pub worker_join_timeout_ms: u64,
}

fn default_interface() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    15555
}
fn default_poll_interval_ms() -> u64 {
    1
}
fn default_join_timeout_ms() -> u64 {
    5000
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            interface: default_interface(),
            port: default_port(),
            poll_interval_ms: default_poll_interval_ms(),
            worker_join_timeout_ms: default_join_timeout_ms(),
        }
    }
}

// --- Batch section ---

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BatchSettings {
    /// Detector pixels per axis.
    #[serde(default = "default_bins")]
    pub bins: usize,
    /// Detector angular half-width in degrees.
    #[serde(default = "default_ang_range")]
    pub ang_range: f64,
    /// Sample half-extent perpendicular to the beam, in m.
    #[serde(default = "default_sample_halfwidth")]
    pub sample_halfwidth: f64,
    /// Sample half-extent along the beam, in m.
    #[serde(default = "default_sample_halfheight")]
    pub sample_halfheight: f64,
    /// Offset applied to z when events are propagated to the surface, in m.
    #[serde(default = "default_surface_offset")]
    pub surface_offset: f64,
}

fn default_bins() -> usize {
    10
}
fn default_ang_range() -> f64 {
    3.0
}
fn default_sample_halfwidth() -> f64 {
    0.05
}
fn default_sample_halfheight() -> f64 {
    0.15
}
fn default_surface_offset() -> f64 {
    -0.02
}

impl Default for BatchSettings {
    fn default() -> Self {
        BatchSettings {
            bins: default_bins(),
            ang_range: default_ang_range(),
            sample_halfwidth: default_sample_halfwidth(),
            sample_halfheight: default_sample_halfheight(),
            surface_offset: default_surface_offset(),
        }
    }
}

// --- Top level ---

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub batch: BatchSettings,
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.poll_interval_ms == 0 {
        return Err(ConfigError::Validation(
            "server.poll_interval_ms must be at least 1".to_string(),
        ));
    }
    if config.batch.bins < 2 {
        return Err(ConfigError::Validation(
            "batch.bins must be at least 2".to_string(),
        ));
    }
    if config.batch.ang_range <= 0.0 {
        return Err(ConfigError::Validation(
            "batch.ang_range must be positive".to_string(),
        ));
    }
    if config.batch.sample_halfwidth <= 0.0 || config.batch.sample_halfheight <= 0.0 {
        return Err(ConfigError::Validation(
            "batch sample extents must be positive".to_string(),
        ));
    }
    Ok(())
}
