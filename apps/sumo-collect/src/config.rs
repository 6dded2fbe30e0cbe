//! Collector configuration.
//!
//! Every field has a default, so a TOML file only needs the values it
//! changes:
//!
//! ```toml
//! max_steps    = 400
//! output_dir   = "output"
//! network_path = "sumo/map.net.xml"
//! sumo_command = ["sumo-gui", "-c", "sumo/map.sumocfg"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use st_core::StepLimit;
use st_output::{DEFAULT_HEAD_ROWS, ExportPaths, NOT_FOUND_OR_FINAL_JUNCTION, NotFoundLabel};
use st_traci::{LaunchCommand, LaunchOptions};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectorConfig {
    /// Step ceiling; the step that would exceed it is not simulated.
    pub max_steps:        u64,
    /// Rows in each `*_to_1000.csv` file.
    pub head_rows:        usize,
    /// Junction placeholder for unresolved segments.
    pub not_found_label:  String,
    pub log_path:         PathBuf,
    pub output_dir:       PathBuf,
    pub network_path:     PathBuf,
    /// Simulator program and arguments, passed through unchanged.
    pub sumo_command:     Vec<String>,
    /// Fixed TraCI port; a free one is picked when unset.
    pub port:             Option<u16>,
    pub connect_attempts: u32,
    pub retry_delay_ms:   u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_steps:        StepLimit::DEFAULT.get(),
            head_rows:        DEFAULT_HEAD_ROWS,
            not_found_label:  NOT_FOUND_OR_FINAL_JUNCTION.to_owned(),
            log_path:         PathBuf::from("log/log_vehicle.txt"),
            output_dir:       PathBuf::from("output"),
            network_path:     PathBuf::from("sumo/map.net.xml"),
            sumo_command:     Vec::new(),
            port:             None,
            connect_attempts: 60,
            retry_delay_ms:   1_000,
        }
    }
}

impl CollectorConfig {
    /// Read a TOML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn step_limit(&self) -> Result<StepLimit> {
        Ok(StepLimit::new(self.max_steps)?)
    }

    pub fn label(&self) -> NotFoundLabel {
        NotFoundLabel::new(&self.not_found_label)
    }

    pub fn launch_command(&self) -> Result<LaunchCommand> {
        LaunchCommand::new(self.sumo_command.iter().cloned())
            .context("no simulator command: pass it after `--` or set `sumo_command`")
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            port:        self.port,
            attempts:    self.connect_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    pub fn trajectory_paths(&self) -> ExportPaths {
        ExportPaths::trajectory(&self.output_dir)
    }

    pub fn junction_paths(&self) -> ExportPaths {
        ExportPaths::junction(&self.output_dir)
    }
}
