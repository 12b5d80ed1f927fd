/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::FloorNum;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub script: Vec<ScriptedCall>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub n_floors: u8,
    pub n_elevators: usize,
    pub max_passenger_count: u32,
    pub floors_per_second: f64,
    pub door_open_time: f64,
    pub tick_interval: u64,
    pub time_scale: f64,
    pub run_time: f64,
}

/// A button press injected into the scripted host at simulated time `at`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptedCall {
    UpButton { at: f64, floor: FloorNum },
    DownButton { at: f64, floor: FloorNum },
    CabButton { at: f64, elevator: usize, floor: FloorNum },
}

impl ScriptedCall {
    pub fn at(&self) -> f64 {
        match *self {
            ScriptedCall::UpButton { at, .. }
            | ScriptedCall::DownButton { at, .. }
            | ScriptedCall::CabButton { at, .. } => at,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Default for SimulationConfig {
    fn default() -> SimulationConfig {
        SimulationConfig {
            n_floors: 4,
            n_elevators: 1,
            max_passenger_count: 4,
            floors_per_second: 1.0,
            door_open_time: 1.0,
            tick_interval: 50,
            time_scale: 1.0,
            run_time: 30.0,
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

impl SimulationConfig {
    /// Rejects settings the scripted host cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_floors == 0 {
            return Err(ConfigError::Invalid("n_floors must be at least 1".into()));
        }
        if self.n_elevators == 0 {
            return Err(ConfigError::Invalid("n_elevators must be at least 1".into()));
        }
        if !(self.floors_per_second > 0.0) {
            return Err(ConfigError::Invalid("floors_per_second must be positive".into()));
        }
        if !(self.door_open_time >= 0.0) {
            return Err(ConfigError::Invalid("door_open_time must not be negative".into()));
        }
        if self.tick_interval == 0 {
            return Err(ConfigError::Invalid("tick_interval must be at least 1 ms".into()));
        }
        if !(self.time_scale > 0.0) {
            return Err(ConfigError::Invalid("time_scale must be positive".into()));
        }
        if !(self.run_time >= 0.0) {
            return Err(ConfigError::Invalid("run_time must not be negative".into()));
        }

        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        sim.validate()?;

        for call in &self.script {
            if !call.at().is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "scripted call at {} is not a finite time",
                    call.at()
                )));
            }
            let (floor, elevator) = match *call {
                ScriptedCall::UpButton { floor, .. } | ScriptedCall::DownButton { floor, .. } => (floor, None),
                ScriptedCall::CabButton { floor, elevator, .. } => (floor, Some(elevator)),
            };
            if floor >= sim.n_floors {
                return Err(ConfigError::Invalid(format!(
                    "scripted call on floor {} but the building has {} floors",
                    floor, sim.n_floors
                )));
            }
            if let Some(elevator) = elevator {
                if elevator >= sim.n_elevators {
                    return Err(ConfigError::Invalid(format!(
                        "scripted call for elevator {} but there are {} elevators",
                        elevator, sim.n_elevators
                    )));
                }
            }
        }

        Ok(())
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
