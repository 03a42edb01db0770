// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tunable parameters for repair and population seeding.
//!
//! All structures deserialize from JSON with every field optional:
//!
//! ```
//! use density_repair::config::Settings;
//!
//! let settings = Settings::from_json_str(r#"{ "repair": { "void_neighbor_threshold": 3 } }"#).unwrap();
//! assert_eq!(settings.repair.void_neighbor_threshold, 3);
//! assert_eq!(settings.population.size, 16);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Parameters of the repair pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Minimum number of filled edge neighbors for a void to be filled (1..=4).
    pub void_neighbor_threshold: u8,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            void_neighbor_threshold: 4,
        }
    }
}

impl RepairConfig {
    pub fn validate(&self) -> Result<(), GridError> {
        if !(1..=4).contains(&self.void_neighbor_threshold) {
            return Err(GridError::InvalidConfig(format!(
                "void_neighbor_threshold must be in 1..=4, got {}",
                self.void_neighbor_threshold
            )));
        }
        Ok(())
    }
}

/// Parameters for seeding a population from a base distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub size: usize,
    /// Probability of flipping each unconstrained cell.
    pub flip_rate: f64,
    pub seed: u64,
    /// Perturb-and-repair attempts per individual before it is left invalid.
    pub max_attempts: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 16,
            flip_rate: 0.05,
            seed: 42,
            max_attempts: 8,
        }
    }
}

impl PopulationConfig {
    pub fn validate(&self) -> Result<(), GridError> {
        if self.size == 0 {
            return Err(GridError::InvalidConfig("population size must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.flip_rate) {
            return Err(GridError::InvalidConfig(format!(
                "flip_rate must be in [0, 1], got {}",
                self.flip_rate
            )));
        }
        if self.max_attempts == 0 {
            return Err(GridError::InvalidConfig("max_attempts must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub repair: RepairConfig,
    pub population: PopulationConfig,
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, GridError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        self.repair.validate()?;
        self.population.validate()
    }
}
