use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DESCRIPTION, DEFAULT_DT, DEFAULT_NUM_TRAJECTORIES, DEFAULT_SEQ_LEN,
};
use crate::error::{KinemaError, KinemaResult};
use crate::types::Vec2;

/// Dataset generation configuration, persisted alongside the data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Number of trajectories; seeds are 0..num_trajectories
    pub num_trajectories: usize,
    /// Samples per trajectory
    pub seq_len: usize,
    /// Integration step (s)
    pub dt: f64,
    pub description: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_trajectories: DEFAULT_NUM_TRAJECTORIES,
            seq_len: DEFAULT_SEQ_LEN,
            dt: DEFAULT_DT,
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl GenerationConfig {
    /// Build a config from caller-supplied (possibly negative) values
    pub fn new(num_trajectories: i64, seq_len: i64, dt: f64) -> KinemaResult<Self> {
        if num_trajectories < 0 {
            return Err(KinemaError::config(format!(
                "num_trajectories must be >= 0, got {num_trajectories}"
            )));
        }
        if seq_len <= 0 {
            return Err(KinemaError::config(format!("seq_len must be >= 1, got {seq_len}")));
        }
        let config = Self {
            num_trajectories: usize::try_from(num_trajectories)
                .map_err(|e| KinemaError::config(format!("num_trajectories: {e}")))?,
            seq_len: usize::try_from(seq_len)
                .map_err(|e| KinemaError::config(format!("seq_len: {e}")))?,
            dt,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self) -> KinemaResult<()> {
        validate_steps(self.seq_len, self.dt)?;
        self.position_bytes()
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or_else(|| {
                KinemaError::config(format!(
                    "dataset of {} x {} samples does not fit in memory",
                    self.num_trajectories, self.seq_len
                ))
            })?;
        Ok(())
    }

    /// Size of the [N, T, 2] position buffer, `None` on overflow
    pub fn position_bytes(&self) -> Option<usize> {
        self.num_trajectories
            .checked_mul(self.seq_len)?
            .checked_mul(std::mem::size_of::<Vec2>())
    }
}

/// Checks shared by a whole dataset and a single simulation call
pub fn validate_steps(seq_len: usize, dt: f64) -> KinemaResult<()> {
    if seq_len == 0 {
        return Err(KinemaError::config("seq_len must be >= 1, got 0"));
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(KinemaError::config(format!(
            "dt must be positive and finite, got {dt}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.num_trajectories, 10_000);
        assert_eq!(config.seq_len, 100);
        assert_eq!(config.dt, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_accepts_zero_trajectories() {
        let config = GenerationConfig::new(0, 10, 0.1).unwrap();
        assert_eq!(config.num_trajectories, 0);
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_new_rejects_invalid_values() {
        assert!(GenerationConfig::new(-1, 10, 0.1).unwrap_err().is_configuration());
        assert!(GenerationConfig::new(5, 0, 0.1).unwrap_err().is_configuration());
        assert!(GenerationConfig::new(5, -3, 0.1).unwrap_err().is_configuration());
        assert!(GenerationConfig::new(5, 10, 0.0).unwrap_err().is_configuration());
        assert!(GenerationConfig::new(5, 10, -0.1).unwrap_err().is_configuration());
        assert!(GenerationConfig::new(5, 10, f64::NAN).unwrap_err().is_configuration());
        assert!(GenerationConfig::new(5, 10, f64::INFINITY).unwrap_err().is_configuration());
    }

    #[test]
    fn test_oversized_dataset_is_a_configuration_error() {
        let err = GenerationConfig::new(1 << 62, 1, 0.1).unwrap_err();
        assert!(err.is_configuration());
        assert!(GenerationConfig::new(i64::MAX, i64::MAX, 0.1).unwrap_err().is_configuration());

        let config = GenerationConfig::new(4, 3, 0.1).unwrap();
        assert_eq!(config.position_bytes(), Some(4 * 3 * 16));
    }

    #[test]
    fn test_validate_catches_mutated_fields() {
        let mut config = GenerationConfig::default();
        config.seq_len = 0;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.dt = -1.0;
        assert!(config.validate().is_err());
    }
}
