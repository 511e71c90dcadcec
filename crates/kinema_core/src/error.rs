//! Error taxonomy shared by every kinema crate

use thiserror::Error;

/// Result type for kinema operations
pub type KinemaResult<T> = Result<T, KinemaError>;

/// Errors that can occur while generating or persisting a dataset
#[derive(Error, Debug)]
pub enum KinemaError {
    /// Invalid generation parameters, detected before any simulation runs
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A simulated quantity became NaN or infinite
    #[error("Simulation error{}: non-finite {quantity} at step {step}", seed_label(.seed))]
    Simulation {
        seed: Option<u64>,
        step: usize,
        quantity: &'static str,
    },

    /// Directory creation, read/write, or artifact decoding failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn seed_label(seed: &Option<u64>) -> String {
    match seed {
        Some(seed) => format!(" (seed {seed})"),
        None => String::new(),
    }
}

impl KinemaError {
    pub fn config(msg: impl Into<String>) -> Self {
        KinemaError::Configuration(msg.into())
    }

    /// Artifact contents that could not be decoded or violate a dataset invariant
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        KinemaError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            msg.into(),
        ))
    }

    /// Attach the seed of the failing trajectory to a simulation error
    pub fn with_seed(self, seed: u64) -> Self {
        match self {
            KinemaError::Simulation { step, quantity, .. } => KinemaError::Simulation {
                seed: Some(seed),
                step,
                quantity,
            },
            other => other,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, KinemaError::Configuration(_))
    }

    pub fn is_simulation(&self) -> bool {
        matches!(self, KinemaError::Simulation { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, KinemaError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_seed_only_touches_simulation_errors() {
        let err = KinemaError::Simulation {
            seed: None,
            step: 4,
            quantity: "velocity",
        }
        .with_seed(7);
        assert!(matches!(err, KinemaError::Simulation { seed: Some(7), step: 4, .. }));
        assert_eq!(err.to_string(), "Simulation error (seed 7): non-finite velocity at step 4");

        let err = KinemaError::config("dt must be positive").with_seed(7);
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_data_is_io() {
        let err = KinemaError::invalid_data("truncated");
        match err {
            KinemaError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidData),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
