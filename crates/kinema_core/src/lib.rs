pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod types;

pub use config::GenerationConfig;
pub use constants::*;
pub use dataset::*;
pub use error::{KinemaError, KinemaResult};
pub use types::*;
