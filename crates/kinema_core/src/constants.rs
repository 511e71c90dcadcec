// Physical and sampling constants (SI-like units)
// - Distance: metres
// - Mass: kilograms
// - Time: seconds

use crate::types::Vec2;

/// Constant gravitational acceleration (m/s^2), pointing down the y axis
pub const GRAVITY: Vec2 = Vec2::new(0.0, -9.81);

/// Mass is sampled uniformly from [MASS_MIN, MASS_MAX)
pub const MASS_MIN: f64 = 1.0;
pub const MASS_MAX: f64 = 6.0;

/// Quadratic drag coefficient is sampled uniformly from [0, DRAG_COEFF_MAX)
pub const DRAG_COEFF_MAX: f64 = 0.5;

/// Standard-normal scale for the constant wind force (N)
pub const WIND_FORCE_SCALE: f64 = 10.0;

/// Standard-normal scale for the initial position (m)
pub const INITIAL_POSITION_SCALE: f64 = 5.0;

/// Standard-normal scale for the initial velocity (m/s)
pub const INITIAL_VELOCITY_SCALE: f64 = 10.0;

/// Standard deviation of the per-axis observation noise (m)
pub const OBSERVATION_NOISE_STD: f64 = 0.05;

/// Default number of trajectories per dataset
pub const DEFAULT_NUM_TRAJECTORIES: usize = 10_000;

/// Default number of samples per trajectory
pub const DEFAULT_SEQ_LEN: usize = 100;

/// Default integration step (s)
pub const DEFAULT_DT: f64 = 0.1;

/// Where the CLI writes a dataset when no path is given
pub const DEFAULT_OUTPUT_PATH: &str = "./data/physics_v1.bin";

pub const DEFAULT_DESCRIPTION: &str = "2D newtonian motion with gravity, drag, wind, noise";
