use kinema_core::config::validate_steps;
use kinema_core::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{forces, procgen};

/// Result of integrating one body forward `seq_len` steps
#[derive(Debug, Clone, PartialEq)]
pub struct Integration {
    /// Observed (noisy) positions, one per step
    pub trajectory: Trajectory,
    /// True state after the last step
    pub final_position: Vec2,
    pub final_velocity: Vec2,
}

/// Explicit Euler integration: velocity first, then position.
///
/// Observation noise with per-axis std `noise_std` is drawn from `rng`
/// and added to the recorded sample only. The true position and velocity
/// carried to the next step never see it.
pub fn integrate(
    params: &PhysicalParameters,
    initial: &InitialState,
    seq_len: usize,
    dt: f64,
    noise_std: f64,
    rng: &mut impl Rng,
) -> KinemaResult<Integration> {
    validate_steps(seq_len, dt)?;
    if !(noise_std.is_finite() && noise_std >= 0.0) {
        return Err(KinemaError::config(format!(
            "noise_std must be finite and >= 0, got {noise_std}"
        )));
    }

    let mut trajectory = Trajectory::zeros(seq_len);
    let mut position = initial.position;
    let mut velocity = initial.velocity;

    for step in 0..seq_len {
        let acc = forces::acceleration(params, velocity);
        velocity += acc * dt;
        position += velocity * dt;

        ensure_finite(step, "velocity", velocity)?;
        ensure_finite(step, "position", position)?;

        let observed = position + procgen::standard_normal_vec(rng) * noise_std;
        ensure_finite(step, "observed position", observed)?;
        trajectory.set(step, observed);
    }

    Ok(Integration {
        trajectory,
        final_position: position,
        final_velocity: velocity,
    })
}

fn ensure_finite(step: usize, quantity: &'static str, value: Vec2) -> KinemaResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(KinemaError::Simulation {
            seed: None,
            step,
            quantity,
        })
    }
}

/// Simulate one trajectory fully determined by `seed`.
///
/// Every random draw (parameters, initial state, per-step noise) comes
/// from a generator created here and seeded only from `seed`, so calls
/// are independent of each other and of execution order.
pub fn simulate(
    seed: u64,
    seq_len: usize,
    dt: f64,
) -> KinemaResult<(Trajectory, TrajectoryMetadata)> {
    validate_steps(seq_len, dt)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let params = procgen::sample_parameters(&mut rng);
    let initial = procgen::sample_initial_state(&mut rng);

    let run = integrate(&params, &initial, seq_len, dt, OBSERVATION_NOISE_STD, &mut rng)
        .map_err(|e| e.with_seed(seed))?;

    let metadata = TrajectoryMetadata {
        mass: params.mass,
        drag_coeff: params.drag_coeff,
        wind_force: params.wind_force,
        final_velocity: run.final_velocity,
        seed,
    };

    Ok((run.trajectory, metadata))
}
