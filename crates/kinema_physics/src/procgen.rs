use kinema_core::*;
use rand::Rng;
use rand_distr::StandardNormal;

/// Draw the physical parameters of one trajectory.
/// Order of draws is fixed: mass, drag, wind (x, y).
pub fn sample_parameters(rng: &mut impl Rng) -> PhysicalParameters {
    let mass = rng.gen_range(MASS_MIN..MASS_MAX);
    let drag_coeff = rng.gen_range(0.0..DRAG_COEFF_MAX);
    let wind_force = standard_normal_vec(rng) * WIND_FORCE_SCALE;

    PhysicalParameters {
        mass,
        gravity: GRAVITY,
        drag_coeff,
        wind_force,
    }
}

/// Draw the starting position and velocity; follows `sample_parameters`
/// on the same generator.
pub fn sample_initial_state(rng: &mut impl Rng) -> InitialState {
    let position = standard_normal_vec(rng) * INITIAL_POSITION_SCALE;
    let velocity = standard_normal_vec(rng) * INITIAL_VELOCITY_SCALE;
    InitialState { position, velocity }
}

/// Two independent N(0, 1) draws, x first
pub fn standard_normal_vec(rng: &mut impl Rng) -> Vec2 {
    let x: f64 = rng.sample(StandardNormal);
    let y: f64 = rng.sample(StandardNormal);
    Vec2::new(x, y)
}
