use kinema_core::{PhysicalParameters, Vec2};

/// Weight of the body: F = m * g
pub fn gravity_force(mass: f64, gravity: Vec2) -> Vec2 {
    gravity * mass
}

/// Quadratic drag opposing motion: F = -c * v * |v|
pub fn drag_force(drag_coeff: f64, velocity: Vec2) -> Vec2 {
    -(velocity * (drag_coeff * velocity.norm()))
}

/// Sum of gravity, drag and the constant wind force
pub fn total_force(params: &PhysicalParameters, velocity: Vec2) -> Vec2 {
    gravity_force(params.mass, params.gravity)
        + drag_force(params.drag_coeff, velocity)
        + params.wind_force
}

/// Newton's second law: a = F / m
pub fn acceleration(params: &PhysicalParameters, velocity: Vec2) -> Vec2 {
    total_force(params, velocity) / params.mass
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kinema_core::GRAVITY;

    fn params(drag_coeff: f64, wind_force: Vec2) -> PhysicalParameters {
        PhysicalParameters {
            mass: 2.0,
            gravity: GRAVITY,
            drag_coeff,
            wind_force,
        }
    }

    #[test]
    fn test_drag_opposes_motion() {
        let v = Vec2::new(3.0, 4.0);
        let f = drag_force(0.2, v);

        // |F| = c * |v|^2, direction -v
        assert_relative_eq!(f.norm(), 0.2 * 25.0, epsilon = 1e-12);
        assert!(f.x < 0.0 && f.y < 0.0);
        assert_relative_eq!(f.x / f.y, v.x / v.y, epsilon = 1e-12);
    }

    #[test]
    fn test_drag_vanishes_at_rest() {
        assert_eq!(drag_force(0.4, Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_free_fall_acceleration_is_gravity() {
        let a = acceleration(&params(0.0, Vec2::ZERO), Vec2::new(10.0, -3.0));
        assert_relative_eq!(a.x, 0.0);
        assert_relative_eq!(a.y, -9.81, epsilon = 1e-12);
    }

    #[test]
    fn test_wind_scales_inversely_with_mass() {
        let a = acceleration(&params(0.0, Vec2::new(4.0, 0.0)), Vec2::ZERO);
        assert_relative_eq!(a.x, 2.0, epsilon = 1e-12);
    }
}
