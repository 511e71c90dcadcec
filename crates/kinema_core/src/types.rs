use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// 2D vector used for positions, velocities and forces.
/// repr(C) + Pod so position buffers can be viewed as flat f64 slices.
/// Serialized as `[x, y]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for [f64; 2] {
    fn from(v: Vec2) -> Self {
        v.to_array()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for f64 {
    type Output = Vec2;
    fn mul(self, rhs: Vec2) -> Vec2 {
        rhs * self
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Physical parameters of one simulated point mass.
/// Sampled once per trajectory and constant for its whole duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalParameters {
    /// kg
    pub mass: f64,
    /// m/s^2
    pub gravity: Vec2,
    /// Quadratic drag coefficient (>= 0)
    pub drag_coeff: f64,
    /// Constant disturbance force (N)
    pub wind_force: Vec2,
}

/// Starting point of the integration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Ordered noisy position samples, one per time step.
/// The buffer is sized to `seq_len` up front and written by step index.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    points: Vec<Vec2>,
}

impl Trajectory {
    pub fn zeros(seq_len: usize) -> Self {
        Self {
            points: vec![Vec2::ZERO; seq_len],
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn set(&mut self, step: usize, point: Vec2) {
        self.points[step] = point;
    }

    /// Interleaved `[x0, y0, x1, y1, ...]` view
    pub fn as_flat(&self) -> &[f64] {
        bytemuck::cast_slice(&self.points)
    }
}

/// Labels for one trajectory. `metadata[i]` always describes trajectory `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryMetadata {
    pub mass: f64,
    pub drag_coeff: f64,
    pub wind_force: Vec2,
    /// Velocity after the last integration step.
    /// Stored under `initial_velocity` to keep the artifact layout.
    #[serde(rename = "initial_velocity")]
    pub final_velocity: Vec2,
    pub seed: u64,
}

impl TrajectoryMetadata {
    pub fn final_speed(&self) -> f64 {
        self.final_velocity.norm()
    }
}
