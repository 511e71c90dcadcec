use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::{KinemaError, KinemaResult};
use crate::types::{TrajectoryMetadata, Vec2};

/// Dense row-major [N, T, 2] position array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionArray {
    num_trajectories: usize,
    seq_len: usize,
    values: Vec<Vec2>,
}

impl PositionArray {
    /// Zero-filled array; fails instead of aborting when the buffer cannot be allocated
    pub fn zeros(num_trajectories: usize, seq_len: usize) -> KinemaResult<Self> {
        let len = num_trajectories.checked_mul(seq_len).ok_or_else(|| {
            KinemaError::config(format!(
                "position array of {num_trajectories} x {seq_len} samples overflows"
            ))
        })?;
        let mut values = Vec::new();
        values.try_reserve_exact(len).map_err(|e| {
            KinemaError::config(format!("cannot allocate {len} position samples: {e}"))
        })?;
        values.resize(len, Vec2::ZERO);
        Ok(Self {
            num_trajectories,
            seq_len,
            values,
        })
    }

    /// [N, T, 2]
    pub fn shape(&self) -> [usize; 3] {
        [self.num_trajectories, self.seq_len, 2]
    }

    pub fn num_trajectories(&self) -> usize {
        self.num_trajectories
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    pub fn is_empty(&self) -> bool {
        self.num_trajectories == 0
    }

    /// Positions of trajectory `index`
    pub fn row(&self, index: usize) -> &[Vec2] {
        let start = index * self.seq_len;
        &self.values[start..start + self.seq_len]
    }

    pub fn row_mut(&mut self, index: usize) -> &mut [Vec2] {
        let start = index * self.seq_len;
        &mut self.values[start..start + self.seq_len]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Vec2]> {
        // chunks() panics on a zero chunk size; seq_len 0 means no rows anyway
        self.values.chunks(self.seq_len.max(1))
    }

    /// All values as a flat slice of length N * T * 2
    pub fn as_flat(&self) -> &[f64] {
        bytemuck::cast_slice(&self.values)
    }

    fn check_len(&self) -> KinemaResult<()> {
        let expected = self
            .num_trajectories
            .checked_mul(self.seq_len)
            .ok_or_else(|| {
                KinemaError::invalid_data(format!("shape {:?} overflows", self.shape()))
            })?;
        if self.values.len() != expected {
            return Err(KinemaError::invalid_data(format!(
                "position array holds {} samples, shape {:?} needs {}",
                self.values.len(),
                self.shape(),
                expected
            )));
        }
        Ok(())
    }
}

/// A complete generated dataset: positions, per-trajectory labels and the
/// configuration that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub data: PositionArray,
    pub metadata: Vec<TrajectoryMetadata>,
    pub config: GenerationConfig,
}

impl Dataset {
    /// Empty dataset for a config, rows ready to be filled
    pub fn with_config(config: GenerationConfig) -> KinemaResult<Self> {
        let data = PositionArray::zeros(config.num_trajectories, config.seq_len)?;
        let mut metadata = Vec::new();
        metadata.try_reserve_exact(config.num_trajectories).map_err(|e| {
            KinemaError::config(format!(
                "cannot allocate {} metadata entries: {e}",
                config.num_trajectories
            ))
        })?;
        Ok(Self {
            data,
            metadata,
            config,
        })
    }

    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Check config, shape, alignment, seed and finiteness invariants
    pub fn validate(&self) -> KinemaResult<()> {
        self.config
            .validate()
            .map_err(|e| KinemaError::invalid_data(format!("invalid config: {e}")))?;
        self.data.check_len()?;

        let [n, t, _] = self.data.shape();
        if n != self.config.num_trajectories || t != self.config.seq_len {
            return Err(KinemaError::invalid_data(format!(
                "data shape {:?} disagrees with config ({} x {})",
                self.data.shape(),
                self.config.num_trajectories,
                self.config.seq_len
            )));
        }
        if self.metadata.len() != n {
            return Err(KinemaError::invalid_data(format!(
                "{} metadata entries for {} trajectories",
                self.metadata.len(),
                n
            )));
        }
        if let Some((i, meta)) = self
            .metadata
            .iter()
            .enumerate()
            .find(|(i, meta)| meta.seed != *i as u64)
        {
            return Err(KinemaError::invalid_data(format!(
                "metadata[{i}] has seed {}",
                meta.seed
            )));
        }
        if let Some(i) = self.data.as_flat().iter().position(|v| !v.is_finite()) {
            return Err(KinemaError::invalid_data(format!(
                "non-finite position value at flat index {i}"
            )));
        }
        if let Some(meta) = self.metadata.iter().find(|meta| {
            !(meta.mass.is_finite()
                && meta.drag_coeff.is_finite()
                && meta.wind_force.is_finite()
                && meta.final_velocity.is_finite())
        }) {
            return Err(KinemaError::invalid_data(format!(
                "non-finite label for seed {}",
                meta.seed
            )));
        }
        Ok(())
    }

    /// Ranges of the sampled labels, `None` for an empty dataset
    pub fn summary(&self) -> Option<DatasetSummary> {
        let first = self.metadata.first()?;
        let mut summary = DatasetSummary {
            mass: (first.mass, first.mass),
            drag_coeff: (first.drag_coeff, first.drag_coeff),
            mean_final_speed: 0.0,
            max_final_speed: 0.0,
        };
        let mut speed_sum = 0.0;
        for meta in &self.metadata {
            summary.mass = (summary.mass.0.min(meta.mass), summary.mass.1.max(meta.mass));
            summary.drag_coeff = (
                summary.drag_coeff.0.min(meta.drag_coeff),
                summary.drag_coeff.1.max(meta.drag_coeff),
            );
            let speed = meta.final_speed();
            speed_sum += speed;
            summary.max_final_speed = summary.max_final_speed.max(speed);
        }
        summary.mean_final_speed = speed_sum / self.metadata.len() as f64;
        Some(summary)
    }
}

/// Label statistics over a whole dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetSummary {
    /// (min, max)
    pub mass: (f64, f64),
    /// (min, max)
    pub drag_coeff: (f64, f64),
    pub mean_final_speed: f64,
    pub max_final_speed: f64,
}
