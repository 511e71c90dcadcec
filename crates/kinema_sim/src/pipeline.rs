use std::sync::atomic::{AtomicUsize, Ordering};

use kinema_core::*;
use kinema_physics::simulate;
use rayon::prelude::*;

use super::backend::ExecutionBackend;

/// Reported after each trajectory finishes. Observability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Trajectories finished so far, including this one
    pub completed: usize,
    pub total: usize,
    /// Seed of the trajectory that just finished
    pub seed: u64,
}

/// Drives the simulator once per seed 0..N and packs the results into a Dataset
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    config: GenerationConfig,
    backend: ExecutionBackend,
}

impl DatasetBuilder {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            backend: ExecutionBackend::default(),
        }
    }

    pub fn with_backend(mut self, backend: ExecutionBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn backend(&self) -> ExecutionBackend {
        self.backend
    }

    pub fn build(&self) -> KinemaResult<Dataset> {
        self.build_with_progress(|_| {})
    }

    /// Generate the dataset, calling `on_progress` after every trajectory.
    /// With the parallel backend callbacks arrive in completion order.
    pub fn build_with_progress<F>(&self, on_progress: F) -> KinemaResult<Dataset>
    where
        F: Fn(Progress) + Sync,
    {
        self.config.validate()?;
        self.backend.validate()?;

        let total = self.config.num_trajectories;
        let seq_len = self.config.seq_len;
        let dt = self.config.dt;

        tracing::info!(
            "Generating {} trajectories ({} steps, dt = {}) on {} backend",
            total,
            seq_len,
            dt,
            self.backend
        );

        let mut dataset = Dataset::with_config(self.config.clone())?;

        match self.backend {
            ExecutionBackend::Sequential => {
                for index in 0..total {
                    let seed = index as u64;
                    let (trajectory, metadata) = simulate(seed, seq_len, dt)?;
                    dataset.data.row_mut(index).copy_from_slice(trajectory.points());
                    dataset.metadata.push(metadata);

                    tracing::trace!("trajectory {} done", seed);
                    on_progress(Progress {
                        completed: index + 1,
                        total,
                        seed,
                    });
                }
            }
            ExecutionBackend::Parallel { .. } => {
                let completed = AtomicUsize::new(0);
                let results = self.backend.install(|| {
                    (0..total)
                        .into_par_iter()
                        .map(|index| -> KinemaResult<_> {
                            let seed = index as u64;
                            let result = simulate(seed, seq_len, dt)?;
                            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;

                            tracing::trace!("trajectory {} done", seed);
                            on_progress(Progress {
                                completed: done,
                                total,
                                seed,
                            });
                            Ok(result)
                        })
                        .collect::<KinemaResult<Vec<_>>>()
                })??;

                // collect() keeps index order, so row i is seed i
                for (index, (trajectory, metadata)) in results.into_iter().enumerate() {
                    dataset.data.row_mut(index).copy_from_slice(trajectory.points());
                    dataset.metadata.push(metadata);
                }
            }
        }

        tracing::info!("dataset shape: {:?}", dataset.data.shape());
        Ok(dataset)
    }
}

/// Generate `num_trajectories` trajectories with seeds 0..num_trajectories.
/// Arguments are validated before any simulation runs.
pub fn generate(num_trajectories: i64, seq_len: i64, dt: f64) -> KinemaResult<Dataset> {
    let config = GenerationConfig::new(num_trajectories, seq_len, dt)?;
    DatasetBuilder::new(config).build()
}
