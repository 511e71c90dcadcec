use kinema_core::{KinemaError, KinemaResult};
use std::fmt;

/// How trajectory simulations are scheduled.
/// Every backend produces bit-identical datasets; only wall time differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionBackend {
    /// One trajectory at a time, in seed order
    #[default]
    Sequential,
    /// Rayon work-stealing across trajectories.
    /// `threads: None` uses the global pool, `Some(n)` a dedicated pool of n threads.
    Parallel { threads: Option<usize> },
}

impl ExecutionBackend {
    pub fn parallel() -> Self {
        Self::Parallel { threads: None }
    }

    pub fn with_threads(threads: usize) -> Self {
        Self::Parallel {
            threads: Some(threads),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Parallel { .. } => "parallel",
        }
    }

    pub fn validate(&self) -> KinemaResult<()> {
        if let Self::Parallel { threads: Some(0) } = self {
            return Err(KinemaError::config("thread count must be greater than 0"));
        }
        Ok(())
    }

    /// Run `op` inside this backend's thread pool
    pub(crate) fn install<R, F>(&self, op: F) -> KinemaResult<R>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        self.validate()?;
        match self {
            Self::Sequential | Self::Parallel { threads: None } => Ok(op()),
            Self::Parallel { threads: Some(n) } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(*n)
                    .build()
                    .map_err(|e| {
                        KinemaError::config(format!("failed to build {n}-thread pool: {e}"))
                    })?;
                Ok(pool.install(op))
            }
        }
    }
}

impl fmt::Display for ExecutionBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parallel { threads: Some(n) } => write!(f, "parallel ({n} threads)"),
            other => f.write_str(other.name()),
        }
    }
}
