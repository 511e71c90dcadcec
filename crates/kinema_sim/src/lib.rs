pub mod backend;
pub mod pipeline;

pub use backend::ExecutionBackend;
pub use pipeline::{generate, DatasetBuilder, Progress};
