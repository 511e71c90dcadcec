pub mod forces;
pub mod procgen;
pub mod trajectory;

pub use trajectory::{integrate, simulate, Integration};
