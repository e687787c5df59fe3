//! Document root access.

pub mod resolver;

pub use resolver::{ResolvedFile, resolve};
