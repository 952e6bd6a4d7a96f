//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, bootstraps the GPU and the
//! particle pipeline, and converts paint-ready signals into ticks.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
