//! Tiamat engine crate.
//!
//! This crate owns the platform + GPU runtime pieces and the fully
//! configuration-driven particle pipeline: deployments hand over seed data,
//! opaque parameters, WGSL shader text, and vertex layouts; the engine owns
//! buffers, pipelines, the per-tick pass order, and presentation.

pub mod device;
pub mod sim;
pub mod time;
pub mod window;

pub mod logging;
