//! The particle simulation/render pipeline.
//!
//! Deployments describe a simulation as data: seed floats, opaque
//! parameters, WGSL text for the update kernel and the draw shader, and
//! vertex layouts for the draw. This module owns everything derived from
//! that description:
//! - [`ParameterBuffer`]: uniform constants, uploaded once
//! - [`ParticleStore`]: the double-buffered population state
//! - [`ComputeStage`]: the update pipeline + both parity bind groups
//! - [`RenderStage`]: the instanced draw pipeline + static geometry
//! - [`FrameDriver`]: tick orchestration (compute, render, submit, present)

mod compute;
mod config;
mod diagnostics;
mod driver;
mod error;
mod params;
mod render;
mod store;

pub use compute::ComputeStage;
pub use config::{Color, PipelineSetup, RenderConfig, SimulationConfig};
pub use diagnostics::{
    DiagnosticMessage, DiagnosticSeverity, ShaderDiagnostic, set_diagnostics_sink,
};
pub use driver::FrameDriver;
pub use error::{
    AllocationError, PipelineBuildError, PipelineKind, SetupError, SubmissionError,
};
pub use params::ParameterBuffer;
pub use render::RenderStage;
pub use store::ParticleStore;
