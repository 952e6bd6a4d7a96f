//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames, and submitting + presenting them
//! - owning the depth attachment that tracks the surface size

mod depth;
mod gpu;

pub use depth::{DEPTH_FORMAT, DepthTarget};
pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
