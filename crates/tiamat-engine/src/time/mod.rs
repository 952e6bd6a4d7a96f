//! Time subsystem.
//!
//! Frame timing here is observational: simulation step size comes from the
//! deployment's own parameters, so the clock only feeds pacing diagnostics.
//! One `FrameClock` per render loop; call `tick()` once per presented frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
