/// Workgroup size used when a deployment does not specify one. Matches the
/// `@workgroup_size` most of our kernels declare.
pub const DEFAULT_WORKGROUP_SIZE: u32 = 64;

/// One-dimensional dispatch grid for a particle kernel.
///
/// The grid always rounds up, so the final workgroup may run threads past
/// the particle count; kernels bounds-check their global invocation index.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    pub workgroup_size: u32,
    pub workgroups: u32,
}

impl DispatchPlan {
    /// Plans `ceil(particle_count / workgroup_size)` workgroups.
    ///
    /// `workgroup_size` must be non-zero; the engine validates that before
    /// planning.
    pub fn for_particles(particle_count: u32, workgroup_size: u32) -> Self {
        debug_assert!(workgroup_size > 0, "workgroup size must be non-zero");
        Self {
            workgroup_size,
            workgroups: particle_count.div_ceil(workgroup_size),
        }
    }

    /// Total threads the grid launches (a multiple of the workgroup size).
    pub fn thread_count(&self) -> u64 {
        self.workgroups as u64 * self.workgroup_size as u64
    }
}
