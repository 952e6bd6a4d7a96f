use wgpu::util::DeviceExt;

use tiamat_schema::{RecordLayout, Slot, slot};

use super::error::AllocationError;

/// Double-buffered particle state.
///
/// Two identical storage buffers hold consecutive generations of the
/// population. Each tick one is bound read-only and the other read-write,
/// and the roles swap with tick parity; the compute pass never reads the
/// buffer it is writing.
///
/// Both buffers also carry `VERTEX` usage so the render pass can step over
/// the freshly written generation as instance data, and `COPY_SRC` so state
/// can be read back for inspection and tests.
pub struct ParticleStore {
    buffers: [wgpu::Buffer; 2],
    record: RecordLayout,
}

impl ParticleStore {
    /// Allocates both state buffers and uploads the seed into each.
    ///
    /// Sizing is checked against the device limits before either buffer is
    /// created, so a failure allocates nothing. Seeding both slots means
    /// tick 0 reads defined state and a readback of either slot before the
    /// first tick returns the seed.
    pub fn new(
        device: &wgpu::Device,
        record: RecordLayout,
        seed: &[f32],
        limits: &wgpu::Limits,
    ) -> Result<Self, AllocationError> {
        debug_assert_eq!(seed.len() as u64 * 4, record.buffer_bytes());
        check_limits(record.buffer_bytes(), limits)?;

        let buffers = [Slot::A, Slot::B].map(|s| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(match s {
                    Slot::A => "tiamat particle store A",
                    Slot::B => "tiamat particle store B",
                }),
                contents: bytemuck::cast_slice(seed),
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::VERTEX
                    | wgpu::BufferUsages::COPY_SRC,
            })
        });

        log::debug!(
            "particle store: 2 x {} bytes ({} records of {} floats)",
            record.buffer_bytes(),
            record.particle_count(),
            record.stride_floats()
        );

        Ok(Self { buffers, record })
    }

    pub fn record(&self) -> RecordLayout {
        self.record
    }

    /// The buffer backing one slot, independent of tick parity.
    pub fn buffer(&self, slot: Slot) -> &wgpu::Buffer {
        &self.buffers[slot.index()]
    }

    /// The (read, write) buffer pair for `tick`.
    pub fn pair_for_tick(&self, tick: u64) -> (&wgpu::Buffer, &wgpu::Buffer) {
        let pair = slot::for_tick(tick);
        (&self.buffers[pair.read.index()], &self.buffers[pair.write.index()])
    }
}

/// Pre-checks one state buffer's size against the device limits.
///
/// Each buffer is bound in whole as a storage binding, so both the plain
/// buffer-size limit and the storage-binding limit apply.
fn check_limits(required_bytes: u64, limits: &wgpu::Limits) -> Result<(), AllocationError> {
    if required_bytes > limits.max_buffer_size {
        return Err(AllocationError::LimitExceeded {
            limit: "max_buffer_size",
            requested_bytes: required_bytes,
            limit_bytes: limits.max_buffer_size,
        });
    }
    if required_bytes > limits.max_storage_buffer_binding_size as u64 {
        return Err(AllocationError::LimitExceeded {
            limit: "max_storage_buffer_binding_size",
            requested_bytes: required_bytes,
            limit_bytes: limits.max_storage_buffer_binding_size as u64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits_with_storage_binding(max: u32) -> wgpu::Limits {
        wgpu::Limits {
            max_storage_buffer_binding_size: max,
            max_buffer_size: 1 << 30,
            ..wgpu::Limits::default()
        }
    }

    #[test]
    fn four_million_particles_fit_the_default_storage_limit() {
        // 4M records of 8 floats: exactly 128_000_000 bytes per buffer,
        // inside the 128 MiB default binding limit.
        let record = RecordLayout::from_seed(4_000_000, 32_000_000).unwrap();
        assert_eq!(record.buffer_bytes(), 128_000_000);
        check_limits(record.buffer_bytes(), &limits_with_storage_binding(128 << 20)).unwrap();
    }

    #[test]
    fn binding_limit_below_the_store_fails() {
        let record = RecordLayout::from_seed(4_000_000, 32_000_000).unwrap();
        let err = check_limits(record.buffer_bytes(), &limits_with_storage_binding(64 << 20))
            .unwrap_err();
        assert!(matches!(
            err,
            AllocationError::LimitExceeded { limit: "max_storage_buffer_binding_size", .. }
        ));
    }

    #[test]
    fn buffer_size_limit_applies_too() {
        let record = RecordLayout::from_seed(4_000_000, 32_000_000).unwrap();
        let limits = wgpu::Limits {
            max_buffer_size: 1 << 20,
            max_storage_buffer_binding_size: 1 << 30,
            ..wgpu::Limits::default()
        };
        let err = check_limits(record.buffer_bytes(), &limits).unwrap_err();
        assert!(matches!(err, AllocationError::LimitExceeded { limit: "max_buffer_size", .. }));
    }
}
