use wgpu::util::DeviceExt;

use super::error::AllocationError;

/// GPU-resident simulation constants.
///
/// The floats are uploaded verbatim (zero-padded to the 16-byte uniform
/// granularity) once at setup and never written again; every compute pass
/// binds them read-only at binding 0. An empty parameter list still gets a
/// minimal buffer so the bind group layout stays uniform across deployments.
pub struct ParameterBuffer {
    buffer: wgpu::Buffer,
}

impl ParameterBuffer {
    pub fn new(
        device: &wgpu::Device,
        parameters: &[f32],
        limits: &wgpu::Limits,
    ) -> Result<Self, AllocationError> {
        let padded = pad_to_uniform_granularity(parameters);
        let size = padded.len() as u64 * 4;
        if size > limits.max_uniform_buffer_binding_size as u64 {
            return Err(AllocationError::LimitExceeded {
                limit: "max_uniform_buffer_binding_size",
                requested_bytes: size,
                limit_bytes: limits.max_uniform_buffer_binding_size as u64,
            });
        }

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tiamat parameter ubo"),
            contents: bytemuck::cast_slice(&padded),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        Ok(Self { buffer })
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

/// Pads to a whole number of 16-byte rows, with at least one row.
///
/// Uniform bindings round sizes up to 16 bytes on most backends; padding on
/// the CPU side keeps the buffer size and the WGSL-declared struct size from
/// disagreeing by a few bytes.
fn pad_to_uniform_granularity(parameters: &[f32]) -> Vec<f32> {
    let mut padded = parameters.to_vec();
    let target = parameters.len().div_ceil(4).max(1) * 4;
    padded.resize(target, 0.0);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_rounds_up_to_four_floats() {
        assert_eq!(pad_to_uniform_granularity(&[]).len(), 4);
        assert_eq!(pad_to_uniform_granularity(&[1.0]).len(), 4);
        assert_eq!(pad_to_uniform_granularity(&[1.0; 4]).len(), 4);
        assert_eq!(pad_to_uniform_granularity(&[1.0; 7]).len(), 8);
        assert_eq!(pad_to_uniform_granularity(&[1.0; 8]).len(), 8);
    }

    #[test]
    fn padding_preserves_values() {
        let padded = pad_to_uniform_granularity(&[0.0001, 0.6, 0.2]);
        assert_eq!(&padded[..3], &[0.0001, 0.6, 0.2]);
        assert_eq!(padded[3], 0.0);
    }
}
