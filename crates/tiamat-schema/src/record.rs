use crate::error::RecordError;

/// Shape of one particle record, derived from the seed data.
///
/// The engine does not hard-code a particle schema. Whatever per-particle
/// fields a deployment wants, it expresses them as `f32` words in the seed
/// buffer; the stride is simply `seed_len / particle_count` and the compute
/// and render shaders agree on what each word means.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    particle_count: u32,
    stride_floats: u32,
}

impl RecordLayout {
    /// Derives the record shape from a seed of `seed_len` floats covering
    /// `particle_count` particles.
    ///
    /// Fails when the seed does not divide evenly, which almost always means
    /// the deployment changed its record struct without regenerating seeds.
    pub fn from_seed(particle_count: u32, seed_len: usize) -> Result<Self, RecordError> {
        if particle_count == 0 {
            return Err(RecordError::new("particle count is zero"));
        }
        if seed_len == 0 {
            return Err(RecordError::new("seed data is empty"));
        }
        if seed_len % particle_count as usize != 0 {
            return Err(RecordError::new(format!(
                "seed of {seed_len} floats does not divide evenly among {particle_count} particles"
            )));
        }
        let stride_floats = (seed_len / particle_count as usize) as u32;
        Ok(Self { particle_count, stride_floats })
    }

    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }

    /// Record stride in `f32` words.
    pub fn stride_floats(&self) -> u32 {
        self.stride_floats
    }

    /// Record stride in bytes.
    pub fn stride_bytes(&self) -> u64 {
        self.stride_floats as u64 * 4
    }

    /// Size in bytes of one full state buffer. The store allocates two
    /// buffers of exactly this size.
    pub fn buffer_bytes(&self) -> u64 {
        self.particle_count as u64 * self.stride_bytes()
    }
}
