/// Attribute formats a deployment may use in its vertex layouts.
///
/// Deliberately a subset of what GPUs support: particle records and sprite
/// geometry in this engine are scalars and vectors with 4-byte components,
/// so every format here has 4-byte alignment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Float32,
    Float32x2,
    Float32x3,
    Float32x4,
    Uint32,
    Sint32,
}

impl VertexFormat {
    /// Byte width of one attribute of this format.
    pub const fn size(self) -> u64 {
        match self {
            VertexFormat::Float32 | VertexFormat::Uint32 | VertexFormat::Sint32 => 4,
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
        }
    }
}

/// How the draw call assembles primitives from the per-instance vertices.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    #[default]
    TriangleList,
    TriangleStrip,
}

impl PrimitiveTopology {
    /// Strip topologies carry an implicit primitive-restart index and need
    /// the index format pinned at pipeline build time.
    pub const fn is_strip(self) -> bool {
        matches!(self, PrimitiveTopology::LineStrip | PrimitiveTopology::TriangleStrip)
    }
}
