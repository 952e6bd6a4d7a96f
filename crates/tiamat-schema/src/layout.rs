use crate::error::LayoutError;
use crate::format::VertexFormat;

/// Step rate of one vertex buffer slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepMode {
    /// Advances per vertex. Used for geometry shared by every particle.
    Vertex,
    /// Advances per instance. Used for the particle record itself.
    Instance,
}

/// One attribute inside a [`VertexLayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttribute {
    pub shader_location: u32,
    pub offset: u64,
    pub format: VertexFormat,
}

/// Layout of one vertex buffer slot: stride, step rate, and the attributes
/// carved out of each stride-sized element.
///
/// Layouts are plain data supplied by the deployment config. Nothing here
/// talks to the GPU; [`VertexLayout::validate`] exists so that a malformed
/// layout is rejected with a readable message before any device object is
/// created from it.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    pub stride: u64,
    pub step_mode: StepMode,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Checks the rules the GPU would otherwise enforce much later and with
    /// a far worse message.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.stride == 0 {
            return Err(LayoutError::new("stride must be non-zero"));
        }
        if self.stride % 4 != 0 {
            return Err(LayoutError::new(format!(
                "stride {} is not a multiple of 4 bytes",
                self.stride
            )));
        }
        if self.attributes.is_empty() {
            return Err(LayoutError::new("layout declares no attributes"));
        }
        for attr in &self.attributes {
            if attr.offset % 4 != 0 {
                return Err(LayoutError::new(format!(
                    "attribute at shader location {} has unaligned offset {}",
                    attr.shader_location, attr.offset
                )));
            }
            if attr.offset + attr.format.size() > self.stride {
                return Err(LayoutError::new(format!(
                    "attribute at shader location {} ends at byte {} but the stride is {}",
                    attr.shader_location,
                    attr.offset + attr.format.size(),
                    self.stride
                )));
            }
        }
        for (i, a) in self.attributes.iter().enumerate() {
            for b in &self.attributes[i + 1..] {
                if a.shader_location == b.shader_location {
                    return Err(LayoutError::new(format!(
                        "shader location {} is declared twice in one layout",
                        a.shader_location
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Validates the full set of vertex buffer layouts for one pipeline.
///
/// On top of per-layout checks this enforces the slot plan the render stage
/// relies on:
/// - shader locations are unique across the whole set,
/// - exactly one `Instance`-step layout (the view onto the particle record),
/// - at most one `Vertex`-step layout (the shared sprite geometry).
pub fn validate_layout_set(layouts: &[VertexLayout]) -> Result<(), LayoutError> {
    let mut seen = Vec::new();
    let mut instance_slots = 0usize;
    let mut vertex_slots = 0usize;
    for layout in layouts {
        layout.validate()?;
        match layout.step_mode {
            StepMode::Instance => instance_slots += 1,
            StepMode::Vertex => vertex_slots += 1,
        }
        for attr in &layout.attributes {
            if seen.contains(&attr.shader_location) {
                return Err(LayoutError::new(format!(
                    "shader location {} is used by more than one layout",
                    attr.shader_location
                )));
            }
            seen.push(attr.shader_location);
        }
    }
    if instance_slots != 1 {
        return Err(LayoutError::new(format!(
            "expected exactly one instance-step layout, found {instance_slots}"
        )));
    }
    if vertex_slots > 1 {
        return Err(LayoutError::new(format!(
            "expected at most one vertex-step layout, found {vertex_slots}"
        )));
    }
    Ok(())
}
