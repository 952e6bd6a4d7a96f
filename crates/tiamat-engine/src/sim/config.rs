use tiamat_schema::{
    DEFAULT_WORKGROUP_SIZE, PrimitiveTopology, RecordLayout, StepMode, VertexLayout,
    validate_layout_set,
};

use super::error::{AllocationError, PipelineBuildError, SetupError};

/// Linear RGBA color used for the render pass clear.
///
/// Straight alpha; the clear never blends, so no premultiplication applies.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub(crate) fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Everything needed to seed and advance the particle population.
///
/// The engine treats `parameters`, `seed_data`, and `compute_shader` as
/// opaque: what each float means is a contract between the deployment's
/// seeds and its WGSL, never something the engine interprets.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of particle records. The record stride is derived from this
    /// and the seed length.
    pub particle_count: u32,

    /// Initial state for every particle, `stride` floats per record.
    pub seed_data: Vec<f32>,

    /// Simulation constants, uploaded once and bound read-only at binding 0.
    pub parameters: Vec<f32>,

    /// WGSL source with a single `@compute` entry point that reads binding 1
    /// and writes binding 2.
    pub compute_shader: String,

    /// Threads per workgroup. Must match the `@workgroup_size` the kernel
    /// declares, since the dispatch grid is planned from it.
    pub workgroup_size: u32,
}

impl SimulationConfig {
    pub fn new(
        particle_count: u32,
        seed_data: Vec<f32>,
        parameters: Vec<f32>,
        compute_shader: impl Into<String>,
    ) -> Self {
        Self {
            particle_count,
            seed_data,
            parameters,
            compute_shader: compute_shader.into(),
            workgroup_size: DEFAULT_WORKGROUP_SIZE,
        }
    }

    /// Checks the population shape and returns the derived record layout.
    pub(crate) fn validate(&self) -> Result<RecordLayout, SetupError> {
        if self.particle_count == 0 || self.seed_data.is_empty() {
            return Err(AllocationError::EmptyStore.into());
        }
        if self.workgroup_size == 0 {
            return Err(PipelineBuildError::compute("workgroup size is zero").into());
        }
        let record = RecordLayout::from_seed(self.particle_count, self.seed_data.len())
            .map_err(|e| PipelineBuildError::compute(e.message))?;
        Ok(record)
    }
}

/// Everything needed to draw the population each tick.
///
/// The instance-step vertex layout is the render side's view onto the same
/// particle records the kernel writes; its stride must match the record
/// stride the seed implies.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Vertices drawn per particle when no index data is supplied. Ignored
    /// for indexed draws, where the index count drives the range.
    pub instance_vertex_count: u32,

    /// Optional shared geometry (one sprite reused by every instance),
    /// interpreted through the vertex-step layout.
    pub vertex_data: Vec<f32>,

    /// Optional index data for the shared geometry.
    pub index_data: Option<Vec<u16>>,

    /// Vertex buffer layouts, one per slot in declaration order. Exactly one
    /// must be instance-step; at most one vertex-step.
    pub vertex_layouts: Vec<VertexLayout>,

    /// WGSL source with one `@vertex` and one `@fragment` entry point.
    pub render_shader: String,

    pub topology: PrimitiveTopology,

    /// Clear color applied at the top of every render pass.
    pub background: Color,
}

impl RenderConfig {
    pub(crate) fn instance_step_layout(&self) -> Option<(usize, &VertexLayout)> {
        self.vertex_layouts
            .iter()
            .enumerate()
            .find(|(_, l)| l.step_mode == StepMode::Instance)
    }

    pub(crate) fn vertex_step_layout(&self) -> Option<(usize, &VertexLayout)> {
        self.vertex_layouts
            .iter()
            .enumerate()
            .find(|(_, l)| l.step_mode == StepMode::Vertex)
    }

    /// Number of vertices the shared geometry holds, when there is one.
    pub(crate) fn geometry_vertex_count(&self) -> Option<u64> {
        let (_, layout) = self.vertex_step_layout()?;
        Some(self.vertex_data.len() as u64 * 4 / layout.stride)
    }

    /// Checks the layouts and draw ranges against each other and against the
    /// particle record. All failures here are caller configuration mistakes;
    /// nothing has touched the device yet.
    pub(crate) fn validate(&self, record: &RecordLayout) -> Result<(), PipelineBuildError> {
        validate_layout_set(&self.vertex_layouts)
            .map_err(|e| PipelineBuildError::render(e.to_string()))?;

        for layout in &self.vertex_layouts {
            if layout.step_mode == StepMode::Instance && layout.stride != record.stride_bytes() {
                return Err(PipelineBuildError::render(format!(
                    "instance layout stride {} does not match the {}-byte particle record",
                    layout.stride,
                    record.stride_bytes()
                )));
            }
        }

        let geometry_bytes = self.vertex_data.len() as u64 * 4;
        match self.vertex_step_layout() {
            Some((_, layout)) => {
                if self.vertex_data.is_empty() {
                    return Err(PipelineBuildError::render(
                        "vertex-step layout declared but no vertex data supplied",
                    ));
                }
                if geometry_bytes % layout.stride != 0 {
                    return Err(PipelineBuildError::render(format!(
                        "{geometry_bytes} bytes of vertex data is not a whole number of {}-byte vertices",
                        layout.stride
                    )));
                }
            }
            None => {
                if !self.vertex_data.is_empty() {
                    return Err(PipelineBuildError::render(
                        "vertex data supplied without a vertex-step layout",
                    ));
                }
            }
        }

        match &self.index_data {
            Some(indices) => {
                if indices.is_empty() {
                    return Err(PipelineBuildError::render("index data is empty"));
                }
                if let Some(vertex_count) = self.geometry_vertex_count() {
                    for &i in indices {
                        if i as u64 >= vertex_count {
                            return Err(PipelineBuildError::render(format!(
                                "index {i} is out of range for {vertex_count} geometry vertices"
                            )));
                        }
                    }
                }
            }
            None => {
                if self.instance_vertex_count == 0 {
                    return Err(PipelineBuildError::render(
                        "instance vertex count is zero and no index data was supplied",
                    ));
                }
                if let Some(vertex_count) = self.geometry_vertex_count()
                    && self.instance_vertex_count as u64 > vertex_count
                {
                    return Err(PipelineBuildError::render(format!(
                        "instance vertex count {} exceeds the {vertex_count} geometry vertices supplied",
                        self.instance_vertex_count
                    )));
                }
            }
        }

        Ok(())
    }
}

/// The two configuration halves a deployment hands to the runtime.
#[derive(Debug, Clone)]
pub struct PipelineSetup {
    pub simulation: SimulationConfig,
    pub render: RenderConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiamat_schema::{VertexAttribute, VertexFormat};

    fn record() -> RecordLayout {
        // 100 particles, 8 floats each.
        RecordLayout::from_seed(100, 800).unwrap()
    }

    fn instance_layout() -> VertexLayout {
        VertexLayout {
            stride: 32,
            step_mode: StepMode::Instance,
            attributes: vec![
                VertexAttribute { shader_location: 0, offset: 0, format: VertexFormat::Float32x3 },
                VertexAttribute { shader_location: 1, offset: 16, format: VertexFormat::Float32x3 },
            ],
        }
    }

    fn corner_layout() -> VertexLayout {
        VertexLayout {
            stride: 8,
            step_mode: StepMode::Vertex,
            attributes: vec![VertexAttribute {
                shader_location: 2,
                offset: 0,
                format: VertexFormat::Float32x2,
            }],
        }
    }

    fn quad_config() -> RenderConfig {
        RenderConfig {
            instance_vertex_count: 0,
            vertex_data: vec![-0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5],
            index_data: Some(vec![0, 1, 2, 0, 2, 3]),
            vertex_layouts: vec![instance_layout(), corner_layout()],
            render_shader: String::new(),
            topology: PrimitiveTopology::TriangleList,
            background: Color::BLACK,
        }
    }

    #[test]
    fn indexed_quad_config_is_valid() {
        quad_config().validate(&record()).unwrap();
    }

    #[test]
    fn instance_only_config_is_valid() {
        let cfg = RenderConfig {
            instance_vertex_count: 3,
            vertex_data: vec![],
            index_data: None,
            vertex_layouts: vec![instance_layout()],
            ..quad_config()
        };
        cfg.validate(&record()).unwrap();
    }

    #[test]
    fn stride_mismatch_rejected() {
        let mut cfg = quad_config();
        cfg.vertex_layouts[0].stride = 16;
        cfg.validate(&record()).unwrap_err();
    }

    #[test]
    fn attribute_past_stride_rejected() {
        let mut cfg = quad_config();
        cfg.vertex_layouts[0].attributes[1].offset = 24;
        let err = cfg.validate(&record()).unwrap_err();
        assert!(err.message.contains("stride"), "{err}");
    }

    #[test]
    fn vertex_data_without_layout_rejected() {
        let mut cfg = quad_config();
        cfg.vertex_layouts = vec![instance_layout()];
        cfg.validate(&record()).unwrap_err();
    }

    #[test]
    fn layout_without_vertex_data_rejected() {
        let mut cfg = quad_config();
        cfg.vertex_data.clear();
        cfg.validate(&record()).unwrap_err();
    }

    #[test]
    fn ragged_vertex_data_rejected() {
        let mut cfg = quad_config();
        cfg.vertex_data.push(1.0);
        cfg.validate(&record()).unwrap_err();
    }

    #[test]
    fn out_of_range_index_rejected() {
        let mut cfg = quad_config();
        cfg.index_data = Some(vec![0, 1, 4]);
        cfg.validate(&record()).unwrap_err();
    }

    #[test]
    fn zero_draw_range_rejected() {
        let mut cfg = quad_config();
        cfg.index_data = None;
        cfg.instance_vertex_count = 0;
        cfg.vertex_data.clear();
        cfg.vertex_layouts = vec![instance_layout()];
        cfg.validate(&record()).unwrap_err();
    }

    #[test]
    fn simulation_shape_checks() {
        let good = SimulationConfig::new(100, vec![0.0; 800], vec![0.1], "");
        assert_eq!(good.validate().unwrap().stride_floats(), 8);

        let zero = SimulationConfig::new(0, vec![0.0; 800], vec![], "");
        assert!(matches!(
            zero.validate().unwrap_err(),
            SetupError::Allocation(AllocationError::EmptyStore)
        ));

        let uneven = SimulationConfig::new(3, vec![0.0; 8], vec![], "");
        assert!(matches!(uneven.validate().unwrap_err(), SetupError::PipelineBuild(_)));

        let mut bad_wg = SimulationConfig::new(100, vec![0.0; 800], vec![], "");
        bad_wg.workgroup_size = 0;
        assert!(matches!(bad_wg.validate().unwrap_err(), SetupError::PipelineBuild(_)));
    }
}
