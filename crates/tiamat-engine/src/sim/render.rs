use wgpu::util::DeviceExt;

use tiamat_schema::{PrimitiveTopology, RecordLayout, StepMode, VertexFormat};

use crate::device::DEPTH_FORMAT;

use super::config::RenderConfig;
use super::error::PipelineBuildError;

/// Render half of the pipeline: one instanced draw of the whole population.
///
/// Vertex inputs are entirely config-driven. The instance-step slot walks
/// the freshly written particle buffer (one record per instance); the
/// optional vertex-step slot carries shared sprite geometry, optionally
/// indexed. No bind groups: everything the draw reads arrives through
/// vertex pulling.
pub struct RenderStage {
    pipeline: wgpu::RenderPipeline,
    geometry: Option<wgpu::Buffer>,
    indices: Option<(wgpu::Buffer, u32)>,
    instance_slot: u32,
    vertex_slot: Option<u32>,
    instance_vertex_count: u32,
    background: wgpu::Color,
}

impl RenderStage {
    /// Validates the configuration, then builds the pipeline and uploads the
    /// static geometry. Validation runs first so a malformed config is
    /// rejected with a readable message before any device object exists.
    pub fn new(
        device: &wgpu::Device,
        module: &wgpu::ShaderModule,
        config: &RenderConfig,
        record: RecordLayout,
        color_format: wgpu::TextureFormat,
    ) -> Result<Self, PipelineBuildError> {
        config.validate(&record)?;

        let instance_slot = config
            .instance_step_layout()
            .map(|(i, _)| i as u32)
            .ok_or_else(|| PipelineBuildError::render("no instance-step layout"))?;
        let vertex_slot = config.vertex_step_layout().map(|(i, _)| i as u32);

        // Slot order is declaration order; attribute arrays must outlive the
        // borrowing VertexBufferLayouts, hence the two-step build.
        let attribute_sets: Vec<Vec<wgpu::VertexAttribute>> = config
            .vertex_layouts
            .iter()
            .map(|layout| {
                layout
                    .attributes
                    .iter()
                    .map(|a| wgpu::VertexAttribute {
                        format: map_format(a.format),
                        offset: a.offset,
                        shader_location: a.shader_location,
                    })
                    .collect()
            })
            .collect();

        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = config
            .vertex_layouts
            .iter()
            .zip(&attribute_sets)
            .map(|(layout, attrs)| wgpu::VertexBufferLayout {
                array_stride: layout.stride,
                step_mode: map_step_mode(layout.step_mode),
                attributes: attrs,
            })
            .collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tiamat render pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let strip_index_format = (config.topology.is_strip() && config.index_data.is_some())
            .then_some(wgpu::IndexFormat::Uint16);

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tiamat particle draw pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module,
                // Deployments name their entry points freely; the module must
                // contain exactly one @vertex and one @fragment function.
                entry_point: None,
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: None,
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: map_topology(config.topology),
                strip_index_format,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        let geometry = (!config.vertex_data.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tiamat sprite geometry vbo"),
                contents: bytemuck::cast_slice(&config.vertex_data),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let indices = config.index_data.as_ref().map(|indices| {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tiamat sprite geometry ibo"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            (buffer, indices.len() as u32)
        });

        Ok(Self {
            pipeline,
            geometry,
            indices,
            instance_slot,
            vertex_slot,
            instance_vertex_count: config.instance_vertex_count,
            background: config.background.to_wgpu(),
        })
    }

    /// Records the draw for one tick: clears color and depth, binds the
    /// freshly written generation as instance data, and draws every particle
    /// in a single instanced call.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        instances: &wgpu::Buffer,
        instance_count: u32,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tiamat particle draw pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.background),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(self.instance_slot, instances.slice(..));
        if let (Some(slot), Some(geometry)) = (self.vertex_slot, &self.geometry) {
            rpass.set_vertex_buffer(slot, geometry.slice(..));
        }

        match &self.indices {
            Some((buffer, index_count)) => {
                rpass.set_index_buffer(buffer.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..*index_count, 0, 0..instance_count);
            }
            None => {
                rpass.draw(0..self.instance_vertex_count, 0..instance_count);
            }
        }
    }
}

fn map_format(format: VertexFormat) -> wgpu::VertexFormat {
    match format {
        VertexFormat::Float32 => wgpu::VertexFormat::Float32,
        VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
        VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
        VertexFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
        VertexFormat::Uint32 => wgpu::VertexFormat::Uint32,
        VertexFormat::Sint32 => wgpu::VertexFormat::Sint32,
    }
}

fn map_step_mode(mode: StepMode) -> wgpu::VertexStepMode {
    match mode {
        StepMode::Vertex => wgpu::VertexStepMode::Vertex,
        StepMode::Instance => wgpu::VertexStepMode::Instance,
    }
}

fn map_topology(topology: PrimitiveTopology) -> wgpu::PrimitiveTopology {
    match topology {
        PrimitiveTopology::PointList => wgpu::PrimitiveTopology::PointList,
        PrimitiveTopology::LineList => wgpu::PrimitiveTopology::LineList,
        PrimitiveTopology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        PrimitiveTopology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
        PrimitiveTopology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
    }
}
