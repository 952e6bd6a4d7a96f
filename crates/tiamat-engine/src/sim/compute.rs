use tiamat_schema::{DispatchPlan, Slot, slot};

use super::params::ParameterBuffer;
use super::store::ParticleStore;

/// Compute half of the pipeline: one kernel, dispatched once per tick over
/// the whole population.
///
/// The kernel's interface is fixed by convention: group 0 holds the
/// parameters (binding 0, uniform), the read generation (binding 1,
/// read-only storage), and the write generation (binding 2, read-write
/// storage). Both parity orientations of that bind group are built up
/// front, so per tick the stage only selects one and dispatches.
pub struct ComputeStage {
    pipeline: wgpu::ComputePipeline,
    /// Indexed by tick parity: `[0]` reads slot A, `[1]` reads slot B.
    bind_groups: [wgpu::BindGroup; 2],
    plan: DispatchPlan,
}

impl ComputeStage {
    pub fn new(
        device: &wgpu::Device,
        module: &wgpu::ShaderModule,
        params: &ParameterBuffer,
        store: &ParticleStore,
        plan: DispatchPlan,
    ) -> Self {
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tiamat compute bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: true },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: false },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tiamat compute pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("tiamat particle update pipeline"),
            layout: Some(&pipeline_layout),
            module,
            // Deployments name their kernel entry point freely; the module
            // must contain exactly one @compute function.
            entry_point: None,
            compilation_options: Default::default(),
            cache: None,
        });

        // One orientation per parity, wired from the same slot table the
        // store uses, so selection here can never disagree with the store.
        let bind_groups = [0u64, 1u64].map(|tick| {
            let pair = slot::for_tick(tick);
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(match pair.read {
                    Slot::A => "tiamat compute bind group (read A)",
                    Slot::B => "tiamat compute bind group (read B)",
                }),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params.buffer().as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: store.buffer(pair.read).as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: store.buffer(pair.write).as_entire_binding(),
                    },
                ],
            })
        });

        Self { pipeline, bind_groups, plan }
    }

    pub fn plan(&self) -> DispatchPlan {
        self.plan
    }

    /// Records one population update for `tick` into `encoder`.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, tick: u64) {
        let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("tiamat particle update pass"),
            timestamp_writes: None,
        });
        cpass.set_pipeline(&self.pipeline);
        cpass.set_bind_group(0, &self.bind_groups[(tick % 2) as usize], &[]);
        cpass.dispatch_workgroups(self.plan.workgroups, 1, 1);
    }
}
