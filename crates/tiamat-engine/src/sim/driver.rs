use tiamat_schema::DispatchPlan;

use crate::device::{DepthTarget, Gpu};

use super::compute::ComputeStage;
use super::config::PipelineSetup;
use super::diagnostics::{self, ShaderDiagnostic};
use super::error::{PipelineBuildError, SetupError, SubmissionError};
use super::params::ParameterBuffer;
use super::render::RenderStage;
use super::store::ParticleStore;

const UPDATE_SHADER_LABEL: &str = "particle update kernel";
const DRAW_SHADER_LABEL: &str = "particle draw shader";

/// Owns the whole particle pipeline and drives it one tick at a time.
///
/// A tick is: select the buffer pair for the current counter value, record
/// the compute pass, record the render pass over the freshly written
/// generation, submit both in one command buffer, present. The counter
/// advances exactly once per call, whether or not the tick lands on the
/// queue.
pub struct FrameDriver {
    params: ParameterBuffer,
    store: ParticleStore,
    compute: ComputeStage,
    render: RenderStage,
    tick: u64,
}

impl FrameDriver {
    /// Builds every pipeline piece from the deployment's configuration.
    ///
    /// Async because shader compilation results and deferred device
    /// validation resolve asynchronously under wgpu. Either everything is
    /// built and the driver is returned, or nothing usable was created and
    /// the first failure comes back as a [`SetupError`]:
    /// - population/parameter sizing against device limits fails before any
    ///   buffer is created,
    /// - configuration that disagrees with itself fails before any pipeline
    ///   is built,
    /// - WGSL the device rejects is captured per stage through a validation
    ///   scope, with compiler messages routed to the diagnostics sink.
    pub async fn new(gpu: &Gpu<'_>, setup: PipelineSetup) -> Result<Self, SetupError> {
        Self::for_device(gpu.device(), gpu.surface_format(), setup).await
    }

    /// Same construction against a bare device, drawing to `color_format`
    /// instead of a surface. Offscreen targets and headless tests come in
    /// here; [`FrameDriver::new`] delegates to it.
    pub async fn for_device(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        setup: PipelineSetup,
    ) -> Result<Self, SetupError> {
        let limits = device.limits();

        let record = setup.simulation.validate()?;
        setup.render.validate(&record)?;
        let plan =
            DispatchPlan::for_particles(record.particle_count(), setup.simulation.workgroup_size);

        let params = ParameterBuffer::new(device, &setup.simulation.parameters, &limits)?;
        let store = ParticleStore::new(device, record, &setup.simulation.seed_data, &limits)?;

        // One validation scope per stage, so a captured error names the
        // pipeline that produced it. The scope guard pops on drop and
        // discards what it caught; pop explicitly to keep the report.
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let update_module =
            build_shader(device, UPDATE_SHADER_LABEL, &setup.simulation.compute_shader).await;
        let compute = ComputeStage::new(device, &update_module, &params, &store, plan);
        if let Some(err) = scope.pop().await {
            return Err(PipelineBuildError::compute(err.to_string()).into());
        }

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let draw_module = build_shader(device, DRAW_SHADER_LABEL, &setup.render.render_shader).await;
        let render =
            RenderStage::new(device, &draw_module, &setup.render, record, color_format);
        let captured = scope.pop().await;
        let render = render?;
        if let Some(err) = captured {
            return Err(PipelineBuildError::render(err.to_string()).into());
        }

        log::info!(
            "particle pipeline ready: {} particles of {} floats, {} workgroups of {}",
            record.particle_count(),
            record.stride_floats(),
            plan.workgroups,
            plan.workgroup_size
        );

        Ok(Self { params, store, compute, render, tick: 0 })
    }

    /// Runs one tick and presents it.
    ///
    /// The tick number is consumed up front: when frame acquisition fails,
    /// the error carries the number and the next call uses the one after.
    /// Parity selection makes the skip harmless; the next pass simply
    /// re-reads the newest surviving generation.
    pub fn advance(&mut self, gpu: &Gpu<'_>, depth: &DepthTarget) -> Result<(), SubmissionError> {
        let tick = self.tick;
        self.tick += 1;

        let mut frame = gpu.begin_frame().map_err(|source| SubmissionError { tick, source })?;

        let (_, written) = self.store.pair_for_tick(tick);
        self.compute.encode(&mut frame.encoder, tick);
        self.render.encode(
            &mut frame.encoder,
            &frame.view,
            depth.view(),
            written,
            self.store.record().particle_count(),
        );

        gpu.submit(frame);
        Ok(())
    }

    /// Next tick number `advance` will run.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn particle_count(&self) -> u32 {
        self.store.record().particle_count()
    }

    pub fn parameters(&self) -> &ParameterBuffer {
        &self.params
    }

    pub fn plan(&self) -> DispatchPlan {
        self.compute.plan()
    }
}

/// Compiles one deployment-supplied WGSL module and routes its compiler
/// messages to the diagnostics sink.
async fn build_shader(
    device: &wgpu::Device,
    label: &'static str,
    source: &str,
) -> wgpu::ShaderModule {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let info = module.get_compilation_info().await;
    if let Some(diag) = ShaderDiagnostic::from_wgpu(label, source, &info) {
        diagnostics::report(&diag);
    }

    module
}
