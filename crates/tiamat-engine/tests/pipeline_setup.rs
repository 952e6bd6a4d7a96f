//! GPU-backed tests for driver setup.
//!
//! Setup has to reject WGSL whose interface disagrees with the fixed
//! binding contract, attributed to the stage that caused it, before any
//! tick runs. These need a real adapter; on machines without one each test
//! prints a note and returns instead of failing.

use tiamat_engine::sim::{
    Color, FrameDriver, PipelineKind, PipelineSetup, RenderConfig, SetupError, SimulationConfig,
};
use tiamat_schema::{PrimitiveTopology, StepMode, VertexAttribute, VertexFormat, VertexLayout};

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const IDENTITY_KERNEL: &str = r#"
struct Particle {
    pos: vec3<f32>,
    age: f32,
    vel: vec3<f32>,
    seed: f32,
}

@group(0) @binding(0) var<uniform> params: vec4<f32>;
@group(0) @binding(1) var<storage, read> src: array<Particle>;
@group(0) @binding(2) var<storage, read_write> dst: array<Particle>;

@compute @workgroup_size(64)
fn step(@builtin(global_invocation_id) id: vec3<u32>) {
    let i = id.x;
    if (i >= arrayLength(&src)) {
        return;
    }
    dst[i] = src[i];
}
"#;

/// Declares the input generation writable, which the pipeline's read-only
/// binding 1 cannot satisfy.
const BACKWARDS_KERNEL: &str = r#"
@group(0) @binding(0) var<uniform> params: vec4<f32>;
@group(0) @binding(1) var<storage, read_write> src: array<f32>;
@group(0) @binding(2) var<storage, read_write> dst: array<f32>;

@compute @workgroup_size(64)
fn step(@builtin(global_invocation_id) id: vec3<u32>) {
    if (id.x >= arrayLength(&src)) {
        return;
    }
    src[id.x] = dst[id.x];
}
"#;

const POINT_DRAW: &str = r#"
@vertex
fn draw(@location(0) pos: vec3<f32>, @location(1) vel: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(pos.xy + vel.xy * 0.0, pos.z, 1.0);
}

@fragment
fn shade() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
"#;

/// Consumes @location(7), which no configured vertex layout feeds.
const HUNGRY_DRAW: &str = r#"
@vertex
fn draw(@location(0) pos: vec3<f32>, @location(7) ghost: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(pos.xy + ghost, pos.z, 1.0);
}

@fragment
fn shade() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
"#;

async fn create_device() -> Option<wgpu::Device> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions::default())
        .await
        .ok()?;
    let (device, _queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("tiamat test device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .ok()?;
    Some(device)
}

/// 128 particles of 8 zeroed floats, drawn as bare triangles straight from
/// the particle records.
fn base_setup(kernel: &str, draw_shader: &str) -> PipelineSetup {
    let particle_layout = VertexLayout {
        stride: 32,
        step_mode: StepMode::Instance,
        attributes: vec![
            VertexAttribute { shader_location: 0, offset: 0, format: VertexFormat::Float32x3 },
            VertexAttribute { shader_location: 1, offset: 16, format: VertexFormat::Float32x3 },
        ],
    };

    PipelineSetup {
        simulation: SimulationConfig::new(128, vec![0.0; 1024], vec![0.5], kernel),
        render: RenderConfig {
            instance_vertex_count: 3,
            vertex_data: vec![],
            index_data: None,
            vertex_layouts: vec![particle_layout],
            render_shader: draw_shader.to_string(),
            topology: PrimitiveTopology::TriangleList,
            background: Color::BLACK,
        },
    }
}

#[test]
fn valid_deployment_builds_a_driver() {
    let Some(device) = pollster::block_on(create_device()) else {
        eprintln!("skipping: no GPU adapter available");
        return;
    };

    let setup = base_setup(IDENTITY_KERNEL, POINT_DRAW);
    let driver = pollster::block_on(FrameDriver::for_device(&device, COLOR_FORMAT, setup))
        .expect("wellformed deployment");

    assert_eq!(driver.tick(), 0);
    assert_eq!(driver.particle_count(), 128);
    assert_eq!(driver.plan().workgroups, 2);
    // One configured float still occupies a whole 16-byte uniform row.
    assert_eq!(driver.parameters().buffer().size(), 16);
}

#[test]
fn kernel_binding_mismatch_fails_setup_with_a_compute_error() {
    let Some(device) = pollster::block_on(create_device()) else {
        eprintln!("skipping: no GPU adapter available");
        return;
    };

    let setup = base_setup(BACKWARDS_KERNEL, POINT_DRAW);
    let err = match pollster::block_on(FrameDriver::for_device(&device, COLOR_FORMAT, setup)) {
        Ok(_) => panic!("setup accepted a kernel that writes through the read-only binding"),
        Err(e) => e,
    };

    match err {
        SetupError::PipelineBuild(e) => assert_eq!(e.kind, PipelineKind::Compute, "{e}"),
        other => panic!("expected a pipeline build error, got {other}"),
    }
}

#[test]
fn draw_attribute_mismatch_fails_setup_with_a_render_error() {
    let Some(device) = pollster::block_on(create_device()) else {
        eprintln!("skipping: no GPU adapter available");
        return;
    };

    let setup = base_setup(IDENTITY_KERNEL, HUNGRY_DRAW);
    let err = match pollster::block_on(FrameDriver::for_device(&device, COLOR_FORMAT, setup)) {
        Ok(_) => panic!("setup accepted a draw shader wanting an attribute nothing feeds"),
        Err(e) => e,
    };

    match err {
        SetupError::PipelineBuild(e) => assert_eq!(e.kind, PipelineKind::Render, "{e}"),
        other => panic!("expected a pipeline build error, got {other}"),
    }
}
