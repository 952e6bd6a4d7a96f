//! Bundled particle deployments.
//!
//! Each deployment is pure data: a seed population, parameter block, WGSL
//! pair, and vertex layouts. The engine never knows which one it is running.
//!
//! Both deployments use the same 8-float record so they can share the view
//! layouts below:
//!
//! | floats | field            |
//! |--------|------------------|
//! | 0..3   | position         |
//! | 3      | age              |
//! | 4..7   | velocity         |
//! | 7      | per-particle seed|

use rand::Rng;

use tiamat_engine::sim::{Color, PipelineSetup, RenderConfig, SimulationConfig};
use tiamat_schema::{PrimitiveTopology, StepMode, VertexAttribute, VertexFormat, VertexLayout};

const RECORD_FLOATS: usize = 8;

/// Per-instance view of a particle record: position at offset 0, velocity at
/// offset 16. Age and the seed word are simulation-only fields the draw
/// shaders never read.
fn particle_view() -> VertexLayout {
    VertexLayout {
        stride: (RECORD_FLOATS * 4) as u64,
        step_mode: StepMode::Instance,
        attributes: vec![
            VertexAttribute { shader_location: 0, offset: 0, format: VertexFormat::Float32x3 },
            VertexAttribute { shader_location: 1, offset: 16, format: VertexFormat::Float32x3 },
        ],
    }
}

/// Per-vertex view of the shared sprite geometry: one 2D corner per vertex.
fn corner_view() -> VertexLayout {
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

// ── BOIDS ─────────────────────────────────────────────────────────────────
//
// Classic three-rule flocking in a wrapping box, drawn as small triangles
// rotated to face their velocity. Non-indexed: three vertices per instance.

pub fn boids() -> PipelineSetup {
    let count = 1_500u32;
    let mut rng = rand::thread_rng();

    let mut seed = Vec::with_capacity(count as usize * RECORD_FLOATS);
    for _ in 0..count {
        seed.push(rng.gen_range(-1.0..1.0));
        seed.push(rng.gen_range(-1.0..1.0));
        seed.push(rng.gen_range(-0.3..0.3));
        seed.push(0.0); // age
        seed.push(rng.gen_range(-0.1..0.1));
        seed.push(rng.gen_range(-0.1..0.1));
        seed.push(rng.gen_range(-0.02..0.02));
        seed.push(0.0); // spare
    }

    let simulation = SimulationConfig::new(
        count,
        seed,
        // delta_t, cohesion/separation/alignment radii, then their gains.
        vec![0.04, 0.1, 0.025, 0.025, 0.02, 0.05, 0.005],
        include_str!("shaders/boids_update.wgsl"),
    );

    let render = RenderConfig {
        instance_vertex_count: 3,
        vertex_data: vec![-0.01, -0.02, 0.01, -0.02, 0.0, 0.02],
        index_data: None,
        vertex_layouts: vec![particle_view(), corner_view()],
        render_shader: include_str!("shaders/boids_draw.wgsl").to_string(),
        topology: PrimitiveTopology::TriangleList,
        background: Color::new(0.008, 0.012, 0.03, 1.0),
    };

    PipelineSetup { simulation, render }
}

// ── ORBIT ─────────────────────────────────────────────────────────────────
//
// A stream of points circling a central attractor, respawning from an
// emitter strip when their lifetime runs out. Indexed: each instance is a
// quad billboard built from four vertices and six indices.

/// Gravitational parameter of the attractor. Must match `MU` in
/// `orbit_update.wgsl`; the seed velocities below are computed for circular
/// orbits under the same constant.
const MU: f32 = 5_000.0;

pub fn orbit() -> PipelineSetup {
    let count = 200_000u32;
    let mut rng = rand::thread_rng();

    let mut seed = Vec::with_capacity(count as usize * RECORD_FLOATS);
    for _ in 0..count {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let radius = rng.gen_range(0.15..0.8f32);
        let (sin, cos) = angle.sin_cos();
        let speed = (MU / radius).sqrt() * rng.gen_range(0.95..1.05);

        seed.push(radius * cos);
        seed.push(radius * sin);
        seed.push(rng.gen_range(-0.02..0.02));
        seed.push(rng.gen_range(0.0..0.04)); // age, staggers the respawns
        seed.push(-sin * speed);
        seed.push(cos * speed);
        seed.push(0.0);
        seed.push(rng.gen_range(0.0..1_000.0)); // hash seed
    }

    let simulation = SimulationConfig::new(
        count,
        seed,
        // delta_t, emitter height, emitter width.
        vec![0.0001, 0.6, 0.2],
        include_str!("shaders/orbit_update.wgsl"),
    );

    let s = 0.0035f32;
    let render = RenderConfig {
        instance_vertex_count: 0,
        vertex_data: vec![-s, -s, s, -s, s, s, -s, s],
        index_data: Some(vec![0, 1, 2, 0, 2, 3]),
        vertex_layouts: vec![particle_view(), corner_view()],
        render_shader: include_str!("shaders/orbit_draw.wgsl").to_string(),
        topology: PrimitiveTopology::TriangleList,
        background: Color::new(0.004, 0.004, 0.012, 1.0),
    };

    PipelineSetup { simulation, render }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiamat_schema::{RecordLayout, validate_layout_set};

    #[test]
    fn deployments_have_coherent_shapes() {
        for setup in [boids(), orbit()] {
            let record = RecordLayout::from_seed(
                setup.simulation.particle_count,
                setup.simulation.seed_data.len(),
            )
            .unwrap();
            assert_eq!(record.stride_floats(), RECORD_FLOATS as u32);
            validate_layout_set(&setup.render.vertex_layouts).unwrap();
        }
    }

    #[test]
    fn orbit_indices_address_the_quad() {
        let setup = orbit();
        let vertex_count = (setup.render.vertex_data.len() / 2) as u16;
        for &i in setup.render.index_data.as_ref().unwrap() {
            assert!(i < vertex_count);
        }
    }
}
