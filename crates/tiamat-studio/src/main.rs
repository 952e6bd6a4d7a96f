use anyhow::Result;
use winit::dpi::LogicalSize;

use tiamat_engine::device::GpuInit;
use tiamat_engine::logging::{LoggingConfig, init_logging};
use tiamat_engine::sim::set_diagnostics_sink;
use tiamat_engine::window::{Runtime, RuntimeConfig};

mod demos;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    println!();
    println!("  ╔══════════════════════════════════════╗");
    println!("  ║         TIAMAT PARTICLE LAB          ║");
    println!("  ║   gpu compute  ·  instanced draw     ║");
    println!("  ╚══════════════════════════════════════╝");
    println!();

    let name = std::env::args().nth(1).unwrap_or_else(|| "boids".into());
    let setup = match name.as_str() {
        "boids" => demos::boids(),
        "orbit" => demos::orbit(),
        other => anyhow::bail!("unknown deployment '{other}' (try 'boids' or 'orbit')"),
    };

    // The bundled shaders ship with the binary, so any compile message is a
    // developer error worth printing with line info rather than burying in
    // the log.
    set_diagnostics_sink(|diag| {
        if diag.has_errors() {
            eprintln!("shader '{}' was rejected:", diag.shader);
        }
        for msg in &diag.messages {
            match msg.line {
                Some(line) => eprintln!("  [{}] line {line}: {}", diag.shader, msg.text),
                None => eprintln!("  [{}] {}", diag.shader, msg.text),
            }
        }
    });

    log::info!(
        "launching '{name}' with {} particles",
        setup.simulation.particle_count
    );

    Runtime::run(
        RuntimeConfig {
            title: format!("tiamat · {name}"),
            initial_size: LogicalSize::new(1100.0, 800.0),
        },
        GpuInit {
            present_mode: wgpu::PresentMode::AutoVsync,
            ..GpuInit::default()
        },
        setup,
    )
}
