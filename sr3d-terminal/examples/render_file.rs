//! Example: render a mesh from a few angles into PPM files, no terminal needed
//!
//! Usage: cargo run --example render_file -- path/to/model.obj [out-prefix]

use std::env;
use std::f32::consts::FRAC_PI_2;

use anyhow::{Context, Result};
use sr3d_core::export::save_ppm;
use sr3d_core::{load_mesh, Mesh, Pipeline, SpinningModel};
use sr3d_terminal::{init_logging, LoggingConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default())?;

    let args: Vec<String> = env::args().collect();
    let mesh = match args.get(1) {
        Some(path) => load_mesh(path).with_context(|| format!("cannot load {path}"))?,
        None => {
            eprintln!("Usage: {} <mesh-file> [out-prefix]", args[0]);
            eprintln!("\nNo mesh provided, using default cube...");
            Mesh::cube()
        }
    };
    let prefix = args.get(2).map_or("frame", String::as_str);

    let mut model = SpinningModel::new(mesh);
    // A quarter turn per simulated second
    model.spin = FRAC_PI_2;
    let mut pipeline = Pipeline::new(320, 240);

    for i in 0..4 {
        let dt = if i == 0 { 0.0 } else { 1.0 };
        let stats = pipeline.frame(&mut model, dt);
        let path = format!("{prefix}-{i}.ppm");
        save_ppm(pipeline.target(), &path).with_context(|| format!("cannot write {path}"))?;
        println!("{path}: {stats}");
    }
    Ok(())
}
