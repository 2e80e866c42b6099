//! sr3d Terminal Renderer
//!
//! Renders a mesh (or a cube) with the CPU rasterizer, either live in the
//! terminal or once to an image file with `--snapshot`.
//! Controls:
//!   - WASD / Arrow Keys: Rotate the model
//!   - E/R: Roll rotation
//!   - Space: Pause spinning
//!   - F / L: Toggle wireframe / lighting
//!   - Q/ESC: Quit

use anyhow::Result;
use log::warn;
use sr3d_core::{load_mesh, Mesh};
use sr3d_terminal::{init_logging, AppConfig, Command, LoggingConfig, TerminalApp};

fn main() -> Result<()> {
    let config = match AppConfig::from_args(std::env::args().skip(1))? {
        Command::Run(config) => config,
        Command::Help => {
            print!("{}", sr3d_terminal::config::USAGE);
            return Ok(());
        }
    };

    // The terminal belongs to the frames unless rendering a snapshot
    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        file: config.snapshot.is_none().then(|| config.log_file.clone()),
    })?;

    let mesh = match &config.mesh {
        Some(path) => load_mesh(path).unwrap_or_else(|e| {
            warn!("Failed to load {}: {e}. Falling back to a cube.", path.display());
            Mesh::cube()
        }),
        None => Mesh::cube(),
    };

    if config.snapshot.is_some() {
        let stats = sr3d_terminal::render_snapshot(mesh, &config)?;
        log::info!("{stats:#}");
        return Ok(());
    }

    let mut app = TerminalApp::new(mesh, &config)?;
    app.run()
}
