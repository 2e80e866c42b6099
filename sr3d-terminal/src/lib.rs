//! Terminal frontend for the sr3d rasterizer

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use log::{debug, info};
use sr3d_core::color::rgb;
use sr3d_core::export::{save_depth_pgm, save_ppm};
use sr3d_core::{Mesh, Pipeline, Shading, SpinningModel, Stats};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod guard;
pub mod logging;
pub mod renderer;

pub use config::{AppConfig, Command};
pub use guard::TerminalGuard;
pub use logging::{init_logging, LoggingConfig};
pub use renderer::{CellMode, TerminalRenderer};

/// Rotation per key press, in radians
const ROTATE_STEP: f32 = 0.1;

/// Color of the edge overlay
const WIREFRAME_COLOR: u32 = rgb(0x40, 0xFF, 0x80);

/// Builds the scene described by `config` around `mesh`
pub fn build_scene(mesh: Mesh, config: &AppConfig) -> SpinningModel {
    let mut scene = SpinningModel::new(mesh);
    scene.spin = config.spin;
    scene.color = config.color;
    if config.wireframe {
        scene.wireframe = Some(WIREFRAME_COLOR);
    }
    scene
}

fn build_pipeline(width: u32, height: u32, config: &AppConfig) -> Pipeline {
    let mut pipeline = Pipeline::new(width, height);
    if config.unlit {
        pipeline.set_shading(Shading::Unlit);
    }
    pipeline
}

/// Renders a single frame of `mesh` to the files named in `config`, without
/// touching the terminal
pub fn render_snapshot(mesh: Mesh, config: &AppConfig) -> Result<Stats> {
    let (width, height) = config.size;
    let mut scene = build_scene(mesh, config);
    let mut pipeline = build_pipeline(width, height, config);
    let stats = pipeline.frame(&mut scene, 0.0);

    if let Some(path) = &config.snapshot {
        save_ppm(pipeline.target(), path)
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!("Wrote {}x{} frame to {}", width, height, path.display());
    }
    if let Some(path) = &config.depth {
        save_depth_pgm(pipeline.target(), path)
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!("Wrote depth buffer to {}", path.display());
    }
    Ok(stats)
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: SpinningModel,
    pipeline: Pipeline,
    renderer: TerminalRenderer,
    frame_time: Duration,
    pending_resize: Option<(u16, u16)>,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    stats: Stats,
}

impl TerminalApp {
    /// Creates an app sized to the current terminal
    pub fn new(mesh: Mesh, config: &AppConfig) -> Result<Self> {
        let (cols, rows) = terminal::size().context("cannot query terminal size")?;
        Ok(Self::with_size(mesh, config, cols, rows))
    }

    /// Creates an app for a terminal of `cols`×`rows` cells
    pub fn with_size(mesh: Mesh, config: &AppConfig, cols: u16, rows: u16) -> Self {
        let renderer = TerminalRenderer::new(if config.ascii {
            CellMode::Ascii
        } else {
            CellMode::HalfBlock
        });
        let (width, height) = renderer.target_size(cols, rows);

        Self {
            scene: build_scene(mesh, config),
            pipeline: build_pipeline(width, height, config),
            renderer,
            frame_time: Duration::from_secs(1) / config.fps.max(1),
            pending_resize: None,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            stats: Stats::default(),
        }
    }

    pub fn scene(&self) -> &SpinningModel {
        &self.scene
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Takes over the terminal and runs until the user quits
    pub fn run(&mut self) -> Result<()> {
        let _guard = TerminalGuard::new().context("cannot set up the terminal")?;
        info!(
            "Starting {}x{} render loop",
            self.pipeline.target().width(),
            self.pipeline.target().height()
        );
        let result = self.main_loop();
        info!("Render loop finished: {:#}", self.pipeline.stats());
        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let mut last_tick = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }
            if !self.running {
                break;
            }
            self.apply_resize();

            // Update and render
            let dt = last_tick.elapsed().as_secs_f32();
            last_tick = Instant::now();
            self.stats = self.pipeline.frame(&mut self.scene, dt);
            self.present()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Reacts to one terminal event. Resizes are only recorded here and
    /// applied before the next frame.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Resize(cols, rows) => self.pending_resize = Some((cols, rows)),
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, modifiers, .. }: KeyEvent) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => self.scene.rotation.rotate(ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.scene.rotation.rotate(-ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.scene.rotation.rotate(0.0, -ROTATE_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.scene.rotation.rotate(0.0, ROTATE_STEP, 0.0),
            KeyCode::Char('e') => self.scene.rotation.rotate(0.0, 0.0, ROTATE_STEP),
            KeyCode::Char('r') => self.scene.rotation.rotate(0.0, 0.0, -ROTATE_STEP),
            KeyCode::Char(' ') => {
                self.scene.paused = !self.scene.paused;
                debug!("paused: {}", self.scene.paused);
            }
            KeyCode::Char('f') => self.scene.toggle_wireframe(WIREFRAME_COLOR),
            KeyCode::Char('l') => {
                let shading = match self.pipeline.shading() {
                    Shading::Lambert => Shading::Unlit,
                    Shading::Unlit => Shading::Lambert,
                };
                debug!("shading: {shading:?}");
                self.pipeline.set_shading(shading);
            }
            _ => {}
        }
    }

    /// Applies the last resize event, if any. Must run between frames.
    pub fn apply_resize(&mut self) {
        if let Some((cols, rows)) = self.pending_resize.take() {
            let (width, height) = self.renderer.target_size(cols, rows);
            if self.pipeline.resize(width, height) {
                debug!("terminal resized to {cols}x{rows} cells");
            }
        }
    }

    fn present(&mut self) -> Result<()> {
        let mut stdout = stdout().lock();
        self.renderer.draw(self.pipeline.target(), &mut stdout)?;

        // Draw UI overlay
        let (cols, _) = terminal::size()?;
        let mut status = format!(
            "sr3d | FPS: {:.1} | {} | WASD/Arrows=Rotate E/R=Roll Space=Pause F=Wire L=Light Q=Quit",
            self.fps, self.stats
        );
        if let Some((i, _)) = status.char_indices().nth(cols as usize) {
            status.truncate(i);
        }
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
