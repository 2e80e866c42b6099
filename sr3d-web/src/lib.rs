//! sr3d Web - the CPU rasterizer in a browser canvas
//!
//! Frames are rendered in WASM and copied into a 2D canvas with
//! `putImageData`. No WebGL or WebGPU context is involved.

use std::sync::Once;

use log::{debug, info, Level, LevelFilter};
use sr3d_core::color::rgb;
use sr3d_core::obj::parse_obj;
use sr3d_core::stl::parse_stl;
use sr3d_core::{Mesh, MeshError, Pipeline, Shading, SpinningModel, Stats};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

const WIREFRAME_COLOR: u32 = rgb(0x40, 0xFF, 0x80);

static LOGGING: Once = Once::new();

/// Sends `log` records to the browser console at `level` and up, and panic
/// messages to `console.error`. Only the first call has an effect.
pub fn init_logging(level: Level) {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        // The page may have installed its own logger already
        let _ = console_log::init_with_level(level);
        debug!("console logging initialized");
    });
}

// Entry point from JS
#[wasm_bindgen(start)]
pub fn start() {
    init_logging(Level::Info);
}

/// Changes the log filter at runtime, e.g. `"debug"` or `"off"`. Returns
/// false for an unknown level name.
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> bool {
    match level.parse::<LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}

#[wasm_bindgen]
pub struct WebRenderer {
    scene: SpinningModel,
    pipeline: Pipeline,
    context: Option<CanvasRenderingContext2d>,
    stats: Stats,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Creates a renderer showing a cube in a `width`×`height` framebuffer
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> WebRenderer {
        WebRenderer {
            scene: SpinningModel::new(Mesh::cube()),
            pipeline: Pipeline::new(width, height),
            context: None,
            stats: Stats::default(),
        }
    }

    /// Draws into the canvas with id `canvas_id` from now on, matching its size
    pub fn attach(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
            .dyn_into()?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        self.resize(canvas.width(), canvas.height());
        self.context = Some(context);
        info!("attached to #{canvas_id}");
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.pipeline.target().width()
    }

    pub fn height(&self) -> u32 {
        self.pipeline.target().height()
    }

    /// Resizes the framebuffer. Call between frames.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.pipeline.resize(width, height) {
            debug!("framebuffer resized to {width}x{height}");
        }
    }

    /// Update rotation state
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.scene.rotation.rotate(dx, dy, dz);
    }

    pub fn set_spin(&mut self, radians_per_sec: f32) {
        self.scene.spin = radians_per_sec;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.scene.paused = paused;
    }

    pub fn toggle_wireframe(&mut self) {
        self.scene.toggle_wireframe(WIREFRAME_COLOR);
    }

    pub fn set_lit(&mut self, lit: bool) {
        self.pipeline
            .set_shading(if lit { Shading::Lambert } else { Shading::Unlit });
    }

    /// Replaces the model with Wavefront OBJ source text
    pub fn load_obj(&mut self, text: &str) -> Result<(), JsValue> {
        self.replace_mesh(parse_obj(text)).map_err(to_js)
    }

    /// Replaces the model with the bytes of an STL file
    pub fn load_stl(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.replace_mesh(parse_stl(bytes)).map_err(to_js)
    }

    /// Advances by `dt` seconds and renders one frame. Returns the number of
    /// pixels written.
    pub fn tick(&mut self, dt: f32) -> u32 {
        self.stats = self.pipeline.frame(&mut self.scene, dt);
        self.stats.frags.o as u32
    }

    /// The framebuffer as RGBA bytes, row by row
    pub fn frame_bytes(&self) -> Vec<u8> {
        self.pipeline.target().to_rgba_bytes()
    }

    /// Copies the last frame to the attached canvas, if any
    pub fn present(&self) -> Result<(), JsValue> {
        match &self.context {
            Some(context) => self.present_to(context),
            None => Ok(()),
        }
    }

    /// Copies the last frame to `context` at the origin
    pub fn present_to(&self, context: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let bytes = self.frame_bytes();
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(bytes.as_slice()),
            self.width(),
            self.height(),
        )?;
        context.put_image_data(&image, 0.0, 0.0)
    }

    /// One line summary of the last frame
    pub fn stats(&self) -> String {
        self.stats.to_string()
    }
}

impl WebRenderer {
    fn replace_mesh(&mut self, mesh: Result<Mesh, MeshError>) -> Result<(), MeshError> {
        let mesh = mesh?;
        info!(
            "loaded {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        self.scene.set_mesh(mesh);
        Ok(())
    }
}

fn to_js(e: MeshError) -> JsValue {
    JsValue::from_str(&e.to_string())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_console_logger_installed_once() {
        init_logging(Level::Debug);
        let level = log::max_level();
        assert!(level >= LevelFilter::Info);
        // Ignored: the first initialization wins
        init_logging(Level::Trace);
        assert_eq!(log::max_level(), level);

        let mut r = WebRenderer::new(8, 8);
        r.resize(16, 16);
        assert_eq!(r.width(), 16);
    }
}
