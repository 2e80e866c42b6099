//! Per-frame hooks and a ready-made scene that spins a single model.

use log::debug;

use crate::color;
use crate::geometry::Mesh;
use crate::math::Matrix44;
use crate::pipeline::Pipeline;
use crate::projection::Camera;
use crate::transform::{RotationState, Transform, Uniforms};

/// What the host runs once per frame, through [`Pipeline::frame`].
pub trait Scene {
    /// Advances the scene by `dt` seconds.
    fn update(&mut self, dt: f32);

    /// Issues the draw calls of one frame.
    fn draw(&mut self, pipeline: &mut Pipeline);
}

/// A [`Scene`] made of two closures. See [`from_fns`].
pub struct FnScene<U, D> {
    update: U,
    draw: D,
}

/// Creates a scene from an update and a draw closure.
pub fn from_fns<U, D>(update: U, draw: D) -> FnScene<U, D>
where
    U: FnMut(f32),
    D: FnMut(&mut Pipeline),
{
    FnScene { update, draw }
}

impl<U, D> Scene for FnScene<U, D>
where
    U: FnMut(f32),
    D: FnMut(&mut Pipeline),
{
    fn update(&mut self, dt: f32) {
        (self.update)(dt)
    }

    fn draw(&mut self, pipeline: &mut Pipeline) {
        (self.draw)(pipeline)
    }
}

/// One mesh, scaled to fit the unit cube, turning about the vertical axis in
/// front of a fixed camera.
#[derive(Debug, Clone)]
pub struct SpinningModel {
    mesh: Mesh,
    fit: Matrix44,
    pub rotation: RotationState,
    /// Turn rate about Y, in radians per second.
    pub spin: f32,
    pub paused: bool,
    pub camera: Camera,
    pub color: u32,
    pub background: u32,
    /// Color of the edge overlay, if shown.
    pub wireframe: Option<u32>,
    /// Whether the filled triangles are drawn at all.
    pub solid: bool,
}

impl SpinningModel {
    /// Light gray, the default model color.
    pub const DEFAULT_COLOR: u32 = 0xFFCC_CCCC;

    pub fn new(mesh: Mesh) -> Self {
        let fit = Self::fit(&mesh);
        Self {
            mesh,
            fit,
            rotation: RotationState::zero(),
            spin: 1.0,
            paused: false,
            camera: Camera::default(),
            color: Self::DEFAULT_COLOR,
            background: color::BLACK,
            wireframe: None,
            solid: true,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Replaces the model, refitting it to the unit cube.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.fit = Self::fit(&mesh);
        self.mesh = mesh;
    }

    /// Shows the wireframe overlay in `color`, or hides it if shown.
    pub fn toggle_wireframe(&mut self, color: u32) {
        self.wireframe = match self.wireframe {
            Some(_) => None,
            None => Some(color),
        };
    }

    pub fn uniforms(&self) -> Uniforms {
        Uniforms {
            model: Transform::rotation_matrix(&self.rotation) * self.fit,
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
        }
    }

    fn fit(mesh: &Mesh) -> Matrix44 {
        let fit = mesh
            .bounds()
            .map(Transform::fit_unit_cube)
            .unwrap_or_else(Matrix44::identity);
        debug!(
            "fitting mesh of {} triangles to the unit cube",
            mesh.triangle_count()
        );
        fit
    }
}

impl Scene for SpinningModel {
    fn update(&mut self, dt: f32) {
        if !self.paused {
            self.rotation.rotate(0.0, self.spin * dt, 0.0);
        }
    }

    fn draw(&mut self, pipeline: &mut Pipeline) {
        let target = pipeline.target();
        self.camera.set_viewport(target.width(), target.height());
        pipeline.clear(self.background);

        let uniforms = self.uniforms();
        if self.solid {
            pipeline.draw_mesh(&self.mesh, &uniforms, self.color);
        }
        if let Some(color) = self.wireframe {
            pipeline.draw_wireframe(&self.mesh, &uniforms, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_spins_unless_paused() {
        let mut scene = SpinningModel::new(Mesh::cube());
        scene.spin = 2.0;
        scene.update(0.5);
        assert_eq!(scene.rotation.y, 1.0);

        scene.paused = true;
        scene.update(0.5);
        assert_eq!(scene.rotation.y, 1.0);
    }

    #[test]
    fn test_toggle_wireframe() {
        let mut scene = SpinningModel::new(Mesh::cube());
        scene.toggle_wireframe(color::WHITE);
        assert_eq!(scene.wireframe, Some(color::WHITE));
        scene.toggle_wireframe(color::WHITE);
        assert_eq!(scene.wireframe, None);
    }

    #[test]
    fn test_draw_tracks_aspect_and_clears() {
        let mut scene = SpinningModel::new(Mesh::cube());
        scene.background = color::rgb(1, 2, 3);
        let mut pipeline = Pipeline::new(40, 20);
        let stats = pipeline.frame(&mut scene, 0.0);

        assert_eq!(scene.camera.aspect, 2.0);
        assert_eq!(stats.calls, 1);
        assert_eq!(pipeline.target().pixel(0, 0), Some(color::rgb(1, 2, 3)));
        assert!(stats.frags.o > 0);
    }

    #[test]
    fn test_empty_mesh_draws_nothing() {
        let mut scene = SpinningModel::new(Mesh::default());
        let mut pipeline = Pipeline::new(8, 8);
        let stats = pipeline.frame(&mut scene, 0.1);
        assert_eq!(stats.prims.i, 0);
        assert!(pipeline.target().color().iter().all(|&c| c == color::BLACK));
    }
}
