//! The render pipeline: owns the render target and drives meshes through
//! the vertex, viewport and raster stages.

use std::mem;

use log::{debug, trace};

use crate::geometry::Mesh;
use crate::light::Light;
use crate::raster::{draw_line, draw_triangle};
use crate::scene::Scene;
use crate::shader::{vertex_shader, VsOutput};
use crate::stats::{Stats, Throughput, Timer};
use crate::target::RenderTarget;
use crate::transform::Uniforms;
use crate::viewport::viewport_transform;

/// How triangles are colored.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Shading {
    /// Base color scaled by the Lambert term of the interpolated normal.
    #[default]
    Lambert,
    /// Base color as is.
    Unlit,
}

/// A single-threaded rasterization pipeline.
///
/// Exclusively owns its [`RenderTarget`]. Draw calls borrow a mesh and its
/// uniforms; nothing is retained between calls except scratch buffers and
/// statistics.
#[derive(Debug)]
pub struct Pipeline {
    target: RenderTarget,
    light: Light,
    shading: Shading,
    varyings: Vec<VsOutput>,
    frame: Stats,
    stats: Stats,
}

impl Pipeline {
    pub fn new(width: u32, height: u32) -> Self {
        debug!("creating pipeline with a {width}x{height} target");
        Self {
            target: RenderTarget::new(width, height),
            light: Light::default(),
            shading: Shading::default(),
            varyings: Vec::new(),
            frame: Stats::default(),
            stats: Stats::default(),
        }
    }

    pub fn with_light(self, light: Light) -> Self {
        Self { light, ..self }
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn set_light(&mut self, light: Light) {
        self.light = light;
    }

    pub fn shading(&self) -> Shading {
        self.shading
    }

    pub fn set_shading(&mut self, shading: Shading) {
        self.shading = shading;
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut RenderTarget {
        &mut self.target
    }

    /// Totals over the lifetime of the pipeline.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn clear(&mut self, color: u32) {
        self.target.clear(color);
    }

    /// Resizes the render target. Must only be called between frames.
    /// See [`RenderTarget::resize`].
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.target.resize(width, height)
    }

    /// Runs one frame of `scene`: update, then draw.
    ///
    /// Returns the statistics of the draw calls the scene issued.
    pub fn frame<S: Scene + ?Sized>(&mut self, scene: &mut S, dt: f32) -> Stats {
        self.frame = Stats::default();
        scene.update(dt);
        scene.draw(self);

        let mut frame = mem::take(&mut self.frame);
        frame.frames = 1;
        self.stats.frames += 1;
        frame
    }

    /// Draws the triangles of `mesh` in index order, depth tested.
    ///
    /// Triangles with a vertex on or behind the camera plane (`w <= 0`) are
    /// skipped and counted as culled.
    pub fn draw_mesh(&mut self, mesh: &Mesh, uniforms: &Uniforms, color: u32) -> Stats {
        let timer = Timer::start();
        let mut stats = Stats {
            calls: 1,
            ..Stats::default()
        };

        stats.verts = self.run_vertex_stage(mesh, uniforms);

        let normals_enabled = self.shading == Shading::Lambert;
        let (w, h) = (self.target.width(), self.target.height());

        for (n, face) in mesh.faces().enumerate() {
            stats.prims.i += 1;
            let Some(vs) = self.assemble(face) else {
                trace!("skipping triangle {n}: vertex missing or behind the camera");
                stats.culled += 1;
                continue;
            };
            let screen = vs.map(|v| viewport_transform(&v.clip_pos, w, h));
            let normals = vs.map(|v| v.world_normal);

            let frags = draw_triangle(
                &mut self.target,
                &screen,
                normals_enabled.then_some(&normals),
                &self.light,
                color,
            );
            if frags.i > 0 {
                stats.prims.o += 1;
            }
            stats.frags += frags;
        }

        timer.finish(&mut stats);
        self.record(&stats);
        stats
    }

    /// Draws the edges of every triangle of `mesh` as lines, ignoring and
    /// leaving untouched the depth buffer.
    pub fn draw_wireframe(&mut self, mesh: &Mesh, uniforms: &Uniforms, color: u32) -> Stats {
        let timer = Timer::start();
        let mut stats = Stats {
            calls: 1,
            ..Stats::default()
        };

        stats.verts = self.run_vertex_stage(mesh, uniforms);
        let (w, h) = (self.target.width(), self.target.height());

        for face in mesh.faces() {
            stats.prims.i += 1;
            let Some(vs) = self.assemble(face) else {
                stats.culled += 1;
                continue;
            };
            let [a, b, c] = vs.map(|v| {
                let p = viewport_transform(&v.clip_pos, w, h);
                (p.x.floor() as i32, p.y.floor() as i32)
            });
            for ((x0, y0), (x1, y1)) in [(a, b), (b, c), (c, a)] {
                draw_line(&mut self.target, x0, y0, x1, y1, color);
            }
            stats.prims.o += 1;
        }

        timer.finish(&mut stats);
        self.record(&stats);
        stats
    }

    /// Shades every vertex of `mesh` into the scratch buffer. Counts the
    /// vertices that ended up in front of the camera.
    fn run_vertex_stage(&mut self, mesh: &Mesh, uniforms: &Uniforms) -> Throughput {
        let mvp = uniforms.mvp();
        self.varyings.clear();
        self.varyings.extend(
            mesh.vertices
                .iter()
                .map(|v| vertex_shader(v, &uniforms.model, &mvp)),
        );
        let in_front = self.varyings.iter().filter(|v| v.clip_pos.w > 0.0).count();
        Throughput::new(mesh.vertices.len(), in_front)
    }

    /// Looks up the shaded vertices of a triangle. `None` if any of them is
    /// missing or not in front of the camera.
    fn assemble(&self, [a, b, c]: [usize; 3]) -> Option<[VsOutput; 3]> {
        let vs = [
            *self.varyings.get(a)?,
            *self.varyings.get(b)?,
            *self.varyings.get(c)?,
        ];
        vs.iter().all(|v| v.clip_pos.w > 0.0).then_some(vs)
    }

    fn record(&mut self, stats: &Stats) {
        self.frame += stats.clone();
        self.stats += stats.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{self, rgb};
    use crate::geometry::{Triangle, Vertex};
    use crate::math::{Matrix44, Vector3, Vector4};
    use crate::scene::from_fns;
    use crate::target::DEFAULT_CLEAR;

    fn quad_in_ndc(z: f32) -> Mesh {
        // Two triangles covering the whole viewport, at NDC depth z
        let v = |x, y| Vertex::new(Vector3::new(x, y, z), Vector3::new(0.0, 0.0, -1.0));
        Mesh::from_triangles([
            Triangle::new(v(-1.0, 1.0), v(1.0, 1.0), v(1.0, -1.0)),
            Triangle::new(v(-1.0, 1.0), v(1.0, -1.0), v(-1.0, -1.0)),
        ])
    }

    #[test]
    fn test_draw_mesh_fills_target() {
        let mut p = Pipeline::new(8, 8).with_light(Light::new(Vector3::z(), 0.0));
        let stats = p.draw_mesh(&quad_in_ndc(0.5), &Uniforms::default(), rgb(200, 0, 0));

        assert_eq!(stats.calls, 1);
        assert_eq!(stats.verts, Throughput::new(6, 6));
        assert_eq!(stats.prims, Throughput::new(2, 2));
        assert_eq!(stats.frags.o, 64);
        assert!(p.target().color().iter().all(|&c| c == rgb(200, 0, 0)));
        assert!(p.target().depth().iter().all(|&d| (d - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_unlit_writes_base_color() {
        let mut p = Pipeline::new(4, 4).with_light(Light::new(-Vector3::z(), 0.0));
        p.draw_mesh(&quad_in_ndc(0.5), &Uniforms::default(), rgb(10, 20, 30));
        // Facing away from the light: black
        assert_eq!(p.target().pixel(1, 1), Some(rgb(0, 0, 0)));

        p.clear(DEFAULT_CLEAR);
        p.set_shading(Shading::Unlit);
        p.draw_mesh(&quad_in_ndc(0.5), &Uniforms::default(), rgb(10, 20, 30));
        assert_eq!(p.target().pixel(1, 1), Some(rgb(10, 20, 30)));
    }

    #[test]
    fn test_triangles_behind_camera_are_culled() {
        let mut p = Pipeline::new(8, 8);
        let mut u = Uniforms::default();
        // w = -1 for every vertex
        u.projection = Matrix44::from_diagonal(&Vector4::new(1.0, 1.0, 1.0, -1.0));
        let stats = p.draw_mesh(&quad_in_ndc(0.5), &u, color::WHITE);

        assert_eq!(stats.culled, 2);
        assert_eq!(stats.verts, Throughput::new(6, 0));
        assert_eq!(stats.prims, Throughput::new(2, 0));
        assert!(p.target().color().iter().all(|&c| c == DEFAULT_CLEAR));
    }

    #[test]
    fn test_invalid_indices_are_skipped() {
        let mut mesh = quad_in_ndc(0.5);
        mesh.indices.extend([0, 1, 99]);
        let mut p = Pipeline::new(4, 4);
        let stats = p.draw_mesh(&mesh, &Uniforms::default(), color::WHITE);
        assert_eq!(stats.prims, Throughput::new(3, 2));
    }

    #[test]
    fn test_wireframe_leaves_depth() {
        let mut p = Pipeline::new(8, 8);
        let stats = p.draw_wireframe(&quad_in_ndc(0.5), &Uniforms::default(), color::WHITE);
        assert_eq!(stats.prims.o, 2);
        assert_eq!(p.target().pixel(0, 0), Some(color::WHITE));
        assert_eq!(p.target().pixel(4, 4), Some(color::WHITE));
        assert_eq!(p.target().pixel(5, 2), Some(DEFAULT_CLEAR));
        assert!(p.target().depth().iter().all(|&d| d == 1.0));
    }

    #[test]
    fn test_frame_collects_stats() {
        let mesh = quad_in_ndc(0.5);
        let mut updates = 0.0;
        let mut scene = from_fns(
            |dt| updates += dt,
            |p: &mut Pipeline| {
                p.clear(DEFAULT_CLEAR);
                p.draw_mesh(&mesh, &Uniforms::default(), color::WHITE);
                p.draw_wireframe(&mesh, &Uniforms::default(), color::WHITE);
            },
        );
        let mut p = Pipeline::new(4, 4);
        let frame = p.frame(&mut scene, 0.5);
        p.frame(&mut scene, 0.25);
        drop(scene);

        assert_eq!(updates, 0.75);
        assert_eq!(frame.frames, 1);
        assert_eq!(frame.calls, 2);
        assert_eq!(p.stats().frames, 2);
        assert_eq!(p.stats().calls, 4);
    }

    #[test]
    fn test_resize_between_frames() {
        let mut p = Pipeline::new(4, 4);
        assert!(p.resize(6, 3));
        assert!(!p.resize(0, 3));
        p.draw_mesh(&quad_in_ndc(0.5), &Uniforms::default(), color::WHITE);
        assert_eq!(p.target().color().len(), 18);
    }
}
