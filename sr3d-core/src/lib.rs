//! sr3d core: a small CPU rasterization pipeline.
//!
//! Meshes are transformed by the vertex stage, mapped to pixels by the
//! viewport stage and filled by a barycentric rasterizer with a depth test
//! and Lambert shading, all into a [`RenderTarget`] owned by a [`Pipeline`].
//! No GPU is involved; hosts read the finished framebuffer and present it
//! however they like.

pub mod color;
pub mod error;
pub mod export;
pub mod geometry;
pub mod light;
pub mod load;
pub mod math;
pub mod obj;
pub mod pipeline;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod shader;
pub mod stats;
pub mod stl;
pub mod target;
pub mod transform;
pub mod viewport;

// Re-export commonly used types
pub use error::MeshError;
pub use geometry::{Mesh, Triangle, Vertex};
pub use light::Light;
pub use load::load_mesh;
pub use math::{Matrix44, Vector3, Vector4};
pub use pipeline::{Pipeline, Shading};
pub use projection::Camera;
pub use scene::{from_fns, FnScene, Scene, SpinningModel};
pub use shader::{vertex_shader, VsOutput};
pub use stats::{Stats, Throughput};
pub use target::{RenderTarget, DEFAULT_CLEAR};
pub use transform::{RotationState, Transform, Uniforms};
pub use viewport::viewport_transform;
