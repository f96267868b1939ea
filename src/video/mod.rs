//! The video subsystem: shader programs, GPU-resident geometry and textures,
//! and the device seam they all talk through.
//!
//! Resources here are passive. They are created before the frame loop starts,
//! bound every frame by [`application::RunLoop`](../application/index.html),
//! and disposed exactly once on the way out. Every GPU object is wrapped in a
//! move-only id, so a resource cannot be deleted twice by construction.

pub mod device;
pub mod mesh;
pub mod shader;
pub mod texture;

/// Maximum number of vertex attribute slots a layout may describe.
pub const MAX_VERTEX_ATTRIBUTES: usize = 8;

pub mod prelude {
    pub use super::device::{Device, GlDevice, HeadlessDevice};
    pub use super::mesh::{Mesh, VertexAttribute, VertexFormat, VertexLayout};
    pub use super::shader::{ShaderProgram, ShaderStage, UniformLocation};
    pub use super::texture::{Texture2D, TextureFilter, TextureSampling, TextureWrap};
}
