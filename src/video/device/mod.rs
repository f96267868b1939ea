//! The backend seam of the renderer. A `Device` is responsible for only one
//! thing: turning resource requests and draw submissions into low-level
//! graphics API calls.
//!
//! Two implementations ship with the crate: [`GlDevice`](gl/struct.GlDevice.html)
//! drives a live OpenGL context, and [`HeadlessDevice`](headless/struct.HeadlessDevice.html)
//! accepts the same protocol without a GPU while recording what was asked of
//! it. Tests run entirely against the latter.
//!
//! Every method is `unsafe` because implementations may issue raw driver
//! calls that are only defined on the thread owning the context. Callers in
//! this crate uphold that by never moving a device across threads.

pub mod gl;
pub mod headless;

pub use self::gl::GlDevice;
pub use self::headless::HeadlessDevice;

use crate::errors::Result;
use crate::math::{Color, Vector2};
use crate::video::mesh::VertexAttribute;
use crate::video::shader::{ShaderStage, UniformLocation};
use crate::video::texture::TextureSampling;

macro_rules! impl_resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// Deliberately neither `Copy` nor `Clone`: ownership of the
        /// underlying driver object is exclusive and transferable, never
        /// duplicated, so a double delete is unrepresentable.
        #[derive(Debug, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a raw driver-side object name. Only `Device`
            /// implementations should mint these.
            #[inline]
            pub fn new(raw: u32) -> Self {
                $name(raw)
            }

            #[inline]
            pub fn raw(&self) -> u32 {
                self.0
            }
        }
    };
}

impl_resource_id! {
    /// A compiled shader stage object, alive between a successful compile
    /// and the end of the link attempt that consumes it.
    StageId
}

impl_resource_id! {
    /// A linked, executable shader program object.
    ProgramId
}

impl_resource_id! {
    /// A vertex or index buffer object.
    BufferId
}

impl_resource_id! {
    /// A vertex array object binding attribute slots to a vertex buffer.
    VertexArrayId
}

impl_resource_id! {
    /// A 2D texture object.
    TextureId
}

pub trait Device {
    /// Compiles one shader stage from source text. The implementation must
    /// guarantee NUL termination of the source it hands to the driver, and
    /// must delete the partially created stage object on failure. Diagnostics
    /// are retrieved with a length query followed by a sized read, since the
    /// driver's log is not self-terminating.
    unsafe fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<StageId>;

    unsafe fn delete_stage(&mut self, stage: StageId) -> Result<()>;

    /// Links two compiled stages into a program. On failure the implementation
    /// deletes the half-built program object before returning, so an unlinked
    /// program id never escapes; the stages stay alive and remain the
    /// caller's to delete.
    unsafe fn link_program(&mut self, vertex: &StageId, fragment: &StageId) -> Result<ProgramId>;

    unsafe fn delete_program(&mut self, program: ProgramId) -> Result<()>;

    /// Activates the program as the current pipeline state.
    unsafe fn bind_program(&mut self, program: &ProgramId) -> Result<()>;

    /// Resolves a uniform name. Names the program does not declare resolve to
    /// [`UniformLocation::NotFound`], not an error.
    unsafe fn uniform_location(
        &mut self,
        program: &ProgramId,
        name: &str,
    ) -> Result<UniformLocation>;

    unsafe fn set_uniform_4f(&mut self, location: UniformLocation, value: [f32; 4]) -> Result<()>;

    unsafe fn create_vertex_array(&mut self) -> Result<VertexArrayId>;

    unsafe fn bind_vertex_array(&mut self, array: Option<&VertexArrayId>) -> Result<()>;

    unsafe fn delete_vertex_array(&mut self, array: VertexArrayId) -> Result<()>;

    /// Allocates a vertex buffer and uploads `data` with static-draw usage.
    /// The data is never updated after this upload.
    unsafe fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<BufferId>;

    /// Allocates an index buffer and uploads `data` with static-draw usage.
    /// Must be called while the owning vertex array is bound; the element
    /// binding is part of the array's recorded state.
    unsafe fn create_index_buffer(&mut self, data: &[u32]) -> Result<BufferId>;

    unsafe fn delete_buffer(&mut self, buffer: BufferId) -> Result<()>;

    /// Describes and enables one attribute slot against the currently bound
    /// vertex buffer and vertex array.
    unsafe fn set_attribute(&mut self, attribute: &VertexAttribute, stride: usize) -> Result<()>;

    unsafe fn draw_arrays(&mut self, count: usize) -> Result<()>;

    unsafe fn draw_elements(&mut self, count: usize) -> Result<()>;

    /// Allocates a texture, applies the sampling parameters, uploads the
    /// RGBA8 base image and generates mipmaps when asked to. Rows of `bytes`
    /// are expected tightly packed; the caller validates stride beforehand.
    unsafe fn create_texture(
        &mut self,
        dimensions: Vector2<u32>,
        bytes: &[u8],
        sampling: &TextureSampling,
    ) -> Result<TextureId>;

    /// Binds the texture to the given sampler unit.
    unsafe fn bind_texture(&mut self, unit: u32, texture: &TextureId) -> Result<()>;

    unsafe fn delete_texture(&mut self, texture: TextureId) -> Result<()>;

    unsafe fn set_viewport(&mut self, dimensions: Vector2<u32>) -> Result<()>;

    /// Clears the color target to a fixed background value.
    unsafe fn clear(&mut self, color: Color) -> Result<()>;
}
