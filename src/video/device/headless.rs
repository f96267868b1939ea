//! A device without a GPU behind it. Accepts the whole [`Device`] protocol,
//! tracks which objects are alive, and records draw submissions, so the rest
//! of the crate can run (and be tested) on machines with no display.
//!
//! The implementation is deliberately strict about protocol misuse that a
//! real driver would let slide into undefined behavior: deleting an unknown
//! object, uploading an index buffer with no vertex array bound, or drawing
//! without a program all fail loudly here.

use std::collections::{HashMap, HashSet};

use crate::errors::{Error, Result};
use crate::math::{Color, Vector2};
use crate::video::mesh::VertexAttribute;
use crate::video::shader::{excerpt, ShaderStage, UniformLocation};
use crate::video::texture::TextureSampling;

use super::{BufferId, Device, ProgramId, StageId, TextureId, VertexArrayId};

/// One recorded draw submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub indexed: bool,
    pub count: usize,
}

#[derive(Default)]
pub struct HeadlessDevice {
    next_id: u32,
    stages: HashSet<u32>,
    programs: HashSet<u32>,
    buffers: HashSet<u32>,
    vertex_arrays: HashSet<u32>,
    textures: HashSet<u32>,

    bound_array: Option<u32>,
    bound_program: Option<u32>,

    locations: HashMap<String, i32>,
    missing_uniforms: HashSet<String>,
    rejected_stages: HashSet<ShaderStage>,
    link_failure: Option<String>,

    compiled: Vec<ShaderStage>,
    lookups: usize,
    uniform_writes: Vec<(i32, [f32; 4])>,
    draws: Vec<DrawCall>,
    clears: usize,
    viewport: Option<Vector2<u32>>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Default::default()
    }

    /// Scripts the compiler to reject every future compile of `stage`, the
    /// way a driver rejects broken source.
    pub fn reject_stage(&mut self, stage: ShaderStage) {
        self.rejected_stages.insert(stage);
    }

    /// Scripts the next link attempt to fail with the given diagnostic.
    pub fn fail_next_link<T: Into<String>>(&mut self, log: T) {
        self.link_failure = Some(log.into());
    }

    /// Scripts `name` to resolve to [`UniformLocation::NotFound`].
    pub fn miss_uniform<T: Into<String>>(&mut self, name: T) {
        self.missing_uniforms.insert(name.into());
    }

    /// Every compile attempt seen so far, in order, including rejected ones.
    pub fn compiled_stages(&self) -> &[ShaderStage] {
        &self.compiled
    }

    /// Number of driver-side objects currently alive, of any kind.
    pub fn live_objects(&self) -> usize {
        self.stages.len()
            + self.programs.len()
            + self.buffers.len()
            + self.vertex_arrays.len()
            + self.textures.len()
    }

    pub fn live_stages(&self) -> usize {
        self.stages.len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Number of location queries that reached the "driver".
    pub fn uniform_lookups(&self) -> usize {
        self.lookups
    }

    /// Uniform values actually written, i.e. excluding `NotFound` no-ops.
    pub fn uniform_writes(&self) -> &[(i32, [f32; 4])] {
        &self.uniform_writes
    }

    pub fn viewport(&self) -> Option<Vector2<u32>> {
        self.viewport
    }

    fn mint(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn take(set: &mut HashSet<u32>, id: u32, kind: &str) -> Result<()> {
        if set.remove(&id) {
            Ok(())
        } else {
            Err(Error::Backend(format!(
                "[Headless] Deleting unknown {} object {}.",
                kind, id
            )))
        }
    }
}

impl Device for HeadlessDevice {
    unsafe fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<StageId> {
        self.compiled.push(stage);

        if self.rejected_stages.contains(&stage) {
            return Err(Error::CompileFailure {
                stage,
                excerpt: excerpt(source),
                log: format!("0:1(1): error: {:?} stage rejected by script", stage),
            });
        }

        let id = self.mint();
        self.stages.insert(id);
        Ok(StageId::new(id))
    }

    unsafe fn delete_stage(&mut self, stage: StageId) -> Result<()> {
        Self::take(&mut self.stages, stage.raw(), "stage")
    }

    unsafe fn link_program(&mut self, vertex: &StageId, fragment: &StageId) -> Result<ProgramId> {
        for id in &[vertex.raw(), fragment.raw()] {
            if !self.stages.contains(id) {
                return Err(Error::Backend(format!(
                    "[Headless] Linking against unknown stage {}.",
                    id
                )));
            }
        }

        if let Some(log) = self.link_failure.take() {
            return Err(Error::LinkFailure { log });
        }

        let id = self.mint();
        self.programs.insert(id);
        Ok(ProgramId::new(id))
    }

    unsafe fn delete_program(&mut self, program: ProgramId) -> Result<()> {
        let id = program.raw();
        if self.bound_program == Some(id) {
            self.bound_program = None;
        }
        Self::take(&mut self.programs, id, "program")
    }

    unsafe fn bind_program(&mut self, program: &ProgramId) -> Result<()> {
        if !self.programs.contains(&program.raw()) {
            return Err(Error::Backend(format!(
                "[Headless] Binding unknown program {}.",
                program.raw()
            )));
        }

        self.bound_program = Some(program.raw());
        Ok(())
    }

    unsafe fn uniform_location(
        &mut self,
        _program: &ProgramId,
        name: &str,
    ) -> Result<UniformLocation> {
        self.lookups += 1;

        if self.missing_uniforms.contains(name) {
            return Ok(UniformLocation::NotFound);
        }

        let next = self.locations.len() as i32;
        let slot = *self.locations.entry(name.to_owned()).or_insert(next);
        Ok(UniformLocation::Slot(slot))
    }

    unsafe fn set_uniform_4f(&mut self, location: UniformLocation, value: [f32; 4]) -> Result<()> {
        if let UniformLocation::Slot(slot) = location {
            self.uniform_writes.push((slot, value));
        }
        Ok(())
    }

    unsafe fn create_vertex_array(&mut self) -> Result<VertexArrayId> {
        let id = self.mint();
        self.vertex_arrays.insert(id);
        Ok(VertexArrayId::new(id))
    }

    unsafe fn bind_vertex_array(&mut self, array: Option<&VertexArrayId>) -> Result<()> {
        match array {
            Some(v) if !self.vertex_arrays.contains(&v.raw()) => Err(Error::Backend(format!(
                "[Headless] Binding unknown vertex array {}.",
                v.raw()
            ))),
            Some(v) => {
                self.bound_array = Some(v.raw());
                Ok(())
            }
            None => {
                self.bound_array = None;
                Ok(())
            }
        }
    }

    unsafe fn delete_vertex_array(&mut self, array: VertexArrayId) -> Result<()> {
        let id = array.raw();
        if self.bound_array == Some(id) {
            self.bound_array = None;
        }
        Self::take(&mut self.vertex_arrays, id, "vertex array")
    }

    unsafe fn create_vertex_buffer(&mut self, _data: &[f32]) -> Result<BufferId> {
        let id = self.mint();
        self.buffers.insert(id);
        Ok(BufferId::new(id))
    }

    unsafe fn create_index_buffer(&mut self, _data: &[u32]) -> Result<BufferId> {
        // The element binding is recorded in vertex array state; uploading
        // one without a bound array silently loses the association on a real
        // driver.
        if self.bound_array.is_none() {
            return Err(Error::Backend(
                "[Headless] Index buffer created while no vertex array is bound.".to_owned(),
            ));
        }

        let id = self.mint();
        self.buffers.insert(id);
        Ok(BufferId::new(id))
    }

    unsafe fn delete_buffer(&mut self, buffer: BufferId) -> Result<()> {
        Self::take(&mut self.buffers, buffer.raw(), "buffer")
    }

    unsafe fn set_attribute(&mut self, _attribute: &VertexAttribute, _stride: usize) -> Result<()> {
        if self.bound_array.is_none() {
            return Err(Error::Backend(
                "[Headless] Attribute configured while no vertex array is bound.".to_owned(),
            ));
        }
        Ok(())
    }

    unsafe fn draw_arrays(&mut self, count: usize) -> Result<()> {
        self.submit(false, count)
    }

    unsafe fn draw_elements(&mut self, count: usize) -> Result<()> {
        self.submit(true, count)
    }

    unsafe fn create_texture(
        &mut self,
        dimensions: Vector2<u32>,
        bytes: &[u8],
        _sampling: &TextureSampling,
    ) -> Result<TextureId> {
        let expected = dimensions.x as usize * dimensions.y as usize * 4;
        if bytes.len() != expected {
            return Err(Error::Backend(format!(
                "[Headless] Texture upload of {} bytes, expected {}.",
                bytes.len(),
                expected
            )));
        }

        let id = self.mint();
        self.textures.insert(id);
        Ok(TextureId::new(id))
    }

    unsafe fn bind_texture(&mut self, _unit: u32, texture: &TextureId) -> Result<()> {
        if !self.textures.contains(&texture.raw()) {
            return Err(Error::Backend(format!(
                "[Headless] Binding unknown texture {}.",
                texture.raw()
            )));
        }
        Ok(())
    }

    unsafe fn delete_texture(&mut self, texture: TextureId) -> Result<()> {
        Self::take(&mut self.textures, texture.raw(), "texture")
    }

    unsafe fn set_viewport(&mut self, dimensions: Vector2<u32>) -> Result<()> {
        self.viewport = Some(dimensions);
        Ok(())
    }

    unsafe fn clear(&mut self, _color: Color) -> Result<()> {
        self.clears += 1;
        Ok(())
    }
}

impl HeadlessDevice {
    fn submit(&mut self, indexed: bool, count: usize) -> Result<()> {
        if self.bound_program.is_none() {
            return Err(Error::Backend(
                "[Headless] Draw submitted with no program bound.".to_owned(),
            ));
        }

        if self.bound_array.is_none() {
            return Err(Error::Backend(
                "[Headless] Draw submitted with no vertex array bound.".to_owned(),
            ));
        }

        self.draws.push(DrawCall { indexed, count });
        Ok(())
    }
}
