//! The OpenGL implementation of [`Device`], built on the raw `gl` bindings.
//!
//! Expects a current context on the calling thread with its function pointers
//! already loaded (the glutin window backend does both during creation).

use std::ffi::{CStr, CString};
use std::mem;
use std::os::raw::c_void;
use std::ptr;

use gl;
use gl::types::*;

use crate::errors::{Error, Result};
use crate::math::{Color, Vector2};
use crate::video::mesh::{VertexAttribute, VertexFormat};
use crate::video::shader::{excerpt, ShaderStage, UniformLocation};
use crate::video::texture::{TextureFilter, TextureSampling, TextureWrap};

use super::{BufferId, Device, ProgramId, StageId, TextureId, VertexArrayId};

pub struct GlDevice {
    _priv: (),
}

impl GlDevice {
    /// Wraps the current context. Unsafe because the context must be current
    /// on this thread and stay that way for the device's whole lifetime.
    pub unsafe fn new() -> Result<GlDevice> {
        let version = CStr::from_ptr(gl::GetString(gl::VERSION) as *const _);
        info!("GlDevice on {}", version.to_string_lossy());
        check()?;

        Ok(GlDevice { _priv: () })
    }
}

impl Device for GlDevice {
    unsafe fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<StageId> {
        // The driver reads the source up to a NUL byte. Termination is
        // guaranteed here instead of trusting callers to append one; stray
        // terminators already present in the text are stripped first.
        let source = source.trim_end_matches('\0');
        let c_source = CString::new(source).map_err(|_| Error::CompileFailure {
            stage,
            excerpt: excerpt(source),
            log: "shader source contains an interior NUL byte".to_owned(),
        })?;

        let id = gl::CreateShader(stage_enum(stage));
        gl::ShaderSource(id, 1, &c_source.as_ptr(), ptr::null());
        gl::CompileShader(id);

        let mut status = GLint::from(gl::FALSE);
        gl::GetShaderiv(id, gl::COMPILE_STATUS, &mut status);
        if status != GLint::from(gl::TRUE) {
            let log = shader_info_log(id);
            // The half-built stage object would leak a driver handle.
            gl::DeleteShader(id);
            return Err(Error::CompileFailure {
                stage,
                excerpt: excerpt(source),
                log,
            });
        }

        check()?;
        Ok(StageId::new(id))
    }

    unsafe fn delete_stage(&mut self, stage: StageId) -> Result<()> {
        gl::DeleteShader(stage.raw());
        check()
    }

    unsafe fn link_program(&mut self, vertex: &StageId, fragment: &StageId) -> Result<ProgramId> {
        let id = gl::CreateProgram();
        gl::AttachShader(id, vertex.raw());
        gl::AttachShader(id, fragment.raw());
        gl::LinkProgram(id);

        let mut status = GLint::from(gl::FALSE);
        gl::GetProgramiv(id, gl::LINK_STATUS, &mut status);
        if status != GLint::from(gl::TRUE) {
            let log = program_info_log(id);
            gl::DeleteProgram(id);
            return Err(Error::LinkFailure { log });
        }

        check()?;
        Ok(ProgramId::new(id))
    }

    unsafe fn delete_program(&mut self, program: ProgramId) -> Result<()> {
        gl::DeleteProgram(program.raw());
        check()
    }

    unsafe fn bind_program(&mut self, program: &ProgramId) -> Result<()> {
        gl::UseProgram(program.raw());
        check()
    }

    unsafe fn uniform_location(
        &mut self,
        program: &ProgramId,
        name: &str,
    ) -> Result<UniformLocation> {
        let c_name = match CString::new(name) {
            Ok(v) => v,
            // A name with an interior NUL can't exist in any program.
            Err(_) => return Ok(UniformLocation::NotFound),
        };

        let location = gl::GetUniformLocation(program.raw(), c_name.as_ptr());
        check()?;

        if location < 0 {
            Ok(UniformLocation::NotFound)
        } else {
            Ok(UniformLocation::Slot(location))
        }
    }

    unsafe fn set_uniform_4f(&mut self, location: UniformLocation, value: [f32; 4]) -> Result<()> {
        match location {
            UniformLocation::Slot(slot) => {
                gl::Uniform4f(slot, value[0], value[1], value[2], value[3]);
                check()
            }
            // Mirrors the driver, which ignores writes to location -1.
            UniformLocation::NotFound => Ok(()),
        }
    }

    unsafe fn create_vertex_array(&mut self) -> Result<VertexArrayId> {
        let mut id = 0;
        gl::GenVertexArrays(1, &mut id);
        assert!(id != 0);
        check()?;
        Ok(VertexArrayId::new(id))
    }

    unsafe fn bind_vertex_array(&mut self, array: Option<&VertexArrayId>) -> Result<()> {
        gl::BindVertexArray(array.map_or(0, |v| v.raw()));
        check()
    }

    unsafe fn delete_vertex_array(&mut self, array: VertexArrayId) -> Result<()> {
        let id = array.raw();
        gl::DeleteVertexArrays(1, &id);
        check()
    }

    unsafe fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<BufferId> {
        create_buffer(
            gl::ARRAY_BUFFER,
            data.len() * mem::size_of::<f32>(),
            data.as_ptr() as *const c_void,
        )
    }

    unsafe fn create_index_buffer(&mut self, data: &[u32]) -> Result<BufferId> {
        create_buffer(
            gl::ELEMENT_ARRAY_BUFFER,
            data.len() * mem::size_of::<u32>(),
            data.as_ptr() as *const c_void,
        )
    }

    unsafe fn delete_buffer(&mut self, buffer: BufferId) -> Result<()> {
        let id = buffer.raw();
        gl::DeleteBuffers(1, &id);
        check()
    }

    unsafe fn set_attribute(&mut self, attribute: &VertexAttribute, stride: usize) -> Result<()> {
        gl::EnableVertexAttribArray(attribute.slot);
        gl::VertexAttribPointer(
            attribute.slot,
            GLint::from(attribute.components),
            format_enum(attribute.format),
            attribute.normalized as u8,
            stride as GLsizei,
            attribute.offset as *const c_void,
        );
        check()
    }

    unsafe fn draw_arrays(&mut self, count: usize) -> Result<()> {
        gl::DrawArrays(gl::TRIANGLES, 0, count as GLsizei);
        check()
    }

    unsafe fn draw_elements(&mut self, count: usize) -> Result<()> {
        gl::DrawElements(
            gl::TRIANGLES,
            count as GLsizei,
            gl::UNSIGNED_INT,
            ptr::null(),
        );
        check()
    }

    unsafe fn create_texture(
        &mut self,
        dimensions: Vector2<u32>,
        bytes: &[u8],
        sampling: &TextureSampling,
    ) -> Result<TextureId> {
        let mut id = 0;
        gl::GenTextures(1, &mut id);
        assert!(id != 0);

        gl::BindTexture(gl::TEXTURE_2D, id);
        gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_WRAP_S,
            wrap_enum(sampling.wrap_s) as GLint,
        );
        gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_WRAP_T,
            wrap_enum(sampling.wrap_t) as GLint,
        );
        gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_MIN_FILTER,
            min_filter_enum(sampling.min_filter, sampling.mipmap) as GLint,
        );
        gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_MAG_FILTER,
            mag_filter_enum(sampling.mag_filter) as GLint,
        );

        gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            gl::RGBA8 as GLint,
            dimensions.x as GLsizei,
            dimensions.y as GLsizei,
            0,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            bytes.as_ptr() as *const c_void,
        );

        if sampling.mipmap {
            gl::GenerateMipmap(gl::TEXTURE_2D);
        }

        check()?;
        Ok(TextureId::new(id))
    }

    unsafe fn bind_texture(&mut self, unit: u32, texture: &TextureId) -> Result<()> {
        gl::ActiveTexture(gl::TEXTURE0 + unit);
        gl::BindTexture(gl::TEXTURE_2D, texture.raw());
        check()
    }

    unsafe fn delete_texture(&mut self, texture: TextureId) -> Result<()> {
        let id = texture.raw();
        gl::DeleteTextures(1, &id);
        check()
    }

    unsafe fn set_viewport(&mut self, dimensions: Vector2<u32>) -> Result<()> {
        gl::Viewport(0, 0, dimensions.x as GLsizei, dimensions.y as GLsizei);
        check()
    }

    unsafe fn clear(&mut self, color: Color) -> Result<()> {
        let [r, g, b, a]: [f32; 4] = color.into();
        gl::ClearColor(r, g, b, a);
        gl::Clear(gl::COLOR_BUFFER_BIT);
        check()
    }
}

unsafe fn create_buffer(target: GLenum, size: usize, data: *const c_void) -> Result<BufferId> {
    let mut id = 0;
    gl::GenBuffers(1, &mut id);
    assert!(id != 0);

    gl::BindBuffer(target, id);
    let data = if size == 0 { ptr::null() } else { data };
    gl::BufferData(target, size as isize, data, gl::STATIC_DRAW);

    check()?;
    Ok(BufferId::new(id))
}

/// Reads a shader's diagnostic log with the length-then-read protocol; the
/// text the driver writes is not self-terminating, so the buffer is sized
/// from `INFO_LOG_LENGTH` first.
unsafe fn shader_info_log(id: GLuint) -> String {
    let mut len = 0;
    gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut len);
    if len <= 0 {
        return String::new();
    }

    let mut buf = Vec::with_capacity(len as usize);
    buf.set_len((len as usize) - 1); // skip the trailing NUL
    gl::GetShaderInfoLog(id, len, ptr::null_mut(), buf.as_mut_ptr() as *mut GLchar);
    String::from_utf8_lossy(&buf).into_owned()
}

unsafe fn program_info_log(id: GLuint) -> String {
    let mut len = 0;
    gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, &mut len);
    if len <= 0 {
        return String::new();
    }

    let mut buf = Vec::with_capacity(len as usize);
    buf.set_len((len as usize) - 1); // skip the trailing NUL
    gl::GetProgramInfoLog(id, len, ptr::null_mut(), buf.as_mut_ptr() as *mut GLchar);
    String::from_utf8_lossy(&buf).into_owned()
}

fn stage_enum(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    }
}

fn format_enum(format: VertexFormat) -> GLenum {
    match format {
        VertexFormat::F32 => gl::FLOAT,
        VertexFormat::U8 => gl::UNSIGNED_BYTE,
    }
}

fn wrap_enum(wrap: TextureWrap) -> GLenum {
    match wrap {
        TextureWrap::Repeat => gl::REPEAT,
        TextureWrap::Mirror => gl::MIRRORED_REPEAT,
        TextureWrap::Clamp => gl::CLAMP_TO_EDGE,
    }
}

fn min_filter_enum(filter: TextureFilter, mipmap: bool) -> GLenum {
    match (filter, mipmap) {
        (TextureFilter::Nearest, false) => gl::NEAREST,
        (TextureFilter::Linear, false) => gl::LINEAR,
        (TextureFilter::Nearest, true) => gl::NEAREST_MIPMAP_NEAREST,
        (TextureFilter::Linear, true) => gl::LINEAR_MIPMAP_LINEAR,
    }
}

fn mag_filter_enum(filter: TextureFilter) -> GLenum {
    match filter {
        TextureFilter::Nearest => gl::NEAREST,
        TextureFilter::Linear => gl::LINEAR,
    }
}

unsafe fn check() -> Result<()> {
    match gl::GetError() {
        gl::NO_ERROR => Ok(()),

        gl::INVALID_ENUM => Err(Error::Backend(
            "[GL] An unacceptable value is specified for an enumerated argument.".to_owned(),
        )),

        gl::INVALID_VALUE => Err(Error::Backend(
            "[GL] A numeric argument is out of range.".to_owned(),
        )),

        gl::INVALID_OPERATION => Err(Error::Backend(
            "[GL] The specified operation is not allowed in the current state.".to_owned(),
        )),

        gl::OUT_OF_MEMORY => Err(Error::Backend(
            "[GL] There is not enough memory left to execute the command.".to_owned(),
        )),

        _ => Err(Error::Backend("[GL] Unknown OpenGL error.".to_owned())),
    }
}
