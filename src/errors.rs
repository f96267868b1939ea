//! Crate-wide failure types.

use std::path::PathBuf;

use failure::Fail;

use crate::video::shader::ShaderStage;

/// Anything that can go wrong while building or driving GPU resources.
///
/// Compilation, linking, stride and source-read failures are startup-fatal:
/// the frame loop is never entered with a broken program or texture. Once the
/// loop runs, the per-frame operations are total functions and do not raise
/// these errors (unknown uniform names no-op, draws always submit).
#[derive(Debug, Fail)]
pub enum Error {
    /// The driver rejected a shader stage. Carries the stage kind, the head
    /// of the offending source and the driver's diagnostic log.
    #[fail(
        display = "Failed to compile {:?} shader:\n{}\nwhile compiling:\n{}",
        stage, log, excerpt
    )]
    CompileFailure {
        stage: ShaderStage,
        excerpt: String,
        log: String,
    },
    /// The driver rejected the combination of two compiled stages.
    #[fail(display = "Failed to link program:\n{}", log)]
    LinkFailure { log: String },
    /// A pixel buffer with padded or otherwise non-contiguous rows was
    /// offered for upload. Rows must be exactly `width * 4` bytes.
    #[fail(
        display = "Unsupported pixel row stride: expected {} bytes, got {}",
        expected, actual
    )]
    UnsupportedStride { expected: usize, actual: usize },
    /// A shader source file could not be read.
    #[fail(display = "Failed to read shader source {:?}: {}", path, cause)]
    SourceRead { path: PathBuf, cause: String },
    /// Window or context trouble reported by the platform layer.
    #[fail(display = "Window: {}", _0)]
    Window(String),
    /// An error reported by the graphics backend outside the compile/link
    /// protocol, e.g. a failed `glGetError` check.
    #[fail(display = "Backend: {}", _0)]
    Backend(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<glutin::CreationError> for Error {
    fn from(err: glutin::CreationError) -> Error {
        Error::Window(format!("{}", err))
    }
}

impl From<glutin::ContextError> for Error {
    fn from(err: glutin::ContextError) -> Error {
        Error::Window(format!("{}", err))
    }
}
