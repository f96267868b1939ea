//! The shader program lifecycle: source text becomes a compiled stage,
//! two stages become a linked program, and the program is what the frame
//! loop activates and feeds uniforms into.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::errors::{Error, Result};
use crate::video::device::{Device, ProgramId};

/// One shading step of the pipeline.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// The resolved position of a named uniform within a linked program.
///
/// Names the program does not declare resolve to `NotFound`. Writes through
/// `NotFound` are silent no-ops, mirroring the permissive behavior of the
/// underlying graphics API; upgrading this to an error would change
/// observable behavior and is deliberately not done.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UniformLocation {
    Slot(i32),
    NotFound,
}

/// A linked, executable combination of a vertex and a fragment stage.
///
/// The only way to obtain one is a successful [`link`](#method.link), so an
/// unlinked program is unrepresentable and `bind` can never touch a dead
/// handle. Uniform locations are resolved lazily and cached for the life of
/// the program.
#[derive(Debug)]
pub struct ShaderProgram {
    id: ProgramId,
    uniforms: HashMap<String, UniformLocation>,
}

impl ShaderProgram {
    /// Compiles both stages and links them into a program.
    ///
    /// Stage order is vertex then fragment, short-circuiting: the fragment
    /// stage is never compiled when the vertex stage fails. Both compiled
    /// stages are deleted once the link attempt is over, whether it
    /// succeeded or not; nothing leaks on the failure path.
    pub fn link<D>(device: &mut D, vertex: &str, fragment: &str) -> Result<ShaderProgram>
    where
        D: Device + ?Sized,
    {
        let vs = unsafe { device.compile_stage(ShaderStage::Vertex, vertex)? };
        let fs = match unsafe { device.compile_stage(ShaderStage::Fragment, fragment) } {
            Ok(fs) => fs,
            Err(err) => {
                unsafe { device.delete_stage(vs)? };
                return Err(err);
            }
        };

        let linked = unsafe { device.link_program(&vs, &fs) };

        // The stages are dead weight once the link attempt is over.
        unsafe {
            device.delete_stage(vs)?;
            device.delete_stage(fs)?;
        }

        Ok(ShaderProgram {
            id: linked?,
            uniforms: HashMap::new(),
        })
    }

    /// Reads the two stage sources from plain-text files and links them.
    pub fn from_files<D, P>(device: &mut D, vertex: P, fragment: P) -> Result<ShaderProgram>
    where
        D: Device + ?Sized,
        P: AsRef<Path>,
    {
        let vs = read_source(vertex.as_ref())?;
        let fs = read_source(fragment.as_ref())?;
        Self::link(device, &vs, &fs)
    }

    /// Activates this program as the current pipeline state.
    pub fn bind<D>(&self, device: &mut D) -> Result<()>
    where
        D: Device + ?Sized,
    {
        unsafe { device.bind_program(&self.id) }
    }

    /// Pushes a vec4 uniform. The name is resolved through the cache, costing
    /// one driver query per name for the life of the program; a name the
    /// program does not declare makes this a no-op.
    pub fn set_uniform_4f<D>(&mut self, device: &mut D, name: &str, value: [f32; 4]) -> Result<()>
    where
        D: Device + ?Sized,
    {
        let location = match self.uniforms.get(name) {
            Some(v) => *v,
            None => {
                let resolved = unsafe { device.uniform_location(&self.id, name)? };
                self.uniforms.insert(name.to_owned(), resolved);
                resolved
            }
        };

        match location {
            UniformLocation::Slot(_) => unsafe { device.set_uniform_4f(location, value) },
            UniformLocation::NotFound => Ok(()),
        }
    }

    /// Releases the program object. Consumes `self`, so deletion happens
    /// exactly once per program; the driver does not promise anything about
    /// a double delete.
    pub fn dispose<D>(self, device: &mut D) -> Result<()>
    where
        D: Device + ?Sized,
    {
        unsafe { device.delete_program(self.id) }
    }
}

/// The head of a shader source, for compile diagnostics.
pub(crate) fn excerpt(source: &str) -> String {
    const MAX: usize = 120;
    let trimmed = source.trim_start();
    match trimmed.char_indices().nth(MAX) {
        Some((i, _)) => format!("{}...", &trimmed[..i]),
        None => trimmed.to_owned(),
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| Error::SourceRead {
        path: path.to_owned(),
        cause: format!("{}", err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_truncates() {
        let long: String = "x".repeat(400);
        let head = excerpt(&long);
        assert!(head.len() < 130);
        assert!(head.ends_with("..."));

        assert_eq!(excerpt("  void main() {}"), "void main() {}");
    }
}
