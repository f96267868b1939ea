//! GPU-resident geometry: an interleaved vertex buffer, an optional 32-bit
//! index buffer, and the vertex array object binding attribute slots to byte
//! offsets within the vertex buffer.

use crate::errors::Result;
use crate::video::device::{BufferId, Device, VertexArrayId};
use crate::video::MAX_VERTEX_ATTRIBUTES;

/// Element type of one vertex attribute.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum VertexFormat {
    F32,
    U8,
}

impl VertexFormat {
    /// Size of one element in bytes.
    pub fn size(self) -> usize {
        match self {
            VertexFormat::F32 => 4,
            VertexFormat::U8 => 1,
        }
    }
}

/// One attribute slot description: where in the interleaved vertex record its
/// elements live and how the driver should read them.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct VertexAttribute {
    pub slot: u32,
    pub components: u8,
    pub format: VertexFormat,
    pub normalized: bool,
    pub offset: usize,
}

/// An ordered sequence of attribute descriptors plus the per-vertex stride.
///
/// The stride must be consistent with the interleaved vertex buffer's actual
/// per-vertex byte width. The builder computes a tightly packed stride; it
/// can be overridden, and a wrong one is not an error — rendering proceeds
/// with undefined visual output. That hazard is inherited from the underlying
/// API and is intentionally not validated away.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: usize,
}

impl VertexLayout {
    pub fn build() -> VertexLayoutBuilder {
        VertexLayoutBuilder::new()
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Per-vertex byte width.
    pub fn stride(&self) -> usize {
        self.stride
    }
}

#[derive(Default)]
pub struct VertexLayoutBuilder {
    attributes: Vec<VertexAttribute>,
    cursor: usize,
    stride: Option<usize>,
}

impl VertexLayoutBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends a tightly packed `f32` attribute at the next free offset.
    pub fn with(self, slot: u32, components: u8) -> Self {
        self.with_format(slot, components, VertexFormat::F32, false)
    }

    pub fn with_format(
        mut self,
        slot: u32,
        components: u8,
        format: VertexFormat,
        normalized: bool,
    ) -> Self {
        assert!(components >= 1 && components <= 4);
        assert!(self.attributes.len() < MAX_VERTEX_ATTRIBUTES);

        self.attributes.push(VertexAttribute {
            slot,
            components,
            format,
            normalized,
            offset: self.cursor,
        });
        self.cursor += components as usize * format.size();
        self
    }

    /// Overrides the computed stride. See the layout-consistency note on
    /// [`VertexLayout`].
    pub fn stride(mut self, bytes: usize) -> Self {
        self.stride = Some(bytes);
        self
    }

    pub fn finish(self) -> VertexLayout {
        VertexLayout {
            stride: self.stride.unwrap_or(self.cursor),
            attributes: self.attributes,
        }
    }
}

/// A vertex buffer, an optional index buffer, and the vertex array object
/// describing them. Uploaded once at creation with static-draw usage and
/// never updated afterwards; bound once per frame; disposed exactly once
/// after the loop exits.
pub struct Mesh {
    array: VertexArrayId,
    vertices: BufferId,
    indices: Option<BufferId>,
    vertex_count: usize,
    index_count: usize,
}

impl Mesh {
    /// Uploads `vertices` (and `indices`, when given) and records the
    /// attribute layout into a vertex array object.
    ///
    /// The ordering below is load-bearing: attributes are configured while
    /// both the array and the vertex buffer are bound, and the index buffer
    /// is uploaded before the array is unbound, because the element binding
    /// lives in the array's recorded state.
    ///
    /// Index values must all be smaller than the vertex count.
    pub fn new<D>(
        device: &mut D,
        vertices: &[f32],
        layout: &VertexLayout,
        indices: Option<&[u32]>,
    ) -> Result<Mesh>
    where
        D: Device + ?Sized,
    {
        assert!(layout.stride() > 0);

        let vertex_count = vertices.len() * ::std::mem::size_of::<f32>() / layout.stride();
        if let Some(indices) = indices {
            debug_assert!(
                indices.iter().all(|&v| (v as usize) < vertex_count),
                "index buffer references vertices beyond the vertex buffer"
            );
        }

        unsafe {
            let array = device.create_vertex_array()?;
            device.bind_vertex_array(Some(&array))?;

            let vbo = device.create_vertex_buffer(vertices)?;
            for attribute in layout.attributes() {
                device.set_attribute(attribute, layout.stride())?;
            }

            let ibo = match indices {
                Some(data) => Some(device.create_index_buffer(data)?),
                None => None,
            };

            device.bind_vertex_array(None)?;

            Ok(Mesh {
                array,
                vertices: vbo,
                indices: ibo,
                vertex_count,
                index_count: indices.map_or(0, <[u32]>::len),
            })
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Binds the vertex array and issues exactly one draw call, indexed over
    /// the whole index buffer when one exists, otherwise over every vertex.
    pub fn draw<D>(&self, device: &mut D) -> Result<()>
    where
        D: Device + ?Sized,
    {
        unsafe {
            device.bind_vertex_array(Some(&self.array))?;
            if self.indices.is_some() {
                device.draw_elements(self.index_count)
            } else {
                device.draw_arrays(self.vertex_count)
            }
        }
    }

    /// Releases all three objects. Deletion order between them is free: the
    /// array holds its buffer bindings by name, not by lifetime.
    pub fn dispose<D>(self, device: &mut D) -> Result<()>
    where
        D: Device + ?Sized,
    {
        unsafe {
            device.delete_buffer(self.vertices)?;
            if let Some(indices) = self.indices {
                device.delete_buffer(indices)?;
            }
            device.delete_vertex_array(self.array)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_layout_offsets() {
        let layout = VertexLayout::build().with(0, 3).with(1, 2).finish();
        assert_eq!(layout.stride(), 20);

        let attributes = layout.attributes();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].offset, 0);
        assert_eq!(attributes[0].components, 3);
        assert_eq!(attributes[1].offset, 12);
        assert_eq!(attributes[1].components, 2);
    }

    #[test]
    fn mixed_format_offsets() {
        let layout = VertexLayout::build()
            .with(0, 2)
            .with_format(1, 4, VertexFormat::U8, true)
            .finish();
        assert_eq!(layout.stride(), 12);
        assert_eq!(layout.attributes()[1].offset, 8);
        assert!(layout.attributes()[1].normalized);
    }

    #[test]
    fn stride_override_wins() {
        let layout = VertexLayout::build().with(0, 3).stride(32).finish();
        assert_eq!(layout.stride(), 32);
    }
}
