use bytemuck::{Pod, Zeroable};
use glow::HasContext;

use super::Gles;
use crate::error::AcquireError;

/// Attribute location of the position input in the vertex stage.
pub const POSITION_LOCATION: u32 = 0;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const COMPONENTS: i32 = 3;
    const STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;
}

/// The fixed triangle, counter-clockwise, in clip space.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex { position: [-1.0, -1.0, 0.0] },
    Vertex { position: [1.0, -1.0, 0.0] },
    Vertex { position: [0.0, 1.0, 0.0] },
];

/// Static vertex buffer + the vertex array recording its attribute layout.
pub struct Geometry<'g> {
    gl: &'g glow::Context,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

impl<'g> Geometry<'g> {
    /// Uploads `vertices` and binds them to location 0 as tightly packed
    /// `vec3` floats, without normalization.
    pub fn build(gles: &'g Gles<'_>, vertices: &[Vertex]) -> Result<Self, AcquireError> {
        let gl = gles.gl();
        let vertex_count = i32::try_from(vertices.len())
            .map_err(|_| AcquireError::GlObject(format!("{} vertices", vertices.len())))?;

        unsafe {
            let vao = gl.create_vertex_array().map_err(AcquireError::GlObject)?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(err) => {
                    gl.delete_vertex_array(vao);
                    return Err(AcquireError::GlObject(err));
                }
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(
                POSITION_LOCATION,
                Vertex::COMPONENTS,
                glow::FLOAT,
                false,
                Vertex::STRIDE,
                0,
            );
            gl.enable_vertex_attrib_array(POSITION_LOCATION);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);

            log::debug!("uploaded {vertex_count} vertices");
            Ok(Self {
                gl,
                vao,
                vbo,
                vertex_count,
            })
        }
    }

    pub fn vertex_array(&self) -> glow::VertexArray {
        self.vao
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }
}

impl Drop for Geometry<'_> {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
