use glow::HasContext;

use super::geometry::{Geometry, TRIANGLE};
use super::shader::{build_program, ShaderProgram, ShaderSources};
use super::Gles;
use crate::config::{gl_extent, ClearColor};
use crate::error::{TrigonError, TrigonResult};

/// GPU objects for one draw: geometry plus a usable program.
pub struct Pipeline<'g> {
    gles: &'g Gles<'g>,
    program: ShaderProgram<'g, Gles<'g>>,
    geometry: Geometry<'g>,
}

impl<'g> Pipeline<'g> {
    /// Uploads the triangle and builds the program from `sources`.
    pub fn new(gles: &'g Gles<'g>, sources: &ShaderSources<'_>) -> TrigonResult<Self> {
        let geometry = Geometry::build(gles, &TRIANGLE)?;
        let program = build_program(gles, sources)?;
        Ok(Self {
            gles,
            program,
            geometry,
        })
    }

    /// Sets the viewport to the full surface and clears it.
    pub fn clear(&self, color: ClearColor, size: (u32, u32)) -> TrigonResult<()> {
        let (width, height) = gl_extent(size.0, size.1).ok_or_else(|| {
            TrigonError::config(format!(
                "viewport {}x{} exceeds the GL size range",
                size.0, size.1
            ))
        })?;
        let gl = self.gles.gl();
        unsafe {
            gl.viewport(0, 0, width, height);
            gl.clear_color(color.r, color.g, color.b, color.a);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
        Ok(())
    }

    /// Draws the geometry as a triangle list, then unbinds program and vertex
    /// array.
    pub fn draw(&self) {
        let gl = self.gles.gl();
        unsafe {
            gl.use_program(Some(self.program.raw()));
            gl.bind_vertex_array(Some(self.geometry.vertex_array()));
            gl.draw_arrays(glow::TRIANGLES, 0, self.geometry.vertex_count());
            gl.bind_vertex_array(None);
            gl.use_program(None);

            let error = gl.get_error();
            if error != glow::NO_ERROR {
                log::warn!("GL error 0x{error:04x} after draw");
            }
        }
        log::debug!("drew {} vertices", self.geometry.vertex_count());
    }

    /// Blocks until every issued command has completed.
    pub fn finish(&self) {
        unsafe { self.gles.gl().finish() }
    }
}
