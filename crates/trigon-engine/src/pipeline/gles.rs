use std::marker::PhantomData;

use glow::HasContext;

use super::shader::{ShaderDriver, StageKind};
use crate::context::{DisplayDriver, RenderContext};

/// GLES function table for the current context.
///
/// Borrows the [`RenderContext`] it was loaded from, so no GL call can be issued
/// after the context is released.
pub struct Gles<'c> {
    gl: glow::Context,
    _context: PhantomData<&'c ()>,
}

impl<'c> Gles<'c> {
    /// Resolves GL entry points through the context's display driver.
    pub fn load<D: DisplayDriver>(context: &'c RenderContext<'_, D>) -> Self {
        // SAFETY: the context is current on this thread for as long as 'c.
        let gl = unsafe { glow::Context::from_loader_function(|name| context.proc_address(name)) };

        let version = gl.version();
        log::info!(
            "GL {}.{}{} ({})",
            version.major,
            version.minor,
            if version.is_embedded { " ES" } else { "" },
            version.vendor_info
        );

        Self {
            gl,
            _context: PhantomData,
        }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

impl ShaderDriver for Gles<'_> {
    type Shader = glow::Shader;
    type Program = glow::Program;

    fn create_shader(&self, kind: StageKind) -> Result<glow::Shader, String> {
        unsafe { self.gl.create_shader(kind.gl_enum()) }
    }

    fn compile_shader(&self, shader: glow::Shader, source: &str) -> bool {
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: glow::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: glow::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn link_program(&self, program: glow::Program) -> bool {
        unsafe {
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn validate_program(&self, program: glow::Program) -> bool {
        unsafe {
            self.gl.validate_program(program);
            self.gl.get_program_parameter_i32(program, glow::VALIDATE_STATUS) != 0
        }
    }

    fn program_info_log(&self, program: glow::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&self, program: glow::Program) {
        unsafe { self.gl.delete_program(program) }
    }
}
