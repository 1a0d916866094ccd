//! GLES pipeline: triangle geometry, shader program, draw.
//!
//! Every GL object id is a field of the value that owns it and is deleted when
//! that value drops. Nothing here is global.
//!
//! Convention:
//! - Geometry is in clip space, [-1, 1] on both axes.
//! - The vertex shader scales x/y by 0.4 so the triangle sits inside the frame.

mod geometry;
mod gles;
mod renderer;
mod shader;

pub use geometry::{Geometry, Vertex, TRIANGLE};
pub use gles::Gles;
pub use renderer::Pipeline;
pub use shader::{
    build_program, compile_stage, ShaderDriver, ShaderProgram, ShaderSources, Stage, StageKind,
};
