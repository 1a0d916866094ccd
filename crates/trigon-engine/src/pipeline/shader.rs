use std::fmt;

use crate::error::{ShaderBuildError, ShaderFailure};

/// Shader pipeline stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    /// GL enum for `glCreateShader`.
    pub fn gl_enum(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Vertex + fragment source text for one program.
#[derive(Debug, Clone, Copy)]
pub struct ShaderSources<'s> {
    pub vertex: &'s str,
    pub fragment: &'s str,
}

impl ShaderSources<'static> {
    /// Scaled pass-through vertex stage and solid red fragment stage.
    pub fn triangle() -> Self {
        Self {
            vertex: include_str!("../shaders/triangle.vert"),
            fragment: include_str!("../shaders/triangle.frag"),
        }
    }
}

/// The GL entry points needed to build a program.
///
/// Status queries return `true` on success. Logs are returned whole.
pub trait ShaderDriver {
    type Shader: Copy;
    type Program: Copy;

    fn create_shader(&self, kind: StageKind) -> Result<Self::Shader, String>;
    /// Uploads `source` and compiles; returns the compile status.
    fn compile_shader(&self, shader: Self::Shader, source: &str) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program) -> bool;
    fn validate_program(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
}

/// A successfully compiled stage. The shader object is deleted on drop; once
/// attached, GL keeps it alive until the program goes away.
pub struct Stage<'g, D: ShaderDriver> {
    driver: &'g D,
    raw: D::Shader,
    kind: StageKind,
}

impl<D: ShaderDriver> Stage<'_, D> {
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn raw(&self) -> D::Shader {
        self.raw
    }
}

impl<D: ShaderDriver> Drop for Stage<'_, D> {
    fn drop(&mut self) {
        self.driver.delete_shader(self.raw);
    }
}

/// Compiles `source` as a `kind` stage.
///
/// On failure the shader object is deleted and the driver's log is returned.
pub fn compile_stage<'g, D: ShaderDriver>(
    driver: &'g D,
    source: &str,
    kind: StageKind,
) -> Result<Stage<'g, D>, ShaderFailure> {
    let raw = driver
        .create_shader(kind)
        .map_err(ShaderFailure::CreateObject)?;
    let stage = Stage { driver, raw, kind };

    if !driver.compile_shader(raw, source) {
        let log = driver.shader_info_log(raw);
        return Err(ShaderFailure::Compile { stage: kind, log });
    }

    log::debug!("compiled {kind} shader");
    Ok(stage)
}

/// A linked and validated program; deleted on drop.
pub struct ShaderProgram<'g, D: ShaderDriver> {
    driver: &'g D,
    raw: D::Program,
}

impl<D: ShaderDriver> ShaderProgram<'_, D> {
    pub fn raw(&self) -> D::Program {
        self.raw
    }
}

impl<D: ShaderDriver> Drop for ShaderProgram<'_, D> {
    fn drop(&mut self) {
        self.driver.delete_program(self.raw);
    }
}

/// Compiles both stages, links, then validates.
///
/// A stage that fails to compile is not attached, but the other stage is still
/// compiled and linking is still attempted. Validation only runs after a
/// successful link. Any failure yields `Err` with every collected diagnostic.
pub fn build_program<'g, D: ShaderDriver>(
    driver: &'g D,
    sources: &ShaderSources<'_>,
) -> Result<ShaderProgram<'g, D>, ShaderBuildError> {
    let raw = driver.create_program().map_err(|msg| {
        log::error!("generation of shader program failed: {msg}");
        ShaderBuildError::single(ShaderFailure::CreateObject(msg))
    })?;
    let program = ShaderProgram { driver, raw };

    let mut failures = Vec::new();
    let mut stages = Vec::with_capacity(2);

    for (kind, source) in [
        (StageKind::Vertex, sources.vertex),
        (StageKind::Fragment, sources.fragment),
    ] {
        match compile_stage(driver, source, kind) {
            Ok(stage) => {
                driver.attach_shader(raw, stage.raw());
                stages.push(stage);
            }
            Err(failure) => {
                log::error!("{failure}");
                failures.push(failure);
            }
        }
    }

    if !driver.link_program(raw) {
        let failure = ShaderFailure::Link {
            log: driver.program_info_log(raw),
        };
        log::error!("{failure}");
        failures.push(failure);
    } else if !driver.validate_program(raw) {
        let failure = ShaderFailure::Validate {
            log: driver.program_info_log(raw),
        };
        log::error!("{failure}");
        failures.push(failure);
    }

    // Attached shaders are only flagged for deletion here.
    drop(stages);

    if failures.is_empty() {
        log::debug!("shader program linked and validated");
        Ok(program)
    } else {
        Err(ShaderBuildError { failures })
    }
}
