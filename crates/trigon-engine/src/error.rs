//! Error taxonomy for the headless pipeline.
//!
//! Three families, matching how each failure is handled:
//! - [`AcquireError`]: a device, drawable, display, config, context or surface
//!   could not be obtained. Always fatal; scoped handles unwind on return.
//! - [`ShaderBuildError`]: compile/link/validate failed. Carries driver logs.
//! - [`ExportError`]: readback allocation or file output failed.

use std::io;
use std::path::PathBuf;

use crate::pipeline::StageKind;

/// Convenience result type used across the engine.
pub type TrigonResult<T> = Result<T, TrigonError>;

/// Failure to acquire one of the pipeline's scoped resources.
#[derive(thiserror::Error, Debug)]
pub enum AcquireError {
    #[error("failed to open DRM device {}", .path.display())]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no usable render node found under {}", .dir.display())]
    NoRenderNode { dir: PathBuf },

    #[error("failed to create GBM device")]
    Allocator(#[source] io::Error),

    #[error("failed to create GBM surface ({width}x{height})")]
    Drawable {
        width: u32,
        height: u32,
        #[source]
        source: io::Error,
    },

    #[error("failed to load libEGL: {0}")]
    LoadEgl(String),

    #[error("failed to get EGL display")]
    NoDisplay,

    #[error("failed to initialize EGL: {0}")]
    Initialize(String),

    #[error("failed to bind the OpenGL ES API: {0}")]
    BindApi(String),

    #[error("failed to choose EGL config: {0}")]
    ChooseConfig(String),

    #[error("no EGL config matches the requested attributes")]
    NoMatchingConfig,

    #[error("failed to create EGL context: {0}")]
    CreateContext(String),

    #[error("failed to create EGL surface: {0}")]
    CreateSurface(String),

    #[error("failed to make EGL context current: {0}")]
    MakeCurrent(String),

    #[error("failed to swap buffers: {0}")]
    Swap(String),

    #[error("failed to create GL object: {0}")]
    GlObject(String),
}

/// One failed step while building a shader program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderFailure {
    /// The driver refused to create a shader or program object.
    CreateObject(String),
    Compile { stage: StageKind, log: String },
    Link { log: String },
    Validate { log: String },
}

impl std::fmt::Display for ShaderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateObject(msg) => write!(f, "object creation failed: {msg}"),
            Self::Compile { stage, log } => {
                write!(f, "compilation of {stage} shader failed: '{}'", log.trim_end())
            }
            Self::Link { log } => write!(f, "linking of the shader program failed: '{}'", log.trim_end()),
            Self::Validate { log } => {
                write!(f, "shader program validation failed: '{}'", log.trim_end())
            }
        }
    }
}

/// A shader program that could not be made usable.
///
/// Every step that failed is kept, in the order it was attempted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("shader program build failed: {}", join_failures(.failures))]
pub struct ShaderBuildError {
    pub failures: Vec<ShaderFailure>,
}

impl ShaderBuildError {
    pub fn single(failure: ShaderFailure) -> Self {
        Self { failures: vec![failure] }
    }

    /// Driver diagnostic text of every failed step.
    pub fn diagnostics(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().filter_map(|f| match f {
            ShaderFailure::CreateObject(msg) => Some(msg.as_str()),
            ShaderFailure::Compile { log, .. }
            | ShaderFailure::Link { log }
            | ShaderFailure::Validate { log } => Some(log.as_str()),
        })
    }
}

fn join_failures(failures: &[ShaderFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure to read back or write out the rendered frame.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("failed to allocate a {bytes}-byte pixel buffer")]
    Allocation { bytes: usize },

    #[error("{width}x{height} is outside the GL size range")]
    SizeOutOfRange { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, {width}x{height} RGBA8 needs {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("failed to open {} for writing", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Top-level error for a full render run.
#[derive(thiserror::Error, Debug)]
pub enum TrigonError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Acquire(#[from] AcquireError),

    #[error(transparent)]
    Shader(#[from] ShaderBuildError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl TrigonError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_error_lists_every_failed_step() {
        let err = ShaderBuildError {
            failures: vec![
                ShaderFailure::Compile {
                    stage: StageKind::Fragment,
                    log: "0:3: syntax error\n".into(),
                },
                ShaderFailure::Link { log: "no fragment shader".into() },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("compilation of fragment shader failed: '0:3: syntax error'"));
        assert!(msg.contains("linking of the shader program failed"));
        assert_eq!(err.diagnostics().count(), 2);
    }

    #[test]
    fn acquire_error_converts_into_top_level() {
        let err: TrigonError = AcquireError::NoMatchingConfig.into();
        assert!(matches!(err, TrigonError::Acquire(AcquireError::NoMatchingConfig)));
        assert_eq!(err.to_string(), "no EGL config matches the requested attributes");
    }

    #[test]
    fn out_of_range_readback_names_the_size() {
        let err = ExportError::SizeOutOfRange { width: u32::MAX, height: 600 };
        assert_eq!(err.to_string(), "4294967295x600 is outside the GL size range");
    }

    #[test]
    fn device_open_error_keeps_io_source() {
        let err = AcquireError::DeviceOpen {
            path: "/dev/dri/renderD128".into(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.to_string(), "failed to open DRM device /dev/dri/renderD128");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert!(source.is_some());
    }
}
