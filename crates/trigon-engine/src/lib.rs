//! Trigon engine crate.
//!
//! Headless GPU bring-up on a DRM render node: GBM allocates the off-screen
//! drawable, EGL binds a GLES 3 context to it, one triangle is drawn and the
//! frame is read back and written as a binary PPM.

pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod render;

pub use config::{ClearColor, DeviceSelection, RenderConfig, RowOrder};
pub use error::{AcquireError, ExportError, ShaderBuildError, TrigonError, TrigonResult};
pub use render::{render_to_file, FrameSummary};
