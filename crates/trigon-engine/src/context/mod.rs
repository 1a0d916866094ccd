//! Display connection + GPU context bring-up.
//!
//! `RenderContext::new` walks the fixed sequence:
//! get display -> initialize -> choose config -> create context ->
//! create window surface -> make current.
//!
//! Each acquired object is a scoped guard; a failure at any step drops the guards
//! already built, in reverse order, before the error is returned.

mod attribs;
mod driver;
mod egl;
mod session;

pub use attribs::{ConfigRequest, ContextRequest};
pub use driver::{DisplayDriver, DriverError};
pub use egl::EglDriver;
pub use session::{
    Configuration, CurrentBinding, DisplayConnection, GpuContext, PendingDisplay, RenderContext,
    SurfaceView,
};
