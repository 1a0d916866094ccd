//! GPU device node + GBM buffer allocation.
//!
//! This module is responsible for:
//! - opening the DRM render node (`DeviceHandle`)
//! - creating the GBM device on top of it (`BufferAllocator`)
//! - allocating the off-screen renderable surface (`Drawable`)
//!
//! Lifetimes tie each layer to the one below, so the render node cannot be
//! closed while a GBM object still references it.

mod allocator;
mod node;

pub use allocator::{BufferAllocator, Drawable, DRAWABLE_FORMAT};
pub use node::{probe_render_nodes, DeviceHandle, RENDER_NODE_MINORS};

use std::ffi::c_void;

/// Raw native display pointer handed to the display driver (a `gbm_device*`).
pub trait NativeDisplay {
    fn native_display(&self) -> *mut c_void;
}

/// Raw native window pointer handed to the display driver (a `gbm_surface*`).
pub trait NativeWindow {
    fn native_window(&self) -> *mut c_void;
}
