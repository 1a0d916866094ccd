use std::ffi::c_void;
use std::marker::PhantomData;

use gbm::{AsRaw, BufferObjectFlags, Format};

use super::{DeviceHandle, NativeDisplay, NativeWindow};
use crate::error::AcquireError;

/// Pixel layout of the drawable: 32-bit packed XRGB.
pub const DRAWABLE_FORMAT: Format = Format::Xrgb8888;

/// GBM device created over an open render node.
///
/// Dropping it calls `gbm_device_destroy`; the borrowed [`DeviceHandle`] stays
/// open until its own drop.
pub struct BufferAllocator<'d> {
    gbm: gbm::Device<&'d DeviceHandle>,
}

impl<'d> BufferAllocator<'d> {
    /// Creates a GBM device over `handle`.
    pub fn new(handle: &'d DeviceHandle) -> Result<Self, AcquireError> {
        let gbm = gbm::Device::new(handle).map_err(AcquireError::Allocator)?;
        log::debug!(
            "created GBM device on {} (backend {})",
            handle.path().display(),
            gbm.backend_name()
        );
        Ok(Self { gbm })
    }

    /// Allocates a renderable, CPU-invisible surface of `width` x `height`.
    ///
    /// Format is fixed to [`DRAWABLE_FORMAT`] and usage to rendering.
    pub fn create_drawable(&self, width: u32, height: u32) -> Result<Drawable<'_>, AcquireError> {
        let surface = self
            .gbm
            .create_surface::<()>(width, height, DRAWABLE_FORMAT, BufferObjectFlags::RENDERING)
            .map_err(|source| AcquireError::Drawable {
                width,
                height,
                source,
            })?;

        log::debug!("created GBM surface {width}x{height} {DRAWABLE_FORMAT:?}");
        Ok(Drawable {
            surface,
            width,
            height,
            _allocator: PhantomData,
        })
    }
}

impl NativeDisplay for BufferAllocator<'_> {
    fn native_display(&self) -> *mut c_void {
        self.gbm.as_raw() as *mut c_void
    }
}

impl Drop for BufferAllocator<'_> {
    fn drop(&mut self) {
        log::debug!("destroying GBM device");
    }
}

/// Off-screen GBM surface used as the EGL window target.
pub struct Drawable<'a> {
    surface: gbm::Surface<()>,
    width: u32,
    height: u32,
    _allocator: PhantomData<&'a ()>,
}

impl Drawable<'_> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl NativeWindow for Drawable<'_> {
    fn native_window(&self) -> *mut c_void {
        self.surface.as_raw() as *mut c_void
    }
}

impl Drop for Drawable<'_> {
    fn drop(&mut self) {
        log::debug!("destroying GBM surface {}x{}", self.width, self.height);
    }
}
