use std::ffi::c_void;

use khronos_egl as egl;

use super::driver::{DisplayDriver, DriverError};
use crate::error::AcquireError;

/// [`DisplayDriver`] backed by the system `libEGL`, loaded at runtime.
pub struct EglDriver {
    egl: egl::DynamicInstance<egl::EGL1_4>,
}

impl EglDriver {
    /// Loads `libEGL` and resolves every EGL 1.4 entry point.
    pub fn load() -> Result<Self, AcquireError> {
        // SAFETY: libEGL's initializers have no preconditions on the caller.
        let egl = unsafe { egl::DynamicInstance::<egl::EGL1_4>::load_required() }
            .map_err(|err| AcquireError::LoadEgl(err.to_string()))?;
        log::debug!("loaded libEGL");
        Ok(Self { egl })
    }
}

fn describe(err: egl::Error) -> DriverError {
    err.to_string()
}

impl DisplayDriver for EglDriver {
    type Display = egl::Display;
    type Config = egl::Config;
    type Context = egl::Context;
    type Surface = egl::Surface;

    unsafe fn get_display(&self, native: *mut c_void) -> Option<egl::Display> {
        unsafe { self.egl.get_display(native) }
    }

    fn initialize(&self, display: egl::Display) -> Result<(i32, i32), DriverError> {
        self.egl.initialize(display).map_err(describe)
    }

    fn bind_api(&self) -> Result<(), DriverError> {
        self.egl.bind_api(egl::OPENGL_ES_API).map_err(describe)
    }

    fn choose_config(
        &self,
        display: egl::Display,
        attribs: &[i32],
    ) -> Result<Option<egl::Config>, DriverError> {
        self.egl.choose_first_config(display, attribs).map_err(describe)
    }

    fn create_context(
        &self,
        display: egl::Display,
        config: egl::Config,
        attribs: &[i32],
    ) -> Result<egl::Context, DriverError> {
        self.egl
            .create_context(display, config, None, attribs)
            .map_err(describe)
    }

    unsafe fn create_window_surface(
        &self,
        display: egl::Display,
        config: egl::Config,
        window: *mut c_void,
    ) -> Result<egl::Surface, DriverError> {
        unsafe {
            self.egl
                .create_window_surface(display, config, window, None)
                .map_err(describe)
        }
    }

    fn make_current(
        &self,
        display: egl::Display,
        surface: egl::Surface,
        context: egl::Context,
    ) -> Result<(), DriverError> {
        self.egl
            .make_current(display, Some(surface), Some(surface), Some(context))
            .map_err(describe)
    }

    fn release_current(&self, display: egl::Display) -> Result<(), DriverError> {
        self.egl
            .make_current(display, None, None, None)
            .map_err(describe)
    }

    fn swap_buffers(&self, display: egl::Display, surface: egl::Surface) -> Result<(), DriverError> {
        self.egl.swap_buffers(display, surface).map_err(describe)
    }

    fn destroy_surface(&self, display: egl::Display, surface: egl::Surface) -> Result<(), DriverError> {
        self.egl.destroy_surface(display, surface).map_err(describe)
    }

    fn destroy_context(&self, display: egl::Display, context: egl::Context) -> Result<(), DriverError> {
        self.egl.destroy_context(display, context).map_err(describe)
    }

    fn terminate(&self, display: egl::Display) -> Result<(), DriverError> {
        self.egl.terminate(display).map_err(describe)
    }

    fn proc_address(&self, name: &str) -> *const c_void {
        self.egl
            .get_proc_address(name)
            .map_or(std::ptr::null(), |f| f as *const c_void)
    }
}
