use std::ffi::c_void;

/// Driver-reported failure text.
pub type DriverError = String;

/// The display-driver entry points used by [`RenderContext`](super::RenderContext).
///
/// Handle types are plain copyable ids; ownership lives in the session guards,
/// never in the driver.
pub trait DisplayDriver {
    type Display: Copy;
    type Config: Copy;
    type Context: Copy;
    type Surface: Copy;

    /// Returns the display for a native device pointer.
    ///
    /// # Safety
    /// `native` must be a live native display (a `gbm_device*` for EGL on GBM).
    unsafe fn get_display(&self, native: *mut c_void) -> Option<Self::Display>;

    /// Negotiates driver capabilities; returns the (major, minor) version.
    fn initialize(&self, display: Self::Display) -> Result<(i32, i32), DriverError>;

    /// Selects OpenGL ES as the client API for later context creation.
    fn bind_api(&self) -> Result<(), DriverError>;

    /// Returns the first config matching `attribs` (a `NONE`-terminated list).
    fn choose_config(
        &self,
        display: Self::Display,
        attribs: &[i32],
    ) -> Result<Option<Self::Config>, DriverError>;

    fn create_context(
        &self,
        display: Self::Display,
        config: Self::Config,
        attribs: &[i32],
    ) -> Result<Self::Context, DriverError>;

    /// # Safety
    /// `window` must be a live native window (a `gbm_surface*`) that outlives the
    /// returned surface.
    unsafe fn create_window_surface(
        &self,
        display: Self::Display,
        config: Self::Config,
        window: *mut c_void,
    ) -> Result<Self::Surface, DriverError>;

    /// Binds `surface` as draw and read target together with `context`.
    fn make_current(
        &self,
        display: Self::Display,
        surface: Self::Surface,
        context: Self::Context,
    ) -> Result<(), DriverError>;

    /// Unbinds any context/surface from the calling thread.
    fn release_current(&self, display: Self::Display) -> Result<(), DriverError>;

    fn swap_buffers(&self, display: Self::Display, surface: Self::Surface) -> Result<(), DriverError>;

    fn destroy_surface(&self, display: Self::Display, surface: Self::Surface) -> Result<(), DriverError>;

    fn destroy_context(&self, display: Self::Display, context: Self::Context) -> Result<(), DriverError>;

    fn terminate(&self, display: Self::Display) -> Result<(), DriverError>;

    /// Client API entry point lookup; null when unknown.
    fn proc_address(&self, name: &str) -> *const c_void;
}
