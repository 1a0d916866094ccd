use std::ffi::c_void;

use super::attribs::{ConfigRequest, ContextRequest};
use super::driver::DisplayDriver;
use crate::device::{NativeDisplay, NativeWindow};
use crate::error::AcquireError;

/// A display obtained from the driver but not yet initialized.
///
/// Nothing can be created from it; [`PendingDisplay::initialize`] turns it into a
/// [`DisplayConnection`].
pub struct PendingDisplay<'a, D: DisplayDriver> {
    driver: &'a D,
    raw: D::Display,
}

impl<'a, D: DisplayDriver> PendingDisplay<'a, D> {
    /// Step 1: looks up the display for the allocator's native device.
    pub fn get(driver: &'a D, native: &'a impl NativeDisplay) -> Result<Self, AcquireError> {
        // SAFETY: `native` is borrowed for 'a, so the gbm_device outlives every
        // object created from this display.
        let raw = unsafe { driver.get_display(native.native_display()) }
            .ok_or(AcquireError::NoDisplay)?;
        Ok(Self { driver, raw })
    }

    /// Step 2: negotiates driver capabilities.
    pub fn initialize(self) -> Result<DisplayConnection<'a, D>, AcquireError> {
        let (major, minor) = self
            .driver
            .initialize(self.raw)
            .map_err(AcquireError::Initialize)?;
        log::info!("EGL {major}.{minor} initialized");

        Ok(DisplayConnection {
            driver: self.driver,
            raw: self.raw,
            version: (major, minor),
        })
    }
}

/// Initialized display; terminated on drop.
pub struct DisplayConnection<'a, D: DisplayDriver> {
    driver: &'a D,
    raw: D::Display,
    version: (i32, i32),
}

impl<'a, D: DisplayDriver> DisplayConnection<'a, D> {
    pub fn version(&self) -> (i32, i32) {
        self.version
    }

    /// Step 3: picks the first config satisfying every requested attribute.
    pub fn choose_configuration(
        &self,
        request: &ConfigRequest,
    ) -> Result<Configuration<D>, AcquireError> {
        self.driver.bind_api().map_err(AcquireError::BindApi)?;

        let raw = self
            .driver
            .choose_config(self.raw, &request.attrib_list())
            .map_err(AcquireError::ChooseConfig)?
            .ok_or(AcquireError::NoMatchingConfig)?;
        log::debug!("chose EGL config for {request:?}");

        Ok(Configuration { raw, request: *request })
    }

    /// Step 4: creates the single, unshared GPU context.
    pub fn create_context(
        &self,
        config: &Configuration<D>,
        request: &ContextRequest,
    ) -> Result<GpuContext<'a, D>, AcquireError> {
        let raw = self
            .driver
            .create_context(self.raw, config.raw, &request.attrib_list())
            .map_err(AcquireError::CreateContext)?;
        log::debug!("created GLES {} context", request.client_version);

        Ok(GpuContext {
            driver: self.driver,
            display: self.raw,
            raw,
        })
    }

    /// Step 5: wraps the drawable as a window surface.
    pub fn create_surface_view(
        &self,
        config: &Configuration<D>,
        window: &'a impl NativeWindow,
    ) -> Result<SurfaceView<'a, D>, AcquireError> {
        // SAFETY: `window` is borrowed for 'a, which bounds the returned view.
        let raw = unsafe {
            self.driver
                .create_window_surface(self.raw, config.raw, window.native_window())
        }
        .map_err(AcquireError::CreateSurface)?;
        log::debug!("created EGL window surface");

        Ok(SurfaceView {
            driver: self.driver,
            display: self.raw,
            raw,
        })
    }

    /// Step 6: binds `surface` (draw + read) and `context` to this thread.
    pub fn make_current(
        &self,
        surface: &SurfaceView<'a, D>,
        context: &GpuContext<'a, D>,
    ) -> Result<CurrentBinding<'a, D>, AcquireError> {
        self.driver
            .make_current(self.raw, surface.raw, context.raw)
            .map_err(AcquireError::MakeCurrent)?;
        log::debug!("context made current");

        Ok(CurrentBinding {
            driver: self.driver,
            display: self.raw,
        })
    }
}

impl<D: DisplayDriver> Drop for DisplayConnection<'_, D> {
    fn drop(&mut self) {
        log::debug!("terminating EGL display");
        if let Err(err) = self.driver.terminate(self.raw) {
            log::warn!("eglTerminate failed: {err}");
        }
    }
}

/// Immutable config descriptor. Owns no driver resource.
pub struct Configuration<D: DisplayDriver> {
    raw: D::Config,
    request: ConfigRequest,
}

impl<D: DisplayDriver> Configuration<D> {
    pub fn request(&self) -> &ConfigRequest {
        &self.request
    }
}

/// GPU context; destroyed on drop.
pub struct GpuContext<'a, D: DisplayDriver> {
    driver: &'a D,
    display: D::Display,
    raw: D::Context,
}

impl<D: DisplayDriver> Drop for GpuContext<'_, D> {
    fn drop(&mut self) {
        log::debug!("destroying EGL context");
        if let Err(err) = self.driver.destroy_context(self.display, self.raw) {
            log::warn!("eglDestroyContext failed: {err}");
        }
    }
}

/// Window surface over the drawable; destroyed on drop.
pub struct SurfaceView<'a, D: DisplayDriver> {
    driver: &'a D,
    display: D::Display,
    raw: D::Surface,
}

impl<D: DisplayDriver> Drop for SurfaceView<'_, D> {
    fn drop(&mut self) {
        log::debug!("destroying EGL surface");
        if let Err(err) = self.driver.destroy_surface(self.display, self.raw) {
            log::warn!("eglDestroySurface failed: {err}");
        }
    }
}

/// The thread's current (display, surface, surface, context) binding.
///
/// Released on drop so the surface and context are not current when destroyed.
pub struct CurrentBinding<'a, D: DisplayDriver> {
    driver: &'a D,
    display: D::Display,
}

impl<D: DisplayDriver> Drop for CurrentBinding<'_, D> {
    fn drop(&mut self) {
        log::debug!("releasing current context");
        if let Err(err) = self.driver.release_current(self.display) {
            log::warn!("eglMakeCurrent(NONE) failed: {err}");
        }
    }
}

/// A display, config, context and surface, bound current and ready to draw.
///
/// Field order is teardown order: the binding is released first and the display
/// is terminated last.
pub struct RenderContext<'a, D: DisplayDriver> {
    _binding: CurrentBinding<'a, D>,
    surface: SurfaceView<'a, D>,
    _context: GpuContext<'a, D>,
    config: Configuration<D>,
    display: DisplayConnection<'a, D>,
    width: u32,
    height: u32,
}

impl<'a, D: DisplayDriver> RenderContext<'a, D> {
    /// Runs steps 1-6 against `native` (the allocator) and `window` (the
    /// drawable).
    pub fn new(
        driver: &'a D,
        native: &'a impl NativeDisplay,
        window: &'a impl NativeWindow,
        size: (u32, u32),
        config_request: &ConfigRequest,
        context_request: &ContextRequest,
    ) -> Result<Self, AcquireError> {
        let display = PendingDisplay::get(driver, native)?.initialize()?;
        let config = display.choose_configuration(config_request)?;
        let context = display.create_context(&config, context_request)?;
        let surface = display.create_surface_view(&config, window)?;
        let binding = display.make_current(&surface, &context)?;

        log::info!("render context ready ({}x{})", size.0, size.1);
        Ok(Self {
            _binding: binding,
            surface,
            _context: context,
            config,
            display,
            width: size.0,
            height: size.1,
        })
    }

    /// Presents the rendered frame on the surface.
    pub fn swap_buffers(&self) -> Result<(), AcquireError> {
        self.display
            .driver
            .swap_buffers(self.display.raw, self.surface.raw)
            .map_err(AcquireError::Swap)
    }

    /// Looks up a client API entry point through the display driver.
    pub fn proc_address(&self, name: &str) -> *const c_void {
        self.display.driver.proc_address(name)
    }

    pub fn config(&self) -> &Configuration<D> {
        &self.config
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Driver steps that can be scripted to fail.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub(crate) enum Step {
        GetDisplay,
        Initialize,
        BindApi,
        ChooseConfig,
        CreateContext,
        CreateSurface,
        MakeCurrent,
    }

    const STEPS: [Step; 7] = [
        Step::GetDisplay,
        Step::Initialize,
        Step::BindApi,
        Step::ChooseConfig,
        Step::CreateContext,
        Step::CreateSurface,
        Step::MakeCurrent,
    ];

    /// Records every call; fails at `fail_at`, exposes `configs` matches.
    pub(crate) struct RecordingDriver {
        pub calls: RefCell<Vec<&'static str>>,
        pub fail_at: Option<Step>,
        pub configs: usize,
    }

    impl RecordingDriver {
        pub fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_at: None,
                configs: 1,
            }
        }

        pub fn failing_at(step: Step) -> Self {
            Self { fail_at: Some(step), ..Self::new() }
        }

        fn step(&self, step: Step, name: &'static str) -> Result<(), String> {
            self.calls.borrow_mut().push(name);
            if self.fail_at == Some(step) {
                Err(format!("{name} refused"))
            } else {
                Ok(())
            }
        }

        fn record(&self, name: &'static str) -> Result<(), String> {
            self.calls.borrow_mut().push(name);
            Ok(())
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }
    }

    impl DisplayDriver for RecordingDriver {
        type Display = u32;
        type Config = u32;
        type Context = u32;
        type Surface = u32;

        unsafe fn get_display(&self, native: *mut c_void) -> Option<u32> {
            assert!(!native.is_null());
            self.step(Step::GetDisplay, "get_display").ok().map(|_| 1)
        }

        fn initialize(&self, _: u32) -> Result<(i32, i32), String> {
            self.step(Step::Initialize, "initialize").map(|_| (1, 5))
        }

        fn bind_api(&self) -> Result<(), String> {
            self.step(Step::BindApi, "bind_api")
        }

        fn choose_config(&self, _: u32, attribs: &[i32]) -> Result<Option<u32>, String> {
            assert_eq!(attribs.last(), Some(&khronos_egl::NONE));
            self.step(Step::ChooseConfig, "choose_config")?;
            Ok((self.configs > 0).then_some(7))
        }

        fn create_context(&self, _: u32, config: u32, _: &[i32]) -> Result<u32, String> {
            assert_eq!(config, 7);
            self.step(Step::CreateContext, "create_context").map(|_| 2)
        }

        unsafe fn create_window_surface(
            &self,
            _: u32,
            config: u32,
            window: *mut c_void,
        ) -> Result<u32, String> {
            assert_eq!(config, 7);
            assert!(!window.is_null());
            self.step(Step::CreateSurface, "create_surface").map(|_| 3)
        }

        fn make_current(&self, _: u32, surface: u32, context: u32) -> Result<(), String> {
            assert_eq!((surface, context), (3, 2));
            self.step(Step::MakeCurrent, "make_current")
        }

        fn release_current(&self, _: u32) -> Result<(), String> {
            self.record("release_current")
        }

        fn swap_buffers(&self, _: u32, surface: u32) -> Result<(), String> {
            assert_eq!(surface, 3);
            self.record("swap_buffers")
        }

        fn destroy_surface(&self, _: u32, _: u32) -> Result<(), String> {
            self.record("destroy_surface")
        }

        fn destroy_context(&self, _: u32, _: u32) -> Result<(), String> {
            self.record("destroy_context")
        }

        fn terminate(&self, _: u32) -> Result<(), String> {
            self.record("terminate")
        }

        fn proc_address(&self, _: &str) -> *const c_void {
            std::ptr::null()
        }
    }

    /// Stand-in for the GBM device and surface.
    pub(crate) struct FakeNative(pub u8);

    impl NativeDisplay for FakeNative {
        fn native_display(&self) -> *mut c_void {
            &self.0 as *const u8 as *mut c_void
        }
    }

    impl NativeWindow for FakeNative {
        fn native_window(&self) -> *mut c_void {
            &self.0 as *const u8 as *mut c_void
        }
    }

    fn build(driver: &RecordingDriver) -> Result<RenderContext<'_, RecordingDriver>, AcquireError> {
        static NATIVE: FakeNative = FakeNative(0);
        static WINDOW: FakeNative = FakeNative(1);
        RenderContext::new(
            driver,
            &NATIVE,
            &WINDOW,
            (800, 600),
            &ConfigRequest::default(),
            &ContextRequest::default(),
        )
    }

    const ACQUIRE: [&str; 7] = [
        "get_display",
        "initialize",
        "bind_api",
        "choose_config",
        "create_context",
        "create_surface",
        "make_current",
    ];

    /// Release call for an acquire call that leaves a live resource behind.
    fn release_of(acquire: &str) -> Option<&'static str> {
        match acquire {
            "initialize" => Some("terminate"),
            "create_context" => Some("destroy_context"),
            "create_surface" => Some("destroy_surface"),
            "make_current" => Some("release_current"),
            _ => None,
        }
    }

    #[test]
    fn acquires_in_order_then_tears_down_in_reverse() {
        let driver = RecordingDriver::new();
        {
            let ctx = build(&driver).unwrap();
            assert_eq!(driver.calls(), ACQUIRE);
            assert_eq!(ctx.size(), (800, 600));
            ctx.swap_buffers().unwrap();
        }
        let calls = driver.calls();
        assert_eq!(
            &calls[ACQUIRE.len()..],
            [
                "swap_buffers",
                "release_current",
                "destroy_surface",
                "destroy_context",
                "terminate"
            ]
        );
    }

    #[test]
    fn failure_at_any_step_unwinds_exactly_the_acquired_prefix() {
        for (index, step) in STEPS.iter().enumerate() {
            let driver = RecordingDriver::failing_at(*step);
            assert!(build(&driver).is_err(), "{step:?} should fail the build");

            let attempted = &ACQUIRE[..=index];
            let released: Vec<_> = attempted[..index]
                .iter()
                .rev()
                .filter_map(|a| release_of(a))
                .collect();

            let mut expected = attempted.to_vec();
            expected.extend(released);
            assert_eq!(driver.calls(), expected, "failing at {step:?}");
        }
    }

    #[test]
    fn failures_map_to_their_acquire_error() {
        let cases = [
            (Step::GetDisplay, "failed to get EGL display"),
            (Step::Initialize, "failed to initialize EGL: initialize refused"),
            (Step::CreateContext, "failed to create EGL context: create_context refused"),
            (Step::CreateSurface, "failed to create EGL surface: create_surface refused"),
            (Step::MakeCurrent, "failed to make EGL context current: make_current refused"),
        ];
        for (step, message) in cases {
            let driver = RecordingDriver::failing_at(step);
            let err = build(&driver).err().unwrap();
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn zero_matching_configs_fails_before_context_creation() {
        let driver = RecordingDriver { configs: 0, ..RecordingDriver::new() };
        let err = build(&driver).err().unwrap();

        assert!(matches!(err, AcquireError::NoMatchingConfig));
        assert_eq!(
            driver.calls(),
            ["get_display", "initialize", "bind_api", "choose_config", "terminate"]
        );
    }

    #[test]
    fn configuration_remembers_request() {
        let driver = RecordingDriver::new();
        let ctx = build(&driver).unwrap();
        assert_eq!(ctx.config().request(), &ConfigRequest::default());
    }
}
