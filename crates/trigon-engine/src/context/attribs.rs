use khronos_egl as egl;

/// Attributes a config must satisfy.
///
/// Defaults request 8-bit RGBA, window-capable surfaces and GLES 3.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConfigRequest {
    pub red_size: i32,
    pub green_size: i32,
    pub blue_size: i32,
    pub alpha_size: i32,
    pub surface_type: i32,
    pub renderable_type: i32,
}

impl Default for ConfigRequest {
    fn default() -> Self {
        Self {
            red_size: 8,
            green_size: 8,
            blue_size: 8,
            alpha_size: 8,
            surface_type: egl::WINDOW_BIT,
            renderable_type: egl::OPENGL_ES3_BIT,
        }
    }
}

impl ConfigRequest {
    /// `NONE`-terminated attribute list for config selection.
    pub fn attrib_list(&self) -> [i32; 13] {
        [
            egl::SURFACE_TYPE,
            self.surface_type,
            egl::RED_SIZE,
            self.red_size,
            egl::GREEN_SIZE,
            self.green_size,
            egl::BLUE_SIZE,
            self.blue_size,
            egl::ALPHA_SIZE,
            self.alpha_size,
            egl::RENDERABLE_TYPE,
            self.renderable_type,
            egl::NONE,
        ]
    }
}

/// Context creation parameters. No share context is ever requested.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ContextRequest {
    pub client_version: i32,
}

impl Default for ContextRequest {
    fn default() -> Self {
        Self { client_version: 3 }
    }
}

impl ContextRequest {
    pub fn attrib_list(&self) -> [i32; 3] {
        [egl::CONTEXT_CLIENT_VERSION, self.client_version, egl::NONE]
    }
}
