use std::path::PathBuf;

use crate::error::{TrigonError, TrigonResult};

/// Render node opened when nothing else is requested.
pub const DEFAULT_RENDER_NODE: &str = "/dev/dri/renderD128";

/// Directory scanned by [`DeviceSelection::Probe`].
pub const RENDER_NODE_DIR: &str = "/dev/dri";

/// How the GPU render node is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSelection {
    /// Open exactly this device file; no fallback.
    Fixed(PathBuf),
    /// Try `renderD128..=renderD191` under [`RENDER_NODE_DIR`] and keep the first
    /// node that opens read/write.
    Probe,
}

impl Default for DeviceSelection {
    fn default() -> Self {
        Self::Fixed(PathBuf::from(DEFAULT_RENDER_NODE))
    }
}

/// Row order used when serializing the read-back frame.
///
/// GL reads pixels starting at the bottom-left corner, so writing rows in read
/// order yields a vertically flipped image.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum RowOrder {
    /// Rows are written in the order GL returned them (bottom row first).
    #[default]
    AsRead,
    /// Rows are reversed so the file is upright.
    FlipVertical,
}

/// Normalized RGBA clear color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ClearColor {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// The color as an RGBA8 framebuffer would store it.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::new(0.3, 0.5, 0.6, 1.0)
    }
}

/// `width` x `height` as GLsizei, the type glViewport and glReadPixels take.
pub fn gl_extent(width: u32, height: u32) -> Option<(i32, i32)> {
    Some((i32::try_from(width).ok()?, i32::try_from(height).ok()?))
}

/// Parameters of one headless render run.
///
/// Defaults reproduce the fixed run: 800x600, teal clear color, output written to
/// `triangle.ppm` in the working directory.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub device: DeviceSelection,
    pub width: u32,
    pub height: u32,
    pub clear_color: ClearColor,
    pub output: PathBuf,
    pub row_order: RowOrder,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            device: DeviceSelection::default(),
            width: 800,
            height: 600,
            clear_color: ClearColor::default(),
            output: PathBuf::from("triangle.ppm"),
            row_order: RowOrder::AsRead,
        }
    }
}

impl RenderConfig {
    /// Rejects configurations no surface can be created for.
    pub fn validate(&self) -> TrigonResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TrigonError::config(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if gl_extent(self.width, self.height).is_none() {
            return Err(TrigonError::config(format!(
                "surface size {}x{} exceeds the GL size range",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
