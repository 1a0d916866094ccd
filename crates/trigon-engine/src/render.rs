//! One complete headless run: acquire, draw, swap, read back, export, tear down.

use std::path::PathBuf;

use crate::config::RenderConfig;
use crate::context::{ConfigRequest, ContextRequest, EglDriver, RenderContext};
use crate::device::{BufferAllocator, DeviceHandle};
use crate::error::TrigonResult;
use crate::export::{write_portable_pixmap, PixelBuffer};
use crate::pipeline::{Gles, Pipeline, ShaderSources};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSummary {
    pub device: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// RGBA at the centre of the frame (inside the triangle).
    pub center: [u8; 4],
    /// RGBA at pixel (0, 0) (background).
    pub corner: [u8; 4],
}

impl FrameSummary {
    fn sample(device: PathBuf, output: PathBuf, pixels: &PixelBuffer) -> Self {
        let (width, height) = (pixels.width(), pixels.height());
        Self {
            device,
            output,
            width,
            height,
            center: pixels.pixel(width / 2, height / 2).unwrap_or_default(),
            corner: pixels.pixel(0, 0).unwrap_or_default(),
        }
    }
}

/// Renders the triangle described by `config` and writes it to `config.output`.
///
/// Resources are acquired strictly in order and released in reverse when this
/// function returns, on success or at the first failure.
pub fn render_to_file(config: &RenderConfig) -> TrigonResult<FrameSummary> {
    config.validate()?;
    let size = (config.width, config.height);

    let device = DeviceHandle::select(&config.device)?;
    let allocator = BufferAllocator::new(&device)?;
    let drawable = allocator.create_drawable(config.width, config.height)?;

    let driver = EglDriver::load()?;
    let context = RenderContext::new(
        &driver,
        &allocator,
        &drawable,
        size,
        &ConfigRequest::default(),
        &ContextRequest::default(),
    )?;
    let gles = Gles::load(&context);

    let pipeline = Pipeline::new(&gles, &ShaderSources::triangle())?;
    pipeline.clear(config.clear_color, size)?;
    pipeline.draw();
    pipeline.finish();

    context.swap_buffers()?;

    let pixels = PixelBuffer::read_color_buffer(&gles, config.width, config.height)?;
    write_portable_pixmap(&config.output, &pixels, config.row_order)?;

    Ok(FrameSummary::sample(
        device.path().to_path_buf(),
        config.output.clone(),
        &pixels,
    ))
}
