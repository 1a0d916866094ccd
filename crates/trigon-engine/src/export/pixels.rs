use glow::HasContext;

use crate::config::gl_extent;
use crate::error::ExportError;
use crate::pipeline::Gles;

/// CPU copy of an RGBA8 color buffer, rows in GL read order (bottom row first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Byte length of a `width` x `height` RGBA8 image, if it fits in memory
    /// addressing.
    pub fn byte_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
    }

    /// Zeroed buffer; fails instead of aborting when the allocation is refused.
    pub fn allocate(width: u32, height: u32) -> Result<Self, ExportError> {
        let bytes = Self::byte_len(width, height).ok_or(ExportError::Allocation { bytes: usize::MAX })?;

        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| ExportError::Allocation { bytes })?;
        data.resize(bytes, 0);

        Ok(Self { width, height, data })
    }

    /// Wraps existing RGBA8 bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ExportError> {
        let expected = Self::byte_len(width, height).unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(ExportError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Reads the (0,0)-(width,height) region of the current read surface.
    pub fn read_color_buffer(gles: &Gles<'_>, width: u32, height: u32) -> Result<Self, ExportError> {
        let (gl_width, gl_height) =
            gl_extent(width, height).ok_or(ExportError::SizeOutOfRange { width, height })?;
        let mut buffer = Self::allocate(width, height)?;
        let gl = gles.gl();
        unsafe {
            gl.pixel_store_i32(glow::PACK_ALIGNMENT, 4);
            gl.read_pixels(
                0,
                0,
                gl_width,
                gl_height,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(Some(buffer.data.as_mut_slice())),
            );
        }
        log::debug!("read back {width}x{height} RGBA8");
        Ok(buffer)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// RGBA of the pixel at column `x` of row `y`, rows in storage order.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Row `y` in storage order.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        self.data.get(start..start + stride)
    }
}
