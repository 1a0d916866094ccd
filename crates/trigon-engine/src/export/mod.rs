//! Framebuffer readback and Portable Pixmap output.

mod pixels;
mod ppm;

pub use pixels::PixelBuffer;
pub use ppm::{encode_portable_pixmap, portable_pixmap_header, portable_pixmap_len, write_portable_pixmap};
