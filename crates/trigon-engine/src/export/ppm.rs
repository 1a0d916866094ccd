use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::PixelBuffer;
use crate::config::RowOrder;
use crate::error::ExportError;

/// `P6\n<width> <height>\n255\n`
pub fn portable_pixmap_header(width: u32, height: u32) -> String {
    format!("P6\n{width} {height}\n255\n")
}

/// Exact size of the file [`write_portable_pixmap`] produces.
pub fn portable_pixmap_len(width: u32, height: u32) -> usize {
    portable_pixmap_header(width, height).len() + 3 * width as usize * height as usize
}

/// Writes a binary P6 image: header, then one RGB triplet per pixel, alpha
/// dropped. Rows go out in storage order unless `order` flips them.
pub fn encode_portable_pixmap<W: Write>(
    out: &mut W,
    pixels: &PixelBuffer,
    order: RowOrder,
) -> io::Result<()> {
    let (width, height) = (pixels.width(), pixels.height());
    out.write_all(portable_pixmap_header(width, height).as_bytes())?;

    let mut line = Vec::with_capacity(width as usize * 3);
    for i in 0..height {
        let y = match order {
            RowOrder::AsRead => i,
            RowOrder::FlipVertical => height - 1 - i,
        };
        line.clear();
        for px in pixels.row(y).unwrap_or_default().chunks_exact(4) {
            line.extend_from_slice(&px[..3]);
        }
        out.write_all(&line)?;
    }
    Ok(())
}

/// Creates (or truncates) `path` and writes `pixels` to it as P6.
pub fn write_portable_pixmap(
    path: impl AsRef<Path>,
    pixels: &PixelBuffer,
    order: RowOrder,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let mut out = BufWriter::new(file);
    encode_portable_pixmap(&mut out, pixels, order)
        .and_then(|()| out.flush())
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    log::info!(
        "wrote {}x{} pixmap to {}",
        pixels.width(),
        pixels.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("trigon-ppm-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    /// Two rows: red/green on top of blue/white, alpha varying.
    fn two_by_two() -> PixelBuffer {
        PixelBuffer::from_rgba(
            2,
            2,
            vec![
                255, 0, 0, 10, 0, 255, 0, 20, //
                0, 0, 255, 30, 255, 255, 255, 40,
            ],
        )
        .unwrap()
    }

    #[test]
    fn header_format() {
        assert_eq!(portable_pixmap_header(800, 600), "P6\n800 600\n255\n");
    }

    #[test]
    fn encodes_rgb_without_alpha_in_storage_order() {
        let mut out = Vec::new();
        encode_portable_pixmap(&mut out, &two_by_two(), RowOrder::AsRead).unwrap();

        let header = b"P6\n2 2\n255\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(
            &out[header.len()..],
            &[255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255]
        );
    }

    #[test]
    fn flip_vertical_reverses_rows() {
        let mut out = Vec::new();
        encode_portable_pixmap(&mut out, &two_by_two(), RowOrder::FlipVertical).unwrap();
        let body = &out[b"P6\n2 2\n255\n".len()..];
        assert_eq!(body, &[0, 0, 255, 255, 255, 255, 255, 0, 0, 0, 255, 0]);
    }

    #[test]
    fn file_size_matches_header_plus_triplets() {
        for (w, h) in [(1, 1), (3, 7), (800, 600), (1024, 1)] {
            let pixels = PixelBuffer::allocate(w, h).unwrap();
            let path = scratch(&format!("size-{w}x{h}.ppm"));
            write_portable_pixmap(&path, &pixels, RowOrder::AsRead).unwrap();

            let expected = 3 + format!("{w} {h}\n").len() + 4 + 3 * w as usize * h as usize;
            let actual = std::fs::metadata(&path).unwrap().len() as usize;
            assert_eq!(actual, expected, "{w}x{h}");
            assert_eq!(portable_pixmap_len(w, h), expected);
        }
    }

    #[test]
    fn writing_twice_is_byte_identical() {
        let pixels = two_by_two();
        let a = scratch("twice-a.ppm");
        let b = scratch("twice-b.ppm");
        write_portable_pixmap(&a, &pixels, RowOrder::AsRead).unwrap();
        write_portable_pixmap(&b, &pixels, RowOrder::AsRead).unwrap();
        let first = std::fs::read(&a).unwrap();
        // Same path again: truncated and rewritten.
        write_portable_pixmap(&a, &pixels, RowOrder::AsRead).unwrap();

        assert_eq!(first, std::fs::read(&b).unwrap());
        assert_eq!(first, std::fs::read(&a).unwrap());
    }

    #[test]
    fn unwritable_path_is_a_create_error() {
        let pixels = two_by_two();
        let path = scratch("missing-dir").join("nested").join("out.ppm");

        let err = write_portable_pixmap(&path, &pixels, RowOrder::AsRead).unwrap_err();
        match err {
            ExportError::Create { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The caller still owns the buffer.
        assert_eq!(pixels.width(), 2);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn encode_propagates_write_errors() {
        let err = encode_portable_pixmap(&mut FailingWriter, &two_by_two(), RowOrder::AsRead)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
    }
}
