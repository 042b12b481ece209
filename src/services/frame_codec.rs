//! PNG frame decode/encode.
//!
//! Bridges frame files on disk and the raw RGB rasters the dithering engine
//! consumes. Decoding normalizes whatever ffmpeg produced down to a
//! tightly-packed 3-channel 8-bit buffer; encoding writes the engine's
//! output back as RGB PNG. All functions are synchronous: they run inside
//! `spawn_blocking` frame tasks.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("PNG decode error: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("Unsupported PNG color type: {0:?}")]
    UnsupportedColor(png::ColorType),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A decoded frame: row-major RGB8 pixels, no padding.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode a PNG file into a packed RGB8 buffer.
///
/// ffmpeg normally writes rgb24 PNGs, but the decoder also accepts RGBA
/// (alpha dropped) and grayscale (replicated across channels) so externally
/// produced frames work too. Bit depths above 8 are stripped to 8.
pub fn decode_rgb(path: &Path) -> Result<FrameBuffer, CodecError> {
    let mut decoder = png::Decoder::new(File::open(path)?);
    // Expand palettes / sub-byte depths and strip 16-bit down to 8.
    decoder.set_transformations(png::Transformations::normalize_to_color8());

    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let pixel_count = (info.width * info.height) as usize;
    let pixels = match info.color_type {
        png::ColorType::Rgb => buf,
        png::ColorType::Rgba => {
            let mut rgb = Vec::with_capacity(pixel_count * 3);
            for px in buf.chunks_exact(4) {
                rgb.extend_from_slice(&px[..3]);
            }
            rgb
        }
        png::ColorType::Grayscale => {
            let mut rgb = Vec::with_capacity(pixel_count * 3);
            for &v in &buf {
                rgb.extend_from_slice(&[v, v, v]);
            }
            rgb
        }
        png::ColorType::GrayscaleAlpha => {
            let mut rgb = Vec::with_capacity(pixel_count * 3);
            for px in buf.chunks_exact(2) {
                rgb.extend_from_slice(&[px[0], px[0], px[0]]);
            }
            rgb
        }
        other => return Err(CodecError::UnsupportedColor(other)),
    };

    Ok(FrameBuffer {
        pixels,
        width: info.width,
        height: info.height,
    })
}

/// Encode a packed RGB8 buffer as a PNG file, replacing any existing file.
pub fn encode_rgb(path: &Path, frame: &FrameBuffer) -> Result<(), CodecError> {
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&frame.pixels)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_frame(width: u32, height: u32) -> FrameBuffer {
        let pixels = (0..width * height)
            .flat_map(|i| {
                if (i % width + i / width) % 2 == 0 {
                    [255u8, 0, 0]
                } else {
                    [0u8, 0, 255]
                }
            })
            .collect();
        FrameBuffer {
            pixels,
            width,
            height,
        }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame-000001.png");

        let frame = checker_frame(4, 3);
        encode_rgb(&path, &frame).unwrap();

        let decoded = decode_rgb(&path).unwrap();
        assert_eq!(decoded.width, 4);
        assert_eq!(decoded.height, 3);
        assert_eq!(decoded.pixels, frame.pixels);
    }

    #[test]
    fn test_decode_rgba_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.png");

        // Hand-write a 2x1 RGBA PNG.
        let file = File::create(&path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), 2, 1);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer
            .write_image_data(&[10, 20, 30, 255, 40, 50, 60, 128])
            .unwrap();
        writer.finish().unwrap();

        let decoded = decode_rgb(&path).unwrap();
        assert_eq!(decoded.pixels, vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_decode_grayscale_expands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");

        let file = File::create(&path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), 2, 1);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[0, 200]).unwrap();
        writer.finish().unwrap();

        let decoded = decode_rgb(&path).unwrap();
        assert_eq!(decoded.pixels, vec![0, 0, 0, 200, 200, 200]);
    }

    #[test]
    fn test_decode_missing_file() {
        let result = decode_rgb(Path::new("/nonexistent/frame.png"));
        assert!(matches!(result, Err(CodecError::Io(_))));
    }

    #[test]
    fn test_decode_garbage_is_named_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let result = decode_rgb(&path);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }
}
