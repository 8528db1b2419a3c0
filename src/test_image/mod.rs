//! Test image generation.
//!
//! Provides small, valid encoded images for tests without shipping binary
//! fixtures.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

/// Encode a solid-color RGBA image as PNG bytes.
pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let [r, g, b] = color;
    let img = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]));

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("in-memory PNG encoding cannot fail");
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_bytes_is_valid_png() {
        let bytes = png_bytes(4, 4, [1, 2, 3]);
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 4);
    }
}
