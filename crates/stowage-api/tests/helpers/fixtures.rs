//! Generated image fixtures.

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Encoded PNG of the given size
pub fn create_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([40, 120, 200, 255]));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode PNG");
    buffer.into_inner()
}

/// Bytes that look like an icon but that no thumbnail codec accepts
pub fn create_ico_bytes() -> Vec<u8> {
    vec![0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x10, 0x10]
}
