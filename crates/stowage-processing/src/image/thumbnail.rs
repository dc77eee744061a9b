//! Thumbnail generation
//!
//! Decoding and resampling are CPU-bound; callers run [`ThumbnailGenerator::generate`]
//! on the blocking pool.

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("unsupported image format: {extension}")]
    Unsupported { extension: String },

    #[error("image has zero width or height")]
    EmptyImage,

    #[error("original has no usable file name: {0}")]
    InvalidPath(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Scale `(width, height)` down to fit within the bounds, preserving aspect ratio.
/// Images already inside the bounds are returned unchanged.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let ratio = (width as f64 / max_width as f64).max(height as f64 / max_height as f64);

    if ratio <= 1.0 {
        (width, height)
    } else {
        (
            ((width as f64 / ratio).round() as u32).max(1),
            ((height as f64 / ratio).round() as u32).max(1),
        )
    }
}

/// Shrinks stored images into the thumbnail directory
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailGenerator {
    max_width: u32,
    max_height: u32,
}

impl ThumbnailGenerator {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Codec for a file, chosen strictly from its lowercase extension.
    fn format_for(path: &Path) -> Result<ImageFormat, ThumbnailError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "gif" => Ok(ImageFormat::Gif),
            _ => Err(ThumbnailError::Unsupported { extension }),
        }
    }

    /// Write a thumbnail of `original` into `out_dir` under the same file name.
    pub fn generate(&self, original: &Path, out_dir: &Path) -> Result<PathBuf, ThumbnailError> {
        let format = Self::format_for(original)?;
        let filename = original
            .file_name()
            .ok_or_else(|| ThumbnailError::InvalidPath(original.display().to_string()))?;

        let start = std::time::Instant::now();
        let reader = BufReader::new(File::open(original)?);
        let img = ImageReader::with_format(reader, format).decode()?;

        if img.width() == 0 || img.height() == 0 {
            return Err(ThumbnailError::EmptyImage);
        }

        let (width, height) = fit_within(img.width(), img.height(), self.max_width, self.max_height);
        let thumbnail = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        let thumbnail = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(thumbnail.to_rgb8()),
            ImageFormat::Gif => DynamicImage::ImageRgba8(thumbnail.to_rgba8()),
            _ => thumbnail,
        };

        let target = out_dir.join(filename);
        let mut temp = tempfile::Builder::new()
            .prefix(".thumb-")
            .tempfile_in(out_dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            thumbnail.write_to(&mut writer, format)?;
            writer.flush()?;
        }
        temp.persist(&target).map_err(|e| ThumbnailError::Io(e.error))?;

        tracing::debug!(
            original = %original.display(),
            thumbnail = %target.display(),
            width,
            height,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Thumbnail generated"
        );

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_image(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
        let path = dir.join(name);
        match format {
            ImageFormat::Jpeg => {
                let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
                img.save_with_format(&path, format).unwrap();
            }
            _ => {
                let img = RgbaImage::from_pixel(width, height, Rgba([30, 200, 30, 255]));
                img.save_with_format(&path, format).unwrap();
            }
        }
        path
    }

    fn dimensions(path: &Path) -> (u32, u32) {
        image::image_dimensions(path).unwrap()
    }

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(400, 200, 200, 200), (200, 100));
        assert_eq!(fit_within(200, 800, 200, 200), (50, 200));
        assert_eq!(fit_within(100, 50, 200, 200), (100, 50));
        assert_eq!(fit_within(10_000, 1, 200, 200), (200, 1));
    }

    #[test]
    fn test_png_is_shrunk() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("thumbnail");
        std::fs::create_dir(&out).unwrap();
        let original = write_image(dir.path(), "abc.png", 400, 300, ImageFormat::Png);

        let generator = ThumbnailGenerator::new(200, 200);
        let thumb = generator.generate(&original, &out).unwrap();

        assert_eq!(thumb, out.join("abc.png"));
        assert_eq!(dimensions(&thumb), (200, 150));
    }

    #[test]
    fn test_jpeg_uppercase_extension() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("thumbnail");
        std::fs::create_dir(&out).unwrap();
        let original = write_image(dir.path(), "photo.JPEG", 300, 600, ImageFormat::Jpeg);

        let thumb = ThumbnailGenerator::new(200, 200)
            .generate(&original, &out)
            .unwrap();
        assert_eq!(dimensions(&thumb), (100, 200));
    }

    #[test]
    fn test_small_image_not_upscaled() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("thumbnail");
        std::fs::create_dir(&out).unwrap();
        let original = write_image(dir.path(), "tiny.gif", 20, 10, ImageFormat::Gif);

        let thumb = ThumbnailGenerator::new(200, 200)
            .generate(&original, &out)
            .unwrap();
        assert_eq!(dimensions(&thumb), (20, 10));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("favicon.ico");
        std::fs::write(&original, b"\x00\x00\x01\x00").unwrap();

        let result = ThumbnailGenerator::new(200, 200).generate(&original, dir.path());
        assert!(matches!(
            result,
            Err(ThumbnailError::Unsupported { extension }) if extension == "ico"
        ));
    }

    #[test]
    fn test_corrupt_image_is_an_error() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("thumbnail");
        std::fs::create_dir(&out).unwrap();
        let original = dir.path().join("broken.png");
        std::fs::write(&original, b"abcdefghij").unwrap();

        let result = ThumbnailGenerator::new(200, 200).generate(&original, &out);
        assert!(matches!(result, Err(ThumbnailError::Image(_))));
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }
}
