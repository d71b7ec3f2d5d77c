//! Logo loading. JPEG bytes are embedded as-is (DCTDecode); PNG is decoded to
//! RGB with a separate alpha channel for the soft mask.

use std::io::Cursor;
use std::path::Path;

use crate::error::{InvoiceError, Result};

/// A logo ready for embedding, with its pixel size.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

/// Pixel data in the form the PDF writer embeds.
#[derive(Debug, Clone)]
pub enum ImagePixelData {
    /// Original JPEG bytes, written with DCTDecode.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// Decoded pixels from a PNG.
    Decoded {
        /// width * height * 3 bytes
        rgb: Vec<u8>,
        /// width * height bytes, `None` when every pixel is opaque.
        alpha: Option<Vec<u8>>,
    },
}

/// Value of the image's /ColorSpace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl JpegColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            JpegColorSpace::DeviceRGB => "/DeviceRGB",
            JpegColorSpace::DeviceGray => "/DeviceGray",
        }
    }
}

impl LoadedImage {
    /// Height for a given width, keeping the aspect ratio.
    pub fn height_for_width(&self, width: f64) -> f64 {
        if self.width_px == 0 {
            return 0.0;
        }
        width * f64::from(self.height_px) / f64::from(self.width_px)
    }
}

/// Read and decode a logo file, attaching the path to any decode error.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let data = std::fs::read(path)?;
    decode_image_bytes(&data).map_err(|reason| InvoiceError::Image {
        path: path.to_path_buf(),
        reason,
    })
}

/// Pick the decoder from the magic bytes. Only JPEG and PNG are accepted.
pub fn decode_image_bytes(data: &[u8]) -> std::result::Result<LoadedImage, String> {
    if data.len() < 4 {
        return Err("Image data too short".to_string());
    }
    if is_jpeg(data) {
        decode_jpeg(data)
    } else if is_png(data) {
        decode_png(data)
    } else {
        Err("Unsupported image format (expected JPEG or PNG)".to_string())
    }
}

/// SOI marker.
fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

/// First four bytes of the PNG signature.
fn is_png(data: &[u8]) -> bool {
    data.starts_with(&[0x89, 0x50, 0x4E, 0x47])
}

/// JPEG: read the dimensions and color space only. The bytes go into the
/// PDF untouched.
fn decode_jpeg(data: &[u8]) -> std::result::Result<LoadedImage, String> {
    let (width, height) = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("JPEG format detection error: {}", e))?
        .into_dimensions()
        .map_err(|e| format!("Failed to read JPEG dimensions: {}", e))?;

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: data.to_vec(),
            color_space: jpeg_color_space(data),
        },
        width_px: width,
        height_px: height,
    })
}

/// Read the component count from the first SOF segment. One component is
/// grayscale, anything else is treated as RGB.
fn jpeg_color_space(data: &[u8]) -> JpegColorSpace {
    let mut i = 2;
    while i + 3 < data.len() {
        if data[i] != 0xFF {
            break;
        }
        let marker = data[i + 1];
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof && i + 9 < data.len() {
            return if data[i + 9] == 1 {
                JpegColorSpace::DeviceGray
            } else {
                JpegColorSpace::DeviceRGB
            };
        }
        let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + seg_len;
    }
    JpegColorSpace::DeviceRGB
}

/// PNG: decode to RGBA and split off the alpha channel for the soft mask.
fn decode_png(data: &[u8]) -> std::result::Result<LoadedImage, String> {
    let img = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("PNG format detection error: {}", e))?
        .decode()
        .map_err(|e| format!("Failed to decode PNG: {}", e))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixel_count = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);

    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }
    let opaque = alpha.iter().all(|a| *a == 255);

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: if opaque { None } else { Some(alpha) },
        },
        width_px: width,
        height_px: height,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |_, _| image::Rgb([200, 40, 90]));
        let mut buf = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), width, height, image::ColorType::Rgb8)
            .unwrap();
        buf
    }

    #[test]
    fn jpeg_passes_through() {
        let loaded = decode_image_bytes(&jpeg_bytes(4, 2)).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (4, 2));
        assert_eq!(loaded.height_for_width(30.0), 15.0);
        match &loaded.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                assert!(data.starts_with(&[0xFF, 0xD8]));
                assert_eq!(*color_space, JpegColorSpace::DeviceRGB);
            }
            _ => panic!("JPEG should stay as Jpeg variant"),
        }
    }

    #[test]
    fn png_with_alpha_gets_mask() {
        let mut img = image::RgbaImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 128]));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 1, 1, image::ColorType::Rgba8)
            .unwrap();

        let loaded = decode_image_bytes(&buf).unwrap();
        match &loaded.pixel_data {
            ImagePixelData::Decoded { rgb, alpha } => {
                assert_eq!(rgb, &[255, 0, 0]);
                assert_eq!(alpha.as_deref(), Some(&[128u8][..]));
            }
            _ => panic!("PNG should decode to Decoded variant"),
        }
    }

    #[test]
    fn grayscale_jpeg_is_detected() {
        let img = image::GrayImage::from_fn(3, 3, |_, _| image::Luma([120]));
        let mut buf = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 3, 3, image::ColorType::L8)
            .unwrap();

        match decode_image_bytes(&buf).unwrap().pixel_data {
            ImagePixelData::Jpeg { color_space, .. } => {
                assert_eq!(color_space, JpegColorSpace::DeviceGray);
                assert_eq!(color_space.pdf_name(), "/DeviceGray");
            }
            _ => panic!("JPEG should stay as Jpeg variant"),
        }
    }

    #[test]
    fn opaque_png_has_no_mask() {
        let img = image::RgbaImage::from_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 2, 1, image::ColorType::Rgba8)
            .unwrap();

        match decode_image_bytes(&buf).unwrap().pixel_data {
            ImagePixelData::Decoded { rgb, alpha } => {
                assert_eq!(rgb, vec![10, 20, 30, 10, 20, 30]);
                assert!(alpha.is_none());
            }
            _ => panic!("PNG should decode to Decoded variant"),
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode_image_bytes(&[0x00, 0x01]).is_err());
        assert!(decode_image_bytes(b"GIF89a....").is_err());
    }
}
