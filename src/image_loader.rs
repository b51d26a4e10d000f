//! # Image Loading and Decoding
//!
//! Loads images from data URIs, `file://` URIs, file paths or raw base64
//! strings and prepares them for PDF embedding. JPEG images pass through
//! without re-encoding (PDF supports DCTDecode natively). Everything else is
//! decoded to RGB pixels with a separate alpha channel for SMask transparency.
//!
//! Remote (`http://`, `https://`) sources are not fetched; they fail as
//! unreachable and the layout engine substitutes a placeholder.

use std::io::Cursor;

use crate::error::NodeError;

/// A fully decoded/loaded image ready for PDF embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

impl LoadedImage {
    /// Height / width, or 0.75 for degenerate images.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width_px == 0 {
            0.75
        } else {
            self.height_px as f64 / self.width_px as f64
        }
    }
}

/// The pixel data in a format the PDF serializer can consume directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ImagePixelData {
    /// Raw JPEG bytes, embedded directly with DCTDecode.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// Decoded RGB pixels + optional alpha channel.
    Decoded {
        /// width * height * 3 bytes (RGB)
        rgb: Vec<u8>,
        /// width * height bytes (grayscale alpha). None if fully opaque.
        alpha: Option<Vec<u8>>,
    },
}

/// JPEG color space for the PDF /ColorSpace entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
}

/// Load an image from a source string.
///
/// Supported `src` formats:
/// - `data:image/...;base64,...` data URI
/// - `file:///path/to/image.png`
/// - File path (absolute, `./` or `../` relative, or ending in an image
///   extension)
/// - Raw base64-encoded image data
pub fn load_image(src: &str) -> Result<LoadedImage, NodeError> {
    let raw_bytes = read_source_bytes(src)?;
    decode_image_bytes(&raw_bytes)
}

/// Resolve the source string to raw image bytes.
fn read_source_bytes(src: &str) -> Result<Vec<u8>, NodeError> {
    let src = src.trim();
    if src.is_empty() {
        return Err(NodeError::ImageUnreachable("empty image source".to_string()));
    }

    if let Some(rest) = src.strip_prefix("data:") {
        let comma_pos = rest.find(',').ok_or_else(|| {
            NodeError::ImageUnreachable("invalid data URI: missing comma".to_string())
        })?;
        let (header, payload) = (&rest[..comma_pos], &rest[comma_pos + 1..]);
        if !header.ends_with(";base64") {
            return Err(NodeError::Unsupported(format!(
                "data URI must be base64-encoded, got '{}'",
                header
            )));
        }
        return base64_decode(payload);
    }

    if src.starts_with("http://") || src.starts_with("https://") {
        return Err(NodeError::ImageUnreachable(format!(
            "remote image sources are not fetched: '{}'",
            src
        )));
    }

    if let Some(path) = src.strip_prefix("file://") {
        return read_file(path);
    }

    if looks_like_path(src) {
        return read_file(src);
    }

    base64_decode(src)
}

/// Only explicit path prefixes or image extensions count as paths, to avoid
/// treating base64 strings (which contain '/') as file paths.
fn looks_like_path(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    src.starts_with('/')
        || src.starts_with("./")
        || src.starts_with("../")
        || [".png", ".jpg", ".jpeg", ".webp"]
            .iter()
            .any(|ext| lower.ends_with(ext))
}

fn read_file(path: &str) -> Result<Vec<u8>, NodeError> {
    std::fs::read(path)
        .map_err(|e| NodeError::ImageUnreachable(format!("failed to read '{}': {}", path, e)))
}

fn base64_decode(input: &str) -> Result<Vec<u8>, NodeError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| NodeError::ImageUnreachable(format!("not a path, URI or base64 data: {}", e)))
}

/// Detect image format from magic bytes and decode accordingly.
fn decode_image_bytes(data: &[u8]) -> Result<LoadedImage, NodeError> {
    if data.len() < 4 {
        return Err(NodeError::ImageDecode("image data too short".to_string()));
    }

    if is_jpeg(data) {
        decode_jpeg(data)
    } else {
        decode_to_rgb(data)
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

/// JPEG: read dimensions and color space without decoding pixels.
fn decode_jpeg(data: &[u8]) -> Result<LoadedImage, NodeError> {
    let reader = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| NodeError::ImageDecode(format!("JPEG format detection error: {}", e)))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| NodeError::ImageDecode(format!("failed to read JPEG dimensions: {}", e)))?;

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: data.to_vec(),
            color_space: detect_jpeg_color_space(data),
        },
        width_px: width,
        height_px: height,
    })
}

/// Scan JPEG markers for the SOF segment and read the component count.
fn detect_jpeg_color_space(data: &[u8]) -> JpegColorSpace {
    let mut i = 2; // skip SOI marker (FF D8)
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            break;
        }
        let marker = data[i + 1];
        // SOF markers: C0-C3, C5-C7, C9-CB, CD-CF
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof && i + 9 < data.len() {
            // length(2) + precision(1) + height(2) + width(2) + num_components(1)
            return if data[i + 9] == 1 {
                JpegColorSpace::DeviceGray
            } else {
                JpegColorSpace::DeviceRGB
            };
        }
        if i + 3 < data.len() {
            let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            i += 2 + seg_len;
        } else {
            break;
        }
    }
    JpegColorSpace::DeviceRGB
}

/// PNG, WebP: decode to RGBA, split into RGB + alpha.
fn decode_to_rgb(data: &[u8]) -> Result<LoadedImage, NodeError> {
    let img = image::load_from_memory(data)
        .map_err(|e| NodeError::ImageDecode(format!("unsupported or corrupt image: {}", e)))?;

    let rgba = img.to_rgba8();
    let width = rgba.width();
    let height = rgba.height();

    let pixel_count = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    let mut has_transparency = false;

    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel[3]);
        if pixel[3] != 255 {
            has_transparency = true;
        }
    }

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: if has_transparency { Some(alpha) } else { None },
        },
        width_px: width,
        height_px: height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), w, h, image::ColorType::Rgba8)
            .unwrap();
        buf
    }

    #[test]
    fn test_is_jpeg() {
        assert!(is_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(!is_jpeg(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(!is_jpeg(&[0xFF]));
    }

    #[test]
    fn test_invalid_data_uri() {
        assert!(load_image("data:image/png;base64").is_err());
    }

    #[test]
    fn test_remote_source_is_unreachable() {
        let err = load_image("https://example.com/logo.png").unwrap_err();
        assert!(matches!(err, NodeError::ImageUnreachable(_)));
    }

    #[test]
    fn test_missing_file_is_unreachable() {
        let err = load_image("./definitely/not/here.png").unwrap_err();
        assert!(matches!(err, NodeError::ImageUnreachable(_)));
    }

    #[test]
    fn test_too_short_data() {
        assert!(decode_image_bytes(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn test_unsupported_format() {
        let err = decode_image_bytes(&[0x00, 0x01, 0x02, 0x03, 0x04]).unwrap_err();
        assert!(matches!(err, NodeError::ImageDecode(_)));
    }

    #[test]
    fn test_decode_opaque_png() {
        let loaded = decode_image_bytes(&png_bytes(1, 1, [255, 0, 0, 255])).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (1, 1));
        match &loaded.pixel_data {
            ImagePixelData::Decoded { rgb, alpha } => {
                assert_eq!(rgb, &[255, 0, 0]);
                assert!(alpha.is_none(), "Fully opaque should have no alpha");
            }
            _ => panic!("PNG should decode to Decoded variant"),
        }
    }

    #[test]
    fn test_decode_png_with_alpha() {
        let loaded = decode_image_bytes(&png_bytes(1, 1, [255, 0, 0, 128])).unwrap();
        match &loaded.pixel_data {
            ImagePixelData::Decoded { alpha, .. } => {
                assert_eq!(alpha.as_deref(), Some(&[128u8][..]));
            }
            _ => panic!("PNG should decode to Decoded variant"),
        }
    }

    #[test]
    fn test_decode_minimal_jpeg() {
        let img = image::RgbImage::from_fn(2, 2, |_, _| image::Rgb([0, 128, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 2, 2, image::ColorType::Rgb8)
            .unwrap();

        let loaded = decode_image_bytes(&buf).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (2, 2));
        match &loaded.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                assert!(data.starts_with(&[0xFF, 0xD8]));
                assert_eq!(*color_space, JpegColorSpace::DeviceRGB);
            }
            _ => panic!("JPEG should stay as Jpeg variant"),
        }
    }

    #[test]
    fn test_base64_data_uri_and_aspect() {
        use base64::Engine;
        let b64 = base64::engine::general_purpose::STANDARD.encode(png_bytes(4, 2, [0, 255, 0, 255]));
        let loaded = load_image(&format!("data:image/png;base64,{}", b64)).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (4, 2));
        assert!((loaded.aspect_ratio() - 0.5).abs() < 1e-9);

        let raw = load_image(&b64).unwrap();
        assert_eq!(raw.width_px, 4);
    }
}
