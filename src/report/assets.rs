use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageReader, Rgb, RgbImage};

use crate::errors::ReportError;
use crate::models::{Attachment, AttachmentRole};

const JPEG_QUALITY: u8 = 85;

/// A decoded image, downscaled if needed and re-encoded as baseline JPEG
/// so every asset embeds the same way.
#[derive(Clone, PartialEq)]
pub struct PreparedImage {
    pub role: AttachmentRole,
    pub filename: String,
    pub width_px: u32,
    pub height_px: u32,
    pub jpeg: Vec<u8>,
}

impl std::fmt::Debug for PreparedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedImage")
            .field("role", &self.role)
            .field("filename", &self.filename)
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("jpeg_len", &self.jpeg.len())
            .finish()
    }
}

/// Decode every attachment. The first undecodable one aborts the report.
pub fn prepare_all(
    attachments: &[Attachment],
    max_width_px: u32,
) -> Result<Vec<PreparedImage>, ReportError> {
    attachments
        .iter()
        .map(|a| prepare(a, max_width_px))
        .collect()
}

pub fn prepare(attachment: &Attachment, max_width_px: u32) -> Result<PreparedImage, ReportError> {
    let decode_err = |reason: String| ReportError::AssetDecode {
        role: attachment.role,
        filename: attachment.filename.clone(),
        reason,
    };

    let img = ImageReader::new(Cursor::new(&attachment.bytes))
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?
        .decode()
        .map_err(|e| decode_err(e.to_string()))?;

    let img = downscale(img, max_width_px);
    let (width_px, height_px) = img.dimensions();
    let rgb = flatten_on_white(&img);

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| decode_err(e.to_string()))?;

    log::debug!(
        "Prepared {} '{}': {}x{} px, {} bytes",
        attachment.role,
        attachment.filename,
        width_px,
        height_px,
        jpeg.len()
    );

    Ok(PreparedImage {
        role: attachment.role,
        filename: attachment.filename.clone(),
        width_px,
        height_px,
        jpeg,
    })
}

/// Shrink to `max_width_px` wide, keeping the aspect ratio. Never upscales.
fn downscale(img: DynamicImage, max_width_px: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    if max_width_px == 0 || w <= max_width_px {
        return img;
    }
    let new_h = ((h as f64) * (max_width_px as f64) / (w as f64)).round().max(1.0) as u32;
    let ratio = w as f32 / max_width_px as f32;
    let filter = if ratio > 2.0 {
        image::imageops::FilterType::Triangle
    } else {
        image::imageops::FilterType::Lanczos3
    };
    img.resize_exact(max_width_px, new_h, filter)
}

/// JPEG has no alpha; blend transparent pixels onto white instead of
/// letting them turn black.
fn flatten_on_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, px) in rgba.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_bytes(w: u32, h: u32, px: Rgba<u8>) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, px);
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    fn attachment(bytes: Vec<u8>) -> Attachment {
        Attachment {
            role: AttachmentRole::Photo,
            filename: "p.png".to_string(),
            bytes,
        }
    }

    #[test]
    fn wide_images_are_downscaled_keeping_ratio() {
        let prepared = prepare(&attachment(png_bytes(400, 200, Rgba([0, 0, 255, 255]))), 100).unwrap();
        assert_eq!((prepared.width_px, prepared.height_px), (100, 50));
        assert_eq!(&prepared.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn small_images_keep_their_size() {
        let prepared = prepare(&attachment(png_bytes(40, 30, Rgba([0, 0, 0, 255]))), 1200).unwrap();
        assert_eq!((prepared.width_px, prepared.height_px), (40, 30));
    }

    #[test]
    fn transparency_becomes_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])));
        let flat = flatten_on_white(&img);
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn garbage_bytes_fail_with_role_and_filename() {
        let err = prepare(&attachment(b"not an image".to_vec()), 1200).unwrap_err();
        match err {
            ReportError::AssetDecode { role, filename, .. } => {
                assert_eq!(role, AttachmentRole::Photo);
                assert_eq!(filename, "p.png");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
