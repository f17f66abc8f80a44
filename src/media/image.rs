//! Image compression, resizing and cropping.
//!
//! Best-effort by contract: `normalize_image` never errors. Oversized inputs
//! are re-encoded down toward the policy budget; anything that fails to
//! decode or encode comes back as a countable `Failed` outcome and the
//! caller stores the original bytes unchanged.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use tracing::warn;

use super::document::file_size_kb;
use super::policy::{ImagePolicy, MAX_QUALITY_ITERATIONS, QUALITY_FLOOR};

/// JPEG quality used when re-encoding after a crop.
const CROP_QUALITY: u8 = 95;

#[derive(Clone, Debug)]
pub enum CompressionOutcome {
    /// Input was already within budget; bytes pass through untouched.
    Skipped,
    /// Re-encoded. May still be over budget if the quality floor was hit.
    Compressed { data: Vec<u8>, quality: u8 },
    /// Decode or encode failed; the caller keeps the original bytes.
    Failed { reason: String },
}

impl CompressionOutcome {
    /// The bytes to store: the compressed output when there is one, the
    /// original otherwise.
    pub fn bytes<'a>(&'a self, original: &'a [u8]) -> &'a [u8] {
        match self {
            CompressionOutcome::Compressed { data, .. } => data,
            CompressionOutcome::Skipped | CompressionOutcome::Failed { .. } => original,
        }
    }

    pub fn was_compressed(&self) -> bool {
        matches!(self, CompressionOutcome::Compressed { .. })
    }
}

#[derive(Clone, Debug)]
pub enum CropOutcome {
    Applied(Vec<u8>),
    /// Crop instruction dropped (malformed coordinates or a processing
    /// failure); the stored image stays as-is and any pending-crop state
    /// should be cleared.
    Discarded { reason: String },
}

/// Compress `data` to fit `policy`. No-op below the size threshold; never
/// enlarges, never raises. PNG inputs are re-encoded once at maximum
/// compression, everything else becomes JPEG with the quality stepped down
/// from `quality_initial` to the floor until the budget is met.
pub fn normalize_image(data: &[u8], policy: &ImagePolicy) -> CompressionOutcome {
    if file_size_kb(data) <= policy.max_size_kb as f64 {
        return CompressionOutcome::Skipped;
    }
    match try_normalize(data, policy) {
        Ok((data, quality)) => CompressionOutcome::Compressed { data, quality },
        Err(err) => {
            warn!(error = %err, "image compression failed, keeping original");
            CompressionOutcome::Failed {
                reason: err.to_string(),
            }
        }
    }
}

fn try_normalize(data: &[u8], policy: &ImagePolicy) -> image::ImageResult<(Vec<u8>, u8)> {
    let format = image::guess_format(data)?;
    let img = image::load_from_memory(data)?;
    let img = resize_to_policy(&img, policy);

    if format == ImageFormat::Png {
        let encoded = encode_png(&img)?;
        return Ok((encoded, policy.quality_initial));
    }

    let rgb = DynamicImage::ImageRgb8(flatten_to_rgb(&img));
    let mut quality = policy.quality_initial;
    let mut encoded = encode_jpeg(&rgb, quality)?;
    for _ in 1..MAX_QUALITY_ITERATIONS {
        if file_size_kb(&encoded) <= policy.max_size_kb as f64 || quality <= QUALITY_FLOOR {
            break;
        }
        quality = quality.saturating_sub(5).max(QUALITY_FLOOR);
        encoded = encode_jpeg(&rgb, quality)?;
    }
    Ok((encoded, quality))
}

/// Center-crop to the target aspect ratio and resize to the exact target.
/// Used on first upload of a fixed-ratio slot, before any manual crop
/// coordinates exist.
pub fn auto_crop(data: &[u8], target: (u32, u32)) -> CropOutcome {
    match try_auto_crop(data, target) {
        Ok(out) => CropOutcome::Applied(out),
        Err(err) => {
            warn!(error = %err, "auto-crop failed, keeping original image");
            CropOutcome::Discarded {
                reason: err.to_string(),
            }
        }
    }
}

fn try_auto_crop(data: &[u8], target: (u32, u32)) -> image::ImageResult<Vec<u8>> {
    let format = image::guess_format(data)?;
    let img = image::load_from_memory(data)?;
    let (width, height) = img.dimensions();
    let (target_w, target_h) = target;

    let ratio = target_w as f64 / target_h as f64;
    let mut crop_w = width as f64;
    let mut crop_h = crop_w / ratio;
    if crop_h > height as f64 {
        crop_h = height as f64;
        crop_w = crop_h * ratio;
    }
    let left = ((width as f64 - crop_w) / 2.0) as u32;
    let top = ((height as f64 - crop_h) / 2.0) as u32;

    let cropped = img.crop_imm(left, top, crop_w as u32, crop_h as u32);
    let out = if cropped.dimensions() == target {
        cropped
    } else {
        cropped.resize_exact(target_w, target_h, FilterType::Lanczos3)
    };
    encode_with_format(&out, format, CROP_QUALITY)
}

/// Apply explicit crop coordinates `"x1,y1,x2,y2"`, then resize to the exact
/// target. Malformed coordinates are discarded soft: the image stays
/// unmodified and the pending-crop state is to be cleared by the caller.
pub fn apply_crop(data: &[u8], raw_coords: &str, target: (u32, u32)) -> CropOutcome {
    let format = match image::guess_format(data) {
        Ok(format) => format,
        Err(err) => {
            warn!(error = %err, "crop source is not a decodable image");
            return CropOutcome::Discarded {
                reason: err.to_string(),
            };
        }
    };
    let img = match image::load_from_memory(data) {
        Ok(img) => img,
        Err(err) => {
            warn!(error = %err, "crop source failed to decode");
            return CropOutcome::Discarded {
                reason: err.to_string(),
            };
        }
    };

    let (x1, y1, x2, y2) = match parse_crop_coords(raw_coords, img.dimensions()) {
        Ok(coords) => coords,
        Err(reason) => {
            warn!(coords = raw_coords, reason, "discarding malformed crop instruction");
            return CropOutcome::Discarded { reason };
        }
    };

    let cropped = img.crop_imm(x1, y1, x2 - x1, y2 - y1);
    let (target_w, target_h) = target;
    let out = if cropped.dimensions() == target {
        cropped
    } else {
        cropped.resize_exact(target_w, target_h, FilterType::Lanczos3)
    };
    match encode_with_format(&out, format, CROP_QUALITY) {
        Ok(bytes) => CropOutcome::Applied(bytes),
        Err(err) => {
            warn!(error = %err, "crop re-encode failed, keeping original image");
            CropOutcome::Discarded {
                reason: err.to_string(),
            }
        }
    }
}

fn parse_crop_coords(raw: &str, dimensions: (u32, u32)) -> Result<(u32, u32, u32, u32), String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("expected 4 coordinates, got {}", parts.len()));
    }
    let mut coords = [0u32; 4];
    for (idx, part) in parts.iter().enumerate() {
        coords[idx] = part
            .parse::<u32>()
            .map_err(|_| format!("non-integer coordinate: {part}"))?;
    }
    let [x1, y1, x2, y2] = coords;
    if x2 <= x1 || y2 <= y1 {
        return Err("empty crop rectangle".to_string());
    }
    let (width, height) = dimensions;
    if x2 > width || y2 > height {
        return Err(format!(
            "crop rectangle ({x1},{y1},{x2},{y2}) outside image bounds {width}x{height}"
        ));
    }
    Ok((x1, y1, x2, y2))
}

/// Exact resize when target dimensions are fixed, otherwise downscale to fit
/// the bounds preserving aspect ratio. Never upscales past the original.
fn resize_to_policy(img: &DynamicImage, policy: &ImagePolicy) -> DynamicImage {
    if let Some((width, height)) = policy.target_dimensions {
        return img.resize_exact(width, height, FilterType::Lanczos3);
    }
    let (width, height) = img.dimensions();
    if let Some(max_width) = policy.max_width {
        if width > max_width {
            let new_height = ((height as f64 * max_width as f64 / width as f64) as u32).max(1);
            return img.resize_exact(max_width, new_height, FilterType::Lanczos3);
        }
    }
    if let Some(max_height) = policy.max_height {
        if height > max_height {
            let new_width = ((width as f64 * max_height as f64 / height as f64) as u32).max(1);
            return img.resize_exact(new_width, max_height, FilterType::Lanczos3);
        }
    }
    img.clone()
}

/// Flatten alpha and palette modes onto a white background. JPEG has no
/// alpha channel; encoding transparency without this produces black fringes.
fn flatten_to_rgb(img: &DynamicImage) -> RgbImage {
    if let DynamicImage::ImageRgb8(rgb) = img {
        return rgb.clone();
    }
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgb = RgbImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        rgb.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    rgb
}

fn encode_with_format(
    img: &DynamicImage,
    format: ImageFormat,
    quality: u8,
) -> image::ImageResult<Vec<u8>> {
    if format == ImageFormat::Png {
        encode_png(img)
    } else {
        let rgb = DynamicImage::ImageRgb8(flatten_to_rgb(img));
        encode_jpeg(&rgb, quality)
    }
}

fn encode_png(img: &DynamicImage) -> image::ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilterType::Adaptive);
    img.write_with_encoder(encoder)?;
    Ok(buf)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> image::ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    img.write_with_encoder(encoder)?;
    Ok(buf)
}
