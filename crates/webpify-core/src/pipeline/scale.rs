//! Downscaling policies: max-dimension clamping and percentage thumbnails.
//!
//! Both keep the aspect ratio and never enlarge. Resampling uses a
//! Catmull-Rom filter on premultiplied alpha into a new RGBA buffer.

use fast_image_resize::{self as fir, MulDiv, PixelType, ResizeOptions};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};

/// Target size for clamping `(width, height)` into `max_width` x `max_height`.
///
/// A zero bound is unconstrained. Width is clamped first; the height bound is
/// then checked against the already-scaled height.
pub fn clamp_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let mut new_w = width;
    let mut new_h = height;

    if max_width > 0 && new_w > max_width {
        let factor = f64::from(max_width) / f64::from(new_w);
        new_w = max_width;
        new_h = scale_round(new_h, factor);
    }
    if max_height > 0 && new_h > max_height {
        let factor = f64::from(max_height) / f64::from(new_h);
        new_h = max_height;
        new_w = scale_round(new_w, factor);
    }

    (new_w, new_h)
}

/// Thumbnail size at `percent` of `(width, height)`, at least 1x1.
pub fn thumbnail_dimensions(width: u32, height: u32, percent: u32) -> (u32, u32) {
    let factor = f64::from(percent) / 100.0;
    (
        scale_round(width, factor).max(1),
        scale_round(height, factor).max(1),
    )
}

/// Shrink `image` to fit the bounds.
///
/// Returns the input untouched when it already fits (or when the computed size
/// collapses to zero), so in-bounds images are not resampled.
pub fn clamp_resize(image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    let (new_w, new_h) = clamp_dimensions(width, height, max_width, max_height);

    if new_w == 0 || new_h == 0 || (new_w, new_h) == (width, height) {
        return image;
    }

    tracing::trace!("Resize: {}x{} -> {}x{}", width, height, new_w, new_h);
    resample(&image, new_w, new_h)
}

/// Derive a thumbnail at `percent` of the image size.
///
/// Always resamples, so a 100 percent thumbnail is a same-size copy.
pub fn thumbnail(image: &DynamicImage, percent: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    let (thumb_w, thumb_h) = thumbnail_dimensions(width, height, percent);
    tracing::trace!(
        "Thumbnail: {}x{} at {}% -> {}x{}",
        width,
        height,
        percent,
        thumb_w,
        thumb_h
    );
    resample(image, thumb_w, thumb_h)
}

/// Catmull-Rom resample into a freshly allocated RGBA image.
///
/// Colors are premultiplied by alpha for the convolution and divided back
/// afterwards, so fully transparent pixels do not bleed into opaque edges.
pub fn resample(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let rgba = image.to_rgba8();
    match resample_premultiplied(&rgba, width, height) {
        Ok(resized) => DynamicImage::ImageRgba8(resized),
        Err(e) => {
            tracing::warn!("Premultiplied resize failed, using straight alpha: {e}");
            DynamicImage::ImageRgba8(imageops::resize(&rgba, width, height, FilterType::CatmullRom))
        }
    }
}

fn resample_premultiplied(rgba: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage, String> {
    let mut src = fir::images::Image::from_vec_u8(
        rgba.width(),
        rgba.height(),
        rgba.as_raw().clone(),
        PixelType::U8x4,
    )
    .map_err(|e| format!("failed to wrap source pixels: {e:?}"))?;
    let mut dst = fir::images::Image::new(width, height, PixelType::U8x4);

    let mul_div = MulDiv::default();
    mul_div
        .multiply_alpha_inplace(&mut src)
        .map_err(|e| format!("failed to premultiply alpha: {e}"))?;

    let options =
        ResizeOptions::new().resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::CatmullRom));
    fir::Resizer::new()
        .resize(&src, &mut dst, &options)
        .map_err(|e| format!("resize error: {e:?}"))?;

    mul_div
        .divide_alpha_inplace(&mut dst)
        .map_err(|e| format!("failed to unpremultiply alpha: {e}"))?;

    RgbaImage::from_raw(width, height, dst.into_vec())
        .ok_or_else(|| "resized buffer has the wrong length".to_string())
}

fn scale_round(value: u32, factor: f64) -> u32 {
    (f64::from(value) * factor).round() as u32
}
