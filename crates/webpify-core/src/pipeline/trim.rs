//! Transparent border trimming.
//!
//! Works like an editor's "trim transparent pixels": find the smallest
//! rectangle holding every pixel whose alpha is above a threshold and crop to
//! it. Alpha is compared at 8-bit precision regardless of the source depth.

use image::{DynamicImage, GenericImageView};

/// Pixel rectangle with exclusive `max_x`/`max_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Rectangle {
    /// True when the rectangle encloses no pixels ("no content found").
    pub fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    pub fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    pub fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }
}

/// Find the bounding box of every pixel with `alpha8 > threshold`.
///
/// The scan always visits every pixel in row-major order. When nothing is
/// above the threshold the result is empty (`min_x >= max_x`).
pub fn find_content_bounds(image: &DynamicImage, threshold: u8) -> Rectangle {
    let (width, height) = image.dimensions();

    match image {
        DynamicImage::ImageRgba8(buf) => scan(width, height, threshold, |x, y| {
            buf.get_pixel(x, y).0[3]
        }),
        DynamicImage::ImageLumaA8(buf) => scan(width, height, threshold, |x, y| {
            buf.get_pixel(x, y).0[1]
        }),
        DynamicImage::ImageRgba16(buf) => scan(width, height, threshold, |x, y| {
            high_byte(buf.get_pixel(x, y).0[3])
        }),
        DynamicImage::ImageLumaA16(buf) => scan(width, height, threshold, |x, y| {
            high_byte(buf.get_pixel(x, y).0[1])
        }),
        DynamicImage::ImageRgba32F(buf) => scan(width, height, threshold, |x, y| {
            float_alpha8(buf.get_pixel(x, y).0[3])
        }),
        other if !other.color().has_alpha() => {
            scan(width, height, threshold, |_, _| u8::MAX)
        }
        other => {
            let rgba = other.to_rgba16();
            scan(width, height, threshold, |x, y| {
                high_byte(rgba.get_pixel(x, y).0[3])
            })
        }
    }
}

/// Crop `image` to its content bounds.
///
/// Returns the input untouched when no pixel is above the threshold, so a
/// fully transparent image passes through unchanged. Otherwise the result is
/// a freshly allocated image of the same pixel format.
pub fn trim(image: DynamicImage, threshold: u8) -> DynamicImage {
    let bounds = find_content_bounds(&image, threshold);
    if bounds.is_empty() {
        tracing::trace!("Trim: no content above alpha {}, keeping image", threshold);
        return image;
    }

    tracing::trace!(
        "Trim: {}x{} -> {}x{} at ({}, {})",
        image.width(),
        image.height(),
        bounds.width(),
        bounds.height(),
        bounds.min_x,
        bounds.min_y
    );
    image.crop_imm(bounds.min_x, bounds.min_y, bounds.width(), bounds.height())
}

fn scan<F>(width: u32, height: u32, threshold: u8, alpha: F) -> Rectangle
where
    F: Fn(u32, u32) -> u8,
{
    if width == 0 || height == 0 {
        return Rectangle {
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
        };
    }

    let mut rect = Rectangle {
        min_x: width,
        min_y: height,
        max_x: 0,
        max_y: 0,
    };

    for y in 0..height {
        for x in 0..width {
            if alpha(x, y) <= threshold {
                continue;
            }
            rect.min_x = rect.min_x.min(x);
            rect.min_y = rect.min_y.min(y);
            rect.max_x = rect.max_x.max(x);
            rect.max_y = rect.max_y.max(y);
        }
    }

    // Exclusive upper bounds.
    rect.max_x += 1;
    rect.max_y += 1;
    rect
}

/// Truncate a 16-bit sample to 8 bits by dropping the low byte.
fn high_byte(sample: u16) -> u8 {
    (sample >> 8) as u8
}

fn float_alpha8(sample: f32) -> u8 {
    high_byte((sample.clamp(0.0, 1.0) * f32::from(u16::MAX)).round() as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, LumaA, Rgba, RgbaImage};

    fn transparent(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
    }

    #[test]
    fn test_single_opaque_pixel_bounds() {
        let mut img = transparent(20, 10);
        img.put_pixel(7, 3, Rgba([255, 0, 0, 255]));

        let bounds = find_content_bounds(&DynamicImage::ImageRgba8(img), 0);
        assert_eq!(
            bounds,
            Rectangle {
                min_x: 7,
                min_y: 3,
                max_x: 8,
                max_y: 4
            }
        );
    }

    #[test]
    fn test_fully_transparent_is_empty() {
        let img = DynamicImage::ImageRgba8(transparent(16, 9));
        let bounds = find_content_bounds(&img, 0);
        assert!(bounds.is_empty());
        assert!(bounds.min_x >= bounds.max_x);
    }

    #[test]
    fn test_trim_identity_on_transparent_image() {
        let mut img = transparent(8, 8);
        // Faint pixel that is still at the threshold
        img.put_pixel(2, 2, Rgba([10, 20, 30, 40]));
        let original = DynamicImage::ImageRgba8(img);

        let trimmed = trim(original.clone(), 40);
        assert_eq!(trimmed, original);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut img = transparent(5, 5);
        img.put_pixel(1, 1, Rgba([0, 0, 0, 10]));
        img.put_pixel(3, 4, Rgba([0, 0, 0, 11]));
        let img = DynamicImage::ImageRgba8(img);

        let bounds = find_content_bounds(&img, 10);
        assert_eq!((bounds.min_x, bounds.min_y), (3, 4));
        assert_eq!((bounds.max_x, bounds.max_y), (4, 5));
    }

    #[test]
    fn test_trim_copies_translated_pixels() {
        let mut img = transparent(30, 20);
        for y in 5..15 {
            for x in 10..25 {
                img.put_pixel(x, y, Rgba([x as u8, y as u8, 7, 200]));
            }
        }
        // Semi-transparent pixel inside the box must keep its alpha
        img.put_pixel(12, 6, Rgba([1, 2, 3, 17]));

        let trimmed = trim(DynamicImage::ImageRgba8(img), 0);
        assert_eq!(trimmed.dimensions(), (15, 10));

        let out = trimmed.to_rgba8();
        assert_eq!(out.get_pixel(0, 0), &Rgba([10, 5, 7, 200]));
        assert_eq!(out.get_pixel(14, 9), &Rgba([24, 14, 7, 200]));
        assert_eq!(out.get_pixel(2, 1), &Rgba([1, 2, 3, 17]));
    }

    #[test]
    fn test_opaque_image_without_alpha_is_kept_whole() {
        let img = DynamicImage::new_rgb8(12, 7);
        let bounds = find_content_bounds(&img, 0);
        assert_eq!(
            bounds,
            Rectangle {
                min_x: 0,
                min_y: 0,
                max_x: 12,
                max_y: 7
            }
        );
        assert_eq!(trim(img, 0).dimensions(), (12, 7));
    }

    #[test]
    fn test_sixteen_bit_alpha_drops_low_byte() {
        let mut buf: ImageBuffer<LumaA<u16>, Vec<u16>> =
            ImageBuffer::from_pixel(4, 4, LumaA([0, 0]));
        // 0x05FF -> alpha8 = 5, transparent at threshold 5
        buf.put_pixel(0, 0, LumaA([0, 0x05FF]));
        // 0x0600 -> alpha8 = 6, content at threshold 5
        buf.put_pixel(2, 3, LumaA([0, 0x0600]));

        let bounds = find_content_bounds(&DynamicImage::ImageLumaA16(buf), 5);
        assert_eq!(
            bounds,
            Rectangle {
                min_x: 2,
                min_y: 3,
                max_x: 3,
                max_y: 4
            }
        );
    }

    #[test]
    fn test_max_threshold_treats_everything_as_transparent() {
        let img = DynamicImage::new_rgb8(3, 3);
        assert!(find_content_bounds(&img, u8::MAX).is_empty());
    }
}
