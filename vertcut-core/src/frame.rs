//! Software frame operations.
//!
//! Replays a clip's transform plan on a single decoded frame using the
//! `image` crate. This is how poster thumbnails are produced: the renderer
//! proper lowers the same plan to an ffmpeg filter graph, while this module
//! applies it to one extracted frame in process. Keeping both paths on the
//! same `TransformStage` values means the thumbnail always previews what
//! the encoder produced.

use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::compose::{ComposedClip, TransformStage, stage_output_size};

/// Gaussian blur of a frame. Operates on float-converted samples and
/// preserves dimensions exactly.
#[must_use]
pub fn gaussian_blur(image: &RgbImage, sigma: f32) -> RgbImage {
    imageops::blur(image, sigma)
}

/// Applies a transform stage sequence to a frame, producing a new frame.
#[must_use]
pub fn apply_stages(image: &RgbImage, stages: &[TransformStage]) -> RgbImage {
    let mut current = image.clone();
    for stage in stages {
        current = match *stage {
            TransformStage::Crop(rect) => {
                imageops::crop_imm(&current, rect.x, rect.y, rect.width, rect.height).to_image()
            }
            TransformStage::Scale { width, height } => {
                imageops::resize(&current, width, height, FilterType::Triangle)
            }
            TransformStage::ScaleToWidth(width) => {
                let (_, height) = stage_output_size(
                    (current.width(), current.height()),
                    &TransformStage::ScaleToWidth(width),
                );
                imageops::resize(&current, width, height, FilterType::Triangle)
            }
            TransformStage::Blur { sigma } => gaussian_blur(&current, sigma),
        };
    }
    current
}

/// Draws `foreground` centred onto `canvas`.
#[must_use]
pub fn composite_centered(mut canvas: RgbImage, foreground: &RgbImage) -> RgbImage {
    let x = canvas.width().saturating_sub(foreground.width()) / 2;
    let y = canvas.height().saturating_sub(foreground.height()) / 2;
    imageops::overlay(&mut canvas, foreground, i64::from(x), i64::from(y));
    canvas
}

/// Renders the poster frame for a composed clip from one decoded source
/// frame: background layer (if any) with the foreground composited
/// centred on top.
#[must_use]
pub fn render_poster(clip: &ComposedClip, source_frame: &RgbImage) -> RgbImage {
    let foreground = apply_stages(source_frame, &clip.foreground);
    match &clip.background {
        Some(stages) => {
            let background = apply_stages(source_frame, stages);
            composite_centered(background, &foreground)
        }
        None => foreground,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CropRect;
    use image::Rgb;

    /// A frame with a single bright pixel in the middle of a dark field.
    fn spike_image(width: u32, height: u32) -> RgbImage {
        let mut image = RgbImage::new(width, height);
        image.put_pixel(width / 2, height / 2, Rgb([255, 255, 255]));
        image
    }

    #[test]
    fn test_blur_changes_interior_pixel_and_keeps_dimensions() {
        let image = spike_image(32, 32);
        let blurred = gaussian_blur(&image, 8.0);

        assert_eq!(blurred.dimensions(), image.dimensions());
        // Smoothing is not a no-op: the spike spreads into its neighbours
        assert_ne!(blurred.get_pixel(16, 16), image.get_pixel(16, 16));
    }

    #[test]
    fn test_apply_stages_tracks_dimensions() {
        let image = RgbImage::new(192, 108);
        let stages = [
            TransformStage::Crop(CropRect {
                width: 108,
                height: 108,
                x: 42,
                y: 0,
            }),
            TransformStage::Scale {
                width: 72,
                height: 72,
            },
            TransformStage::Blur { sigma: 8.0 },
        ];
        let result = apply_stages(&image, &stages);
        assert_eq!(result.dimensions(), (72, 72));
    }

    #[test]
    fn test_composite_centers_foreground() {
        let mut canvas = RgbImage::new(10, 10);
        for pixel in canvas.pixels_mut() {
            *pixel = Rgb([10, 10, 10]);
        }
        let mut foreground = RgbImage::new(4, 4);
        for pixel in foreground.pixels_mut() {
            *pixel = Rgb([200, 200, 200]);
        }

        let result = composite_centered(canvas, &foreground);
        assert_eq!(result.get_pixel(5, 5), &Rgb([200, 200, 200]));
        assert_eq!(result.get_pixel(0, 0), &Rgb([10, 10, 10]));
        assert_eq!(result.get_pixel(9, 9), &Rgb([10, 10, 10]));
    }
}
