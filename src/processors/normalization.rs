//! Image normalization for classification.
//!
//! This module turns arbitrary uploaded image bytes into the fixed-shape
//! tensor the inference backend was trained on: decode, convert to RGB,
//! stretch-resize to the target square, scale into `[0, 1]`, and add a
//! leading batch dimension.

use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::tensor::Tensor4D;
use image::{DynamicImage, RgbImage, imageops::FilterType};
use serde::{Deserialize, Serialize};

/// Channel ordering of the produced tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Channel, Height, Width order (common in PyTorch exports)
    CHW,
    /// Height, Width, Channel order (common in TensorFlow exports)
    HWC,
}

/// Normalizes raw image bytes into an inference-ready tensor.
///
/// The resize is a direct stretch to the target square with a fixed bilinear
/// filter; no cropping and no aspect-ratio preservation, matching what the
/// reference model was trained on. Identical bytes always produce an
/// identical tensor.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    /// Target spatial size as (width, height).
    target_size: (u32, u32),
    /// Channel ordering of the produced tensor.
    order: ChannelOrder,
}

impl ImageNormalizer {
    /// Creates a normalizer for the given target size and channel order.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if either target dimension is zero.
    pub fn new(target_size: (u32, u32), order: ChannelOrder) -> ClassifyResult<Self> {
        let (width, height) = target_size;
        if width == 0 || height == 0 {
            return Err(ClassifyError::config_error_with_context(
                "target_size",
                &format!("{width}x{height}"),
                "both dimensions must be greater than 0",
            ));
        }
        Ok(Self { target_size, order })
    }

    /// The spatial size this normalizer produces, as (width, height).
    pub fn target_size(&self) -> (u32, u32) {
        self.target_size
    }

    /// The channel ordering this normalizer produces.
    pub fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    /// Decodes image bytes and normalizes them into a batch-of-1 tensor.
    ///
    /// The produced tensor has shape `[1, H, W, 3]` (HWC) or `[1, 3, H, W]`
    /// (CHW), RGB channel order, and every value in `[0.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// * `Decode` if the bytes are not a decodable image.
    /// * `UnsupportedMode` if conversion to RGB is impossible (only
    ///   reachable through image formats this crate does not know about).
    pub fn normalize(&self, bytes: &[u8]) -> ClassifyResult<Tensor4D> {
        let decoded = image::load_from_memory(bytes).map_err(ClassifyError::Decode)?;
        let rgb = to_rgb_checked(decoded)?;

        let (width, height) = self.target_size;
        let resized = image::imageops::resize(&rgb, width, height, FilterType::Triangle);

        self.to_tensor(&resized)
    }

    /// Converts an already-resized RGB image into the scaled tensor.
    fn to_tensor(&self, img: &RgbImage) -> ClassifyResult<Tensor4D> {
        let (width, height) = (img.width() as usize, img.height() as usize);
        let scale = 1.0 / 255.0;

        match self.order {
            ChannelOrder::HWC => {
                // Raw RGB8 buffers are already row-major HWC.
                let data: Vec<f32> = img.as_raw().iter().map(|&v| v as f32 * scale).collect();
                Tensor4D::from_shape_vec((1, height, width, 3), data).map_err(ClassifyError::Tensor)
            }
            ChannelOrder::CHW => {
                let mut data = vec![0.0f32; 3 * height * width];
                for (x, y, pixel) in img.enumerate_pixels() {
                    let (x, y) = (x as usize, y as usize);
                    for c in 0..3 {
                        data[c * height * width + y * width + x] = pixel[c] as f32 * scale;
                    }
                }
                Tensor4D::from_shape_vec((1, 3, height, width), data).map_err(ClassifyError::Tensor)
            }
        }
    }
}

/// Converts a decoded image to RGB8, discarding alpha and promoting
/// grayscale/palette data as the codec defines.
fn to_rgb_checked(img: DynamicImage) -> ClassifyResult<RgbImage> {
    match &img {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_)
        | DynamicImage::ImageRgb32F(_)
        | DynamicImage::ImageRgba32F(_) => Ok(img.to_rgb8()),
        // DynamicImage is non-exhaustive; future variants may not define an
        // RGB conversion.
        other => Err(ClassifyError::UnsupportedMode {
            mode: format!("{:?}", other.color()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Rgb, RgbaImage};
    use std::io::Cursor;

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    fn gradient_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 255])
        });
        encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
    }

    fn normalizer() -> ImageNormalizer {
        ImageNormalizer::new((224, 224), ChannelOrder::HWC).unwrap()
    }

    #[test]
    fn produces_fixed_shape_for_any_input_dimensions() {
        let normalizer = normalizer();
        for (w, h) in [(640, 480), (10, 10), (3, 500)] {
            let tensor = normalizer.normalize(&gradient_png(w, h)).unwrap();
            assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        }
    }

    #[test]
    fn all_values_scaled_into_unit_interval() {
        let tensor = normalizer().normalize(&gradient_png(64, 64)).unwrap();
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
        // The blue channel is saturated in the fixture, so the maximum must
        // actually reach 1.0.
        assert!(tensor.iter().any(|&v| v == 1.0));
    }

    #[test]
    fn grayscale_input_is_promoted_to_rgb() {
        let img = GrayImage::from_pixel(50, 40, image::Luma([128]));
        let bytes = encode(DynamicImage::ImageLuma8(img), ImageFormat::Png);
        let tensor = normalizer().normalize(&bytes).unwrap();
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        // All three channels carry the promoted gray value.
        let v = tensor[[0, 0, 0, 0]];
        assert_eq!(tensor[[0, 0, 0, 1]], v);
        assert_eq!(tensor[[0, 0, 0, 2]], v);
    }

    #[test]
    fn alpha_is_discarded() {
        let img = RgbaImage::from_pixel(8, 8, image::Rgba([200, 100, 50, 7]));
        let bytes = encode(DynamicImage::ImageRgba8(img), ImageFormat::Png);
        let tensor = normalizer().normalize(&bytes).unwrap();
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn chw_order_transposes_the_layout() {
        let normalizer = ImageNormalizer::new((224, 224), ChannelOrder::CHW).unwrap();
        let tensor = normalizer.normalize(&gradient_png(32, 32)).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn identical_bytes_produce_identical_tensors() {
        let normalizer = normalizer();
        let bytes = gradient_png(100, 60);
        let a = normalizer.normalize(&bytes).unwrap();
        let b = normalizer.normalize(&bytes).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = normalizer().normalize(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ClassifyError::Decode(_)));
    }

    #[test]
    fn rejects_empty_bytes() {
        let err = normalizer().normalize(&[]).unwrap_err();
        assert!(matches!(err, ClassifyError::Decode(_)));
    }

    #[test]
    fn rejects_truncated_image() {
        let mut bytes = gradient_png(64, 64);
        bytes.truncate(bytes.len() / 2);
        assert!(normalizer().normalize(&bytes).is_err());
    }

    #[test]
    fn rejects_zero_target_dimension() {
        assert!(ImageNormalizer::new((0, 224), ChannelOrder::HWC).is_err());
    }
}
