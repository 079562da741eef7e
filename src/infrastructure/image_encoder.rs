// Output encoding for rendered collages
use crate::domain::request::OutputFormat;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use thiserror::Error;

const JPEG_QUALITY: u8 = 85;
const WEBP_QUALITY: f32 = 90.0;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("jpeg encoding failed: {0}")]
    Jpeg(#[from] image::ImageError),
}

#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn encode(canvas: &RgbaImage, format: OutputFormat) -> Result<EncodedImage, EncodeError> {
    // Both outputs are opaque
    let rgb = DynamicImage::ImageRgba8(canvas.clone()).into_rgb8();

    let bytes = match format {
        OutputFormat::Jpeg => {
            let mut bytes = Vec::new();
            JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY).encode_image(&rgb)?;
            bytes
        }
        OutputFormat::WebP => {
            webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
                .encode(WEBP_QUALITY)
                .to_vec()
        }
    };

    Ok(EncodedImage {
        content_type: format.content_type(),
        bytes,
    })
}
