// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Codec backed by the `image` crate

use super::{Codec, CodecError, DecodeLimits};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::tiff::TiffEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageReader};
use sq_core::{EncodeOptions, PngCompression};
use std::io::Cursor;

/// Pure-Rust codec over `image`.
///
/// Lossy WebP goes through libwebp so quality and effort apply. Some knobs
/// in [`EncodeOptions`] have no counterpart in the `image` encoders
/// (progressive JPEG, AVIF chroma subsampling, TIFF compression). Those are
/// accepted and logged, never rejected.
#[derive(Debug, Clone)]
pub struct ImageCodec {
    filter: FilterType,
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self {
            filter: FilterType::CatmullRom,
        }
    }
}

impl ImageCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resampling filter used for downscaling
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }
}

impl Codec for ImageCodec {
    type Image = DynamicImage;

    fn decode(&self, bytes: &[u8], limits: &DecodeLimits) -> Result<DynamicImage, CodecError> {
        // Read the header first so oversized images are refused before
        // their pixel buffer is allocated.
        let (width, height) = reader(bytes)?
            .into_dimensions()
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        limits.check(width, height)?;

        reader(bytes)?
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn dimensions(&self, image: &DynamicImage) -> (u32, u32) {
        (image.width(), image.height())
    }

    fn resize(
        &self,
        image: DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::Resize(format!(
                "target {width}x{height} has a zero dimension"
            )));
        }
        Ok(image.resize_exact(width, height, self.filter))
    }

    fn encode(&self, image: &DynamicImage, options: &EncodeOptions) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        match *options {
            EncodeOptions::Jpeg {
                quality,
                progressive,
            } => {
                if progressive {
                    tracing::debug!("progressive jpeg unavailable, writing baseline");
                }
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
                rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
                    .map_err(encode_error)?;
            }
            EncodeOptions::Png {
                compression,
                palette,
                ..
            } => {
                let compression = match compression {
                    PngCompression::Fast => CompressionType::Fast,
                    PngCompression::Default => CompressionType::Default,
                    PngCompression::Best => CompressionType::Best,
                };
                let encoder = PngEncoder::new_with_quality(&mut buf, compression, PngFilter::Adaptive);
                let written = if palette {
                    narrow_color(image).write_with_encoder(encoder)
                } else {
                    image.write_with_encoder(encoder)
                };
                written.map_err(encode_error)?;
            }
            EncodeOptions::Webp {
                quality,
                effort,
                lossless: false,
            } => buf = lossy_webp(image, quality, effort)?,
            EncodeOptions::Webp { lossless: true, .. } => {
                to_8bit(image)
                    .write_with_encoder(WebPEncoder::new_lossless(&mut buf))
                    .map_err(encode_error)?;
            }
            EncodeOptions::Avif {
                quality,
                speed,
                subsampling,
            } => {
                tracing::debug!(?subsampling, "avif encoder chooses its own subsampling");
                to_8bit(image)
                    .write_with_encoder(AvifEncoder::new_with_speed_quality(
                        &mut buf, speed, quality,
                    ))
                    .map_err(encode_error)?;
            }
            EncodeOptions::Tiff { compression, .. } => {
                tracing::debug!(?compression, "tiff encoder writes uncompressed strips");
                let mut cursor = Cursor::new(&mut buf);
                to_8bit(image)
                    .write_with_encoder(TiffEncoder::new(&mut cursor))
                    .map_err(encode_error)?;
            }
        }
        Ok(buf)
    }
}

fn reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, CodecError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CodecError::Decode(e.to_string()))?;
    if reader.format().is_none() {
        return Err(CodecError::Decode("unrecognized image format".to_string()));
    }
    Ok(reader)
}

fn encode_error(err: ImageError) -> CodecError {
    match err {
        ImageError::Unsupported(e) => CodecError::Unsupported(e.to_string()),
        other => CodecError::Encode(other.to_string()),
    }
}

/// libwebp lossy encode; `effort` maps onto the encoder method (0..=6).
fn lossy_webp(image: &DynamicImage, quality: u8, effort: u8) -> Result<Vec<u8>, CodecError> {
    let rgba;
    let rgb;
    let encoder = if image.color().has_alpha() {
        rgba = image.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
    } else {
        rgb = image.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
    };

    let mut config = webp::WebPConfig::new()
        .map_err(|()| CodecError::Encode("libwebp config init failed".to_string()))?;
    config.lossless = 0;
    config.quality = f32::from(quality);
    config.method = i32::from(effort.min(6));

    let encoded = encoder
        .encode_advanced(&config)
        .map_err(|e| CodecError::Encode(format!("webp: {e:?}")))?;
    Ok(encoded.to_vec())
}

/// 8-bit RGB or RGBA, depending on whether the source carries alpha.
fn to_8bit(image: &DynamicImage) -> DynamicImage {
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    }
}

/// Narrowest 8-bit color type that represents `image` without loss:
/// opaque images drop alpha, neutral images drop chroma.
fn narrow_color(image: &DynamicImage) -> DynamicImage {
    let rgba = image.to_rgba8();
    let opaque = rgba.pixels().all(|p| p[3] == u8::MAX);
    let gray = rgba.pixels().all(|p| p[0] == p[1] && p[1] == p[2]);
    match (gray, opaque) {
        (true, true) => DynamicImage::ImageLuma8(image.to_luma8()),
        (true, false) => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        (false, true) => DynamicImage::ImageRgb8(image.to_rgb8()),
        (false, false) => DynamicImage::ImageRgba8(rgba),
    }
}

#[cfg(test)]
#[path = "image_codec_tests.rs"]
mod tests;
