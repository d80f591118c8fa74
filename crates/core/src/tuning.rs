// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-format encoder knobs and the options contract handed to codecs.
//!
//! Defaults favour throughput over maximum compression: low AVIF effort,
//! fast PNG deflate, mid WebP effort. Operators can override every knob
//! from the config file.

use crate::format::OutputFormat;
use crate::settings::{EncodeSettings, MAX_QUALITY, MIN_QUALITY};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    #[default]
    Fast,
    Default,
    Best,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChromaSubsampling {
    #[default]
    #[serde(rename = "420")]
    Yuv420,
    #[serde(rename = "422")]
    Yuv422,
    #[serde(rename = "444")]
    Yuv444,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TiffCompression {
    None,
    #[default]
    Lzw,
    Deflate,
    Packbits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JpegTuning {
    pub default_quality: u8,
    pub progressive: bool,
}

impl Default for JpegTuning {
    fn default() -> Self {
        Self {
            default_quality: 80,
            progressive: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PngTuning {
    pub default_quality: u8,
    pub compression: PngCompression,
    /// Collapse to the narrowest lossless 8-bit color type before encoding
    pub palette: bool,
}

impl Default for PngTuning {
    fn default() -> Self {
        Self {
            default_quality: 80,
            compression: PngCompression::Fast,
            palette: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebpTuning {
    pub default_quality: u8,
    /// 0 (fastest) ..= 6 (smallest)
    pub effort: u8,
    pub lossless: bool,
}

impl Default for WebpTuning {
    fn default() -> Self {
        Self {
            default_quality: 80,
            effort: 4,
            lossless: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvifTuning {
    pub default_quality: u8,
    /// Encoder speed, 1 (slowest, smallest) ..= 10 (fastest)
    pub speed: u8,
    pub subsampling: ChromaSubsampling,
}

impl Default for AvifTuning {
    fn default() -> Self {
        Self {
            default_quality: 60,
            speed: 8,
            subsampling: ChromaSubsampling::Yuv420,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiffTuning {
    pub default_quality: u8,
    pub compression: TiffCompression,
}

impl Default for TiffTuning {
    fn default() -> Self {
        Self {
            default_quality: 80,
            compression: TiffCompression::Lzw,
        }
    }
}

/// Operator-level encoder policy, one table per format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderTuning {
    pub jpeg: JpegTuning,
    pub png: PngTuning,
    pub webp: WebpTuning,
    pub avif: AvifTuning,
    pub tiff: TiffTuning,
}

/// Fully resolved parameters for one encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOptions {
    Jpeg {
        quality: u8,
        progressive: bool,
    },
    Png {
        quality: u8,
        compression: PngCompression,
        palette: bool,
    },
    Webp {
        quality: u8,
        effort: u8,
        lossless: bool,
    },
    Avif {
        quality: u8,
        speed: u8,
        subsampling: ChromaSubsampling,
    },
    Tiff {
        quality: u8,
        compression: TiffCompression,
    },
}

impl EncodeOptions {
    pub fn format(&self) -> OutputFormat {
        match self {
            EncodeOptions::Jpeg { .. } => OutputFormat::Jpeg,
            EncodeOptions::Png { .. } => OutputFormat::Png,
            EncodeOptions::Webp { .. } => OutputFormat::Webp,
            EncodeOptions::Avif { .. } => OutputFormat::Avif,
            EncodeOptions::Tiff { .. } => OutputFormat::Tiff,
        }
    }

    pub fn quality(&self) -> u8 {
        match *self {
            EncodeOptions::Jpeg { quality, .. }
            | EncodeOptions::Png { quality, .. }
            | EncodeOptions::Webp { quality, .. }
            | EncodeOptions::Avif { quality, .. }
            | EncodeOptions::Tiff { quality, .. } => quality,
        }
    }
}

impl EncoderTuning {
    /// Configured fallback quality for `format`, clamped into the valid range.
    pub fn default_quality(&self, format: OutputFormat) -> u8 {
        let q = match format {
            OutputFormat::Jpeg => self.jpeg.default_quality,
            OutputFormat::Png => self.png.default_quality,
            OutputFormat::Webp => self.webp.default_quality,
            OutputFormat::Avif => self.avif.default_quality,
            OutputFormat::Tiff => self.tiff.default_quality,
        };
        q.clamp(MIN_QUALITY, MAX_QUALITY)
    }

    /// Merge the caller's settings with this policy.
    pub fn options_for(&self, settings: &EncodeSettings) -> EncodeOptions {
        let quality = settings.quality;
        match settings.output_format {
            OutputFormat::Jpeg => EncodeOptions::Jpeg {
                quality,
                progressive: self.jpeg.progressive,
            },
            OutputFormat::Png => EncodeOptions::Png {
                quality,
                compression: self.png.compression,
                palette: self.png.palette,
            },
            OutputFormat::Webp => EncodeOptions::Webp {
                quality,
                effort: self.webp.effort.min(6),
                lossless: self.webp.lossless,
            },
            OutputFormat::Avif => EncodeOptions::Avif {
                quality,
                speed: self.avif.speed.clamp(1, 10),
                subsampling: self.avif.subsampling,
            },
            OutputFormat::Tiff => EncodeOptions::Tiff {
                quality,
                compression: self.tiff.compression,
            },
        }
    }
}

#[cfg(test)]
#[path = "tuning_tests.rs"]
mod tests;
