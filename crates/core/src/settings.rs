// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller-supplied encode settings

use crate::error::ValidationError;
use crate::format::OutputFormat;
use serde::{Deserialize, Serialize};

pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// What the caller asked for: target format, quality and an optional
/// bounding box for downscaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeSettings {
    pub quality: u8,
    pub output_format: OutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize_height: Option<u32>,
}

impl EncodeSettings {
    pub fn new(output_format: OutputFormat, quality: u8) -> Self {
        Self {
            quality,
            output_format,
            resize_width: None,
            resize_height: None,
        }
    }

    pub fn with_resize(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.resize_width = width;
        self.resize_height = height;
        self
    }

    /// True when either resize bound is present
    pub fn wants_resize(&self) -> bool {
        self.resize_width.is_some() || self.resize_height.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            return Err(ValidationError::QualityOutOfRange(self.quality));
        }
        if self.resize_width == Some(0) {
            return Err(ValidationError::ZeroDimension { axis: "width" });
        }
        if self.resize_height == Some(0) {
            return Err(ValidationError::ZeroDimension { axis: "height" });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
