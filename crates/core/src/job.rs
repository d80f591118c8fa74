// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable description of one transcode request

use crate::error::ValidationError;
use crate::format::OutputFormat;
use crate::id::JobId;
use crate::settings::EncodeSettings;
use std::fmt;
use std::sync::Arc;

/// One transcode request.
///
/// Constructed only through [`JobDescriptor::new`], which enforces the
/// submission preconditions, so a descriptor that exists is always valid.
/// The payload is shared, so handing the descriptor to a worker thread does
/// not copy the image bytes.
#[derive(Clone)]
pub struct JobDescriptor {
    id: JobId,
    payload: Arc<[u8]>,
    settings: EncodeSettings,
    original_name: String,
    original_size: u64,
}

impl JobDescriptor {
    pub fn new(
        id: JobId,
        payload: impl Into<Arc<[u8]>>,
        settings: EncodeSettings,
        original_name: impl Into<String>,
        original_size: u64,
    ) -> Result<Self, ValidationError> {
        let payload = payload.into();
        if payload.is_empty() {
            return Err(ValidationError::EmptyPayload);
        }
        settings.validate()?;
        Ok(Self {
            id,
            payload,
            settings,
            original_name: original_name.into(),
            original_size,
        })
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn settings(&self) -> &EncodeSettings {
        &self.settings
    }

    pub fn output_format(&self) -> OutputFormat {
        self.settings.output_format
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn original_size(&self) -> u64 {
        self.original_size
    }
}

impl fmt::Debug for JobDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobDescriptor")
            .field("id", &self.id)
            .field("payload_len", &self.payload.len())
            .field("settings", &self.settings)
            .field("original_name", &self.original_name)
            .field("original_size", &self.original_size)
            .finish()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
