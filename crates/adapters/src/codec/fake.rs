// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake codec for testing
//!
//! Payloads are text: `fake:WxH` followed by `;`-separated directives.
//!
//! - `label=NAME` tags the job in [`FakeCodec::decoded`]
//! - `gate=NAME` blocks decode until [`FakeCodec::open_gate`] is called
//! - `fail=decode|resize|encode` fails that stage
//! - `panic` panics inside decode, killing the worker thread
//! - `size=N` makes encode emit exactly `N` bytes
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Codec, CodecError, DecodeLimits};
use parking_lot::{Condvar, Mutex};
use sq_core::EncodeOptions;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

const GATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a fake payload
pub fn fake_payload(width: u32, height: u32, directives: &[&str]) -> Vec<u8> {
    let mut text = format!("fake:{width}x{height}");
    for directive in directives {
        text.push(';');
        text.push_str(directive);
    }
    text.into_bytes()
}

/// Recorded codec call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecCall {
    Decode { label: Option<String> },
    Resize { width: u32, height: u32 },
    Encode { format: String, quality: u8 },
}

/// Decoded fake image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FakeImage {
    pub width: u32,
    pub height: u32,
    pub label: Option<String>,
    gate: Option<String>,
    fail: Option<String>,
    panic: bool,
    size: Option<usize>,
}

impl FakeImage {
    fn parse(bytes: &[u8]) -> Result<Self, CodecError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| CodecError::Decode("fake payload is not utf-8".to_string()))?;
        let mut parts = text.split(';');
        let dims = parts
            .next()
            .and_then(|head| head.strip_prefix("fake:"))
            .ok_or_else(|| CodecError::Decode("missing fake header".to_string()))?;
        let (w, h) = dims
            .split_once('x')
            .ok_or_else(|| CodecError::Decode(format!("bad dimensions '{dims}'")))?;
        let parse_dim = |s: &str| {
            s.parse::<u32>()
                .map_err(|_| CodecError::Decode(format!("bad dimensions '{dims}'")))
        };
        let mut image = FakeImage {
            width: parse_dim(w)?,
            height: parse_dim(h)?,
            ..Default::default()
        };
        for directive in parts {
            match directive.split_once('=') {
                Some(("label", v)) => image.label = Some(v.to_string()),
                Some(("gate", v)) => image.gate = Some(v.to_string()),
                Some(("fail", v)) => image.fail = Some(v.to_string()),
                Some(("size", v)) => {
                    image.size = Some(v.parse().map_err(|_| {
                        CodecError::Decode(format!("bad size directive '{directive}'"))
                    })?)
                }
                None if directive == "panic" => image.panic = true,
                _ => return Err(CodecError::Decode(format!("unknown directive '{directive}'"))),
            }
        }
        Ok(image)
    }

    fn fails_at(&self, stage: &str) -> bool {
        self.fail.as_deref() == Some(stage)
    }
}

#[derive(Default)]
struct FakeCodecState {
    calls: Vec<CodecCall>,
    decoded: Vec<String>,
    open_gates: HashSet<String>,
    waiting: usize,
    active: usize,
    max_active: usize,
}

struct Shared {
    state: Mutex<FakeCodecState>,
    gates: Condvar,
}

/// Fake codec for testing
#[derive(Clone)]
pub struct FakeCodec {
    inner: Arc<Shared>,
}

impl Default for FakeCodec {
    fn default() -> Self {
        Self {
            inner: Arc::new(Shared {
                state: Mutex::new(FakeCodecState::default()),
                gates: Condvar::new(),
            }),
        }
    }
}

impl FakeCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CodecCall> {
        self.inner.state.lock().calls.clone()
    }

    /// Labels in the order their decode started
    pub fn decoded(&self) -> Vec<String> {
        self.inner.state.lock().decoded.clone()
    }

    /// Number of decodes currently blocked on a gate
    pub fn waiting(&self) -> usize {
        self.inner.state.lock().waiting
    }

    /// Highest number of decodes observed running at once
    pub fn max_active(&self) -> usize {
        self.inner.state.lock().max_active
    }

    /// Release every decode waiting on `name`, now and in the future
    pub fn open_gate(&self, name: &str) {
        self.inner.state.lock().open_gates.insert(name.to_string());
        self.inner.gates.notify_all();
    }

    fn wait_gate(&self, name: &str) -> Result<(), CodecError> {
        let mut state = self.inner.state.lock();
        state.waiting += 1;
        let mut result = Ok(());
        while !state.open_gates.contains(name) {
            if self
                .inner
                .gates
                .wait_for(&mut state, GATE_TIMEOUT)
                .timed_out()
            {
                result = Err(CodecError::Decode(format!("gate '{name}' never opened")));
                break;
            }
        }
        state.waiting -= 1;
        result
    }
}

impl Codec for FakeCodec {
    type Image = FakeImage;

    #[allow(clippy::panic)]
    fn decode(&self, bytes: &[u8], limits: &DecodeLimits) -> Result<FakeImage, CodecError> {
        let parsed = FakeImage::parse(bytes);
        {
            let mut state = self.inner.state.lock();
            let label = parsed.as_ref().ok().and_then(|i| i.label.clone());
            if let Some(label) = &label {
                state.decoded.push(label.clone());
            }
            state.calls.push(CodecCall::Decode { label });
            state.active += 1;
            state.max_active = state.max_active.max(state.active);
        }

        let result = parsed.and_then(|image| {
            if let Some(gate) = &image.gate {
                self.wait_gate(gate)?;
            }
            limits.check(image.width, image.height)?;
            if image.fails_at("decode") {
                return Err(CodecError::Decode("scripted decode failure".to_string()));
            }
            Ok(image)
        });

        self.inner.state.lock().active -= 1;

        if matches!(&result, Ok(image) if image.panic) {
            panic!("fake codec panic");
        }
        result
    }

    fn dimensions(&self, image: &FakeImage) -> (u32, u32) {
        (image.width, image.height)
    }

    fn resize(&self, image: FakeImage, width: u32, height: u32) -> Result<FakeImage, CodecError> {
        self.inner
            .state
            .lock()
            .calls
            .push(CodecCall::Resize { width, height });
        if image.fails_at("resize") {
            return Err(CodecError::Resize("scripted resize failure".to_string()));
        }
        Ok(FakeImage {
            width,
            height,
            ..image
        })
    }

    fn encode(&self, image: &FakeImage, options: &EncodeOptions) -> Result<Vec<u8>, CodecError> {
        let format = options.format().to_string();
        self.inner.state.lock().calls.push(CodecCall::Encode {
            format: format.clone(),
            quality: options.quality(),
        });
        if image.fails_at("encode") {
            return Err(CodecError::Encode("scripted encode failure".to_string()));
        }
        Ok(match image.size {
            Some(size) => vec![0u8; size],
            None => format!(
                "{format}:{}x{}:q{}",
                image.width,
                image.height,
                options.quality()
            )
            .into_bytes(),
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
