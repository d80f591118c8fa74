// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sq_adapters::{fake_payload, CodecCall, FakeCodec};
use sq_core::{EncodeSettings, JobId, OutputFormat};

fn pipeline(codec: &FakeCodec) -> Pipeline<FakeCodec> {
    Pipeline::new(
        codec.clone(),
        DecodeLimits {
            max_pixels: 40_000_000,
        },
        EncoderTuning::default(),
    )
}

fn job(payload: Vec<u8>, settings: EncodeSettings, original_size: u64) -> JobDescriptor {
    JobDescriptor::new(JobId::new("job-1"), payload, settings, "in.png", original_size).unwrap()
}

#[yare::parameterized(
    width_binds          = { (4000, 3000), Some(800), None, Some((800, 600)) },
    height_binds         = { (4000, 3000), None, Some(300), Some((400, 300)) },
    both_width_tighter   = { (4000, 3000), Some(800), Some(800), Some((800, 600)) },
    both_height_tighter  = { (3000, 4000), Some(800), Some(800), Some((600, 800)) },
    already_fits         = { (640, 480), Some(800), Some(600), None },
    never_enlarges       = { (100, 50), Some(1000), None, None },
    no_bounds            = { (4000, 3000), None, None, None },
    exact_fit            = { (800, 600), Some(800), Some(600), None },
    rounds_to_nearest    = { (1000, 333), Some(500), None, Some((500, 167)) },
    thin_keeps_one_pixel = { (10000, 1), Some(100), None, Some((100, 1)) },
)]
fn fits_within_bounds(
    source: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
    expected: Option<(u32, u32)>,
) {
    assert_eq!(fit_within(source, width, height), expected);
}

#[test]
fn fit_never_exceeds_either_bound() {
    for (w, h) in [(4000, 3000), (3000, 4000), (1234, 987), (7, 5000)] {
        if let Some((tw, th)) = fit_within((w, h), Some(640), Some(480)) {
            assert!(tw <= 640 && th <= 480, "{w}x{h} -> {tw}x{th}");
            assert!(tw <= w && th <= h);
        }
    }
}

#[test]
fn resizes_before_encoding() {
    let codec = FakeCodec::new();
    let settings = EncodeSettings::new(OutputFormat::Webp, 75).with_resize(Some(800), None);
    let output = pipeline(&codec)
        .run(&job(fake_payload(4000, 3000, &[]), settings, 1_000_000))
        .unwrap();

    assert_eq!((output.width, output.height), (800, 600));
    assert_eq!(
        codec.calls(),
        vec![
            CodecCall::Decode { label: None },
            CodecCall::Resize {
                width: 800,
                height: 600
            },
            CodecCall::Encode {
                format: "webp".to_string(),
                quality: 75
            },
        ]
    );
}

#[test]
fn skips_resize_when_image_already_fits() {
    let codec = FakeCodec::new();
    let settings = EncodeSettings::new(OutputFormat::Png, 80).with_resize(Some(800), Some(800));
    let output = pipeline(&codec)
        .run(&job(fake_payload(100, 50, &[]), settings, 1000))
        .unwrap();

    assert_eq!((output.width, output.height), (100, 50));
    assert!(!codec
        .calls()
        .iter()
        .any(|call| matches!(call, CodecCall::Resize { .. })));
}

#[test]
fn computes_metrics_from_encoded_output() {
    let codec = FakeCodec::new();
    let payload = fake_payload(10, 10, &["size=250"]);
    let settings = EncodeSettings::new(OutputFormat::Jpeg, 80);
    let output = pipeline(&codec)
        .run(&job(payload.clone(), settings, 1000))
        .unwrap();

    assert_eq!(output.output.len(), 250);
    assert_eq!(output.compressed_size, 250);
    assert_eq!(output.compression_ratio, 75);
    assert_eq!(output.output_format, OutputFormat::Jpeg);
    assert_eq!(output.cache_key, cache_key(&payload, OutputFormat::Jpeg, 80));
}

#[test]
fn ratio_goes_negative_when_output_grows() {
    let codec = FakeCodec::new();
    let output = pipeline(&codec)
        .run(&job(
            fake_payload(10, 10, &["size=150"]),
            EncodeSettings::new(OutputFormat::Png, 80),
            100,
        ))
        .unwrap();
    assert_eq!(output.compression_ratio, -50);
}

#[yare::parameterized(
    decode = { "fail=decode" },
    resize = { "fail=resize" },
    encode = { "fail=encode" },
)]
fn propagates_codec_errors(directive: &str) {
    let codec = FakeCodec::new();
    let settings = EncodeSettings::new(OutputFormat::Png, 80).with_resize(Some(5), None);
    let err = pipeline(&codec)
        .run(&job(fake_payload(10, 10, &[directive]), settings, 100))
        .unwrap_err();
    assert!(err.to_string().contains("scripted"), "{err}");
}

#[test]
fn rejects_images_beyond_pixel_limit() {
    let codec = FakeCodec::new();
    let pipeline = Pipeline::new(
        codec,
        DecodeLimits { max_pixels: 100 },
        EncoderTuning::default(),
    );
    let err = pipeline
        .run(&job(
            fake_payload(20, 20, &[]),
            EncodeSettings::new(OutputFormat::Png, 80),
            100,
        ))
        .unwrap_err();
    assert!(matches!(err, CodecError::TooLarge { .. }));
}
