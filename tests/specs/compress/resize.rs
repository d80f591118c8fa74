//! Resize specs: aspect ratio is kept and images never grow

use crate::prelude::*;

#[test]
fn width_bound_scales_height() {
    let temp = Project::empty();
    temp.png("wide.png", 400, 300);

    temp.sq()
        .args(&["compress", "-f", "png", "--width", "80", "wide.png", "--out-dir", "out"])
        .passes()
        .stdout_has("80x60");

    assert_eq!(temp.dimensions("out/wide.png"), (80, 60));
}

#[test]
fn both_bounds_fit_inside_the_box() {
    let temp = Project::empty();
    temp.png("tall.png", 300, 600);

    temp.sq()
        .args(&[
            "compress", "-f", "png", "--width", "200", "--height", "100", "tall.png",
            "--out-dir", "out",
        ])
        .passes();

    assert_eq!(temp.dimensions("out/tall.png"), (50, 100));
}

#[test]
fn small_images_are_not_enlarged() {
    let temp = Project::empty();
    temp.png("icon.png", 40, 20);

    temp.sq()
        .args(&["compress", "-f", "png", "--width", "800", "icon.png", "--out-dir", "out"])
        .passes();

    assert_eq!(temp.dimensions("out/icon.png"), (40, 20));
}
