//! Transcoding specs: every target format writes a decodable file

use crate::prelude::*;

#[test]
fn png_to_webp_by_default() {
    let temp = Project::empty();
    temp.png("photo.png", 64, 48);

    temp.sq()
        .args(&["compress", "photo.png", "--out-dir", "out"])
        .passes()
        .stdout_has("photo.png")
        .stdout_has("webp")
        .stdout_has("64x48")
        .stdout_has("1 compressed, 0 failed");

    assert_eq!(temp.dimensions("out/photo.webp"), (64, 48));
}

#[test]
fn png_to_jpeg_uses_jpg_extension() {
    let temp = Project::empty();
    temp.png("photo.png", 32, 32);

    temp.sq()
        .args(&["compress", "-f", "jpeg", "-q", "60", "photo.png", "--out-dir", "out"])
        .passes();

    assert_eq!(temp.dimensions("out/photo.jpg"), (32, 32));
}

#[test]
fn many_files_report_in_input_order() {
    let temp = Project::empty();
    let names = ["c.png", "a.png", "d.png", "b.png"];
    for name in names {
        temp.png(name, 16, 16);
    }

    let mut args = vec!["compress", "-f", "png", "--out-dir", "out", "--pool-size", "2"];
    args.extend(names);
    let stdout = temp.sq().args(&args).passes().stdout();

    let positions: Vec<usize> = names
        .iter()
        .map(|name| stdout.find(name).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{stdout}");
    for name in names {
        assert!(temp.exists(std::path::Path::new("out").join(name)));
    }
}

#[test]
fn refuses_to_overwrite_the_input() {
    let temp = Project::empty();
    temp.png("photo.png", 8, 8);
    let before = std::fs::read(temp.path().join("photo.png")).unwrap();

    temp.sq()
        .args(&["compress", "-f", "png", "photo.png"])
        .fails()
        .stdout_has("refusing to overwrite");

    assert_eq!(std::fs::read(temp.path().join("photo.png")).unwrap(), before);
}
