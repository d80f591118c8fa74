//! CLI error handling specs
//!
//! Bad input is refused before any worker starts.

use crate::prelude::*;

#[test]
fn unknown_format_is_rejected() {
    let temp = Project::empty();
    temp.png("a.png", 8, 8);

    temp.sq()
        .args(&["compress", "-f", "gif", "a.png"])
        .fails()
        .exit_code(1)
        .stderr_has("unsupported output format: 'gif'");
    assert!(!temp.exists("a.gif"));
}

#[test]
fn quality_out_of_range_is_rejected() {
    let temp = Project::empty();
    temp.png("a.png", 8, 8);

    temp.sq()
        .args(&["compress", "-q", "0", "a.png"])
        .fails()
        .exit_code(1)
        .stderr_has("quality 0 out of range");
}

#[test]
fn zero_width_is_rejected() {
    let temp = Project::empty();
    temp.png("a.png", 8, 8);

    temp.sq()
        .args(&["compress", "--width", "0", "a.png"])
        .fails()
        .stderr_has("resize width must be greater than zero");
}

#[test]
fn compress_without_files_is_a_usage_error() {
    cli().args(&["compress"]).fails().exit_code(2);
}

#[test]
fn missing_explicit_config_is_an_error() {
    let temp = Project::empty();
    temp.sq()
        .args(&["config", "--config", "nope.toml"])
        .fails()
        .stderr_has("failed to read config nope.toml");
}

#[test]
fn invalid_env_override_names_the_variable() {
    let temp = Project::empty();
    temp.sq()
        .args(&["config"])
        .env("SQ_POOL_SIZE", "lots")
        .fails()
        .stderr_has("SQ_POOL_SIZE");
}
