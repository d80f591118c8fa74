//! Help and version specs

use crate::prelude::*;

#[test]
fn no_subcommand_prints_help() {
    cli()
        .passes()
        .stdout_has("Usage: sq")
        .stdout_has("compress")
        .stdout_has("config");
}

#[test]
fn version_flag_prints_version() {
    cli()
        .args(&["--version"])
        .passes()
        .stdout_has(concat!("sq ", env!("CARGO_PKG_VERSION")));
}

#[test]
fn compress_help_lists_flags() {
    cli()
        .args(&["compress", "--help"])
        .passes()
        .stdout_has("--format")
        .stdout_has("--quality")
        .stdout_has("--width")
        .stdout_has("--out-dir");
}
