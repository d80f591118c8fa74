//! Black-box behavior tests for the sq CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, exit codes and the files it writes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/config.rs"]
mod cli_config;
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;

// compress/
#[path = "specs/compress/failures.rs"]
mod compress_failures;
#[path = "specs/compress/json.rs"]
mod compress_json;
#[path = "specs/compress/resize.rs"]
mod compress_resize;
#[path = "specs/compress/transcode.rs"]
mod compress_transcode;
