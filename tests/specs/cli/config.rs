//! `sq config` specs

use crate::prelude::*;

#[test]
fn prints_effective_defaults_as_toml() {
    let temp = Project::empty();
    temp.sq()
        .args(&["config"])
        .env("SQ_POOL_SIZE", "3")
        .passes()
        .stdout_has("[pool]")
        .stdout_has("pool_size = 3")
        .stdout_has("max_queue = 1024")
        .stdout_has("restart = \"never\"")
        .stdout_has("[tuning.webp]");
}

#[test]
fn file_values_are_layered_under_env() {
    let temp = Project::empty();
    temp.file(
        "sq.toml",
        b"[pool]\npool_size = 2\nrestart = \"replace\"\nshutdown_grace_ms = 100\n",
    );

    let run = temp
        .sq()
        .args(&["config", "--config", "sq.toml", "-o", "json"])
        .env("SQ_SHUTDOWN_GRACE_MS", "250")
        .passes();
    let json = run.json();

    assert_eq!(json["pool"]["pool_size"], 2);
    assert_eq!(json["pool"]["restart"], "replace");
    assert_eq!(json["pool"]["shutdown_grace_ms"], 250);
}

#[test]
fn sq_config_variable_selects_the_file() {
    let temp = Project::empty();
    temp.file("custom.toml", b"[pool]\nmax_queue = 7\n");

    temp.sq()
        .args(&["config"])
        .env("SQ_CONFIG", temp.path().join("custom.toml"))
        .passes()
        .stdout_has("max_queue = 7");
}

#[test]
fn unknown_keys_are_rejected() {
    let temp = Project::empty();
    temp.file("sq.toml", b"[pool]\nworkers = 2\n");

    temp.sq()
        .args(&["config", "--config", "sq.toml"])
        .fails()
        .stderr_has("invalid config sq.toml");
}
