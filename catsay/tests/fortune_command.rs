//! `FortuneCommand` against stub executables.
//!
//! Each test writes a tiny shell script standing in for `fortune` and points
//! the command (or the resolved config) at it.

#![cfg(unix)]

use std::time::Duration;

use catsay::config::{FORTUNE_BIN_ENV, ServiceConfig};
use catsay::io::fortune::{FortuneCommand, FortuneSettings, TextSource, caption};
use catsay::test_support::{
    stub_dir, write_failing_fortune, write_stub_executable, write_stub_fortune,
};

fn settings_for(binary: std::path::PathBuf) -> FortuneSettings {
    FortuneSettings {
        binary,
        timeout: Duration::from_secs(5),
        output_limit_bytes: 64 * 1024,
    }
}

#[test]
fn produces_trimmed_stdout() {
    let dir = stub_dir().expect("dir");
    let binary = write_stub_fortune(dir.path(), "  Hello World  ").expect("stub");

    let text = FortuneCommand::new(settings_for(binary))
        .produce()
        .expect("produce");
    assert_eq!(text, "Hello World");
}

#[test]
fn caption_from_stub_is_encoded() {
    let dir = stub_dir().expect("dir");
    let binary = write_stub_fortune(dir.path(), "Hello World").expect("stub");

    let command = FortuneCommand::new(settings_for(binary));
    assert_eq!(caption(&command).expect("caption"), "Hello%20World");
}

#[test]
fn non_zero_exit_is_an_error_with_stderr() {
    let dir = stub_dir().expect("dir");
    let binary = write_failing_fortune(dir.path(), 2, "no fortunes found").expect("stub");

    let err = FortuneCommand::new(settings_for(binary))
        .produce()
        .expect_err("should fail");
    let message = format!("{err:#}");
    assert!(message.contains("Some(2)"), "{message}");
    assert!(message.contains("no fortunes found"), "{message}");
}

#[test]
fn hanging_binary_times_out() {
    let dir = stub_dir().expect("dir");
    let binary = write_stub_executable(dir.path(), "fortune", "exec sleep 5").expect("stub");

    let command = FortuneCommand::new(FortuneSettings {
        timeout: Duration::from_millis(200),
        ..settings_for(binary)
    });
    let err = command.produce().expect_err("should time out");
    assert!(err.to_string().contains("timed out"));
}

#[test]
fn env_override_selects_which_binary_runs() {
    let default_dir = stub_dir().expect("dir");
    let default_binary = write_stub_fortune(default_dir.path(), "from config").expect("stub");
    let sentinel_dir = stub_dir().expect("dir");
    let sentinel_binary = write_stub_fortune(sentinel_dir.path(), "SENTINEL-7f3a").expect("stub");

    let mut cfg = ServiceConfig::default();
    cfg.fortune.binary = default_binary;

    let unchanged = cfg.clone().resolve_env(|_| None);
    let text = FortuneCommand::new(FortuneSettings::from(&unchanged.fortune))
        .produce()
        .expect("produce");
    assert_eq!(text, "from config");

    let sentinel_path = sentinel_binary.to_string_lossy().into_owned();
    let overridden =
        cfg.resolve_env(|key| (key == FORTUNE_BIN_ENV).then(|| sentinel_path.clone()));
    let text = FortuneCommand::new(FortuneSettings::from(&overridden.fortune))
        .produce()
        .expect("produce");
    assert_eq!(text, "SENTINEL-7f3a");
}
