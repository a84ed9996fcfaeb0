// tests/config_loading.rs

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use tvdeploy::config::{load_and_validate, load_from_path, parse_duration, resolve_config};
use tvdeploy::errors::TvdeployError;
use tvdeploy::types::ConnectCheck;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn config_error(contents: &str) -> String {
    let file = config_file(contents);
    match load_and_validate(file.path()) {
        Err(TvdeployError::ConfigError(msg)) => msg,
        other => panic!("expected a config error, got {other:?}"),
    }
}

#[test]
fn empty_file_yields_defaults() {
    let file = config_file("");

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.server.bind.to_string(), "127.0.0.1:3000");
    assert!(cfg.server.upload_dir.ends_with("tizen-uploads"));
    assert_eq!(cfg.server.max_upload_bytes, 256 * 1024 * 1024);
    assert_eq!(cfg.tools.bridge_path, None);
    assert_eq!(cfg.tools.sdk_path, None);
    assert_eq!(cfg.connect.test_check, ConnectCheck::Strict);
    assert_eq!(cfg.connect.pipeline_check, ConnectCheck::Loose);
    assert!(!cfg.connect.verify_devices);
    assert_eq!(cfg.exec.timeout, None);
}

#[test]
fn full_file_is_honoured() {
    let file = config_file(
        r#"
[server]
bind = "0.0.0.0:8080"
upload_dir = "/var/tmp/wgt"
max_upload_bytes = 1024

[tools]
bridge_path = "/opt/tizen/tools/sdb"
sdk_path = "/opt/tizen/tools/ide/bin/tizen"

[connect]
test_check = "loose"
pipeline_check = "strict"
verify_devices = true

[exec]
timeout = "90s"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.server.bind.port(), 8080);
    assert_eq!(cfg.server.upload_dir, PathBuf::from("/var/tmp/wgt"));
    assert_eq!(cfg.server.max_upload_bytes, 1024);
    assert_eq!(cfg.tools.bridge_path.as_deref(), Some("/opt/tizen/tools/sdb"));
    assert_eq!(
        cfg.tools.sdk_path.as_deref(),
        Some("/opt/tizen/tools/ide/bin/tizen")
    );
    assert_eq!(cfg.connect.test_check, ConnectCheck::Loose);
    assert_eq!(cfg.connect.pipeline_check, ConnectCheck::Strict);
    assert!(cfg.connect.verify_devices);
    assert_eq!(cfg.exec.timeout, Some(Duration::from_secs(90)));
}

#[test]
fn bad_bind_address_is_rejected() {
    let msg = config_error("[server]\nbind = \"localhost\"\n");
    assert!(msg.contains("[server].bind"), "{msg}");
}

#[test]
fn zero_upload_limit_is_rejected() {
    let msg = config_error("[server]\nmax_upload_bytes = 0\n");
    assert!(msg.contains("max_upload_bytes"), "{msg}");
}

#[test]
fn empty_tool_path_is_rejected() {
    let msg = config_error("[tools]\nsdk_path = \"  \"\n");
    assert!(msg.contains("[tools].sdk_path"), "{msg}");
}

#[test]
fn bad_timeouts_are_rejected() {
    assert!(config_error("[exec]\ntimeout = \"soon\"\n").contains("[exec].timeout"));
    assert!(config_error("[exec]\ntimeout = \"10\"\n").contains("unit"));
    assert!(config_error("[exec]\ntimeout = \"0s\"\n").contains("greater than zero"));
    assert!(
        config_error("[exec]\ntimeout = \"18446744073709551615h\"\n").contains("too large")
    );
}

#[test]
fn unknown_connect_check_is_a_toml_error() {
    let file = config_file("[connect]\ntest_check = \"sometimes\"\n");

    assert!(matches!(
        load_from_path(file.path()),
        Err(TvdeployError::TomlError(_))
    ));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let result = resolve_config(Some(Path::new("/definitely/not/Tvdeploy.toml")));

    assert!(matches!(result, Err(TvdeployError::IoError(_))));
}

#[test]
fn explicit_file_is_loaded() {
    let file = config_file("[tools]\nbridge_path = \"sdb\"\n");

    let cfg = resolve_config(Some(file.path())).unwrap();

    assert_eq!(cfg.tools.bridge_path.as_deref(), Some("sdb"));
}

#[test]
fn durations_parse_with_units() {
    assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
    assert_eq!(parse_duration(" 30s "), Ok(Duration::from_secs(30)));
    assert_eq!(parse_duration("10m"), Ok(Duration::from_secs(600)));
    assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    assert!(parse_duration("").is_err());
    assert!(parse_duration("5d").is_err());
    assert!(parse_duration("18446744073709551615m").is_err());
    assert_eq!(
        parse_duration("18446744073709551615s"),
        Ok(Duration::from_secs(u64::MAX))
    );
}
