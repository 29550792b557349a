use crate::logger;

use std::fs;
use std::str::FromStr;

use idhub_config::LogLevel;

#[test]
fn test_file_logger_writes_to_the_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.log");

    logger::initialize(LogLevel::from_str("info").unwrap(), Some(path.clone()), false).unwrap();
    log::info!("file logger smoke line");

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("file logger smoke line"));
    assert!(contents.contains("INFO"));
}

#[test]
fn test_unwritable_log_file_is_an_error() {
    let result = logger::initialize(
        LogLevel::from_str("info").unwrap(),
        Some("/nonexistent-dir/server.log".into()),
        false,
    );
    assert!(result.is_err());
}
