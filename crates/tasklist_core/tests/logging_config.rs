use tasklist_core::{logging_status, CoreConfig, LogLevel};

#[test]
fn config_log_level_drives_logger_start() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().to_str().unwrap().to_string();
    let config = CoreConfig {
        log_level: LogLevel::Warn,
        ..CoreConfig::default()
    };

    config.init_logging(&log_dir).unwrap();
    config.init_logging(&log_dir).unwrap();

    let (level, active_dir) = logging_status().unwrap();
    assert_eq!(level, LogLevel::Warn);
    assert_eq!(active_dir, dir.path());

    let louder = CoreConfig {
        log_level: LogLevel::Trace,
        ..CoreConfig::default()
    };
    assert!(louder
        .init_logging(&log_dir)
        .unwrap_err()
        .contains("refusing to switch"));
}
