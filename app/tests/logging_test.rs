use jobwatch_core::LoggingConfig;
use tempfile::TempDir;

#[test]
fn test_log_file_receives_events() {
    let tmp = TempDir::new().expect("create temp dir");
    let config = LoggingConfig {
        log_file: tmp.path().join("logs").join("jobwatch.log"),
        filter: "info".to_string(),
    };

    jobwatch_app::init_tracing(&config).expect("init tracing");
    tracing::info!("Waiting for 10 seconds before processing the next country...");

    let contents = std::fs::read_to_string(&config.log_file).expect("read log file");
    assert!(contents.contains("Waiting for 10 seconds"));
    assert!(!contents.contains('\u{1b}'), "log file must not contain ANSI escapes");

    // a second subscriber cannot be installed
    assert!(jobwatch_app::init_tracing(&config).is_err());
}
