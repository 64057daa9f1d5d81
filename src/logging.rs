use flexi_logger::{opt_format, Cleanup, Criterion, FileSpec, Logger, Naming};

/// Starts the server's file logger. The level is taken from `RUST_LOG`
/// (or `level` if the environment is unset), and logs rotate at 10 MB
/// keeping one prior file.
pub fn setup_logging(directory: &str, level: &str) {
    Logger::try_with_env_or_str(level)
        .unwrap()
        .log_to_file(FileSpec::default().directory(directory))
        .format(opt_format)
        .rotate(
            Criterion::Size(10 * 1024 * 1024),
            Naming::Numbers,
            Cleanup::KeepLogFiles(1),
        )
        .start()
        .unwrap();
}

/// Starts a stderr-only logger for test binaries. Safe to call more than
/// once per process (a second call is a no-op) since `#[tokio::test]`
/// gives each test its own async task but they share one process.
pub fn init_test_logging() {
    let _ = Logger::try_with_env_or_str("warn")
        .unwrap()
        .log_to_stderr()
        .start();
}
