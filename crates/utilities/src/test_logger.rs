use log::SetLoggerError;

/// Initialises a logger that prints to the test output, can be called multiple
/// times since only the first call installs the logger.
pub fn test_logger() -> Result<(), SetLoggerError> {
    env_logger::builder().is_test(true).try_init()
}
