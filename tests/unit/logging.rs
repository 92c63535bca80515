//! Unit tests for log format selection

use zonewatch::logging::{try_init_logging, LogFormat};

#[test]
fn test_log_format_for_environment() {
    assert_eq!(LogFormat::for_environment("production"), LogFormat::Json);
    assert_eq!(LogFormat::for_environment("prod"), LogFormat::Json);
    assert_eq!(LogFormat::for_environment("sandbox"), LogFormat::Pretty);
    assert_eq!(LogFormat::for_environment("staging"), LogFormat::Pretty);
}

#[test]
fn test_second_init_is_rejected() {
    let _ = try_init_logging(LogFormat::Pretty);
    assert!(try_init_logging(LogFormat::Json).is_err());
}
