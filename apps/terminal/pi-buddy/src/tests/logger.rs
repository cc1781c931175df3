// Unit tests for logger module initialization logic

use crate::logger::initialize;

use std::path::PathBuf;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: Tests and the binary may both reach initialization. A second
/// call must not try to install a second global logger.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed,
/// causing fern to fail when setting a global logger twice.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A valid temporary directory
    let temp_dir = std::env::temp_dir().join("pi-buddy-test-logger");
    std::fs::create_dir_all(&temp_dir).unwrap();

    // WHEN: Calling initialize twice
    let first = initialize(&temp_dir);
    let second = initialize(&temp_dir);

    // THEN: Both return Ok
    assert!(first.is_ok(), "First initialization should succeed");
    assert!(second.is_ok(), "Second initialization should be idempotent");

    // Cleanup
    std::fs::remove_dir_all(&temp_dir).ok();
}
