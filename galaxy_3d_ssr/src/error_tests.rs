//! Unit tests for error.rs
//!
//! Tests all Error variants, their Display output and the error macros.

use crate::error::{Error, Result};
use serial_test::serial;

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("command list already submitted".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("command list already submitted"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("material shader mismatch".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("material shader mismatch"));
}

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("device not registered".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Initialization failed"));
    assert!(display.contains("device not registered"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone_keeps_message() {
    let err = Error::InvalidResource("hit texture".to_string());
    match err.clone() {
        Error::InvalidResource(msg) => assert_eq!(msg, "hit texture"),
        other => panic!("unexpected variant {:?}", other),
    }
}

#[test]
fn test_result_question_mark_propagation() {
    fn inner() -> Result<u32> {
        Err(Error::OutOfMemory)
    }
    fn outer() -> Result<u32> {
        let value = inner()?;
        Ok(value + 1)
    }
    assert!(matches!(outer(), Err(Error::OutOfMemory)));
}

// ============================================================================
// MACRO TESTS
// ============================================================================

#[test]
#[serial]
fn test_engine_err_builds_backend_error() {
    let err = crate::engine_err!("galaxy3d::ssr::test", "slot {} missing", 2);
    match err {
        Error::BackendError(msg) => assert_eq!(msg, "slot 2 missing"),
        other => panic!("unexpected variant {:?}", other),
    }
}

#[test]
#[serial]
fn test_engine_bail_returns_early() {
    fn check(width: u32) -> Result<u32> {
        if width == 0 {
            crate::engine_bail!("galaxy3d::ssr::test", "zero width");
        }
        Ok(width)
    }
    assert!(check(0).is_err());
    assert_eq!(check(4).unwrap(), 4);
}
