//! Unit tests for error.rs
//!
//! Tests all Error variants, their Display output and the From conversions.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_io_error_display() {
    let err = Error::Io("asset_registry.ron: permission denied".to_string());
    let display = format!("{}", err);
    assert!(display.contains("I/O error"));
    assert!(display.contains("permission denied"));
}

#[test]
fn test_invalid_data_display() {
    let err = Error::InvalidData("blob truncated at offset 12".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid data"));
    assert!(display.contains("offset 12"));
}

#[test]
fn test_serialization_display() {
    let err = Error::Serialization("expected map".to_string());
    assert_eq!(format!("{}", err), "Serialization error: expected map");
}

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("texture upload rejected".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("texture upload rejected"));
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("asset handle 42 not registered".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("handle 42"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::InvalidData("x".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::Io("a".to_string()));
    assert!(debug.contains("Io"));

    let debug = format!("{:?}", Error::BackendError("b".to_string()));
    assert!(debug.contains("BackendError"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::InvalidResource("res".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// CONVERSIONS
// ============================================================================

#[test]
fn test_from_io_error() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.tex");
    let err: Error = io.into();
    match err {
        Error::Io(msg) => assert!(msg.contains("missing.tex")),
        other => panic!("expected Io, got {:?}", other),
    }
}

#[test]
fn test_from_ron_spanned_error() {
    let parsed: std::result::Result<Vec<u32>, _> = ron::from_str("[1, 2,");
    let err: Error = parsed.unwrap_err().into();
    assert!(matches!(err, Error::Serialization(_)));
}

// ============================================================================
// ERROR PROPAGATION TESTS
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::InvalidData("bad".to_string()))
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    assert!(outer().is_err());
}

#[test]
fn test_io_error_propagation_with_question_mark() {
    fn read_missing() -> Result<Vec<u8>> {
        let bytes = std::fs::read("/definitely/not/a/real/path.tex")?;
        Ok(bytes)
    }

    assert!(matches!(read_missing(), Err(Error::Io(_))));
}
