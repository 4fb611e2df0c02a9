//! Test utilities for Scoremate
//!
//! Temporary directories, test files, and a small sample dataset.

use std::path::PathBuf;
use tempfile::TempDir;

/// Header plus three customers, one of them defaulted
pub const SAMPLE_CSV: &str = "CUST_ID,INCOME,SAVINGS,DEBT,CREDIT_SCORE,DEFAULT\n\
C03PVPPHOY,45000,1200,30000,600,0\n\
C02COQEVYU,90000,25000,10000,700,1\n\
C0AB12CDEF,60000,8000,5000,800,0\n";

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error's message contains `expected`
///
/// # Panics
///
/// Panics if the result is Ok or if the message doesn't match
pub fn assert_error_contains<T: std::fmt::Debug>(result: crate::error::Result<T>, expected: &str) {
    match result {
        Ok(v) => panic!("Expected error containing '{}', got Ok({:?})", expected, v),
        Err(e) => {
            let message = format!("{:#}", e);
            assert!(
                message.contains(expected),
                "Error message '{}' does not contain '{}'",
                message,
                expected
            );
        }
    }
}
