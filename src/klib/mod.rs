//! Kernel Library (KLib).
//!
//! Utilitários internos sem dependência de hardware.

pub mod test_framework;

pub use test_framework::{run_test_suite, SuiteReport, TestCase, TestResult};
