//! Diagnostic system for Quill build files.
//!
//! A diagnostic carries:
//! - an error code for searchability
//! - a message saying what went wrong
//! - a primary span saying where
//! - optional secondary labels, notes and help lines
//!
//! # Error Guarantees
//!
//! `ErrorGuaranteed` is type-level proof that at least one error reached a
//! `DiagnosticQueue`. It can only be obtained from the queue.

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
