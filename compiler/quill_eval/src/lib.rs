#![deny(clippy::arithmetic_side_effects)]
//! Quill Eval - scope engine and evaluator for Quill build files.
//!
//! # Architecture
//!
//! - `Value`: the six value kinds, with scopes shared by handle
//! - `Scope` / `Environment`: nested scopes with per-binding used flags and
//!   a one-way open/closed lifecycle
//! - `builtins`: `mark_used_from`, `not_needed`, `forward_variables_from`,
//!   `defined` and `template`, which receive unevaluated arguments
//! - `Interpreter`: walks an `AstArena`, invokes templates and target
//!   declarations, and runs the unused-variable pass when a scope closes
//!
//! # Used tracking
//!
//! Reading a variable through `Scope::lookup` is not a pure operation: it
//! flips the binding's used flag. A scope that closes normally reports
//! every local binding that was never read as "assignment had no effect".
//! Scopes abandoned because of an error are never reported.

pub mod builtins;
mod diagnostics;
mod environment;
pub mod errors;
pub mod interpreter;
mod operators;
mod stack;
mod target;
mod tracing_setup;
mod value;

pub use builtins::BuiltinFunction;
pub use diagnostics::unused_variable;
pub use environment::{
    Environment, LocalScope, Scope, ScopeClosed, ScopeState, SearchMode, UnusedBinding,
};
pub use errors::{EvalError, EvalErrorKind, EvalNote, EvalResult};
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter, DEFAULT_TARGET_KINDS};
pub use operators::{apply_compound, evaluate_binary};
pub use stack::ensure_sufficient_stack;
pub use target::{CollectingSink, Target, TargetDeclaration, TargetSink};
pub use tracing_setup::init_tracing;
pub use value::{Value, ValueDisplay, ValueKind};
