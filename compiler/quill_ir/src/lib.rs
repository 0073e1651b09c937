//! Quill IR - source-level data structures for the Quill build language.
//!
//! This crate contains the types shared between the (external) parser and
//! the evaluator:
//! - Spans for source locations
//! - Names for interned identifiers
//! - The flat AST arena (`AstArena`) addressed by `ExprId`, `StmtId` and `BlockId`
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and string literals become `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, nodes refer to each other by index

mod ast;
mod interner;
mod name;
mod span;

pub use ast::{
    AssignOp, AstArena, BinaryOp, Block, BlockId, Call, Expr, ExprId, ExprKind, Stmt, StmtId,
    StmtKind, UnaryOp,
};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
