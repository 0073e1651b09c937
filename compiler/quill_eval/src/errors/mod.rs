//! Evaluation errors.
//!
//! Every failure is an `EvalError` carrying a typed `EvalErrorKind`, the
//! user-facing message, a source span, and optional notes and help. Errors
//! are only built through the `#[cold]` factory functions below, and
//! `EvalError::to_diagnostic` maps them onto stable E6xxx codes.
//!
//! All of these are hard errors: they abort the statement sequence that is
//! running. A variable that is merely absent (for example a name passed to
//! `mark_used_from` that nothing defines) is never an error.

use quill_diagnostic::{Diagnostic, ErrorCode};
use quill_ir::{Span, StringInterner};

use crate::environment::ScopeClosed;
use crate::value::{Value, ValueKind};

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
///
/// `Display` produces the primary message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("Wrong number of arguments to {function}().")]
    ArityMismatch {
        function: String,
        expected: &'static str,
    },
    #[error("Expected {expected}.")]
    NotAnIdentifier { expected: &'static str },
    #[error("Undefined identifier `{name}`.")]
    UndefinedIdentifier { name: String },
    #[error("Unknown function `{name}`.")]
    UndefinedFunction { name: String },
    #[error("This is not {} {expected}.", .expected.article())]
    TypeMismatch { expected: ValueKind, got: ValueKind },
    #[error("Incompatible types for `{op}`: {left} and {right}.")]
    InvalidOperands {
        op: &'static str,
        left: ValueKind,
        right: ValueKind,
    },
    #[error("Integer overflow in `{op}`.")]
    IntegerOverflow { op: &'static str },
    #[error("`{function}()` does not produce a value.")]
    NoValue { function: String },
    #[error("Not a valid list of variables to exclude.")]
    InvalidExclusionList,
    #[error("Not a valid list of variables to {purpose}.")]
    InvalidSelector { purpose: &'static str },
    #[error("Clobbering existing value.")]
    ClobberedVariable { name: String },
    #[error("This overwrites a previous assignment to `{name}` that had no effect.")]
    OverwroteUnusedAssignment { name: String },
    #[error("Duplicate template definition `{name}`.")]
    TemplateRedefined { name: String },
    #[error("`{function}()` needs a {{ }} block.")]
    BlockRequired { function: String },
    #[error("`{function}()` does not take a {{ }} block.")]
    BlockNotAllowed { function: String },
    #[error("Item not found.")]
    ItemNotFound { item: String },
    #[error(transparent)]
    ScopeClosed(#[from] ScopeClosed),
}

impl EvalErrorKind {
    /// Map this error kind to its corresponding `ErrorCode`.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ArityMismatch { .. } => ErrorCode::E6001,
            Self::NotAnIdentifier { .. } => ErrorCode::E6002,
            Self::UndefinedIdentifier { .. } => ErrorCode::E6003,
            Self::UndefinedFunction { .. } => ErrorCode::E6004,
            Self::TypeMismatch { .. } | Self::InvalidOperands { .. } | Self::NoValue { .. } => {
                ErrorCode::E6010
            }
            Self::InvalidExclusionList => ErrorCode::E6011,
            Self::InvalidSelector { .. } => ErrorCode::E6012,
            Self::IntegerOverflow { .. } => ErrorCode::E6013,
            Self::ClobberedVariable { .. } => ErrorCode::E6020,
            Self::OverwroteUnusedAssignment { .. } => ErrorCode::E6021,
            Self::TemplateRedefined { .. } => ErrorCode::E6022,
            Self::BlockRequired { .. } => ErrorCode::E6023,
            Self::BlockNotAllowed { .. } => ErrorCode::E6024,
            Self::ItemNotFound { .. } => ErrorCode::E6025,
            Self::ScopeClosed(_) => ErrorCode::E6030,
        }
    }

    /// Produce a concise label for the primary span.
    pub fn primary_label(&self) -> &'static str {
        match self {
            Self::ArityMismatch { .. } => "wrong number of arguments",
            Self::NotAnIdentifier { .. } => "not an identifier",
            Self::UndefinedIdentifier { .. } => "not found in this scope",
            Self::UndefinedFunction { .. } => "function not found",
            Self::TypeMismatch { .. } => "wrong type",
            Self::InvalidOperands { .. } => "mismatched types",
            Self::IntegerOverflow { .. } => "overflow occurred here",
            Self::NoValue { .. } => "used as a value here",
            Self::InvalidExclusionList => "invalid exclusion list",
            Self::InvalidSelector { .. } => "invalid variable list",
            Self::ClobberedVariable { .. } => "would overwrite an existing variable",
            Self::OverwroteUnusedAssignment { .. } => "overwritten here",
            Self::TemplateRedefined { .. } => "redefined here",
            Self::BlockRequired { .. } => "missing block",
            Self::BlockNotAllowed { .. } => "unexpected block",
            Self::ItemNotFound { .. } => "not in the list",
            Self::ScopeClosed(_) => "scope already closed",
        }
    }
}

/// Additional context note attached to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
    pub span: Option<Span>,
}

impl EvalNote {
    /// Create a note with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
        }
    }

    /// Create a note with a message and source location.
    pub fn with_span(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured error category for diagnostic conversion.
    pub kind: EvalErrorKind,
    /// Human-readable error message; equals `kind.to_string()`.
    pub message: String,
    /// Source location of the offending node.
    pub span: Option<Span>,
    /// Additional context notes.
    pub notes: Vec<EvalNote>,
    /// A hint for fixing the error.
    pub help: Option<String>,
}

impl EvalError {
    /// Create an error from a structured kind.
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            notes: Vec::new(),
            help: None,
        }
    }

    /// Attach a source span to this error.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach a span only if none has been set yet.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    /// Add a context note to this error.
    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Convert this `EvalError` into a `Diagnostic`.
    ///
    /// Notes with a span become secondary labels; the rest become notes.
    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.kind.error_code()).with_message(&self.message);

        if let Some(span) = self.span {
            diag = diag.with_label(span, self.kind.primary_label());
        }

        for note in &self.notes {
            diag = match note.span {
                Some(span) => diag.with_secondary_label(span, &note.message),
                None => diag.with_note(&note.message),
            };
        }

        if let Some(help) = &self.help {
            diag = diag.with_help(help);
        }

        diag
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

impl From<ScopeClosed> for EvalError {
    fn from(err: ScopeClosed) -> Self {
        EvalError::from_kind(EvalErrorKind::ScopeClosed(err))
    }
}

// Call shape

/// Argument count outside what the function accepts.
#[cold]
pub fn arity_mismatch(function: &str, expected: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        function: function.to_string(),
        expected,
    })
    .with_help(format!("Expecting {expected}."))
}

/// An argument that must be a bare identifier was an expression.
#[cold]
pub fn not_an_identifier(expected: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotAnIdentifier { expected })
}

#[cold]
pub fn undefined_identifier(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedIdentifier {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_string(),
    })
    .with_help("Only built-in functions, target kinds and templates defined earlier can be called.")
}

#[cold]
pub fn block_required(function: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BlockRequired {
        function: function.to_string(),
    })
}

#[cold]
pub fn block_not_allowed(function: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BlockNotAllowed {
        function: function.to_string(),
    })
}

#[cold]
pub fn no_value(function: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoValue {
        function: function.to_string(),
    })
}

// Values

/// A value of the wrong kind, with the offending value in the hint.
#[cold]
pub fn type_mismatch(expected: ValueKind, got: &Value, interner: &StringInterner) -> EvalError {
    let got_kind = got.kind();
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected,
        got: got_kind,
    })
    .with_help(format!(
        "Instead I see {} {got_kind} = {}",
        got_kind.article(),
        got.display(interner)
    ))
}

#[cold]
pub fn invalid_operands(op: &'static str, left: ValueKind, right: ValueKind) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidOperands { op, left, right })
}

#[cold]
pub fn integer_overflow(op: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow { op })
}

/// `-=` / `-` on a list with an item the list does not contain.
#[cold]
pub fn item_not_found(item: &Value, interner: &StringInterner) -> EvalError {
    let item = item.display(interner).to_string();
    EvalError::from_kind(EvalErrorKind::ItemNotFound { item: item.clone() })
        .with_help(format!("You were trying to remove {item} but it wasn't there."))
}

// Variable lists

#[cold]
pub fn invalid_exclusion_list() -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidExclusionList)
        .with_help("Expecting a list of strings.")
}

/// `purpose` completes "Not a valid list of variables to ...".
#[cold]
pub fn invalid_selector(purpose: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidSelector { purpose })
        .with_help("Expecting either the string \"*\" or a list of strings.")
}

// Definitions

#[cold]
pub fn clobbered_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ClobberedVariable {
        name: name.to_string(),
    })
    .with_help(format!(
        "The item you're trying to copy (`{name}`) already exists in this scope."
    ))
}

/// `name = ...` where the previous local value of `name` was never read.
#[cold]
pub fn overwrote_unused_assignment(name: &str, previous: Span) -> EvalError {
    EvalError::from_kind(EvalErrorKind::OverwroteUnusedAssignment {
        name: name.to_string(),
    })
    .with_note(EvalNote::with_span("previous assignment was here", previous))
    .with_help("Remove the earlier assignment, or read it before assigning again.")
}

#[cold]
pub fn template_redefined(name: &str, previous: Span) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TemplateRedefined {
        name: name.to_string(),
    })
    .with_note(EvalNote::with_span("first defined here", previous))
}
