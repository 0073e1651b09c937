//! Error codes for evaluator diagnostics.
//!
//! Codes are stable identifiers (`E6003`) that users can search for. The
//! first digit is the phase; everything in this language's evaluator lives
//! in the E6xxx runtime range, with internal errors in E9xxx.

use std::fmt;

/// Error codes for all evaluator diagnostics.
///
/// - E600x: call shape (arity, identifier arguments, undefined names)
/// - E601x: value kind mismatches
/// - E602x: assignment and definition conflicts
/// - E603x: scope lifecycle misuse
/// - E6090: assignment had no effect (unused variable)
/// - E9xxx: internal
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Wrong number of arguments to a built-in
    E6001,
    /// Argument must be a bare identifier
    E6002,
    /// Undefined identifier
    E6003,
    /// Unknown function
    E6004,
    /// Value has the wrong kind
    E6010,
    /// Invalid list of variables to exclude
    E6011,
    /// Invalid variable selector (neither `"*"` nor a list of strings)
    E6012,
    /// Integer arithmetic overflowed
    E6013,
    /// Forwarding would clobber an existing variable
    E6020,
    /// Assignment overwrites a value that was never read
    E6021,
    /// Template defined twice
    E6022,
    /// Call requires a `{ }` block
    E6023,
    /// Call does not take a `{ }` block
    E6024,
    /// Item to remove is not in the list
    E6025,
    /// Definition in a scope that was already closed
    E6030,
    /// Assignment had no effect
    E6090,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// Get the code as a string (e.g., "E6003").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6010 => "E6010",
            ErrorCode::E6011 => "E6011",
            ErrorCode::E6012 => "E6012",
            ErrorCode::E6013 => "E6013",
            ErrorCode::E6020 => "E6020",
            ErrorCode::E6021 => "E6021",
            ErrorCode::E6022 => "E6022",
            ErrorCode::E6023 => "E6023",
            ErrorCode::E6024 => "E6024",
            ErrorCode::E6025 => "E6025",
            ErrorCode::E6030 => "E6030",
            ErrorCode::E6090 => "E6090",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// One-line description, used by `--explain` style lookups.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E6001 => "wrong number of arguments",
            ErrorCode::E6002 => "expected an identifier",
            ErrorCode::E6003 => "undefined identifier",
            ErrorCode::E6004 => "unknown function",
            ErrorCode::E6010 => "value has the wrong type",
            ErrorCode::E6011 => "invalid list of variables to exclude",
            ErrorCode::E6012 => "invalid list of variables",
            ErrorCode::E6013 => "integer overflow",
            ErrorCode::E6020 => "clobbering existing value",
            ErrorCode::E6021 => "overwriting a value that had no effect",
            ErrorCode::E6022 => "duplicate template definition",
            ErrorCode::E6023 => "missing block",
            ErrorCode::E6024 => "unexpected block",
            ErrorCode::E6025 => "item not found",
            ErrorCode::E6030 => "scope is closed",
            ErrorCode::E6090 => "assignment had no effect",
            ErrorCode::E9002 => "too many errors",
        }
    }

    /// Whether this code reports a variable that was set and never read.
    pub fn is_unused_variable(&self) -> bool {
        matches!(self, ErrorCode::E6021 | ErrorCode::E6090)
    }

    /// Whether this code reports a malformed argument to a built-in.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E6001 | ErrorCode::E6002 | ErrorCode::E6011 | ErrorCode::E6012
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
