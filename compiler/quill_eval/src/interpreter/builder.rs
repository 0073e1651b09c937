//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use quill_diagnostic::{DiagnosticConfig, DiagnosticQueue};
use quill_ir::{AstArena, StringInterner};
use rustc_hash::{FxHashMap, FxHashSet};

use super::{InternedNames, Interpreter};
use crate::environment::Environment;
use crate::target::{CollectingSink, TargetSink};

/// Target kinds recognised when none are configured.
pub const DEFAULT_TARGET_KINDS: &[&str] = &[
    "action",
    "copy",
    "executable",
    "group",
    "shared_library",
    "source_set",
    "static_library",
];

/// Builder for creating Interpreter instances with various configurations.
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    arena: &'a AstArena,
    env: Option<Environment>,
    diagnostic_config: DiagnosticConfig,
    check_root_scope: bool,
    target_kinds: Vec<String>,
    target_sink: Option<Box<dyn TargetSink>>,
}

impl<'a> InterpreterBuilder<'a> {
    /// Create a new builder with the default configuration.
    pub fn new(interner: &'a StringInterner, arena: &'a AstArena) -> Self {
        Self {
            interner,
            arena,
            env: None,
            diagnostic_config: DiagnosticConfig::default(),
            check_root_scope: false,
            target_kinds: DEFAULT_TARGET_KINDS.iter().map(|s| (*s).to_string()).collect(),
            target_sink: None,
        }
    }

    /// Set the initial environment.
    #[must_use]
    pub fn env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    /// Maximum number of error diagnostics kept (0 = unlimited).
    #[must_use]
    pub fn error_limit(mut self, limit: usize) -> Self {
        self.diagnostic_config.error_limit = limit;
        self
    }

    /// Replace the whole diagnostic queue configuration.
    #[must_use]
    pub fn diagnostic_config(mut self, config: DiagnosticConfig) -> Self {
        self.diagnostic_config = config;
        self
    }

    /// Also report unused variables of the file-level scope.
    #[must_use]
    pub fn check_root_scope(mut self, check: bool) -> Self {
        self.check_root_scope = check;
        self
    }

    /// Replace the set of target-declaring function names.
    #[must_use]
    pub fn target_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_kinds = kinds.into_iter().map(Into::into).collect();
        self
    }

    /// Add one target-declaring function name.
    #[must_use]
    pub fn target_kind(mut self, kind: impl Into<String>) -> Self {
        self.target_kinds.push(kind.into());
        self
    }

    /// Set the receiver of declared targets. Default is a `CollectingSink`.
    #[must_use]
    pub fn target_sink(mut self, sink: Box<dyn TargetSink>) -> Self {
        self.target_sink = Some(sink);
        self
    }

    /// Build the interpreter.
    pub fn build(self) -> Interpreter<'a> {
        let interner = self.interner;
        let target_kinds: FxHashSet<_> = self
            .target_kinds
            .iter()
            .map(|kind| interner.intern(kind))
            .collect();
        Interpreter {
            interner,
            arena: self.arena,
            env: self.env.unwrap_or_default(),
            templates: FxHashMap::default(),
            diagnostics: DiagnosticQueue::with_config(self.diagnostic_config),
            target_kinds,
            target_sink: self
                .target_sink
                .unwrap_or_else(|| Box::new(CollectingSink::new())),
            check_root_scope: self.check_root_scope,
            names: InternedNames::new(interner),
        }
    }
}
