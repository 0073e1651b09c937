//! Nested scopes with used-tracking.
//!
//! A `Scope` maps names to bindings and refers (without owning) to one
//! parent scope for nested lookup. Every binding carries a `used` flag that
//! successful reads set as a side effect. When the block that owns a scope
//! finishes normally the scope is closed, which freezes it and yields the
//! bindings that were never read.
//!
//! `Environment` keeps the stack of scopes that are currently being
//! evaluated, from the file-level root up to the innermost block.

// Rc is the intentional implementation detail of LocalScope<T>
#![expect(
    clippy::disallowed_types,
    reason = "Rc is the implementation of LocalScope<T>"
)]

use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use quill_ir::{Name, Span};

use crate::Value;

/// A single-threaded scope wrapper for reference-counted interior mutability.
///
/// This type wraps `Rc<RefCell<T>>` and enforces that all scope allocations
/// go through the `LocalScope::new()` factory method.
///
/// # Thread Safety
/// `LocalScope<T>` is NOT thread-safe. Evaluation of one build file is
/// single-threaded, and scopes never cross evaluator boundaries.
///
/// # Borrowing
/// Borrows must stay short: never hold a `borrow_mut()` across evaluation of
/// an expression, since evaluation may read the same scope through a child.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    /// Create a new `LocalScope` wrapping the given value.
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Borrow the inner value immutably.
    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    /// Borrow the inner value mutably.
    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Whether both handles refer to the same allocation.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Where a lookup is allowed to look.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchMode {
    /// Only the scope's own bindings.
    LocalOnly,
    /// The scope, then its parent, recursively. Nearest binding wins.
    SearchNested,
}

/// Lifecycle of a scope. The transition is one-way.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ScopeState {
    /// Accepting definitions, lookups and marks.
    #[default]
    Open,
    /// The unused-variable pass has run; nothing changes any more.
    Closed,
}

/// Error returned when defining into a scope that was already closed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot define a variable in a scope that has already been closed")]
pub struct ScopeClosed;

/// A local binding that was never read, reported when its scope closes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnusedBinding {
    pub name: Name,
    /// Where the binding was defined.
    pub origin: Span,
}

/// A variable binding.
#[derive(Clone, Debug)]
struct Binding {
    value: Value,
    used: bool,
    origin: Span,
}

/// A single scope containing variable bindings.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    /// Variable bindings in this scope (`FxHashMap` for faster hashing with `Name` keys).
    bindings: FxHashMap<Name, Binding>,
    /// Parent scope (for lexical scoping). Not owned.
    parent: Option<LocalScope<Scope>>,
    state: ScopeState,
}

impl Scope {
    /// Create a new empty scope with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new scope with a parent.
    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn parent(&self) -> Option<&LocalScope<Scope>> {
        self.parent.as_ref()
    }

    /// Drop the parent reference, leaving only local bindings reachable.
    pub fn take_parent(&mut self) -> Option<LocalScope<Scope>> {
        self.parent.take()
    }

    pub fn state(&self) -> ScopeState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == ScopeState::Closed
    }

    /// Define a variable in this scope.
    ///
    /// Inserts or overwrites the local binding and resets its used flag.
    /// Enclosing scopes are never touched.
    pub fn define(&mut self, name: Name, value: Value, origin: Span) -> Result<(), ScopeClosed> {
        if self.is_closed() {
            tracing::warn!(?name, "define on a closed scope");
            return Err(ScopeClosed);
        }
        tracing::trace!(?name, ?origin, "define");
        self.bindings.insert(
            name,
            Binding {
                value,
                used: false,
                origin,
            },
        );
        Ok(())
    }

    /// Look up a variable, marking the binding that is found as used.
    ///
    /// Returns `None` if the name is absent from every scope `mode` allows;
    /// absence is not an error at this level. Scope values are returned as
    /// handles sharing identity with the stored scope.
    pub fn lookup(&mut self, name: Name, mode: SearchMode) -> Option<Value> {
        let open = !self.is_closed();
        if let Some(binding) = self.bindings.get_mut(&name) {
            if open && !binding.used {
                tracing::trace!(?name, "marked used by lookup");
                binding.used = true;
            }
            return Some(binding.value.clone());
        }
        match (&self.parent, mode) {
            (Some(parent), SearchMode::SearchNested) => parent.borrow_mut().lookup(name, mode),
            _ => None,
        }
    }

    /// Look up a variable without touching any used flag.
    pub fn peek(&self, name: Name, mode: SearchMode) -> Option<Value> {
        if let Some(binding) = self.bindings.get(&name) {
            return Some(binding.value.clone());
        }
        match (&self.parent, mode) {
            (Some(parent), SearchMode::SearchNested) => parent.borrow().peek(name, mode),
            _ => None,
        }
    }

    /// Mutable lookup: marks the binding used (the old value counts as read)
    /// and runs `f` on the stored value in place.
    ///
    /// `f` must not borrow the scope that holds the binding.
    pub fn with_mutable<R>(
        &mut self,
        name: Name,
        mode: SearchMode,
        f: impl FnOnce(&mut Value) -> R,
    ) -> Option<R> {
        let open = !self.is_closed();
        if let Some(binding) = self.bindings.get_mut(&name) {
            if open {
                binding.used = true;
            }
            return Some(f(&mut binding.value));
        }
        match (&self.parent, mode) {
            (Some(parent), SearchMode::SearchNested) => {
                parent.borrow_mut().with_mutable(name, mode, f)
            }
            _ => None,
        }
    }

    /// Mark a local binding used. Absent names are ignored.
    pub fn mark_used(&mut self, name: Name) {
        if self.is_closed() {
            return;
        }
        if let Some(binding) = self.bindings.get_mut(&name) {
            binding.used = true;
        }
    }

    /// Mark every local binding used, except the names in `exclusions`,
    /// which are left exactly as they were.
    pub fn mark_all_used(&mut self, exclusions: &FxHashSet<Name>) {
        if self.is_closed() {
            return;
        }
        for (name, binding) in &mut self.bindings {
            if !exclusions.contains(name) {
                binding.used = true;
            }
        }
        tracing::trace!(
            bindings = self.bindings.len(),
            excluded = exclusions.len(),
            "marked all used"
        );
    }

    /// Whether `name` is a local binding that has been read.
    pub fn is_used(&self, name: Name) -> bool {
        self.bindings.get(&name).is_some_and(|b| b.used)
    }

    /// Whether `name` is a local binding that has not been read yet.
    pub fn is_set_but_unused(&self, name: Name) -> bool {
        self.bindings.get(&name).is_some_and(|b| !b.used)
    }

    pub fn contains_local(&self, name: Name) -> bool {
        self.bindings.contains_key(&name)
    }

    /// Definition site of a local binding.
    pub fn origin(&self, name: Name) -> Option<Span> {
        self.bindings.get(&name).map(|b| b.origin)
    }

    /// Local binding names, sorted by interned id.
    pub fn local_names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.bindings.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Local bindings in definition order, without marking anything.
    pub fn local_values(&self) -> Vec<(Name, Value)> {
        let mut entries: Vec<(Span, Name, Value)> = self
            .bindings
            .iter()
            .map(|(&name, b)| (b.origin, name, b.value.clone()))
            .collect();
        entries.sort_by_key(|(origin, name, _)| (*origin, *name));
        entries
            .into_iter()
            .map(|(_, name, value)| (name, value))
            .collect()
    }

    /// Number of local bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Close the scope and run the unused-variable pass.
    ///
    /// Returns the local bindings that were never read, ordered by
    /// definition site. Only the first call does anything; later calls
    /// return `None`.
    pub fn close(&mut self) -> Option<Vec<UnusedBinding>> {
        if self.is_closed() {
            return None;
        }
        self.state = ScopeState::Closed;
        let mut unused: Vec<UnusedBinding> = self
            .bindings
            .iter()
            .filter(|(_, b)| !b.used)
            .map(|(&name, b)| UnusedBinding {
                name,
                origin: b.origin,
            })
            .collect();
        unused.sort_by_key(|u| (u.origin, u.name));
        tracing::trace!(unused = unused.len(), "scope closed");
        Some(unused)
    }

    /// Open copy of this scope whose nested scope values are copies too.
    ///
    /// Used flags are kept; the parent reference is shared.
    pub fn detached_copy(&self) -> Scope {
        Scope {
            bindings: self
                .bindings
                .iter()
                .map(|(&name, b)| {
                    (
                        name,
                        Binding {
                            value: b.value.detached(),
                            used: b.used,
                            origin: b.origin,
                        },
                    )
                })
                .collect(),
            parent: self.parent.clone(),
            state: ScopeState::Open,
        }
    }

    /// Whether both scopes hold equal values under the same local names.
    pub fn same_values(&self, other: &Scope) -> bool {
        self.bindings.len() == other.bindings.len()
            && self.bindings.iter().all(|(name, b)| {
                other
                    .bindings
                    .get(name)
                    .is_some_and(|o| o.value == b.value)
            })
    }
}

/// Environment for the interpreter using a scope stack.
///
/// The root scope is always at the bottom and is never popped.
pub struct Environment {
    /// Stack of scopes, with current scope at the top.
    scopes: Vec<LocalScope<Scope>>,
    /// File-level scope.
    root: LocalScope<Scope>,
}

impl Environment {
    /// Create a new environment with an empty root scope.
    pub fn new() -> Self {
        let root = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![root.clone()],
            root,
        }
    }

    /// Get the current scope depth (1 when only the root is active).
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Push a new scope whose parent is the current scope.
    #[inline]
    pub fn push_scope(&mut self) {
        let parent = self.current();
        self.push_scope_with_parent(parent);
    }

    /// Push a new scope with an explicit parent.
    ///
    /// Template bodies use this: their parent is the scope the template was
    /// defined in, not the scope it is invoked from.
    pub fn push_scope_with_parent(&mut self, parent: LocalScope<Scope>) {
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
        tracing::trace!(depth = self.scopes.len(), "push scope");
    }

    /// Pop the current scope without closing it.
    ///
    /// This is how scopes are abandoned after an error: no unused-variable
    /// pass runs. The root scope is never popped.
    #[inline]
    pub fn pop_scope(&mut self) -> Option<LocalScope<Scope>> {
        if self.scopes.len() > 1 {
            tracing::trace!(depth = self.scopes.len(), "pop scope");
            self.scopes.pop()
        } else {
            None
        }
    }

    /// Pop the current scope and close it.
    ///
    /// Returns the unused bindings, or `None` if only the root is active or
    /// the scope was already closed.
    pub fn close_scope(&mut self) -> Option<Vec<UnusedBinding>> {
        let scope = self.pop_scope()?;
        let mut scope = scope.borrow_mut();
        scope.close()
    }

    /// Get the current scope.
    #[inline]
    pub fn current(&self) -> LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.root).clone()
    }

    /// The file-level scope.
    pub fn root(&self) -> &LocalScope<Scope> {
        &self.root
    }

    /// Define a variable in the current scope.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value, origin: Span) -> Result<(), ScopeClosed> {
        self.scopes
            .last()
            .unwrap_or(&self.root)
            .borrow_mut()
            .define(name, value, origin)
    }

    /// Look up a variable from the current scope outwards, marking it used.
    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.scopes
            .last()
            .unwrap_or(&self.root)
            .borrow_mut()
            .lookup(name, SearchMode::SearchNested)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
