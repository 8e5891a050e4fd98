//! The typing context: an immutable-by-convention mapping from names to
//! typings, definitions, and declared inductives.

use std::collections::HashMap;

use crate::registry::Inductive;
use crate::term::Term;

/// A `(typings, definitions, inductives)` triple.
///
/// `typings` and `definitions` are disjoint per variable: extending one
/// entry for a name removes any entry the other map held for that name, so
/// the invariant holds by construction rather than by assertion.
///
/// Extension (`extend_ty`/`extend_def`) is non-destructive: it clones the
/// context and returns the derived copy, matching spec's contract that a
/// typing only exists for the lexical scope it was introduced in. Inductive
/// declaration is the one place the context is mutated in place — the
/// registry is append-only for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct Context {
    typings: HashMap<String, Term>,
    definitions: HashMap<String, Term>,
    inductives: HashMap<String, Inductive>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    pub fn contains_ty(&self, name: &str) -> bool {
        self.typings.contains_key(name)
    }

    pub fn contains_def(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn lookup_ty(&self, name: &str) -> Option<&Term> {
        self.typings.get(name)
    }

    pub fn lookup_def(&self, name: &str) -> Option<&Term> {
        self.definitions.get(name)
    }

    pub fn lookup_inductive(&self, name: &str) -> Option<&Inductive> {
        self.inductives.get(name)
    }

    /// Returns a context derived from `self` with `name` bound to a
    /// hypothesis of type `ty`. Any definition previously recorded for
    /// `name` is dropped, preserving the typings/definitions disjointness
    /// invariant.
    #[must_use]
    pub fn extend_ty(&self, name: impl Into<String>, ty: Term) -> Context {
        let mut ctx = self.clone();
        let name = name.into();
        ctx.definitions.remove(&name);
        ctx.typings.insert(name, ty);
        ctx
    }

    /// Returns a context derived from `self` with `name` bound to
    /// `definitions[name] = term`. Any hypothesis previously recorded for
    /// `name` is dropped.
    #[must_use]
    pub fn extend_def(&self, name: impl Into<String>, term: Term) -> Context {
        let mut ctx = self.clone();
        let name = name.into();
        ctx.typings.remove(&name);
        ctx.definitions.insert(name, term);
        ctx
    }

    /// Transiently extends `self` with a hypothesis for the scope of `f`,
    /// then discards the extension. Prefer this over manual
    /// clone-then-extend inside a single rule's local scope.
    pub fn with_binding<T>(&self, name: impl Into<String>, ty: Term, f: impl FnOnce(&Context) -> T) -> T {
        let extended = self.extend_ty(name, ty);
        f(&extended)
    }

    pub(crate) fn insert_inductive(&mut self, ind: Inductive) {
        self.inductives.insert(ind.name.clone(), ind);
    }

    pub(crate) fn with_inductive_mut(&mut self, name: &str, f: impl FnOnce(&mut Inductive)) {
        if let Some(ind) = self.inductives.get_mut(name) {
            f(ind);
        }
    }
}
