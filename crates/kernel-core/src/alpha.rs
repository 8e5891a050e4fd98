//! Alpha-canonicalization and alpha-equality.
//!
//! The kernel represents binders with names, not de Bruijn indices, so two
//! terms that differ only in bound-variable names (`lambda x : A, x` vs
//! `lambda y : A, y`) must compare equal. [`canon`] renames every bound
//! variable to a position-derived canonical name (`__a0`, `__a1`, ...); two
//! terms are alpha-equivalent exactly when their canonical forms are
//! structurally equal.
//!
//! Free variables (anything bound in the ambient [`Context`] rather than by
//! a binder inside the term) are left untouched — canonicalization only
//! touches names a binder inside the term itself introduces.

use std::collections::HashMap;

use crate::context::Context;
use crate::normalize::{normalize, Strategy};
use crate::term::{FixExpr, MatchArm, MatchExpr, Parameters, Term};

struct Canonicalizer {
    renamed: HashMap<String, String>,
    counter: u32,
}

impl Canonicalizer {
    fn fresh(&mut self) -> String {
        let name = format!("__a{}", self.counter);
        self.counter += 1;
        name
    }

    /// Renames `binder` to a fresh canonical name, recording the mapping for
    /// the duration of `f`, then restores whatever mapping (if any) `binder`
    /// had before — matching the lexical scoping of the binder itself.
    fn with_renamed<T>(&mut self, binder: &str, f: impl FnOnce(&mut Self, &str) -> T) -> T {
        let fresh = self.fresh();
        let previous = self.renamed.insert(binder.to_string(), fresh.clone());
        let result = f(self, &fresh);
        match previous {
            Some(prev) => {
                self.renamed.insert(binder.to_string(), prev);
            }
            None => {
                self.renamed.remove(binder);
            }
        }
        result
    }

    fn canon(&mut self, t: &Term) -> Term {
        match t {
            Term::Var(name) => match self.renamed.get(name) {
                Some(fresh) => Term::Var(fresh.clone()),
                // A free variable: bound in the context, not by an enclosing
                // binder inside this term. Left as-is.
                None => t.clone(),
            },
            Term::Sort(_) | Term::IndRef(_) | Term::ConRef(_, _) | Term::Hole(_) => t.clone(),
            Term::Product(name, var_ty, result_ty) => {
                let var_ty = self.canon(var_ty);
                self.with_renamed(name, |this, fresh| {
                    Term::Product(fresh.to_string(), Box::new(var_ty), Box::new(this.canon(result_ty)))
                })
            }
            Term::Lambda(name, var_ty, body) => {
                let var_ty = self.canon(var_ty);
                self.with_renamed(name, |this, fresh| {
                    Term::Lambda(fresh.to_string(), Box::new(var_ty), Box::new(this.canon(body)))
                })
            }
            Term::App(f, a) => Term::App(Box::new(self.canon(f)), Box::new(self.canon(a))),
            Term::Annot(term, ty) => Term::Annot(Box::new(self.canon(term)), Box::new(self.canon(ty))),
            Term::Axiom(ty) => Term::Axiom(Box::new(self.canon(ty))),
            Term::Match(m) => Term::Match(Box::new(self.canon_match(m))),
            Term::Fix(fx) => Term::Fix(Box::new(self.canon_fix(fx))),
        }
    }

    fn canon_match(&mut self, m: &MatchExpr) -> MatchExpr {
        let scrutinee = Box::new(self.canon(&m.scrutinee));

        // as_name and index_names are binders scoped over return_ty only.
        let binders: Vec<&str> = std::iter::once(m.as_name.as_str())
            .chain(m.index_names.iter().map(|s| s.as_str()))
            .collect();
        let (return_ty, mut fresh) = self.canon_scoped(&binders, &m.return_ty);
        let as_name = fresh.remove(0);
        let index_names = fresh;

        let arms = m.arms.iter().map(|arm| self.canon_arm(arm)).collect();

        MatchExpr {
            scrutinee,
            as_name,
            in_ind: m.in_ind.clone(),
            index_names,
            return_ty: Box::new(return_ty),
            arms,
        }
    }

    fn canon_arm(&mut self, arm: &MatchArm) -> MatchArm {
        let binders: Vec<&str> = arm.vars.iter().map(|s| s.as_str()).collect();
        let (result, vars) = self.canon_scoped(&binders, &arm.result);
        MatchArm { con_name: arm.con_name.clone(), vars, result }
    }

    /// Canonicalizes `body` under a sequence of binders introduced together
    /// (e.g. a `Match`'s `as_name`/`index_names`, or an arm's pattern
    /// variables), returning the canonicalized body and the binders' fresh
    /// names in order.
    fn canon_scoped(&mut self, binders: &[&str], body: &Term) -> (Term, Vec<String>) {
        match binders.split_first() {
            Some((head, rest)) => self.with_renamed(head, |this, fresh| {
                let fresh = fresh.to_string();
                let (body, mut names) = this.canon_scoped(rest, body);
                names.insert(0, fresh);
                (body, names)
            }),
            None => (self.canon(body), Vec::new()),
        }
    }

    fn canon_fix(&mut self, fx: &FixExpr) -> FixExpr {
        // self_name is bound over the whole fixpoint (params, return_ty,
        // body); each parameter's type is canonicalized before its own
        // binder takes effect, then its binder scopes over the rest of the
        // parameter list, return_ty, and body — mirroring a Product chain.
        self.with_renamed(&fx.self_name, |this, self_name| {
            let self_name = self_name.to_string();
            let (params, return_ty, body) = this.canon_params_then(&fx.params.0, &fx.return_ty, &fx.body);
            FixExpr {
                self_name,
                params,
                return_ty: Box::new(return_ty),
                body: Box::new(body),
            }
        })
    }

    /// Canonicalizes a parameter list left-to-right (each type seeing prior
    /// renames), then `return_ty`/`body` under every parameter's binder.
    fn canon_params_then(
        &mut self,
        remaining: &[(String, Term)],
        return_ty: &Term,
        body: &Term,
    ) -> (Parameters, Term, Term) {
        match remaining.split_first() {
            Some(((name, ty), rest)) => {
                let ty = self.canon(ty);
                self.with_renamed(name, |this, fresh| {
                    let (mut params, return_ty, body) = this.canon_params_then(rest, return_ty, body);
                    params.0.insert(0, (fresh.to_string(), ty));
                    (params, return_ty, body)
                })
            }
            None => (Parameters::empty(), self.canon(return_ty), self.canon(body)),
        }
    }
}

/// Renames every binder in `t` to a canonical, position-derived name. Free
/// variables are untouched.
pub fn canon(_ctx: &Context, t: &Term) -> Term {
    let mut c = Canonicalizer {
        renamed: HashMap::new(),
        counter: 0,
    };
    c.canon(t)
}

/// Structural equality up to bound-variable renaming.
pub fn alpha_equal(ctx: &Context, a: &Term, b: &Term) -> bool {
    canon(ctx, a) == canon(ctx, b)
}

/// Equality up to both reduction and alpha-renaming: normalizes both sides
/// under call-by-value, then compares canonical forms. This is the equality
/// the type checker uses for `Mismatch` — two types are interchangeable if
/// they reduce to the same normal form, not only if they're written
/// identically.
pub fn compare_terms(ctx: &Context, a: &Term, b: &Term) -> bool {
    let na = normalize(ctx, a, Strategy::Cbv);
    let nb = normalize(ctx, b, Strategy::Cbv);
    alpha_equal(ctx, &na, &nb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Sort;

    #[test]
    fn identical_binder_names_are_alpha_equal() {
        let ctx = Context::new();
        let a = Term::lambda("x", Term::Sort(Sort::Type(0)), Term::var("x"));
        let b = Term::lambda("x", Term::Sort(Sort::Type(0)), Term::var("x"));
        assert!(alpha_equal(&ctx, &a, &b));
    }

    #[test]
    fn different_binder_names_are_alpha_equal() {
        let ctx = Context::new();
        let a = Term::lambda("x", Term::Sort(Sort::Type(0)), Term::var("x"));
        let b = Term::lambda("y", Term::Sort(Sort::Type(0)), Term::var("y"));
        assert!(alpha_equal(&ctx, &a, &b));
    }

    #[test]
    fn free_variables_must_match() {
        let ctx = Context::new();
        let a = Term::lambda("x", Term::Sort(Sort::Type(0)), Term::var("f"));
        let b = Term::lambda("x", Term::Sort(Sort::Type(0)), Term::var("g"));
        assert!(!alpha_equal(&ctx, &a, &b));
    }

    #[test]
    fn nested_binders_rename_consistently() {
        let ctx = Context::new();
        let a = Term::lambda(
            "x",
            Term::Sort(Sort::Type(0)),
            Term::lambda("y", Term::var("x"), Term::app(Term::var("x"), Term::var("y"))),
        );
        let b = Term::lambda(
            "p",
            Term::Sort(Sort::Type(0)),
            Term::lambda("q", Term::var("p"), Term::app(Term::var("p"), Term::var("q"))),
        );
        assert!(alpha_equal(&ctx, &a, &b));
    }

    #[test]
    fn shadowing_inner_binder_reuses_outer_name_correctly() {
        let ctx = Context::new();
        // lambda x : T, lambda x : T, x  -- inner x shadows outer.
        let a = Term::lambda(
            "x",
            Term::Sort(Sort::Type(0)),
            Term::lambda("x", Term::Sort(Sort::Type(0)), Term::var("x")),
        );
        let b = Term::lambda(
            "p",
            Term::Sort(Sort::Type(0)),
            Term::lambda("q", Term::Sort(Sort::Type(0)), Term::var("q")),
        );
        assert!(alpha_equal(&ctx, &a, &b));
    }

    #[test]
    fn match_arm_vars_are_canonicalized() {
        let ctx = Context::new();
        let arm_a = MatchArm { con_name: "S".into(), vars: vec!["n".into()], result: Term::var("n") };
        let arm_b = MatchArm { con_name: "S".into(), vars: vec!["m".into()], result: Term::var("m") };
        let m_a = Term::Match(Box::new(MatchExpr {
            scrutinee: Box::new(Term::var("x")),
            as_name: "a".into(),
            in_ind: "nat".into(),
            index_names: vec![],
            return_ty: Box::new(Term::ind_ref("nat")),
            arms: vec![arm_a],
        }));
        let m_b = Term::Match(Box::new(MatchExpr {
            scrutinee: Box::new(Term::var("x")),
            as_name: "b".into(),
            in_ind: "nat".into(),
            index_names: vec![],
            return_ty: Box::new(Term::ind_ref("nat")),
            arms: vec![arm_b],
        }));
        assert!(alpha_equal(&ctx, &m_a, &m_b));
    }

    #[test]
    fn compare_terms_normalizes_before_comparing() {
        let ctx = Context::new();
        let id = Term::lambda("x", Term::Sort(Sort::Type(0)), Term::var("x"));
        let applied = Term::app(
            Term::lambda("f", Term::Sort(Sort::Type(0)), Term::var("f")),
            id.clone(),
        );
        assert!(compare_terms(&ctx, &applied, &id));
    }
}
