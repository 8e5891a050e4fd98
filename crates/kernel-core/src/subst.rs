//! Capture-aware substitution.
//!
//! `subst(t, x, y)` replaces every free occurrence of `x` in `t` with `y`.
//! Every binder form shadows `x` for its own scope: if the binder's own name
//! is `x`, substitution stops for the subtree the binder introduces. This is
//! the single most important contract in the kernel — get the shadowing
//! cases wrong and well-typed terms silently become ill-typed ones.
//!
//! `subst` assumes `y`'s free variables do not clash with any binder it is
//! substituted beneath. Callers are responsible for this; in practice `y`
//! is always either a normalized term or a term built from names produced by
//! [`crate::alpha::canon`], so clashes do not arise.

use crate::term::{FixExpr, MatchArm, MatchExpr, Parameters, Term};

/// Replaces every free occurrence of `x` in `t` with `y`.
pub fn subst(t: &Term, x: &str, y: &Term) -> Term {
    match t {
        Term::Var(name) => {
            if name == x {
                y.clone()
            } else {
                t.clone()
            }
        }
        Term::Sort(_) | Term::IndRef(_) | Term::ConRef(_, _) | Term::Hole(_) => t.clone(),
        Term::Product(name, var_ty, result_ty) => {
            let var_ty = subst(var_ty, x, y);
            if name == x {
                Term::Product(name.clone(), Box::new(var_ty), result_ty.clone())
            } else {
                Term::Product(name.clone(), Box::new(var_ty), Box::new(subst(result_ty, x, y)))
            }
        }
        Term::Lambda(name, var_ty, body) => {
            let var_ty = subst(var_ty, x, y);
            if name == x {
                Term::Lambda(name.clone(), Box::new(var_ty), body.clone())
            } else {
                Term::Lambda(name.clone(), Box::new(var_ty), Box::new(subst(body, x, y)))
            }
        }
        Term::App(f, a) => Term::App(Box::new(subst(f, x, y)), Box::new(subst(a, x, y))),
        Term::Annot(term, ty) => Term::Annot(Box::new(subst(term, x, y)), Box::new(subst(ty, x, y))),
        Term::Axiom(ty) => Term::Axiom(Box::new(subst(ty, x, y))),
        Term::Match(m) => Term::Match(Box::new(subst_match(m, x, y))),
        Term::Fix(fx) => Term::Fix(Box::new(subst_fix(fx, x, y))),
    }
}

fn subst_match(m: &MatchExpr, x: &str, y: &Term) -> MatchExpr {
    let scrutinee = Box::new(subst(&m.scrutinee, x, y));

    // `as_name` shadows x inside `return_ty`; `index_names` (the arity
    // variables) do too.
    let return_ty = if m.as_name == x || m.index_names.iter().any(|n| n == x) {
        m.return_ty.clone()
    } else {
        Box::new(subst(&m.return_ty, x, y))
    };

    let arms = m
        .arms
        .iter()
        .map(|arm| subst_arm(arm, x, y))
        .collect();

    MatchExpr {
        scrutinee,
        as_name: m.as_name.clone(),
        in_ind: m.in_ind.clone(),
        index_names: m.index_names.clone(),
        return_ty,
        arms,
    }
}

fn subst_arm(arm: &MatchArm, x: &str, y: &Term) -> MatchArm {
    // Pattern variables shadow x for the arm's result.
    if arm.vars.iter().any(|v| v == x) {
        arm.clone()
    } else {
        MatchArm {
            con_name: arm.con_name.clone(),
            vars: arm.vars.clone(),
            result: subst(&arm.result, x, y),
        }
    }
}

fn subst_fix(fx: &FixExpr, x: &str, y: &Term) -> FixExpr {
    let params = subst_parameters(&fx.params, x, y);

    // self_name and every parameter name shadow x for return_ty and body.
    let shadowed = fx.self_name == x || fx.params.names().any(|n| n == x);
    let (return_ty, body) = if shadowed {
        (fx.return_ty.clone(), fx.body.clone())
    } else {
        (
            Box::new(subst(&fx.return_ty, x, y)),
            Box::new(subst(&fx.body, x, y)),
        )
    };

    FixExpr {
        self_name: fx.self_name.clone(),
        params,
        return_ty,
        body,
    }
}

/// Substitutes into each parameter's type; later parameter names shadow `x`
/// for subsequent parameter types, mirroring `Product`/`Lambda` shadowing.
fn subst_parameters(params: &Parameters, x: &str, y: &Term) -> Parameters {
    let mut shadowed = false;
    let entries = params
        .iter()
        .map(|(name, ty)| {
            let ty = if shadowed { ty.clone() } else { subst(ty, x, y) };
            if name == x {
                shadowed = true;
            }
            (name.clone(), ty)
        })
        .collect();
    Parameters::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Sort;

    #[test]
    fn substitutes_free_var() {
        let t = Term::var("x");
        assert_eq!(subst(&t, "x", &Term::var("y")), Term::var("y"));
    }

    #[test]
    fn leaves_other_vars_untouched() {
        let t = Term::var("z");
        assert_eq!(subst(&t, "x", &Term::var("y")), Term::var("z"));
    }

    #[test]
    fn lambda_binder_shadows_body() {
        let ty = Term::var("x");
        let body = Term::var("x");
        let lam = Term::lambda("x", ty, body);
        let result = subst(&lam, "x", &Term::var("y"));
        // The binder's own type substitutes; the body does not.
        assert_eq!(
            result,
            Term::lambda("x", Term::var("y"), Term::var("x"))
        );
    }

    #[test]
    fn product_binder_shadows_result_ty() {
        let prod = Term::product("x", Term::var("x"), Term::var("x"));
        let result = subst(&prod, "x", &Term::var("y"));
        assert_eq!(result, Term::product("x", Term::var("y"), Term::var("x")));
    }

    #[test]
    fn nonshadowing_binder_substitutes_both_sides() {
        let lam = Term::lambda("z", Term::var("x"), Term::var("x"));
        let result = subst(&lam, "x", &Term::var("y"));
        assert_eq!(result, Term::lambda("z", Term::var("y"), Term::var("y")));
    }

    #[test]
    fn match_arm_pattern_vars_shadow_result() {
        let arm = MatchArm {
            con_name: "S".into(),
            vars: vec!["x".into()],
            result: Term::var("x"),
        };
        let m = MatchExpr {
            scrutinee: Box::new(Term::var("x")),
            as_name: "_a".into(),
            in_ind: "nat".into(),
            index_names: vec![],
            return_ty: Box::new(Term::ind_ref("nat")),
            arms: vec![arm],
        };
        let t = Term::Match(Box::new(m));
        let result = subst(&t, "x", &Term::var("y"));
        match result {
            Term::Match(m) => {
                assert_eq!(m.scrutinee.as_ref(), &Term::var("y"));
                assert_eq!(m.arms[0].result, Term::var("x"));
            }
            _ => panic!("expected Match"),
        }
    }

    #[test]
    fn fix_self_name_shadows_body() {
        let fx = FixExpr {
            self_name: "f".into(),
            params: Parameters::new(vec![("n".into(), Term::ind_ref("nat"))]),
            return_ty: Box::new(Term::ind_ref("nat")),
            body: Box::new(Term::var("f")),
        };
        let t = Term::Fix(Box::new(fx));
        let result = subst(&t, "f", &Term::var("y"));
        match result {
            Term::Fix(fx) => assert_eq!(fx.body.as_ref(), &Term::var("f")),
            _ => panic!("expected Fix"),
        }
    }

    #[test]
    fn sort_is_unaffected() {
        let t = Term::Sort(Sort::Prop);
        assert_eq!(subst(&t, "x", &Term::var("y")), t);
    }
}
