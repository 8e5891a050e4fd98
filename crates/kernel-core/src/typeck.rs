//! The bidirectional type checker: `infer` synthesizes a type for a term
//! that carries enough information to stand alone; `check` verifies a term
//! against an expected type, falling back to `infer` plus a
//! [`crate::alpha::compare_terms`] comparison when no rule applies directly.

use crate::alpha::compare_terms;
use crate::context::Context;
use crate::error::{KernelResult, TypeError};
use crate::normalize::{normalize, Strategy};
use crate::subst::subst;
use crate::term::{MatchExpr, Parameters, Sort, Term};

/// Synthesizes a type for `term`.
pub fn infer(ctx: &Context, term: &Term) -> KernelResult<Term> {
    match term {
        Term::Var(name) => {
            if let Some(ty) = ctx.lookup_ty(name) {
                Ok(ty.clone())
            } else if let Some(def) = ctx.lookup_def(name) {
                // A name bound by `extend_def` with no recorded typing
                // infers the type of its definition, letting local
                // abbreviations behave transparently.
                infer(ctx, &def.clone())
            } else {
                Err(TypeError::Unbound(name.clone()))
            }
        }

        Term::Sort(s) => Ok(Term::Sort(infer_sort(*s))),

        Term::Product(x, var_ty, result_ty) => {
            let var_sort = infer_sort_of(ctx, var_ty)?;
            let result_sort = ctx.with_binding(x.clone(), (**var_ty).clone(), |ctx| infer_sort_of(ctx, result_ty))?;
            Ok(Term::Sort(product_sort(var_sort, result_sort)))
        }

        Term::Lambda(x, var_ty, body) => {
            infer_sort_of(ctx, var_ty)?;
            let body_ty = ctx.with_binding(x.clone(), (**var_ty).clone(), |ctx| infer(ctx, body))?;
            Ok(Term::product(x.clone(), (**var_ty).clone(), body_ty))
        }

        Term::App(f, a) => {
            let f_ty = infer(ctx, f)?;
            let f_ty_whnf = normalize(ctx, &f_ty, Strategy::Whnf);
            match f_ty_whnf {
                Term::Product(x, param_ty, result_ty) => {
                    check(ctx, a, &param_ty)?;
                    Ok(subst(&result_ty, &x, a))
                }
                other => Err(TypeError::NotAProduct(other)),
            }
        }

        Term::IndRef(name) => ctx
            .lookup_inductive(name)
            .map(|ind| ind.computed_type.clone())
            .ok_or_else(|| TypeError::Unbound(name.clone())),

        Term::ConRef(ind_name, con_name) => {
            let ind = ctx
                .lookup_inductive(ind_name)
                .ok_or_else(|| TypeError::Unbound(ind_name.clone()))?;
            ind.constructor(con_name)
                .map(|con| con.closed_ty.clone())
                .ok_or_else(|| TypeError::Unbound(format!("{ind_name}::{con_name}")))
        }

        Term::Annot(t, ty) => {
            infer_sort_of(ctx, ty)?;
            check(ctx, t, ty)?;
            Ok((**ty).clone())
        }

        Term::Axiom(ty) => {
            infer_sort_of(ctx, ty)?;
            Ok((**ty).clone())
        }

        Term::Hole(tag) => Err(TypeError::HoleInfer(tag.clone())),

        Term::Match(m) => infer_match(ctx, m),

        Term::Fix(fx) => {
            let fn_ty = fx.params.wrap_with_products((*fx.return_ty).clone());
            let inner_ctx = ctx.extend_ty(fx.self_name.clone(), fn_ty.clone());
            check_body_under_params(&inner_ctx, &fx.params, &fx.return_ty, &fx.body)?;
            crate::wellformed::check_guard(ctx, fx)?;
            Ok(fn_ty)
        }
    }
}

/// Verifies that `term` has type `expected`. Structural rules (`Lambda`
/// against a `Product`, `Hole` against anything) short-circuit `infer`;
/// everything else falls back to inferring `term`'s type and comparing it
/// to `expected` up to reduction and alpha-renaming.
pub fn check(ctx: &Context, term: &Term, expected: &Term) -> KernelResult<()> {
    match term {
        Term::Lambda(x, var_ty, body) => {
            let expected_whnf = normalize(ctx, expected, Strategy::Whnf);
            match expected_whnf {
                Term::Product(px, param_ty, result_ty) => {
                    if !compare_terms(ctx, var_ty, &param_ty) {
                        return Err(TypeError::Mismatch { expected: param_ty, actual: (**var_ty).clone() });
                    }
                    let result_ty = subst(&result_ty, &px, &Term::var(x.clone()));
                    ctx.with_binding(x.clone(), (**var_ty).clone(), |ctx| check(ctx, body, &result_ty))
                }
                other => Err(TypeError::NotAProduct(other)),
            }
        }

        Term::Hole(_) => Ok(()),

        Term::Match(m) => {
            // Match's return_ty already encodes its expected motive; verify
            // it matches the caller's expectation, then infer normally so
            // exhaustiveness/arm checks still run.
            let inferred = infer_match(ctx, m)?;
            if compare_terms(ctx, &inferred, expected) {
                Ok(())
            } else {
                Err(TypeError::Mismatch { expected: expected.clone(), actual: inferred })
            }
        }

        _ => {
            let actual = infer(ctx, term)?;
            if compare_terms(ctx, &actual, expected) {
                Ok(())
            } else {
                Err(TypeError::Mismatch { expected: expected.clone(), actual })
            }
        }
    }
}

/// `Type_i : Type_{i+1}`; `Prop : Type_0`. Predicative: unlike the kernel's
/// originating prototype, `Type_i` never collapses into itself, avoiding
/// Girard's paradox.
fn infer_sort(s: Sort) -> Sort {
    match s {
        Sort::Prop => Sort::Type(0),
        Sort::Type(i) => Sort::Type(i + 1),
    }
}

/// Infers `term`'s type and checks that it is itself a `Sort`, returning
/// that sort. Used for the type-of-a-type positions in `Product`, `Annot`,
/// and `Axiom`.
fn infer_sort_of(ctx: &Context, term: &Term) -> KernelResult<Sort> {
    let ty = infer(ctx, term)?;
    let ty_whnf = normalize(ctx, &ty, Strategy::Whnf);
    match ty_whnf {
        Term::Sort(s) => Ok(s),
        other => Err(TypeError::NotASort(other)),
    }
}

/// The sort of `forall x : A, B` given `A : s_a` and `B : s_b` (with `x`
/// bound): impredicative `Prop` absorbs any domain, otherwise the product
/// lives in the larger of the two universes.
fn product_sort(domain: Sort, codomain: Sort) -> Sort {
    match codomain {
        Sort::Prop => Sort::Prop,
        Sort::Type(j) => match domain {
            Sort::Prop => Sort::Type(j),
            Sort::Type(i) => Sort::Type(i.max(j)),
        },
    }
}

/// Checks a `Fix`'s body against its declared return type, under a context
/// extended with every parameter in turn.
fn check_body_under_params(ctx: &Context, params: &Parameters, return_ty: &Term, body: &Term) -> KernelResult<()> {
    match params.iter().next() {
        None => check(ctx, body, return_ty),
        Some(_) => {
            let mut remaining = params.iter();
            let (name, ty) = remaining.next().expect("checked non-empty above");
            infer_sort_of(ctx, ty)?;
            let rest = Parameters::new(remaining.map(|(n, t)| (n.clone(), t.clone())).collect());
            ctx.with_binding(name.clone(), ty.clone(), |ctx| {
                check_body_under_params(ctx, &rest, return_ty, body)
            })
        }
    }
}

/// The dependent `Match` typing rule.
///
/// 1. Infer the scrutinee's type; its whnf must be `in_ind` applied to the
///    inductive's parameters followed by `index_count()` index arguments.
/// 2. Extend the context with `index_names` bound to the arity's argument
///    types (instantiated at the scrutinee's own parameters) and `as_name`
///    bound to `in_ind` applied to those same parameters and `index_names`.
/// 3. Check every arm against `return_ty` with its pattern variables bound
///    to the constructor's field types, and verify the arms are duplicate-
///    free and exhaustive.
/// 4. The whole `Match`'s type is `return_ty[index_names := indices][as_name := scrutinee]`.
fn infer_match(ctx: &Context, m: &MatchExpr) -> KernelResult<Term> {
    let scrutinee_ty = infer(ctx, &m.scrutinee)?;
    let scrutinee_ty_whnf = normalize(ctx, &scrutinee_ty, Strategy::Whnf);
    let (head, args) = scrutinee_ty_whnf.spine_owned();

    let ind_name = match &head {
        Term::IndRef(name) if name == &m.in_ind => name.clone(),
        _ => return Err(TypeError::NotAProduct(scrutinee_ty_whnf)),
    };
    let ind = ctx
        .lookup_inductive(&ind_name)
        .ok_or_else(|| TypeError::Unbound(ind_name.clone()))?
        .clone();

    let nparams = ind.parameters.len();
    if args.len() != nparams + ind.index_count() {
        return Err(TypeError::NotAProduct(scrutinee_ty_whnf));
    }
    let params_given: Vec<Term> = args[..nparams].to_vec();
    let indices_given: Vec<Term> = args[nparams..].to_vec();

    check_arms_cover(&ind, &m.arms)?;

    // An omitted return clause parses as `Hole`; default it to the inferred
    // type of the first arm's result (spec §4.4 step 2, §6). This gives up
    // dependent abstraction over the indices/scrutinee — every arm then
    // checks against that one concrete type — rather than attempting to
    // guess a motive that generalizes it.
    let resolved_return_ty = match m.return_ty.as_ref() {
        Term::Hole(tag) => default_return_ty_from_first_arm(ctx, &ind, &params_given, m, tag)?,
        _ => (*m.return_ty).clone(),
    };

    let index_types = arity_index_types(&ind, &params_given);
    let motive_ctx = extend_with_indices(ctx, &m.index_names, &index_types);
    let as_ty = Term::ind_ref(ind_name.clone())
        .apply(params_given.iter().cloned())
        .apply(m.index_names.iter().map(|n| Term::var(n.clone())));
    let motive_ctx = motive_ctx.extend_ty(m.as_name.clone(), as_ty);
    infer_sort_of(&motive_ctx, &resolved_return_ty)?;

    for arm in &m.arms {
        check_arm(ctx, &ind, &params_given, m, &resolved_return_ty, arm)?;
    }

    let mut result_ty = resolved_return_ty;
    for (name, index_val) in m.index_names.iter().zip(indices_given.iter()) {
        result_ty = subst(&result_ty, name, index_val);
    }
    result_ty = subst(&result_ty, &m.as_name, &m.scrutinee);
    Ok(result_ty)
}

/// Infers the type to use in place of a `Hole` return clause: the first
/// arm's result, inferred under that arm's own pattern-variable bindings.
/// Fails with [`TypeError::HoleInfer`] if there is no arm to default from
/// (the zero-constructor family case).
fn default_return_ty_from_first_arm(
    ctx: &Context,
    ind: &crate::registry::Inductive,
    params_given: &[Term],
    m: &MatchExpr,
    tag: &str,
) -> KernelResult<Term> {
    let first_arm = m.arms.first().ok_or_else(|| TypeError::HoleInfer(tag.to_string()))?;
    let (field_types, _) = constructor_field_types(ind, params_given, &first_arm.con_name, &first_arm.vars)?;
    let mut arm_ctx = ctx.clone();
    for (var, var_ty) in first_arm.vars.iter().zip(field_types.iter()) {
        arm_ctx = arm_ctx.extend_ty(var.clone(), var_ty.clone());
    }
    infer(&arm_ctx, &first_arm.result)
}

/// The types of the index-binding variables, i.e. the domains of the
/// `Product`s in the inductive's arity, with the inductive's own parameters
/// already substituted away (the arity is stated generically over the
/// parameter names, same as a constructor's `raw_ty`).
fn arity_index_types(ind: &crate::registry::Inductive, params_given: &[Term]) -> Vec<Term> {
    let mut arity = ind.arity.clone();
    for ((pname, _), given) in ind.parameters.iter().zip(params_given.iter()) {
        arity = subst(&arity, pname, given);
    }
    let mut types = Vec::new();
    let mut rest = &arity;
    while let Term::Product(_, var_ty, result_ty) = rest {
        types.push((**var_ty).clone());
        rest = result_ty;
    }
    types
}

fn extend_with_indices(ctx: &Context, names: &[String], types: &[Term]) -> Context {
    let mut ctx = ctx.clone();
    for (name, ty) in names.iter().zip(types.iter()) {
        ctx = ctx.extend_ty(name.clone(), ty.clone());
    }
    ctx
}

/// Peels one `Product` per entry of `vars` off constructor `con_name`'s
/// type (with `ind`'s parameters already substituted in), substituting each
/// field's bound name in as it's peeled. Returns the field types in order
/// alongside the arity-saturating indices found at the tail — `con_name`'s
/// result spine is `IndRef(ind.name) p_1 ... p_k u_1 ... u_p`, so the
/// leading `ind.parameters.len()` entries are stripped before returning,
/// matching the parameter/index split `infer_match` makes for the
/// scrutinee's own type.
fn constructor_field_types(
    ind: &crate::registry::Inductive,
    params_given: &[Term],
    con_name: &str,
    vars: &[String],
) -> KernelResult<(Vec<Term>, Vec<Term>)> {
    let con = ind
        .constructor(con_name)
        .expect("caller already validated con_name names a real constructor");

    let mut raw_ty = con.raw_ty.clone();
    for ((pname, _), given) in ind.parameters.iter().zip(params_given.iter()) {
        raw_ty = subst(&raw_ty, pname, given);
    }

    let mut field_types = Vec::new();
    let mut tail = raw_ty.clone();
    for var in vars {
        match tail {
            Term::Product(pname, var_ty, result_ty) => {
                field_types.push(*var_ty);
                tail = subst(&result_ty, &pname, &Term::var(var.clone()));
            }
            _ => {
                return Err(TypeError::BadConstructorSpine {
                    ind: ind.name.clone(),
                    con: con_name.to_string(),
                    ty: raw_ty.clone(),
                })
            }
        }
    }
    let (_, con_spine_args) = tail.spine();
    let nparams = ind.parameters.len();
    let con_indices: Vec<Term> = con_spine_args[nparams..].iter().map(|t| (*t).clone()).collect();
    Ok((field_types, con_indices))
}

/// Verifies an arm covers its constructor exactly once and checks its
/// result against `return_ty` instantiated at that constructor's own
/// indices and `scrutinee := con_name applied to the arm's pattern vars`.
fn check_arm(
    ctx: &Context,
    ind: &crate::registry::Inductive,
    params_given: &[Term],
    m: &MatchExpr,
    return_ty: &Term,
    arm: &crate::term::MatchArm,
) -> KernelResult<()> {
    let (field_types, con_indices) = constructor_field_types(ind, params_given, &arm.con_name, &arm.vars)?;

    let mut arm_ctx = ctx.clone();
    for (var, var_ty) in arm.vars.iter().zip(field_types.iter()) {
        arm_ctx = arm_ctx.extend_ty(var.clone(), var_ty.clone());
    }

    let mut expected = return_ty.clone();
    for (index_name, con_index) in m.index_names.iter().zip(con_indices.iter()) {
        expected = subst(&expected, index_name, con_index);
    }
    let scrutinee_value = Term::con_ref(ind.name.clone(), arm.con_name.clone())
        .apply(params_given.iter().cloned())
        .apply(arm.vars.iter().map(|v| Term::var(v.clone())));
    expected = subst(&expected, &m.as_name, &scrutinee_value);

    check(&arm_ctx, &arm.result, &expected)
}

/// Checks that `arms` names each of `ind`'s constructors at most once, and
/// that together they name every one of them.
fn check_arms_cover(ind: &crate::registry::Inductive, arms: &[crate::term::MatchArm]) -> KernelResult<()> {
    let mut seen = std::collections::HashSet::new();
    for arm in arms {
        if ind.constructor(&arm.con_name).is_none() {
            return Err(TypeError::Unbound(format!("{}::{}", ind.name, arm.con_name)));
        }
        if !seen.insert(arm.con_name.clone()) {
            return Err(TypeError::Duplicate(arm.con_name.clone()));
        }
    }
    let missing: Vec<String> = ind
        .constructor_names()
        .into_iter()
        .filter(|name| !seen.contains(name))
        .collect();
    if !missing.is_empty() {
        return Err(TypeError::NonExhaustive { ind: ind.name.clone(), missing });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Inductive;

    fn nat_ctx() -> Context {
        let mut ctx = Context::new();
        let nat = Inductive::declare(&mut ctx, "nat", Parameters::empty(), Term::Sort(Sort::Type(0))).unwrap();
        nat.add_constructor(&mut ctx, "O", Term::ind_ref("nat")).unwrap();
        nat.add_constructor(&mut ctx, "S", Term::arrow(Term::ind_ref("nat"), Term::ind_ref("nat"))).unwrap();
        ctx
    }

    #[test]
    fn infers_prop_below_type0() {
        let ctx = Context::new();
        assert_eq!(infer(&ctx, &Term::Sort(Sort::Prop)).unwrap(), Term::Sort(Sort::Type(0)));
    }

    #[test]
    fn infers_type_i_below_type_i_plus_1() {
        let ctx = Context::new();
        assert_eq!(infer(&ctx, &Term::Sort(Sort::Type(3))).unwrap(), Term::Sort(Sort::Type(4)));
    }

    #[test]
    fn infers_identity_function_type() {
        let ctx = Context::new();
        let id = Term::lambda("A", Term::Sort(Sort::Type(0)), Term::lambda("x", Term::var("A"), Term::var("x")));
        let ty = infer(&ctx, &id).unwrap();
        assert_eq!(
            ty,
            Term::product("A", Term::Sort(Sort::Type(0)), Term::product("x", Term::var("A"), Term::var("A")))
        );
    }

    #[test]
    fn checks_identity_against_explicit_annotation() {
        let ctx = Context::new();
        let id = Term::lambda("A", Term::Sort(Sort::Type(0)), Term::lambda("x", Term::var("A"), Term::var("x")));
        let ty = Term::product("A", Term::Sort(Sort::Type(0)), Term::product("x", Term::var("A"), Term::var("A")));
        assert!(check(&ctx, &id, &ty).is_ok());
    }

    #[test]
    fn rejects_mismatched_annotation() {
        let ctx = Context::new();
        let t = Term::annot(Term::Sort(Sort::Prop), Term::Sort(Sort::Type(5)));
        let err = infer(&ctx, &t).unwrap_err();
        assert!(matches!(err, TypeError::Mismatch { .. }));
    }

    #[test]
    fn unbound_variable_is_reported() {
        let ctx = Context::new();
        let err = infer(&ctx, &Term::var("q")).unwrap_err();
        assert!(matches!(err, TypeError::Unbound(name) if name == "q"));
    }

    #[test]
    fn application_requires_product_type() {
        let ctx = Context::new();
        let t = Term::app(Term::Sort(Sort::Prop), Term::Sort(Sort::Prop));
        let err = infer(&ctx, &t).unwrap_err();
        assert!(matches!(err, TypeError::NotAProduct(_)));
    }

    #[test]
    fn match_on_nat_infers_motive_type() {
        let ctx = nat_ctx();
        let n = Term::var("n");
        let m = Term::Match(Box::new(MatchExpr {
            scrutinee: Box::new(n),
            as_name: "_a".into(),
            in_ind: "nat".into(),
            index_names: vec![],
            return_ty: Box::new(Term::ind_ref("nat")),
            arms: vec![
                crate::term::MatchArm { con_name: "O".into(), vars: vec![], result: Term::con_ref("nat", "O") },
                crate::term::MatchArm { con_name: "S".into(), vars: vec!["p".into()], result: Term::var("p") },
            ],
        }));
        let ctx = ctx.extend_ty("n", Term::ind_ref("nat"));
        let ty = infer(&ctx, &m).unwrap();
        assert_eq!(ty, Term::ind_ref("nat"));
    }

    #[test]
    fn match_missing_arm_is_nonexhaustive() {
        let ctx = nat_ctx();
        let ctx = ctx.extend_ty("n", Term::ind_ref("nat"));
        let m = Term::Match(Box::new(MatchExpr {
            scrutinee: Box::new(Term::var("n")),
            as_name: "_a".into(),
            in_ind: "nat".into(),
            index_names: vec![],
            return_ty: Box::new(Term::ind_ref("nat")),
            arms: vec![crate::term::MatchArm { con_name: "O".into(), vars: vec![], result: Term::con_ref("nat", "O") }],
        }));
        let err = infer(&ctx, &m).unwrap_err();
        assert!(matches!(err, TypeError::NonExhaustive { .. }));
    }

    #[test]
    fn match_duplicate_arm_is_rejected() {
        let ctx = nat_ctx();
        let ctx = ctx.extend_ty("n", Term::ind_ref("nat"));
        let m = Term::Match(Box::new(MatchExpr {
            scrutinee: Box::new(Term::var("n")),
            as_name: "_a".into(),
            in_ind: "nat".into(),
            index_names: vec![],
            return_ty: Box::new(Term::ind_ref("nat")),
            arms: vec![
                crate::term::MatchArm { con_name: "O".into(), vars: vec![], result: Term::con_ref("nat", "O") },
                crate::term::MatchArm { con_name: "O".into(), vars: vec![], result: Term::con_ref("nat", "O") },
                crate::term::MatchArm { con_name: "S".into(), vars: vec!["p".into()], result: Term::var("p") },
            ],
        }));
        let err = infer(&ctx, &m).unwrap_err();
        assert!(matches!(err, TypeError::Duplicate(_)));
    }

    #[test]
    fn fixpoint_type_is_parameters_wrapped_with_return_ty() {
        let ctx = nat_ctx();
        let fx = Term::Fix(Box::new(crate::term::FixExpr {
            self_name: "f".into(),
            params: Parameters::new(vec![("n".into(), Term::ind_ref("nat"))]),
            return_ty: Box::new(Term::ind_ref("nat")),
            body: Box::new(Term::var("n")),
        }));
        let ty = infer(&ctx, &fx).unwrap();
        assert_eq!(ty, Term::arrow(Term::ind_ref("nat"), Term::ind_ref("nat")));
    }

    #[test]
    fn hole_is_never_inferrable() {
        let ctx = Context::new();
        let err = infer(&ctx, &Term::hole("1")).unwrap_err();
        assert!(matches!(err, TypeError::HoleInfer(_)));
    }

    #[test]
    fn hole_checks_against_any_type() {
        let ctx = Context::new();
        assert!(check(&ctx, &Term::hole("1"), &Term::Sort(Sort::Prop)).is_ok());
    }

    #[test]
    fn axiom_infers_its_declared_type() {
        let ctx = Context::new();
        let ax = Term::axiom(Term::Sort(Sort::Prop));
        assert_eq!(infer(&ctx, &ax).unwrap(), Term::Sort(Sort::Prop));
    }

    #[test]
    fn match_with_hole_return_defaults_to_first_arm_type() {
        let ctx = nat_ctx();
        let ctx = ctx.extend_ty("n", Term::ind_ref("nat"));
        let m = Term::Match(Box::new(MatchExpr {
            scrutinee: Box::new(Term::var("n")),
            as_name: "_a".into(),
            in_ind: "nat".into(),
            index_names: vec![],
            return_ty: Box::new(Term::hole("_")),
            arms: vec![
                crate::term::MatchArm { con_name: "O".into(), vars: vec![], result: Term::con_ref("nat", "O") },
                crate::term::MatchArm { con_name: "S".into(), vars: vec!["p".into()], result: Term::var("p") },
            ],
        }));
        let ty = infer(&ctx, &m).unwrap();
        assert_eq!(ty, Term::ind_ref("nat"));
    }

    #[test]
    fn match_with_hole_return_and_no_arms_cannot_default() {
        let mut ctx = Context::new();
        Inductive::declare(&mut ctx, "bottom", Parameters::empty(), Term::Sort(Sort::Prop)).unwrap();
        let ctx = ctx.extend_ty("b", Term::ind_ref("bottom"));
        let m = Term::Match(Box::new(MatchExpr {
            scrutinee: Box::new(Term::var("b")),
            as_name: "_a".into(),
            in_ind: "bottom".into(),
            index_names: vec![],
            return_ty: Box::new(Term::hole("_")),
            arms: vec![],
        }));
        let err = infer(&ctx, &m).unwrap_err();
        assert!(matches!(err, TypeError::HoleInfer(_)));
    }

    /// `vec (A : Type_0) : nat -> Type_0` with `vnil : vec A %nat::O` and
    /// `vcons : forall n : nat, A -> vec A n -> vec A (%nat::S n)` — a family
    /// with both a parameter and an arity index, so a constructor's result
    /// spine is `%vec A u` with exactly one leading parameter to strip before
    /// the index.
    fn vec_ctx() -> Context {
        let mut ctx = nat_ctx();
        let vec_ind = Inductive::declare(
            &mut ctx,
            "vec",
            Parameters::new(vec![("A".into(), Term::Sort(Sort::Type(0)))]),
            Term::arrow(Term::ind_ref("nat"), Term::Sort(Sort::Type(0))),
        )
        .unwrap();
        vec_ind
            .add_constructor(
                &mut ctx,
                "vnil",
                Term::ind_ref("vec").apply([Term::var("A"), Term::con_ref("nat", "O")]),
            )
            .unwrap();
        vec_ind
            .add_constructor(
                &mut ctx,
                "vcons",
                Term::product(
                    "n",
                    Term::ind_ref("nat"),
                    Term::product(
                        "a",
                        Term::var("A"),
                        Term::product(
                            "v",
                            Term::ind_ref("vec").apply([Term::var("A"), Term::var("n")]),
                            Term::ind_ref("vec")
                                .apply([Term::var("A"), Term::app(Term::con_ref("nat", "S"), Term::var("n"))]),
                        ),
                    ),
                ),
            )
            .unwrap();
        ctx
    }

    /// Regression for the parameter/index conflation bug: with a nonzero
    /// parameter count, the `vcons` arm's expected return type must
    /// substitute its index binder with the *index* (`%nat::S n`), not the
    /// leading parameter value (`A`).
    #[test]
    fn check_arm_substitutes_index_not_parameter_for_parameterized_family() {
        let ctx = vec_ctx();
        let ind = ctx.lookup_inductive("vec").unwrap().clone();
        let ctx = ctx
            .extend_ty("A", Term::Sort(Sort::Type(0)))
            .extend_ty("n", Term::ind_ref("nat"))
            .extend_ty("a", Term::var("A"))
            .extend_ty("v", Term::ind_ref("vec").apply([Term::var("A"), Term::var("n")]));

        let m = MatchExpr {
            scrutinee: Box::new(Term::var("v")),
            as_name: "_a".into(),
            in_ind: "vec".into(),
            index_names: vec!["k".into()],
            return_ty: Box::new(Term::ind_ref("vec").apply([Term::var("A"), Term::var("k")])),
            arms: vec![],
        };
        let arm = crate::term::MatchArm {
            con_name: "vcons".into(),
            vars: vec!["n".into(), "a".into(), "v".into()],
            result: Term::con_ref("vec", "vcons").apply([
                Term::var("A"),
                Term::var("n"),
                Term::var("a"),
                Term::var("v"),
            ]),
        };

        let params_given = vec![Term::var("A")];
        assert!(check_arm(&ctx, &ind, &params_given, &m, &m.return_ty, &arm).is_ok());
    }
}
