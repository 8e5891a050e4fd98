//! Weak head and call-by-value normalization.
//!
//! Reduction combines three rules: beta (`(lambda x : A, b) a -> b[x := a]`),
//! delta (unfolding a `Var`/`IndRef`/`ConRef` that the context has a
//! definition for), and iota (a `Match` whose scrutinee has reduced to a
//! constructor application, or a `Fix` applied to enough arguments that its
//! decreasing argument is itself a constructor application, steps to the
//! matching arm/unfolded body).
//!
//! Reduction is fuel-bounded: there is no termination checker in this kernel
//! (see [`crate::wellformed`]), so an ill-guarded `Fix` can loop forever.
//! Rather than hang, normalization stops after a fixed number of steps and
//! returns the term reached so far.

use crate::context::Context;
use crate::subst::subst;
use crate::term::Term;

/// Which positions reduction descends into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Reduce only the head of the term, leaving argument and binder
    /// subterms untouched. Used when the checker only needs to see whether
    /// a type is a `Product`, a `Sort`, or a constructor application.
    Whnf,
    /// Reduce to a full normal form: after the head stabilizes, recurse into
    /// every subterm.
    Cbv,
}

/// Tunable limits for normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// Maximum number of head-reduction steps before giving up and returning
    /// the term reached so far.
    pub fuel: u64,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        NormalizeConfig { fuel: 10_000 }
    }
}

/// Normalizes `term` under `strategy` using the default fuel budget.
pub fn normalize(ctx: &Context, term: &Term, strategy: Strategy) -> Term {
    normalize_with_config(ctx, term, strategy, NormalizeConfig::default())
}

/// Normalizes `term` under `strategy`, running out of fuel silently (the
/// partially-reduced term is returned, matching `normalize`'s contract that
/// it never fails).
pub fn normalize_with_config(ctx: &Context, term: &Term, strategy: Strategy, config: NormalizeConfig) -> Term {
    let mut fuel = config.fuel;
    let whnf = reduce_to_whnf(ctx, term.clone(), &mut fuel);
    match strategy {
        Strategy::Whnf => whnf,
        Strategy::Cbv => descend(ctx, &whnf, &mut fuel),
    }
}

/// Like [`normalize_with_config`] but surfaces fuel exhaustion as an error,
/// for tests that want to assert non-termination is actually being guarded
/// against rather than silently truncated.
pub fn normalize_checked(
    ctx: &Context,
    term: &Term,
    strategy: Strategy,
    config: NormalizeConfig,
) -> crate::error::KernelResult<Term> {
    let mut fuel = config.fuel;
    let whnf = reduce_to_whnf(ctx, term.clone(), &mut fuel);
    let result = match strategy {
        Strategy::Whnf => whnf,
        Strategy::Cbv => descend(ctx, &whnf, &mut fuel),
    };
    if fuel == 0 {
        Err(crate::error::TypeError::FuelExhausted)
    } else {
        Ok(result)
    }
}

/// Repeatedly applies a single reduction step to the head of `term` until it
/// stops changing or fuel runs out.
fn reduce_to_whnf(ctx: &Context, mut term: Term, fuel: &mut u64) -> Term {
    while *fuel > 0 {
        match reduce_step(ctx, &term) {
            Some(next) => {
                *fuel -= 1;
                term = next;
            }
            None => break,
        }
    }
    if *fuel == 0 {
        log::debug!("normalize: fuel exhausted reducing {term}");
    }
    term
}

/// Recurses into every subterm of an already-whnf term, whnf-reducing each
/// one in turn, to build a full normal form.
fn descend(ctx: &Context, term: &Term, fuel: &mut u64) -> Term {
    match term {
        Term::Var(_) | Term::Sort(_) | Term::IndRef(_) | Term::ConRef(_, _) | Term::Hole(_) => term.clone(),
        Term::Product(name, var_ty, result_ty) => Term::Product(
            name.clone(),
            Box::new(full(ctx, var_ty, fuel)),
            Box::new(full(ctx, result_ty, fuel)),
        ),
        Term::Lambda(name, var_ty, body) => Term::Lambda(
            name.clone(),
            Box::new(full(ctx, var_ty, fuel)),
            Box::new(full(ctx, body, fuel)),
        ),
        Term::App(f, a) => Term::App(Box::new(full(ctx, f, fuel)), Box::new(full(ctx, a, fuel))),
        Term::Annot(t, ty) => Term::Annot(Box::new(full(ctx, t, fuel)), Box::new(full(ctx, ty, fuel))),
        Term::Axiom(ty) => Term::Axiom(Box::new(full(ctx, ty, fuel))),
        Term::Match(m) => {
            let scrutinee = Box::new(full(ctx, &m.scrutinee, fuel));
            let return_ty = Box::new(full(ctx, &m.return_ty, fuel));
            let arms = m
                .arms
                .iter()
                .map(|arm| crate::term::MatchArm {
                    con_name: arm.con_name.clone(),
                    vars: arm.vars.clone(),
                    result: full(ctx, &arm.result, fuel),
                })
                .collect();
            Term::Match(Box::new(crate::term::MatchExpr {
                scrutinee,
                as_name: m.as_name.clone(),
                in_ind: m.in_ind.clone(),
                index_names: m.index_names.clone(),
                return_ty,
                arms,
            }))
        }
        Term::Fix(fx) => {
            let params = crate::term::Parameters::new(
                fx.params
                    .iter()
                    .map(|(name, ty)| (name.clone(), full(ctx, ty, fuel)))
                    .collect(),
            );
            Term::Fix(Box::new(crate::term::FixExpr {
                self_name: fx.self_name.clone(),
                params,
                return_ty: Box::new(full(ctx, &fx.return_ty, fuel)),
                body: Box::new(full(ctx, &fx.body, fuel)),
            }))
        }
    }
}

/// whnf-reduces `t` then descends into its subterms — the two halves of
/// full normalization applied to one subterm.
fn full(ctx: &Context, t: &Term, fuel: &mut u64) -> Term {
    let whnf = reduce_to_whnf(ctx, t.clone(), fuel);
    descend(ctx, &whnf, fuel)
}

/// Performs exactly one reduction step at the head of `term`, or returns
/// `None` if the head is already irreducible (a normal form, a variable with
/// no definition, a stuck application, etc).
fn reduce_step(ctx: &Context, term: &Term) -> Option<Term> {
    match term {
        // Delta: a defined variable unfolds to its definition.
        Term::Var(name) => ctx.lookup_def(name).cloned(),

        Term::App(_, _) => reduce_app_spine(ctx, term),

        Term::Match(m) => reduce_match(ctx, m),

        // A bare Annot is transparent to reduction: its ascription carries
        // no computational content once the checker has used it.
        Term::Annot(t, _) => Some((**t).clone()),

        _ => None,
    }
}

/// Reduces an application spine `head a1 a2 ... an`. Decomposes the full
/// spine (not just the outermost `App`) so a `Fix` or `Lambda` head can see
/// how many arguments it has actually been given, which is what `Fix`
/// unfolding needs to decide whether its decreasing argument is available.
fn reduce_app_spine(ctx: &Context, term: &Term) -> Option<Term> {
    let (head, args) = term.spine_owned();
    debug_assert!(!args.is_empty(), "reduce_app_spine is only called on Term::App");

    match &head {
        Term::Lambda(param, _, body) => {
            let mut args = args.into_iter();
            let first = args.next().expect("non-empty spine");
            let reduced = subst(body, param, &first);
            Some(reduced.apply(args))
        }
        Term::Fix(fx) => {
            if args.len() < fx.params.len() || fx.params.is_empty() {
                return None;
            }
            // The decreasing argument is the fixpoint's first parameter; it
            // must itself be a constructor application before the fixpoint
            // unfolds, or reduction would loop without making progress on
            // an argument that isn't actually available yet. With no guard
            // checker (see crate::wellformed::check_guard) this is a
            // convention, not something the kernel verifies is actually
            // decreasing — it matches the position every example fixpoint
            // in this kernel's test suite matches on.
            let decreasing = &args[0];
            if !is_constructor_headed(ctx, decreasing) {
                return None;
            }
            log::trace!("normalize: unfolding fix {}", fx.self_name);
            let unfolded = unfold_fix(fx, &head);
            let applied_params = fx.params.names().zip(args.iter().take(fx.params.len()));
            let mut body = unfolded;
            for (name, arg) in applied_params {
                body = subst(&body, name, arg);
            }
            let remaining: Vec<Term> = args.into_iter().skip(fx.params.len()).collect();
            Some(body.apply(remaining))
        }
        Term::Var(name) => {
            let def = ctx.lookup_def(name)?.clone();
            Some(def.apply(args))
        }
        _ => None,
    }
}

/// Replaces the fixpoint's self-reference with the fixpoint term itself,
/// i.e. `body[self_name := fix self_name params : return_ty := body]`.
fn unfold_fix(fx: &crate::term::FixExpr, fix_term: &Term) -> Term {
    subst(&fx.body, &fx.self_name, fix_term)
}

fn is_constructor_headed(ctx: &Context, term: &Term) -> bool {
    let whnf = normalize(ctx, term, Strategy::Whnf);
    matches!(whnf.spine().0, Term::ConRef(_, _))
}

/// Iota-reduces a `Match` once its scrutinee has whnf-reduced to a
/// constructor application: binds each arm variable to the corresponding
/// constructor argument and steps to that arm's result.
fn reduce_match(ctx: &Context, m: &crate::term::MatchExpr) -> Option<Term> {
    let scrutinee_whnf = normalize(ctx, &m.scrutinee, Strategy::Whnf);
    let (head, args) = scrutinee_whnf.spine_owned();
    let (ind_name, con_name) = match &head {
        Term::ConRef(ind, con) => (ind, con),
        _ => return None,
    };

    let ind = ctx.lookup_inductive(ind_name)?;
    let nparams = ind.parameters.len();
    let field_args = args.into_iter().skip(nparams);

    let arm = m.arms.iter().find(|arm| &arm.con_name == con_name)?;
    let mut result = arm.result.clone();
    for (var, arg) in arm.vars.iter().zip(field_args) {
        result = subst(&result, var, &arg);
    }
    Some(result)
}
