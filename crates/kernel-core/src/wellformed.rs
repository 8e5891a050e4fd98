//! Well-formedness gates the kernel declares but does not decide.
//!
//! A full implementation of the Calculus of Inductive Constructions must
//! reject inductives whose constructors embed their own family in a
//! negative position (strict positivity) and fixpoints whose recursive
//! calls cannot be shown to descend a well-founded order (the guard
//! condition). Both checks are substantial, separate pieces of engineering
//! in their own right — this kernel declares the hooks the rest of the
//! checker calls at the right point, so a real checker can be dropped in
//! later without touching [`crate::registry`] or [`crate::typeck`], but does
//! not implement the analyses themselves.

use crate::context::Context;
use crate::error::KernelResult;
use crate::registry::Inductive;
use crate::term::{FixExpr, Term};

/// Strict positivity of a constructor's argument types with respect to the
/// inductive family being declared.
///
/// Always succeeds. A real implementation would walk `raw_ty`'s argument
/// types and reject any occurrence of `ind.name` outside a strictly
/// positive position (e.g. to the left of an arrow).
pub fn check_positivity(ind: &Inductive, con_name: &str, raw_ty: &Term) -> KernelResult<()> {
    let _ = (ind, con_name, raw_ty);
    Ok(())
}

/// The fixpoint guard condition: some syntactic argument of `fix` must
/// strictly decrease on every recursive call, which is what justifies
/// treating `Fix` as total rather than as a source of `False` through
/// unbounded recursion.
///
/// Always succeeds. A real implementation would identify a decreasing
/// argument position and check every recursive call in `fx.body` passes a
/// strict structural subterm of it in that position.
pub fn check_guard(ctx: &Context, fx: &FixExpr) -> KernelResult<()> {
    let _ = (ctx, fx);
    Ok(())
}
