//! kernel-core: a Calculus of Inductive Constructions type theory kernel.
//!
//! Everything is a [`Term`]: types are terms (`nat : Type_0`), values are
//! terms (`%nat::O : nat`), functions are terms (`lambda x : nat, x`).
//! There is no separate syntactic category for types.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              Bidirectional checker            │
//! │         typeck::{infer, check}                │
//! └──────────────────────────────────────────────┘
//!                        │
//!         ┌──────────────┼──────────────┐
//!         ▼               ▼              ▼
//! ┌───────────────┐ ┌───────────┐ ┌──────────────┐
//! │   normalize   │ │   alpha   │ │  wellformed  │
//! │ whnf/cbv, β/δ │ │ canon_eq, │ │ positivity,  │
//! │     /ι/fix    │ │ compare   │ │    guard     │
//! └───────────────┘ └───────────┘ └──────────────┘
//!                        │
//!         ┌──────────────┼──────────────┐
//!         ▼               ▼              ▼
//! ┌───────────────┐ ┌───────────┐ ┌──────────────┐
//! │    context    │ │ registry  │ │    subst     │
//! │  typings/defs │ │inductives │ │  capture-    │
//! │ /inductives   │ │/ctors     │ │   avoiding   │
//! └───────────────┘ └───────────┘ └──────────────┘
//! ```
//!
//! Term representation lives in [`term`]; it has no path back to anything
//! outside this crate and [`kernel_base`]'s structural atoms.

pub mod alpha;
pub mod context;
pub mod error;
pub mod normalize;
pub mod registry;
pub mod subst;
pub mod term;
pub mod typeck;
pub mod wellformed;

pub use alpha::{alpha_equal, canon, compare_terms};
pub use context::Context;
pub use error::{KernelResult, TypeError};
pub use normalize::{normalize, normalize_checked, normalize_with_config, NormalizeConfig, Strategy};
pub use registry::{Constructor, Inductive, InductiveHandle};
pub use subst::subst;
pub use term::{FixExpr, MatchArm, MatchExpr, Parameters, Sort, Term};
pub use typeck::{check, infer};
