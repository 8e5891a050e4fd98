//! The inductive registry: declared inductive families and their
//! constructors.
//!
//! Inductives are built in two steps, mirroring how the kernel's own source
//! material declares them: [`Inductive::declare`] registers the family under
//! `ctx.inductives` with an empty constructor list (so `IndRef` resolves
//! immediately, including from within the constructors about to be added),
//! then [`InductiveHandle::add_constructor`] fills in constructors one at a
//! time.

use crate::context::Context;
use crate::error::{KernelResult, TypeError};
use crate::term::{Parameters, Term};

/// A single constructor of an [`Inductive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    /// The type as written in the inductive definition, before wrapping with
    /// the inductive's parameters — i.e. still generic in the parameter
    /// names.
    pub raw_ty: Term,
    /// `parameters.wrap_with_products(raw_ty)` — the type a free-standing
    /// reference to this constructor infers.
    pub closed_ty: Term,
}

/// A declared inductive family: its parameters, its arity, and its
/// constructors (in declaration order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inductive {
    pub name: String,
    pub parameters: Parameters,
    pub arity: Term,
    constructors: Vec<(String, Constructor)>,
    /// `parameters.wrap_with_products(arity)`, precomputed at declaration
    /// time so `infer(IndRef(I))` does not rebuild the product chain on
    /// every call.
    pub computed_type: Term,
}

impl Inductive {
    /// Registers a new inductive family in `ctx` with no constructors yet.
    ///
    /// Fails with [`TypeError::ArityShape`] if `arity` is not a chain of
    /// products ending in a sort, or [`TypeError::Duplicate`] if `name` is
    /// already declared.
    pub fn declare(
        ctx: &mut Context,
        name: impl Into<String>,
        parameters: Parameters,
        arity: Term,
    ) -> KernelResult<InductiveHandle> {
        let name = name.into();
        check_arity_shape(&arity)?;
        if ctx.lookup_inductive(&name).is_some() {
            return Err(TypeError::Duplicate(name));
        }
        let computed_type = parameters.wrap_with_products(arity.clone());
        let ind = Inductive {
            name: name.clone(),
            parameters,
            arity,
            constructors: Vec::new(),
            computed_type,
        };
        ctx.insert_inductive(ind);
        Ok(InductiveHandle { name })
    }

    /// The number of arity-saturating index arguments (`p` in spec
    /// terminology): the number of products in `arity` before its trailing
    /// sort.
    pub fn index_count(&self) -> usize {
        count_products(&self.arity)
    }

    pub fn constructor(&self, con_name: &str) -> Option<&Constructor> {
        self.constructors
            .iter()
            .find(|(name, _)| name == con_name)
            .map(|(_, con)| con)
    }

    pub fn constructor_names(&self) -> Vec<String> {
        self.constructors.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn constructor_count(&self) -> usize {
        self.constructors.len()
    }

    fn push_constructor(&mut self, name: String, con: Constructor) {
        self.constructors.push((name, con));
    }
}

/// A handle returned by [`Inductive::declare`], used to add constructors to
/// the inductive it names.
pub struct InductiveHandle {
    name: String,
}

impl InductiveHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a constructor to this inductive.
    ///
    /// `raw_ty` is written generically in terms of the inductive's own
    /// parameter names (as declared via [`Inductive::declare`]); it is
    /// wrapped with `parameters.wrap_with_products` to produce `closed_ty`.
    ///
    /// Fails with [`TypeError::BadConstructorSpine`] if `raw_ty`'s tail,
    /// after stripping leading products, is not `IndRef(name)` applied to
    /// exactly `|parameters| + |arity|` arguments, or
    /// [`TypeError::Duplicate`] if `con_name` is already used by this
    /// inductive. The positivity hook (see
    /// [`crate::wellformed::check_positivity`]) is invoked here.
    pub fn add_constructor(
        &self,
        ctx: &mut Context,
        con_name: impl Into<String>,
        raw_ty: Term,
    ) -> KernelResult<()> {
        let con_name = con_name.into();
        let ind = ctx
            .lookup_inductive(&self.name)
            .expect("InductiveHandle always names a registered inductive")
            .clone();

        if ind.constructor(&con_name).is_some() {
            return Err(TypeError::Duplicate(con_name));
        }

        check_constructor_spine(&ind, &con_name, &raw_ty)?;
        crate::wellformed::check_positivity(&ind, &con_name, &raw_ty)?;

        let closed_ty = ind.parameters.wrap_with_products(raw_ty.clone());
        let con = Constructor { raw_ty, closed_ty };

        ctx.with_inductive_mut(&self.name, |ind| ind.push_constructor(con_name, con));
        Ok(())
    }
}

/// `arity` must be a chain of zero or more `Product`s ending in a `Sort`.
fn check_arity_shape(arity: &Term) -> KernelResult<()> {
    match arity {
        Term::Sort(_) => Ok(()),
        Term::Product(_, _, result_ty) => check_arity_shape(result_ty),
        other => Err(TypeError::ArityShape(other.clone())),
    }
}

fn count_products(term: &Term) -> usize {
    match term {
        Term::Product(_, _, result_ty) => 1 + count_products(result_ty),
        _ => 0,
    }
}

/// Strips every leading `Product` from `raw_ty` and checks that the
/// remaining tail is `IndRef(ind.name)` applied to exactly
/// `|parameters| + |arity|` arguments.
fn check_constructor_spine(ind: &Inductive, con_name: &str, raw_ty: &Term) -> KernelResult<()> {
    let mut tail = raw_ty;
    while let Term::Product(_, _, result_ty) = tail {
        tail = result_ty;
    }
    let (head, args) = tail.spine();
    let expected_args = ind.parameters.len() + ind.index_count();
    match head {
        Term::IndRef(name) if name == &ind.name && args.len() == expected_args => Ok(()),
        _ => Err(TypeError::BadConstructorSpine {
            ind: ind.name.clone(),
            con: con_name.to_string(),
            ty: raw_ty.clone(),
        }),
    }
}
