//! Term representation for the Calculus of Inductive Constructions.
//!
//! There is no syntactic distinction between terms and types: a type is just
//! a term that happens to classify other terms. Every shape needed by the
//! kernel — universes, dependent functions, inductive references, dependent
//! pattern matches, and general recursion — is a variant of [`Term`].

use std::fmt;

/// A universe marker.
///
/// `Prop` is the impredicative universe of propositions; `Type(i)` is the
/// `i`-th predicative universe in the `Type_0 : Type_1 : Type_2 : ...`
/// hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sort {
    Prop,
    Type(u32),
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Prop => write!(f, "Prop"),
            Sort::Type(i) => write!(f, "Type_{i}"),
        }
    }
}

/// A single arm of a [`Term::Match`]: a constructor pattern applied to fresh
/// pattern variables, together with the arm's result term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchArm {
    pub con_name: String,
    /// Fresh pattern variables bound by this arm, in constructor-field order.
    pub vars: Vec<String>,
    pub result: Term,
}

/// Dependent case analysis.
///
/// `in_ind`/`index_names` together play the role of the applicative spine
/// `I _ ... _ y_1 ... y_p` from the surface syntax: the parameter slots are
/// anonymous (never bound), and `index_names` are the `y_i` that bind the
/// arity-saturating indices of the scrutinee's type inside `return_ty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchExpr {
    pub scrutinee: Box<Term>,
    /// Binds the scrutinee itself inside `return_ty`.
    pub as_name: String,
    pub in_ind: String,
    pub index_names: Vec<String>,
    pub return_ty: Box<Term>,
    /// Exactly one entry per constructor of `in_ind`, order not significant.
    pub arms: Vec<MatchArm>,
}

/// A recursive definition. `self_name` is bound in `body` to a value of type
/// `params -> return_ty`; `params` binds the function's own arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixExpr {
    pub self_name: String,
    pub params: Parameters,
    pub return_ty: Box<Term>,
    pub body: Box<Term>,
}

/// The term language of the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// An occurrence of a name bound by an enclosing binder or the context.
    Var(String),
    /// A universe marker.
    Sort(Sort),
    /// Dependent function type `forall var : var_ty, result_ty`.
    Product(String, Box<Term>, Box<Term>),
    /// Function abstraction `lambda var : var_ty, body`.
    Lambda(String, Box<Term>, Box<Term>),
    /// Application.
    App(Box<Term>, Box<Term>),
    /// Reference to a declared inductive family.
    IndRef(String),
    /// Reference to a constructor of a declared inductive.
    ConRef(String, String),
    /// Dependent case analysis.
    Match(Box<MatchExpr>),
    /// A recursive definition.
    Fix(Box<FixExpr>),
    /// Explicit type ascription.
    Annot(Box<Term>, Box<Term>),
    /// An unjustified term of declared type (a named opaque constant).
    Axiom(Box<Term>),
    /// A placeholder. Never well-typed by `infer`.
    Hole(String),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Term {
        Term::Var(name.into())
    }

    pub fn sort(sort: Sort) -> Term {
        Term::Sort(sort)
    }

    pub fn product(var: impl Into<String>, var_ty: Term, result_ty: Term) -> Term {
        Term::Product(var.into(), Box::new(var_ty), Box::new(result_ty))
    }

    /// A non-dependent function type `var_ty -> result_ty`.
    pub fn arrow(var_ty: Term, result_ty: Term) -> Term {
        Term::product("_", var_ty, result_ty)
    }

    pub fn lambda(var: impl Into<String>, var_ty: Term, body: Term) -> Term {
        Term::Lambda(var.into(), Box::new(var_ty), Box::new(body))
    }

    pub fn app(f: Term, a: Term) -> Term {
        Term::App(Box::new(f), Box::new(a))
    }

    pub fn ind_ref(name: impl Into<String>) -> Term {
        Term::IndRef(name.into())
    }

    pub fn con_ref(ind: impl Into<String>, con: impl Into<String>) -> Term {
        Term::ConRef(ind.into(), con.into())
    }

    pub fn annot(term: Term, ty: Term) -> Term {
        Term::Annot(Box::new(term), Box::new(ty))
    }

    pub fn axiom(ty: Term) -> Term {
        Term::Axiom(Box::new(ty))
    }

    pub fn hole(tag: impl Into<String>) -> Term {
        Term::Hole(tag.into())
    }

    pub fn is_sort(&self) -> bool {
        matches!(self, Term::Sort(_))
    }

    /// Applies `self` to `args` in order, left-associating as `App` does.
    pub fn apply(self, args: impl IntoIterator<Item = Term>) -> Term {
        args.into_iter().fold(self, Term::app)
    }

    /// Splits an application spine into its head and its arguments, in
    /// left-to-right order. A term with no leading `App` returns itself with
    /// an empty argument list.
    pub fn spine(&self) -> (&Term, Vec<&Term>) {
        let mut args = Vec::new();
        let mut head = self;
        while let Term::App(f, a) = head {
            args.push(a.as_ref());
            head = f.as_ref();
        }
        args.reverse();
        (head, args)
    }

    /// Like [`Term::spine`] but clones into owned terms, convenient when the
    /// head needs to be replaced by a reduced form.
    pub fn spine_owned(&self) -> (Term, Vec<Term>) {
        let (head, args) = self.spine();
        (head.clone(), args.into_iter().cloned().collect())
    }
}

/// An ordered sequence of `(name, type)` pairs, used uniformly for inductive
/// parameters, fixpoint arguments, and constructor argument lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameters(pub Vec<(String, Term)>);

impl Parameters {
    pub fn new(entries: Vec<(String, Term)>) -> Self {
        Parameters(entries)
    }

    pub fn empty() -> Self {
        Parameters(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, Term)> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    /// Wraps `term` in a chain of `Product`s, one per parameter, innermost
    /// parameter closest to `term`.
    pub fn wrap_with_products(&self, term: Term) -> Term {
        self.0.iter().rev().fold(term, |acc, (name, ty)| {
            Term::product(name.clone(), ty.clone(), acc)
        })
    }

    /// Wraps `term` in a chain of `Lambda`s, one per parameter.
    pub fn wrap_with_lambdas(&self, term: Term) -> Term {
        self.0.iter().rev().fold(term, |acc, (name, ty)| {
            Term::lambda(name.clone(), ty.clone(), acc)
        })
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) => write!(f, "{name}"),
            Term::Sort(s) => write!(f, "{s}"),
            Term::Product(x, a, b) => {
                if x == "_" {
                    write!(f, "({a} -> {b})")
                } else {
                    write!(f, "(forall ({x} : {a}), {b})")
                }
            }
            Term::Lambda(x, a, body) => write!(f, "(lambda ({x} : {a}), {body})"),
            Term::App(func, arg) => write!(f, "({func} {arg})"),
            Term::IndRef(name) => write!(f, "%{name}"),
            Term::ConRef(ind, con) => write!(f, "{ind}::{con}"),
            Term::Match(m) => {
                write!(
                    f,
                    "(match {} as {} in {} return {} with ",
                    m.scrutinee, m.as_name, m.in_ind, m.return_ty
                )?;
                for (i, arm) in m.arms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{} {} => {}", arm.con_name, arm.vars.join(" "), arm.result)?;
                }
                write!(f, " end)")
            }
            Term::Fix(fx) => {
                write!(f, "(fix {} ", fx.self_name)?;
                for (name, ty) in fx.params.iter() {
                    write!(f, "({name} : {ty}) ")?;
                }
                write!(f, ": {} := {})", fx.return_ty, fx.body)
            }
            Term::Annot(t, ty) => write!(f, "({t} :: {ty})"),
            Term::Axiom(ty) => write!(f, "(axiom : {ty})"),
            Term::Hole(tag) => write!(f, "_{tag}"),
        }
    }
}
