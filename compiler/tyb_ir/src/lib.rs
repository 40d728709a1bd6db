//! Declaration model of the type bridge.
//!
//! - [`Type`]: structural types of the source language, canonicalised on
//!   construction.
//! - [`Declaration`]: classes, interfaces, attributes, functions and type
//!   parameters, each with a container chain up to a package and module.
//! - [`Model`]: the arena owning every declaration of one compilation run,
//!   along with the interner and the bootstrapped language module.

mod decl;
mod format;
mod interner;
pub mod lang;
mod model;
mod name;
pub mod naming;
mod ty;

pub use decl::{
    Completion, DeclFlags, DeclId, DeclKind, Declaration, FunctionDecl, NominalDecl, NominalKind,
    Origin, Parameter, ParameterList, TypeParamDecl, ValueDecl, Variance,
};
pub use interner::{InternError, StringInterner};
pub use lang::{LangDecls, Wrapper};
pub use model::Model;
pub use name::Name;
pub use ty::Type;
