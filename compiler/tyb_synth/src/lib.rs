//! Synthetic members the target platform needs but the source never wrote.
//!
//! Classes and interfaces become target classes with accessors in place of
//! attributes. Top-level attributes and functions live in holder classes,
//! singleton objects get a lazily initialised instance, named-argument invocations
//! become positional calls, and interfaces with concrete members get a
//! companion class that satisfying classes forward to.
//!
//! Everything is derived from [`tyb_erase`] decisions; the output is the
//! plain [`ClassDef`] IR in [`def`].

pub mod def;
mod error;
mod synthesizer;

pub use def::{ClassDef, Expr, FieldDef, MethodDef, Modifiers, ParamDef, Stmt, TypeParamDef};
pub use error::SynthError;
pub use synthesizer::{adapt, unbox_method, ForwarderSet, NamedArg, NamedCall, Synthesizer, BOX_METHOD};
