//! Declarations held by the [`Model`](crate::Model) arena.

use std::fmt;

use bitflags::bitflags;

use crate::{Name, Type};

/// Index of a declaration in the model arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct DeclId(u32);

impl DeclId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        DeclId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

bitflags! {
    /// Declaration modifiers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DeclFlags: u16 {
        /// Visible outside its container.
        const SHARED = 1 << 0;
        /// Attribute with a setter.
        const VARIABLE = 1 << 1;
        /// Abstract member that refining types must provide.
        const FORMAL = 1 << 2;
        /// Refines a member of a supertype.
        const ACTUAL = 1 << 3;
        /// May be refined by subtypes.
        const DEFAULT = 1 << 4;
        /// Stored in its native (unboxed) representation.
        const UNBOXED = 1 << 5;
        /// Directly contained in a package.
        const TOPLEVEL = 1 << 6;
    }
}

/// Where a declaration came from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Origin {
    /// Built by the semantic analyzer from source.
    Source,
    /// Reconstructed from a compiled artifact.
    Binary,
}

/// Deferred-completion state of a binary declaration.
///
/// Source declarations are always `Complete`. Binary ones start `Pending` and
/// are completed on the first access that needs their members or signature.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Completion {
    Pending,
    InProgress,
    Complete,
    /// Completion ran and reported a diagnostic; members loaded before the
    /// failure are kept.
    Failed,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Variance {
    #[default]
    Invariant,
    /// `out`
    Covariant,
    /// `in`
    Contravariant,
}

impl Variance {
    /// Source keyword, empty for invariant parameters.
    pub fn keyword(self) -> &'static str {
        match self {
            Variance::Invariant => "",
            Variance::Covariant => "out",
            Variance::Contravariant => "in",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NominalKind {
    Class,
    Interface,
}

/// A single parameter of a function or class initializer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: Name,
    pub ty: Type,
    /// Variadic; receives a sequence.
    pub sequenced: bool,
    /// Has a default value.
    pub defaulted: bool,
    pub unboxed: bool,
}

impl Parameter {
    pub fn new(name: Name, ty: Type) -> Self {
        Parameter {
            name,
            ty,
            sequenced: false,
            defaulted: false,
            unboxed: false,
        }
    }

    #[must_use]
    pub fn sequenced(mut self) -> Self {
        self.sequenced = true;
        self
    }

    #[must_use]
    pub fn defaulted(mut self) -> Self {
        self.defaulted = true;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ParameterList {
    pub params: Vec<Parameter>,
}

impl ParameterList {
    pub fn new(params: Vec<Parameter>) -> Self {
        ParameterList { params }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueDecl {
    /// `None` until the declaration is completed.
    pub ty: Option<Type>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionDecl {
    pub type_params: Vec<DeclId>,
    pub parameter_lists: Vec<ParameterList>,
    /// `None` until the declaration is completed.
    pub return_type: Option<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NominalDecl {
    pub kind: NominalKind,
    pub type_params: Vec<DeclId>,
    /// `None` only for the universal top type and interfaces not yet
    /// completed.
    pub extended_type: Option<Type>,
    pub satisfied_types: Vec<Type>,
    /// Initializer parameters. Interfaces have none.
    pub parameters: Option<ParameterList>,
    /// Anonymous class of a singleton object.
    pub object_type: bool,
    pub is_abstract: bool,
    pub is_final: bool,
}

impl NominalDecl {
    pub fn new(kind: NominalKind) -> Self {
        NominalDecl {
            kind,
            type_params: Vec::new(),
            extended_type: None,
            satisfied_types: Vec::new(),
            parameters: None,
            object_type: false,
            is_abstract: matches!(kind, NominalKind::Interface),
            is_final: false,
        }
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, NominalKind::Interface)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeParamDecl {
    pub variance: Variance,
    /// Upper bounds.
    pub satisfied_types: Vec<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Module,
    Package,
    Value(ValueDecl),
    Function(FunctionDecl),
    Nominal(NominalDecl),
    TypeParameter(TypeParamDecl),
}

impl DeclKind {
    /// Short description for messages.
    pub fn describe(&self) -> &'static str {
        match self {
            DeclKind::Module => "module",
            DeclKind::Package => "package",
            DeclKind::Value(_) => "value",
            DeclKind::Function(_) => "function",
            DeclKind::Nominal(n) if n.is_interface() => "interface",
            DeclKind::Nominal(_) => "class",
            DeclKind::TypeParameter(_) => "type parameter",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: Name,
    /// Enclosing scope. Only modules have none.
    pub container: Option<DeclId>,
    pub flags: DeclFlags,
    pub origin: Origin,
    pub completion: Completion,
    /// Member declarations in declaration order.
    pub members: Vec<DeclId>,
    pub kind: DeclKind,
}

impl Declaration {
    pub fn new(name: Name, container: Option<DeclId>, kind: DeclKind) -> Self {
        Declaration {
            name,
            container,
            flags: DeclFlags::empty(),
            origin: Origin::Source,
            completion: Completion::Complete,
            members: Vec::new(),
            kind,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: DeclFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Mark as reconstructed from an artifact and awaiting completion.
    #[must_use]
    pub fn binary(mut self) -> Self {
        self.origin = Origin::Binary;
        self.completion = Completion::Pending;
        self
    }

    #[inline]
    pub fn is_type(&self) -> bool {
        matches!(self.kind, DeclKind::Nominal(_))
    }

    pub fn as_nominal(&self) -> Option<&NominalDecl> {
        match &self.kind {
            DeclKind::Nominal(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_nominal_mut(&mut self) -> Option<&mut NominalDecl> {
        match &mut self.kind {
            DeclKind::Nominal(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_type_param(&self) -> Option<&TypeParamDecl> {
        match &self.kind {
            DeclKind::TypeParameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            DeclKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&ValueDecl> {
        match &self.kind {
            DeclKind::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Type parameters of a nominal or function declaration.
    pub fn type_params(&self) -> &[DeclId] {
        match &self.kind {
            DeclKind::Nominal(n) => &n.type_params,
            DeclKind::Function(f) => &f.type_params,
            _ => &[],
        }
    }

    #[inline]
    pub fn is_variable(&self) -> bool {
        self.flags.contains(DeclFlags::VARIABLE)
    }

    #[inline]
    pub fn is_shared(&self) -> bool {
        self.flags.contains(DeclFlags::SHARED)
    }
}
