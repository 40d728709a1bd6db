//! Synthetic definitions: classes, fields, methods and their bodies.
//!
//! This is the hand-off format to the emission backend. It mirrors the shape
//! of a target class file closely enough to be lowered one-to-one:
//!
//! - **[`ClassDef`]**: a class with fields, methods and nested classes
//! - **[`FieldDef`]** / **[`MethodDef`]**: members with target types
//! - **[`Stmt`]** / **[`Expr`]**: the small statement language used by the
//!   bodies the synthesizer writes itself
//!
//! Bodies the synthesizer cannot know (a function's own code, a companion's
//! concrete members) are left as `None` for the backend to fill in.

use bitflags::bitflags;
use tyb_erase::TargetType;

// ── Modifiers ───────────────────────────────────────────────────────

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const STATIC = 1 << 2;
        const FINAL = 1 << 3;
        const ABSTRACT = 1 << 4;
        const INTERFACE = 1 << 5;
        const VOLATILE = 1 << 6;
    }
}

// ── Expressions and statements ──────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    Null,
    This,
    Local(String),
    /// Source-level argument expression, already lowered by the caller.
    Opaque(String),
    /// The empty sequence, passed for omitted variadic arguments.
    EmptySequence,
    StaticField {
        class: String,
        name: String,
    },
    Field {
        receiver: Box<Expr>,
        name: String,
    },
    Call {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    StaticCall {
        class: String,
        method: String,
        args: Vec<Expr>,
    },
    New {
        class: String,
        args: Vec<Expr>,
    },
    IsNull(Box<Expr>),
}

impl Expr {
    pub fn local(name: impl Into<String>) -> Expr {
        Expr::Local(name.into())
    }

    pub fn this_field(name: impl Into<String>) -> Expr {
        Expr::Field {
            receiver: Box::new(Expr::This),
            name: name.into(),
        }
    }

    pub fn call(receiver: Expr, method: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Call {
            receiver: Box::new(receiver),
            method: method.into(),
            args,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stmt {
    Local {
        name: String,
        ty: TargetType,
        init: Expr,
    },
    Assign {
        target: Expr,
        value: Expr,
    },
    Expr(Expr),
    Return(Option<Expr>),
    If {
        cond: Expr,
        then: Vec<Stmt>,
    },
}

// ── Members ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TargetType,
    pub modifiers: Modifiers,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: String,
    pub bounds: Vec<TargetType>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDef {
    pub name: String,
    pub ty: TargetType,
    /// Encoded metadata sidecar.
    pub metadata: Option<String>,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, ty: TargetType) -> Self {
        ParamDef {
            name: name.into(),
            ty,
            metadata: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParamDef>,
    pub params: Vec<ParamDef>,
    /// `None` for `void`.
    pub return_type: Option<TargetType>,
    /// `None` when the backend supplies the body.
    pub body: Option<Vec<Stmt>>,
    /// Encoded metadata sidecar.
    pub metadata: Option<String>,
}

impl MethodDef {
    pub const CONSTRUCTOR: &'static str = "<init>";

    pub fn new(name: impl Into<String>, modifiers: Modifiers) -> Self {
        MethodDef {
            name: name.into(),
            modifiers,
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: None,
            body: None,
            metadata: None,
        }
    }

    /// A constructor with an empty body.
    pub fn constructor(modifiers: Modifiers) -> Self {
        let mut ctor = MethodDef::new(Self::CONSTRUCTOR, modifiers);
        ctor.body = Some(Vec::new());
        ctor
    }

    #[must_use]
    pub fn with_param(mut self, param: ParamDef) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn returning(mut self, ty: TargetType) -> Self {
        self.return_type = Some(ty);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Vec<Stmt>) -> Self {
        self.body = Some(body);
        self
    }

    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.name == Self::CONSTRUCTOR
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }
}

// ── Classes ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    /// Dotted package name, empty for the default package.
    pub package: String,
    /// Simple target name, keyword-quoted where needed.
    pub name: String,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParamDef>,
    /// `None` for interfaces.
    pub superclass: Option<TargetType>,
    pub interfaces: Vec<TargetType>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
    pub nested: Vec<ClassDef>,
    /// Encoded metadata sidecar.
    pub metadata: Option<String>,
}

impl ClassDef {
    /// A class extending `java.lang.Object`.
    pub fn new(package: impl Into<String>, name: impl Into<String>, modifiers: Modifiers) -> Self {
        ClassDef {
            package: package.into(),
            name: name.into(),
            modifiers,
            type_params: Vec::new(),
            superclass: Some(TargetType::object()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
            metadata: None,
        }
    }

    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Whether a method with this name and parameter count exists.
    pub fn declares(&self, name: &str, arity: usize) -> bool {
        self.methods
            .iter()
            .any(|m| m.name == name && m.params.len() == arity)
    }

    pub fn constructors_mut(&mut self) -> impl Iterator<Item = &mut MethodDef> {
        self.methods.iter_mut().filter(|m| m.is_constructor())
    }
}
