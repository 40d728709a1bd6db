//! Target-platform type expressions.

use std::fmt;

use tyb_ir::lang::platform;
use tyb_ir::Wrapper;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// Native representation of a wrapper-table type.
    Native(Wrapper),
    /// A class or interface. No arguments is either a non-generic class or a
    /// raw use of a generic one.
    Class {
        name: String,
        args: Vec<TypeArg>,
    },
    /// A type variable.
    Var(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeArg {
    Exact(TargetType),
    /// `? extends T`
    Extends(TargetType),
    /// `? super T`
    Super(TargetType),
    /// `?`
    Wildcard,
}

impl TargetType {
    /// `java.lang.Object`.
    pub fn object() -> TargetType {
        TargetType::class(platform::OBJECT)
    }

    /// A class without type arguments.
    pub fn class(name: impl Into<String>) -> TargetType {
        TargetType::Class {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: impl IntoIterator<Item = TypeArg>) -> TargetType {
        TargetType::Class {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, TargetType::Class { name, args } if name == platform::OBJECT && args.is_empty())
    }

    /// Whether values of this type are references (may be null).
    pub fn is_reference(&self) -> bool {
        match self {
            TargetType::Native(w) => w.native_is_reference(),
            TargetType::Class { .. } | TargetType::Var(_) => true,
        }
    }

    /// Class name for classes, native name for natives, variable name for
    /// variables; type arguments dropped.
    pub fn erased_name(&self) -> &str {
        match self {
            TargetType::Native(w) => w.native_name(),
            TargetType::Class { name, .. } | TargetType::Var(name) => name,
        }
    }

    pub fn type_args(&self) -> &[TypeArg] {
        match self {
            TargetType::Class { args, .. } => args,
            _ => &[],
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Native(w) => f.write_str(w.native_name()),
            TargetType::Var(name) => f.write_str(name),
            TargetType::Class { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArg::Exact(t) => write!(f, "{t}"),
            TypeArg::Extends(t) => write!(f, "? extends {t}"),
            TypeArg::Super(t) => write!(f, "? super {t}"),
            TypeArg::Wildcard => f.write_str("?"),
        }
    }
}

#[cfg(test)]
mod tests;
