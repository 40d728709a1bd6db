//! Structural types.
//!
//! Unions and intersections are kept in a canonical form: flattened, free of
//! duplicates and sorted. Set equality of cases is therefore plain structural
//! equality, and `A|B` hashes the same as `B|A`.

use crate::DeclId;

/// A structural type of the source language.
///
/// Build unions and intersections through [`Type::union`] and
/// [`Type::intersection`]; the variants are public for matching, and
/// constructing them directly skips canonicalisation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    /// The uninhabited type. Its only use in practice is as the null case of
    /// an optional.
    Bottom,
    /// A class or interface applied to type arguments.
    Nominal { decl: DeclId, args: Vec<Type> },
    /// A reference to a type parameter.
    Param(DeclId),
    /// Two or more cases, canonically ordered.
    Union(Vec<Type>),
    /// Two or more parts, canonically ordered.
    Intersection(Vec<Type>),
}

impl Type {
    /// A nominal type without type arguments.
    #[inline]
    pub fn simple(decl: DeclId) -> Type {
        Type::Nominal {
            decl,
            args: Vec::new(),
        }
    }

    /// A nominal type applied to type arguments.
    #[inline]
    pub fn nominal(decl: DeclId, args: Vec<Type>) -> Type {
        Type::Nominal { decl, args }
    }

    /// Canonical union of `cases`.
    ///
    /// Nested unions are flattened and duplicates removed. A single case
    /// collapses to itself; no cases at all is `Bottom`.
    pub fn union(cases: impl IntoIterator<Item = Type>) -> Type {
        let mut flat = Vec::new();
        for case in cases {
            match case {
                Type::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        flat.sort();
        flat.dedup();
        match flat.len() {
            0 => Type::Bottom,
            1 => flat.pop().unwrap_or(Type::Bottom),
            _ => Type::Union(flat),
        }
    }

    /// Canonical intersection of `parts`.
    ///
    /// Returns `None` for an empty list: there is no type to collapse to.
    pub fn intersection(parts: impl IntoIterator<Item = Type>) -> Option<Type> {
        let mut flat = Vec::new();
        for part in parts {
            match part {
                Type::Intersection(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        flat.sort();
        flat.dedup();
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Type::Intersection(flat)),
        }
    }

    /// `inner?`, the union of `Bottom` and `inner`.
    pub fn optional(inner: Type) -> Type {
        Type::union([Type::Bottom, inner])
    }

    /// The non-null case if this is exactly `{Bottom, X}`.
    pub fn optional_inner(&self) -> Option<&Type> {
        match self {
            Type::Union(cases) if cases.len() == 2 && cases[0] == Type::Bottom => Some(&cases[1]),
            _ => None,
        }
    }

    /// Whether this is exactly `{Bottom, X}`.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional_inner().is_some()
    }

    /// Whether this union has `Bottom` among its cases.
    pub fn admits_null(&self) -> bool {
        match self {
            Type::Bottom => true,
            Type::Union(cases) => cases.first() == Some(&Type::Bottom),
            _ => false,
        }
    }

    /// This type with the null case removed, if it had one.
    pub fn without_null(&self) -> Type {
        match self {
            Type::Union(cases) if cases.first() == Some(&Type::Bottom) => {
                Type::union(cases.iter().skip(1).cloned())
            }
            other => other.clone(),
        }
    }

    #[inline]
    pub fn is_bottom(&self) -> bool {
        matches!(self, Type::Bottom)
    }

    /// The declaration of a nominal type.
    pub fn nominal_decl(&self) -> Option<DeclId> {
        match self {
            Type::Nominal { decl, .. } => Some(*decl),
            _ => None,
        }
    }

    /// Type arguments of a nominal type; empty for everything else.
    pub fn type_args(&self) -> &[Type] {
        match self {
            Type::Nominal { args, .. } => args,
            _ => &[],
        }
    }

    /// Replace every `Param(p)` that has an entry in `subst`.
    pub fn substitute(&self, subst: &[(DeclId, Type)]) -> Type {
        if subst.is_empty() {
            return self.clone();
        }
        match self {
            Type::Param(p) => subst
                .iter()
                .find(|(param, _)| param == p)
                .map_or_else(|| self.clone(), |(_, ty)| ty.clone()),
            Type::Nominal { decl, args } => Type::Nominal {
                decl: *decl,
                args: args.iter().map(|a| a.substitute(subst)).collect(),
            },
            Type::Union(cases) => Type::union(cases.iter().map(|c| c.substitute(subst))),
            Type::Intersection(parts) => {
                Type::intersection(parts.iter().map(|p| p.substitute(subst)))
                    .unwrap_or_else(|| self.clone())
            }
            Type::Bottom => Type::Bottom,
        }
    }
}
