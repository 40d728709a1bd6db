//! Structural-to-target type erasure.

use tyb_ir::{DeclId, DeclKind, Model, Type, Variance};
use tyb_stack::ensure_sufficient_stack;

use crate::{EraseError, TargetType, TypeArg};

/// Where an erased type is going to appear.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErasureContext {
    /// An `implements` clause.
    Satisfies,
    /// An `extends` clause.
    Extends,
    /// Upper bound of a type parameter.
    TypeParamBound,
    /// Any other position: fields, parameters, return types, locals.
    Ordinary,
}

/// Whether the type being erased is a type argument.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Position {
    TopLevel,
    Argument,
}

enum ErasedArg {
    Arg(TypeArg),
    /// The whole enclosing type must be used raw.
    Raw,
}

/// Pure, deterministic erasure of structural types.
#[derive(Copy, Clone)]
pub struct TypeEraser<'m> {
    model: &'m Model,
}

impl<'m> TypeEraser<'m> {
    pub fn new(model: &'m Model) -> Self {
        TypeEraser { model }
    }

    /// Erase `ty` for use in `context`.
    ///
    /// `None` only in [`ErasureContext::Satisfies`], for types that have no
    /// `implements` form. With `raw_allowed` type arguments are dropped.
    pub fn erase(
        &self,
        ty: &Type,
        context: ErasureContext,
        raw_allowed: bool,
    ) -> Result<Option<TargetType>, EraseError> {
        let erased = self.erase_at(ty, context, raw_allowed, Position::TopLevel)?;
        tracing::trace!(
            ty = %self.model.format_type(ty),
            ?context,
            erased = ?erased.as_ref().map(ToString::to_string),
            "erased"
        );
        Ok(erased)
    }

    /// Erase for an ordinary position, where a result always exists.
    pub fn erase_ordinary(&self, ty: &Type) -> Result<TargetType, EraseError> {
        self.erase_at(ty, ErasureContext::Ordinary, false, Position::TopLevel)?
            .ok_or_else(|| self.unsupported(ty))
    }

    fn erase_at(
        &self,
        ty: &Type,
        context: ErasureContext,
        raw_allowed: bool,
        position: Position,
    ) -> Result<Option<TargetType>, EraseError> {
        ensure_sufficient_stack(|| {
            let simple = Self::simplify(ty);

            if self.erases_to_object(simple) {
                return Ok(match context {
                    ErasureContext::Satisfies => None,
                    _ => Some(TargetType::object()),
                });
            }

            if let Some(wrapper) = self.model.wrapper_of(simple) {
                let native = context == ErasureContext::Ordinary
                    && !ty.is_optional()
                    && position == Position::TopLevel;
                return Ok(Some(if native {
                    TargetType::Native(wrapper)
                } else {
                    TargetType::class(wrapper.boxed_name())
                }));
            }

            match simple {
                Type::Param(p) => match &self.model.decl(*p).kind {
                    DeclKind::TypeParameter(_) => {
                        Ok(Some(TargetType::Var(self.model.simple_name(*p).to_owned())))
                    }
                    _ => Err(self.unsupported(ty)),
                },
                Type::Nominal { decl, args } => self
                    .erase_nominal(*decl, args, context, raw_allowed)
                    .map(Some),
                // Unions and intersections erase to Object above.
                Type::Bottom | Type::Union(_) | Type::Intersection(_) => Err(self.unsupported(ty)),
            }
        })
    }

    fn erase_nominal(
        &self,
        decl: DeclId,
        args: &[Type],
        context: ErasureContext,
        raw_allowed: bool,
    ) -> Result<TargetType, EraseError> {
        let declaration = self.model.decl(decl);
        if !declaration.is_type() {
            return Err(EraseError::UnsupportedConstruct {
                construct: format!(
                    "{} `{}` used as a type",
                    declaration.kind.describe(),
                    self.model.qualified_name(decl)
                ),
            });
        }
        let name = self.model.qualified_name(decl);
        let params = self.model.type_params(decl);
        if !args.is_empty() && args.len() != params.len() {
            return Err(EraseError::UnsupportedConstruct {
                construct: format!(
                    "`{name}` applied to {} type argument(s), expected {}",
                    args.len(),
                    params.len()
                ),
            });
        }
        if raw_allowed || args.is_empty() {
            return Ok(TargetType::class(name));
        }

        let mut erased = Vec::with_capacity(args.len());
        for (arg, &param) in args.iter().zip(params) {
            match self.erase_argument(arg, param, context)? {
                ErasedArg::Arg(a) => erased.push(a),
                ErasedArg::Raw => return Ok(TargetType::class(name)),
            }
        }
        Ok(TargetType::generic(name, erased))
    }

    fn erase_argument(
        &self,
        arg: &Type,
        param: DeclId,
        context: ErasureContext,
    ) -> Result<ErasedArg, EraseError> {
        if Self::is_inexpressible(arg) {
            return Ok(ErasedArg::Raw);
        }

        if context != ErasureContext::Ordinary {
            if arg.is_bottom() {
                return Ok(ErasedArg::Raw);
            }
            // An argument of a satisfied type still needs a type even when it
            // erases to Object.
            let inner = match context {
                ErasureContext::Satisfies => ErasureContext::Extends,
                other => other,
            };
            return Ok(self
                .erase_at(arg, inner, false, Position::Argument)?
                .map_or(ErasedArg::Raw, |t| ErasedArg::Arg(TypeArg::Exact(t))));
        }

        let variance = self.model.variance(param);
        if arg.is_bottom() {
            return Ok(match variance {
                Variance::Contravariant => ErasedArg::Arg(TypeArg::Wildcard),
                Variance::Covariant | Variance::Invariant => ErasedArg::Raw,
            });
        }
        if self.is_top(arg) {
            return Ok(ErasedArg::Arg(match variance {
                Variance::Covariant => TypeArg::Wildcard,
                Variance::Invariant | Variance::Contravariant => TypeArg::Exact(TargetType::object()),
            }));
        }

        let erased = self
            .erase_at(arg, context, false, Position::Argument)?
            .ok_or_else(|| self.unsupported(arg))?;
        Ok(ErasedArg::Arg(match variance {
            Variance::Covariant => TypeArg::Extends(erased),
            Variance::Contravariant => TypeArg::Super(erased),
            Variance::Invariant => TypeArg::Exact(erased),
        }))
    }

    /// Strip optional sugar. The remaining case keeps its type arguments.
    fn simplify(ty: &Type) -> &Type {
        ty.optional_inner().unwrap_or(ty)
    }

    fn erases_to_object(&self, simple: &Type) -> bool {
        match simple {
            Type::Bottom | Type::Union(_) | Type::Intersection(_) => true,
            Type::Nominal { decl, .. } => self.model.lang().erases_to_object(*decl),
            Type::Param(_) => false,
        }
    }

    /// Multi-case unions (other than optionals) and intersections have no
    /// target argument form.
    fn is_inexpressible(arg: &Type) -> bool {
        matches!(Self::simplify(arg), Type::Union(_) | Type::Intersection(_))
    }

    /// The universal top type, or `Object` which accepts every non-null
    /// value.
    fn is_top(&self, arg: &Type) -> bool {
        let lang = self.model.lang();
        matches!(Self::simplify(arg), Type::Nominal { decl, .. } if *decl == lang.void || *decl == lang.object)
    }

    fn unsupported(&self, ty: &Type) -> EraseError {
        EraseError::UnsupportedConstruct {
            construct: format!("type `{}`", self.model.format_type(ty)),
        }
    }
}
