//! Reverse erasure: model types from target signature types.

use tyb_ir::lang::{platform, LangDecls};
use tyb_ir::{DeclId, Model, Type, Wrapper};
use tyb_stack::ensure_sufficient_stack;

use super::{DeclarationKind, DeclarationLoader};
use crate::artifact::JvmType;
use crate::LoadError;

impl DeclarationLoader<'_> {
    /// Type of a member or parameter signature.
    ///
    /// Reference types that may hold null come back optional: strings,
    /// boxed primitives, the language's own boxed wrapper classes and
    /// `java.lang.Object`.
    pub(super) fn reverse_top(
        &mut self,
        model: &mut Model,
        jvm: &JvmType,
        scope: DeclId,
        subject: &str,
    ) -> Result<Type, LoadError> {
        if let JvmType::Declared { name, args } = jvm {
            if args.is_empty() {
                let lang = model.lang();
                let nullable = if name == platform::OBJECT {
                    Some(lang.identifiable_object)
                } else {
                    platform_decl(lang, name).or_else(|| boxed_decl(lang, name))
                };
                if let Some(decl) = nullable {
                    return Ok(Type::optional(Type::simple(decl)));
                }
            }
        }
        self.structural(model, jvm, scope, subject)
    }

    /// Type in a structural position: a type argument, bound, supertype or
    /// array component. Nothing here is optional.
    pub(super) fn structural(
        &mut self,
        model: &mut Model,
        jvm: &JvmType,
        scope: DeclId,
        subject: &str,
    ) -> Result<Type, LoadError> {
        ensure_sufficient_stack(|| {
            let lang = *model.lang();
            let ty = match jvm {
                JvmType::Void => Type::simple(lang.void),
                JvmType::Boolean => Type::simple(lang.boolean),
                JvmType::Byte | JvmType::Short | JvmType::Int | JvmType::Long => Type::simple(lang.integer),
                JvmType::Float | JvmType::Double => Type::simple(lang.float),
                JvmType::Char => Type::simple(lang.character),
                JvmType::Array(component) => {
                    let element = self.structural(model, component, scope, subject)?;
                    model.sequence_of(element)
                }
                JvmType::TypeVar(name) => model
                    .lookup_type_parameter(scope, name)
                    .map(Type::Param)
                    .ok_or_else(|| LoadError::Unresolved { name: name.clone() })?,
                JvmType::Wildcard { bound: Some(bound) } => self.structural(model, bound, scope, subject)?,
                JvmType::Wildcard { bound: None } => Type::simple(lang.void),
                JvmType::Declared { name, args } if args.is_empty() && name == platform::OBJECT => {
                    Type::simple(lang.object)
                }
                JvmType::Declared { name, args } => match platform_decl(&lang, name) {
                    Some(decl) if args.is_empty() => Type::simple(decl),
                    _ => self.declared(model, name, args, scope, subject)?,
                },
            };
            Ok(ty)
        })
    }

    fn declared(
        &mut self,
        model: &mut Model,
        name: &str,
        args: &[JvmType],
        scope: DeclId,
        subject: &str,
    ) -> Result<Type, LoadError> {
        let unsupported = || LoadError::UnsupportedSignature {
            subject: subject.to_owned(),
            ty: name.to_owned(),
        };
        let decl = self.load(model, name, DeclarationKind::Type)?;
        if !model.decl(decl).is_type() {
            return Err(unsupported());
        }
        let args = args
            .iter()
            .map(|arg| self.structural(model, arg, scope, subject))
            .collect::<Result<Vec<_>, _>>()?;
        // A raw reference carries no arguments at all.
        if !args.is_empty() && args.len() != model.type_params(decl).len() {
            return Err(unsupported());
        }
        Ok(Type::nominal(decl, args))
    }
}

/// Wrapper declaration whose boxed form is `name`.
fn boxed_decl(lang: &LangDecls, name: &str) -> Option<DeclId> {
    Wrapper::ALL
        .into_iter()
        .find(|w| w.boxed_name() == name)
        .map(|w| lang.wrapper_decl(w))
}

/// Language type a platform class stands for, excluding `java.lang.Object`.
fn platform_decl(lang: &LangDecls, name: &str) -> Option<DeclId> {
    match name {
        platform::STRING => Some(lang.string),
        platform::BOOLEAN => Some(lang.boolean),
        platform::CHARACTER => Some(lang.character),
        _ if platform::INTEGRAL.contains(&name) => Some(lang.integer),
        _ if platform::FLOATING.contains(&name) => Some(lang.float),
        _ => None,
    }
}
