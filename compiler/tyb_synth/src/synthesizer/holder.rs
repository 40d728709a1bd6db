//! Holder classes for top-level declarations and singletons.

use tyb_codec::metadata::describe;
use tyb_codec::{DeclMetadata, Marker};
use tyb_erase::ErasureContext;
use tyb_ir::{naming, DeclFlags, DeclId, DeclKind, Type};

use super::Synthesizer;
use crate::def::{ClassDef, Expr, FieldDef, MethodDef, Modifiers, ParamDef, Stmt};
use crate::SynthError;

impl Synthesizer<'_> {
    /// Holder class for a top-level attribute.
    ///
    /// A private static slot, a static getter, a static setter when the
    /// attribute is variable, and a private constructor.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn value_holder(&self, decl: DeclId) -> Result<ClassDef, SynthError> {
        let d = self.model.decl(decl);
        let ty = match &d.kind {
            DeclKind::Value(v) if d.flags.contains(DeclFlags::TOPLEVEL) => v.ty.as_ref(),
            _ => None,
        }
        .ok_or_else(|| self.wrong_shape(decl, "an attribute holder"))?;
        let name = self.model.simple_name(decl);
        let target = self.erase(ty)?;

        let mut class = self.holder_class(decl, DeclMetadata::default(), Marker::Attribute);
        let slot = Expr::StaticField {
            class: class.qualified_name(),
            name: naming::HOLDER_VALUE_FIELD.to_owned(),
        };

        let mut slot_modifiers = Modifiers::PRIVATE | Modifiers::STATIC;
        if !d.is_variable() {
            slot_modifiers |= Modifiers::FINAL;
        }
        class.fields.push(FieldDef {
            name: naming::HOLDER_VALUE_FIELD.to_owned(),
            ty: target.clone(),
            modifiers: slot_modifiers,
        });

        let getter = self
            .getter_signature(decl, Modifiers::PUBLIC | Modifiers::STATIC)?
            .with_body(vec![Stmt::Return(Some(slot.clone()))]);
        class.methods.push(getter);

        if d.is_variable() {
            let param = naming::quote_if_keyword(name).into_owned();
            let setter = MethodDef::new(naming::setter_name(name), Modifiers::PUBLIC | Modifiers::STATIC)
                .with_param(ParamDef::new(param.clone(), target))
                .with_body(vec![Stmt::Assign {
                    target: slot,
                    value: Expr::Local(param),
                }]);
            class.methods.push(setter);
        }

        class.methods.push(MethodDef::constructor(Modifiers::PRIVATE));
        Ok(class)
    }

    /// Holder class for a top-level function: one static method named after
    /// the function, plus a static method per defaulted parameter computing
    /// its default from the parameters before it.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn function_holder(&self, decl: DeclId) -> Result<ClassDef, SynthError> {
        let d = self.model.decl(decl);
        let f = match &d.kind {
            DeclKind::Function(f) if d.flags.contains(DeclFlags::TOPLEVEL) => f,
            _ => return Err(self.wrong_shape(decl, "a function holder")),
        };

        let mut class = self.holder_class(decl, DeclMetadata::default(), Marker::Method);
        let method = self.method_signature(decl, Modifiers::PUBLIC | Modifiers::STATIC)?;

        let params = f.parameter_lists.first().map_or(&[][..], |l| l.params.as_slice());
        for (index, param) in params.iter().enumerate() {
            if !param.defaulted {
                continue;
            }
            let mut default = MethodDef::new(
                naming::default_value_method(&method.name, self.model.name(param.name)),
                Modifiers::PUBLIC | Modifiers::STATIC,
            )
            .returning(self.erase(&param.ty)?);
            default.params = method.params[..index].to_vec();
            class.methods.push(default);
        }

        class.methods.insert(0, method);
        class.methods.push(MethodDef::constructor(Modifiers::PRIVATE));
        Ok(class)
    }

    /// Class of a singleton object: a private constructor, a lazily
    /// initialised static `value` and a static getter for it.
    ///
    /// Accepts either the object's anonymous class or its value.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn singleton(&self, decl: DeclId) -> Result<ClassDef, SynthError> {
        let class_decl = match &self.model.decl(decl).kind {
            DeclKind::Nominal(n) if n.object_type => Some(decl),
            DeclKind::Value(v) => v
                .ty
                .as_ref()
                .and_then(Type::nominal_decl)
                .filter(|&c| self.model.decl(c).as_nominal().is_some_and(|n| n.object_type)),
            _ => None,
        }
        .ok_or_else(|| self.wrong_shape(decl, "a singleton"))?;
        let nominal = self
            .model
            .decl(class_decl)
            .as_nominal()
            .ok_or_else(|| self.wrong_shape(decl, "a singleton"))?;

        let mut class = self.holder_class(class_decl, describe(self.model, class_decl), Marker::Object);
        if let Some(extended) = &nominal.extended_type {
            class.superclass = self.eraser.erase(extended, ErasureContext::Extends, false)?;
        }
        for satisfied in &nominal.satisfied_types {
            class
                .interfaces
                .extend(self.eraser.erase(satisfied, ErasureContext::Satisfies, false)?);
        }

        let self_type = self.self_type(class_decl);
        let holder = class.qualified_name();
        let slot = Expr::StaticField {
            class: holder.clone(),
            name: naming::HOLDER_VALUE_FIELD.to_owned(),
        };
        class.fields.push(FieldDef {
            name: naming::HOLDER_VALUE_FIELD.to_owned(),
            ty: self_type.clone(),
            modifiers: Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::VOLATILE,
        });

        let getter = MethodDef::new(
            naming::getter_name(self.model.simple_name(class_decl)),
            Modifiers::PUBLIC | Modifiers::STATIC,
        )
        .returning(self_type)
        .with_body(vec![
            Stmt::If {
                cond: Expr::IsNull(Box::new(slot.clone())),
                then: vec![Stmt::Assign {
                    target: slot.clone(),
                    value: Expr::New {
                        class: holder,
                        args: Vec::new(),
                    },
                }],
            },
            Stmt::Return(Some(slot)),
        ]);
        class.methods.push(MethodDef::constructor(Modifiers::PRIVATE));
        class.methods.push(getter);
        Ok(class)
    }
}
