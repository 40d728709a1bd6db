//! Target classes for analyzer classes, interfaces and objects.

use tyb_codec::metadata::describe;
use tyb_erase::{ErasureContext, TargetType};
use tyb_ir::{naming, DeclFlags, DeclId, DeclKind, NominalDecl};

use super::Synthesizer;
use crate::def::{ClassDef, MethodDef, Modifiers, ParamDef};
use crate::SynthError;

impl Synthesizer<'_> {
    /// Class definition for a class, interface or object declaration.
    ///
    /// Members become accessors and methods whose bodies are left to the
    /// backend. Classes also receive forwarders to the companions of the
    /// interfaces they satisfy.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn class(&self, decl: DeclId) -> Result<ClassDef, SynthError> {
        let nominal = self
            .model
            .decl(decl)
            .as_nominal()
            .ok_or_else(|| self.wrong_shape(decl, "a class"))?;
        let interface = nominal.is_interface();

        let mut class = if nominal.object_type {
            self.singleton(decl)?
        } else {
            self.skeleton(decl, nominal)?
        };
        self.add_members(decl, interface, &mut class)?;
        if !interface {
            self.forwarders(decl)?.apply_to(&mut class);
        }
        Ok(class)
    }

    /// Header, type parameters and initializer of a class or interface.
    fn skeleton(&self, decl: DeclId, nominal: &NominalDecl) -> Result<ClassDef, SynthError> {
        let interface = nominal.is_interface();
        let mut modifiers = Modifiers::empty();
        if self.model.decl(decl).is_shared() {
            modifiers |= Modifiers::PUBLIC;
        }
        if interface {
            modifiers |= Modifiers::INTERFACE | Modifiers::ABSTRACT;
        } else if nominal.is_abstract {
            modifiers |= Modifiers::ABSTRACT;
        } else if nominal.is_final {
            modifiers |= Modifiers::FINAL;
        }

        let name = naming::quote_if_keyword(self.model.simple_name(decl));
        let mut class = ClassDef::new(self.package_name(decl), name, modifiers);
        class.type_params = self.type_params(&nominal.type_params)?;
        class.superclass = match (&nominal.extended_type, interface) {
            (_, true) => None,
            (Some(extended), false) => self.eraser.erase(extended, ErasureContext::Extends, false)?,
            (None, false) => Some(TargetType::object()),
        };
        for satisfied in &nominal.satisfied_types {
            class
                .interfaces
                .extend(self.eraser.erase(satisfied, ErasureContext::Satisfies, false)?);
        }

        let meta = describe(self.model, decl);
        if !meta.is_empty() {
            class.metadata = Some(meta.to_sidecar());
        }

        if !interface {
            let mut ctor = MethodDef::constructor(Modifiers::PUBLIC);
            if let Some(list) = &nominal.parameters {
                ctor.params = list
                    .params
                    .iter()
                    .map(|p| self.param_def(p))
                    .collect::<Result<_, _>>()?;
            }
            class.methods.push(ctor);
        }
        Ok(class)
    }

    fn add_members(&self, decl: DeclId, interface: bool, class: &mut ClassDef) -> Result<(), SynthError> {
        for &member in &self.model.decl(decl).members {
            let d = self.model.decl(member);
            let mut modifiers = Modifiers::empty();
            if d.is_shared() {
                modifiers |= Modifiers::PUBLIC;
            }
            if interface || d.flags.contains(DeclFlags::FORMAL) {
                modifiers |= Modifiers::ABSTRACT;
            }

            match &d.kind {
                DeclKind::Value(_) => {
                    let getter = self.getter_signature(member, modifiers)?;
                    let ty = getter.return_type.clone();
                    class.methods.push(getter);
                    if let (true, Some(ty)) = (d.is_variable(), ty) {
                        let name = self.model.simple_name(member);
                        class.methods.push(
                            MethodDef::new(naming::setter_name(name), modifiers)
                                .with_param(ParamDef::new(naming::quote_if_keyword(name), ty)),
                        );
                    }
                }
                DeclKind::Function(_) => class.methods.push(self.method_signature(member, modifiers)?),
                _ => {}
            }
        }
        Ok(())
    }
}
