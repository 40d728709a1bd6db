//! Interface companions and the forwarders of classes that satisfy them.

use rustc_hash::FxHashSet;
use tyb_erase::{ErasureContext, TargetType};
use tyb_ir::{naming, DeclFlags, DeclId, DeclKind, Type};

use super::Synthesizer;
use crate::def::{ClassDef, Expr, FieldDef, MethodDef, Modifiers, ParamDef, Stmt};
use crate::SynthError;

/// Members a class needs to reach the companions of the interfaces it
/// satisfies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForwarderSet {
    /// One `$Iface$impl` field per interface.
    pub fields: Vec<FieldDef>,
    /// Companion instantiations, run by every constructor.
    pub init: Vec<Stmt>,
    /// Stubs delegating to the companions.
    pub methods: Vec<MethodDef>,
}

impl ForwarderSet {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.methods.is_empty()
    }

    /// Merge into `class`, keeping members it already declares.
    pub fn apply_to(self, class: &mut ClassDef) {
        for field in self.fields {
            if class.field(&field.name).is_none() {
                class.fields.push(field);
            }
        }
        for ctor in class.constructors_mut() {
            let body = ctor.body.get_or_insert_with(Vec::new);
            let rest = std::mem::take(body);
            body.extend(self.init.iter().cloned());
            body.extend(rest);
        }
        for method in self.methods {
            if !class.declares(&method.name, method.params.len()) {
                class.methods.push(method);
            }
        }
    }
}

impl Synthesizer<'_> {
    /// Companion class holding the concrete members of an interface.
    ///
    /// The companion keeps the instance it serves in `$this`; the bodies of
    /// its methods are left to the backend.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn companion(&self, iface: DeclId) -> Result<ClassDef, SynthError> {
        let nominal = self
            .model
            .decl(iface)
            .as_nominal()
            .filter(|n| n.is_interface())
            .ok_or_else(|| self.wrong_shape(iface, "a companion"))?;

        let mut class = ClassDef::new(
            self.package_name(iface),
            naming::companion_name(self.model.simple_name(iface)),
            Modifiers::PUBLIC | Modifiers::FINAL,
        );
        class.type_params = self.type_params(&nominal.type_params)?;

        let iface_type = self.self_type(iface);
        class.fields.push(FieldDef {
            name: naming::COMPANION_THIS.to_owned(),
            ty: iface_type.clone(),
            modifiers: Modifiers::PRIVATE | Modifiers::FINAL,
        });
        class.methods.push(
            MethodDef::constructor(Modifiers::PUBLIC)
                .with_param(ParamDef::new(naming::COMPANION_THIS, iface_type))
                .with_body(vec![Stmt::Assign {
                    target: Expr::this_field(naming::COMPANION_THIS),
                    value: Expr::local(naming::COMPANION_THIS),
                }]),
        );

        for &member in &self.model.decl(iface).members {
            let decl = self.model.decl(member);
            if decl.flags.contains(DeclFlags::FORMAL) {
                continue;
            }
            match decl.kind {
                DeclKind::Function(_) => class.methods.push(self.method_signature(member, Modifiers::PUBLIC)?),
                DeclKind::Value(_) => class.methods.push(self.getter_signature(member, Modifiers::PUBLIC)?),
                _ => {}
            }
        }
        Ok(class)
    }

    /// Companion fields, their initialisation and forwarding stubs for the
    /// interfaces `class` satisfies.
    ///
    /// Interfaces already satisfied through the superclass are skipped, as
    /// are members the class declares itself. Binary supertypes must be
    /// completed before this is called.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn forwarders(&self, class: DeclId) -> Result<ForwarderSet, SynthError> {
        let nominal = self
            .model
            .decl(class)
            .as_nominal()
            .filter(|n| !n.is_interface())
            .ok_or_else(|| self.wrong_shape(class, "forwarders"))?;

        let mut seen = FxHashSet::default();
        seen.insert(class);
        if let Some(extended) = &nominal.extended_type {
            if let Some(superclass) = extended.nominal_decl().filter(|&s| seen.insert(s)) {
                let subst = self.substitution(superclass, extended);
                self.collect_interfaces(superclass, &subst, &mut seen, &mut Vec::new());
            }
        }
        let mut interfaces = Vec::new();
        self.collect_interfaces(class, &[], &mut seen, &mut interfaces);

        let mut set = ForwarderSet::default();
        let mut forwarded: FxHashSet<&str> = FxHashSet::default();
        for satisfied in interfaces {
            let Some(iface) = satisfied.nominal_decl() else {
                continue;
            };
            let simple = self.model.simple_name(iface);
            let field = naming::companion_field_name(simple);
            let companion = match self.package_name(iface) {
                "" => naming::companion_name(simple),
                package => format!("{package}.{}", naming::companion_name(simple)),
            };
            let companion_args = self
                .eraser
                .erase(&satisfied, ErasureContext::Satisfies, false)?
                .map(|erased| erased.type_args().to_vec())
                .unwrap_or_default();

            set.fields.push(FieldDef {
                name: field.clone(),
                ty: TargetType::generic(companion.clone(), companion_args),
                modifiers: Modifiers::PRIVATE | Modifiers::FINAL,
            });
            set.init.push(Stmt::Assign {
                target: Expr::this_field(field.clone()),
                value: Expr::New {
                    class: companion,
                    args: vec![Expr::This],
                },
            });

            let subst = self.substitution(iface, &satisfied);
            for &member in &self.model.decl(iface).members {
                let decl = self.model.decl(member);
                let name = self.model.simple_name(member);
                if decl.flags.contains(DeclFlags::FORMAL)
                    || self.model.direct_value(class, name).is_some()
                    || !matches!(decl.kind, DeclKind::Function(_) | DeclKind::Value(_))
                    || !forwarded.insert(name)
                {
                    continue;
                }
                set.methods.push(self.forwarder(member, &field, &subst)?);
            }
        }
        tracing::debug!(
            fields = set.fields.len(),
            methods = set.methods.len(),
            "forwarders"
        );
        Ok(set)
    }

    /// Stub for `member` typed as the class sees it through `subst`.
    fn forwarder(&self, member: DeclId, field: &str, subst: &[(DeclId, Type)]) -> Result<MethodDef, SynthError> {
        let mut stub = match self.model.decl(member).kind {
            DeclKind::Function(_) => self.method_signature_as(member, Modifiers::PUBLIC, subst)?,
            _ => self.getter_signature_as(member, Modifiers::PUBLIC, subst)?,
        };
        let args = stub.params.iter().map(|p| Expr::local(p.name.clone())).collect();
        let call = Expr::call(Expr::this_field(field), stub.name.clone(), args);
        stub.body = Some(if stub.return_type.is_some() {
            vec![Stmt::Return(Some(call))]
        } else {
            vec![Stmt::Expr(call), Stmt::Return(None)]
        });
        Ok(stub)
    }

    /// Interfaces reachable from `decl` through supertypes not yet in
    /// `seen`, in depth-first order, applied to the arguments `decl`'s own
    /// type parameters take under `subst`. Language interfaces have no
    /// companion and are left out of `out`.
    fn collect_interfaces(
        &self,
        decl: DeclId,
        subst: &[(DeclId, Type)],
        seen: &mut FxHashSet<DeclId>,
        out: &mut Vec<Type>,
    ) {
        let Some(nominal) = self.model.decl(decl).as_nominal() else {
            return;
        };
        for supertype in nominal.extended_type.iter().chain(&nominal.satisfied_types) {
            let supertype = supertype.substitute(subst);
            let Some(super_decl) = supertype.nominal_decl() else {
                continue;
            };
            if !seen.insert(super_decl) {
                continue;
            }
            let is_interface = self
                .model
                .decl(super_decl)
                .as_nominal()
                .is_some_and(|n| n.is_interface());
            let inner = self.substitution(super_decl, &supertype);
            if is_interface && self.model.package_of(super_decl) != Some(self.model.lang().package) {
                out.push(supertype);
            }
            self.collect_interfaces(super_decl, &inner, seen, out);
        }
    }

    /// Type parameters of `decl` paired with the arguments of `applied`.
    /// Raw uses bind nothing.
    fn substitution(&self, decl: DeclId, applied: &Type) -> Vec<(DeclId, Type)> {
        self.model
            .type_params(decl)
            .iter()
            .copied()
            .zip(applied.type_args().iter().cloned())
            .collect()
    }
}
