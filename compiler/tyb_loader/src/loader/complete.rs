//! Second phase of loading: members, signatures and supertypes.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tyb_codec::DeclMetadata;
use tyb_diagnostic::{Diagnostic, ErrorCode};
use tyb_ir::{
    naming, Completion, DeclFlags, DeclId, DeclKind, Declaration, FunctionDecl, Model, Origin,
    Parameter, ParameterList, Type, ValueDecl,
};
use tyb_stack::ensure_sufficient_stack;

use super::{is_unboxed, metadata_of, DeclarationLoader};
use crate::artifact::{ClassArtifact, JvmType, MethodArtifact, MethodFlags};
use crate::classify::{is_equals, MemberKind};
use crate::LoadError;

#[derive(Copy, Clone)]
enum Pending {
    Nominal,
    Attribute,
    Function,
}

impl DeclarationLoader<'_> {
    /// Fill in a binary declaration's members, signature and supertypes.
    ///
    /// Runs at most once per declaration: later calls, including re-entrant
    /// ones made while the declaration is being completed, return at once.
    /// On failure the declaration is marked [`Completion::Failed`] and keeps
    /// whatever was filled in before the error.
    #[tracing::instrument(level = "debug", skip(self, model), fields(decl = ?id))]
    pub fn ensure_complete(&mut self, model: &mut Model, id: DeclId) -> Result<(), LoadError> {
        if model.decl(id).completion != Completion::Pending {
            return Ok(());
        }
        let Some(&artifact) = self.artifacts.get(&id) else {
            model.decl_mut(id).completion = Completion::Complete;
            return Ok(());
        };
        let pending = match model.decl(id).kind {
            DeclKind::Nominal(_) => Pending::Nominal,
            DeclKind::Value(_) => Pending::Attribute,
            DeclKind::Function(_) => Pending::Function,
            _ => {
                model.decl_mut(id).completion = Completion::Complete;
                return Ok(());
            }
        };

        model.decl_mut(id).completion = Completion::InProgress;
        let result = ensure_sufficient_stack(|| match pending {
            Pending::Nominal => self.complete_nominal(model, id, artifact),
            Pending::Attribute => self.complete_attribute(model, id, artifact),
            Pending::Function => self.complete_function(model, id, artifact),
        });
        model.decl_mut(id).completion = if result.is_ok() {
            Completion::Complete
        } else {
            Completion::Failed
        };
        result
    }

    /// Members of a class or interface, completing it first.
    pub fn members(&mut self, model: &mut Model, id: DeclId) -> Result<Vec<DeclId>, LoadError> {
        self.ensure_complete(model, id)?;
        Ok(model.decl(id).members.clone())
    }

    /// Declared or inherited member named `name`.
    pub fn member(
        &mut self,
        model: &mut Model,
        type_decl: DeclId,
        name: &str,
    ) -> Result<Option<DeclId>, LoadError> {
        self.ensure_complete(model, type_decl)?;
        Ok(model.member(type_decl, name))
    }

    fn complete_nominal(
        &mut self,
        model: &mut Model,
        id: DeclId,
        artifact: &ClassArtifact,
    ) -> Result<(), LoadError> {
        let qualified = model.qualified_name(id);
        let meta = metadata_of(artifact.metadata.as_deref(), &qualified)?.unwrap_or_default();

        let cycle = self.complete_supertypes(model, id, artifact, &meta, &qualified);
        for supertype in model.supertype_decls(id) {
            if let Err(err) = self.ensure_complete(model, supertype) {
                self.report(err);
            }
        }

        let (interface, object_type) = model
            .decl(id)
            .as_nominal()
            .map_or((false, false), |n| (n.is_interface(), n.object_type));
        let public_only = self.config.public_only(&artifact.package);
        let mut constructors = 0usize;
        let mut setters: SmallVec<[String; 4]> = SmallVec::new();

        for method in &artifact.methods {
            if method.is_static() || (public_only && !method.is_public()) {
                continue;
            }
            match MemberKind::classify(method) {
                MemberKind::Constructor => {
                    constructors += 1;
                    if constructors == 2 {
                        self.warn(
                            Diagnostic::warning(ErrorCode::W1001)
                                .with_message("more than one constructor, using the first")
                                .with_subject(qualified.clone()),
                        );
                    }
                    if constructors > 1 || object_type {
                        continue;
                    }
                    match self.load_parameters(model, id, method, &qualified) {
                        Ok(params) => model.set_parameters(id, params),
                        Err(err) => self.report(err),
                    }
                }
                MemberKind::Setter { attribute } => setters.push(attribute),
                kind @ (MemberKind::Getter { .. } | MemberKind::HashAccessor | MemberKind::StringAccessor) => {
                    if let Some(attribute) = kind.attribute() {
                        self.add_attribute(model, id, method, attribute, &qualified);
                    }
                }
                MemberKind::Function => self.add_function(model, id, method, &qualified),
            }
        }

        for attribute in setters {
            let value = model.direct_member_where(id, &attribute, |d| matches!(d.kind, DeclKind::Value(_)));
            match value {
                Some(value) => model.decl_mut(value).flags |= DeclFlags::VARIABLE,
                None => self.warn(
                    Diagnostic::warning(ErrorCode::W1002)
                        .with_message(format!("setter for `{attribute}` has no matching attribute"))
                        .with_subject(qualified.clone()),
                ),
            }
        }

        if constructors == 0 && !interface && !object_type {
            model.set_parameters(id, ParameterList::default());
        }

        match cycle {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Set the extended and satisfied types. Returns the cycle error when the
    /// extended chain loops back; the chain is then cut at this declaration.
    fn complete_supertypes(
        &mut self,
        model: &mut Model,
        id: DeclId,
        artifact: &ClassArtifact,
        meta: &DeclMetadata,
        qualified: &str,
    ) -> Option<LoadError> {
        let lang = *model.lang();
        let identifiable = Type::simple(lang.identifiable_object);

        let extended = if artifact.is_interface() {
            Type::simple(lang.object)
        } else if let Some(text) = &meta.extended_type {
            self.decode(model, text, id, qualified).unwrap_or_else(|err| {
                self.report(err);
                identifiable.clone()
            })
        } else {
            match &artifact.superclass {
                None => identifiable.clone(),
                Some(superclass) if superclass.is_class(tyb_ir::lang::platform::OBJECT) => identifiable.clone(),
                Some(superclass) => self
                    .structural(model, superclass, id, qualified)
                    .unwrap_or_else(|err| {
                        self.report(err);
                        identifiable.clone()
                    }),
            }
        };
        model.set_extended_type(id, Some(extended));

        let cycle = if extends_cycle(model, id) {
            model.set_extended_type(id, Some(identifiable));
            Some(LoadError::CyclicSupertype {
                name: qualified.to_owned(),
            })
        } else {
            None
        };

        let satisfied = match &meta.satisfied_types {
            Some(encoded) => encoded
                .iter()
                .filter_map(|text| match self.decode(model, text, id, qualified) {
                    Ok(ty) => Some(ty),
                    Err(err) => {
                        self.report(err);
                        None
                    }
                })
                .collect::<Vec<_>>(),
            None => artifact
                .interfaces
                .iter()
                .filter_map(|iface| match self.structural(model, iface, id, qualified) {
                    Ok(ty) => Some(ty),
                    Err(err) => {
                        self.report(err);
                        None
                    }
                })
                .collect(),
        };
        for ty in satisfied {
            model.add_satisfied_type(id, ty);
        }
        cycle
    }

    /// Attribute member from a getter or a `hash`/`string` accessor.
    fn add_attribute(
        &mut self,
        model: &mut Model,
        owner: DeclId,
        method: &MethodArtifact,
        attribute: &str,
        qualified: &str,
    ) {
        let subject = format!("{qualified}.{attribute}");
        let ty = metadata_of(method.metadata.as_deref(), &subject).and_then(|meta| {
            self.member_type(model, owner, &method.return_type, meta.as_ref(), &subject)
        });
        let ty = match ty {
            Ok(ty) => ty,
            Err(err) => return self.report(err),
        };

        let mut flags = self.member_flags(model, owner, method, attribute);
        if is_unboxed(&method.return_type) {
            flags |= DeclFlags::UNBOXED;
        }
        let name = model.intern(attribute);
        model.alloc(binary_member(name, owner, DeclKind::Value(ValueDecl { ty: Some(ty) })).with_flags(flags));
    }

    /// Function member. A member whose signature fails to load is removed
    /// again; its siblings are unaffected.
    fn add_function(&mut self, model: &mut Model, owner: DeclId, method: &MethodArtifact, qualified: &str) {
        let subject = format!("{qualified}.{}", method.name);
        let meta = match metadata_of(method.metadata.as_deref(), &subject) {
            Ok(meta) => meta,
            Err(err) => return self.report(err),
        };
        let source_name = meta
            .as_ref()
            .and_then(|m| m.name.clone())
            .unwrap_or_else(|| naming::unquote(&method.name).to_owned());

        let mut flags = self.member_flags(model, owner, method, &source_name);
        if is_unboxed(&method.return_type) {
            flags |= DeclFlags::UNBOXED;
        }
        let name = model.intern(&source_name);
        let id = model.alloc(
            binary_member(name, owner, DeclKind::Function(FunctionDecl::default())).with_flags(flags),
        );
        if let Err(err) = self.fill_function(model, id, method, meta.as_ref(), &subject) {
            model.decl_mut(owner).members.retain(|&m| m != id);
            model.decl_mut(id).completion = Completion::Failed;
            self.report(err);
        }
    }

    /// Type parameters, parameters and return type of a function.
    fn fill_function(
        &mut self,
        model: &mut Model,
        id: DeclId,
        method: &MethodArtifact,
        meta: Option<&DeclMetadata>,
        subject: &str,
    ) -> Result<(), LoadError> {
        self.load_type_params(
            model,
            id,
            meta.and_then(|m| m.type_params.as_deref()),
            &method.type_params,
            subject,
        );
        let params = if is_equals(method) {
            let that = model.param("that", Type::simple(model.lang().object));
            ParameterList::new(vec![that])
        } else {
            self.load_parameters(model, id, method, subject)?
        };
        let return_type = self.member_type(model, id, &method.return_type, meta, subject)?;
        if let DeclKind::Function(function) = &mut model.decl_mut(id).kind {
            function.parameter_lists = vec![params];
            function.return_type = Some(return_type);
        }
        Ok(())
    }

    fn load_parameters(
        &mut self,
        model: &mut Model,
        scope: DeclId,
        method: &MethodArtifact,
        subject: &str,
    ) -> Result<ParameterList, LoadError> {
        let mut params = Vec::with_capacity(method.params.len());
        for artifact in &method.params {
            let meta = metadata_of(artifact.metadata.as_deref(), subject)?;
            let ty = self.member_type(model, scope, &artifact.ty, meta.as_ref(), subject)?;
            let name = meta
                .as_ref()
                .and_then(|m| m.name.as_deref())
                .unwrap_or(&artifact.name);
            let mut param = Parameter::new(model.intern(name), ty);
            if let Some(meta) = &meta {
                param.sequenced = meta.sequenced;
                param.defaulted = meta.defaulted;
            }
            param.unboxed = is_unboxed(&artifact.ty);
            params.push(param);
        }
        Ok(ParameterList::new(params))
    }

    /// Type of a member or parameter: the encoded type when metadata has
    /// one, else the reverse-erased signature type.
    fn member_type(
        &mut self,
        model: &mut Model,
        scope: DeclId,
        jvm: &JvmType,
        meta: Option<&DeclMetadata>,
        subject: &str,
    ) -> Result<Type, LoadError> {
        match meta.and_then(|m| m.type_info.as_deref()) {
            Some(text) => self.decode(model, text, scope, subject),
            None => self.reverse_top(model, jvm, scope, subject),
        }
    }

    fn member_flags(&self, model: &Model, owner: DeclId, method: &MethodArtifact, name: &str) -> DeclFlags {
        let mut flags = DeclFlags::empty();
        if method.is_public() {
            flags |= DeclFlags::SHARED;
        }
        let in_interface = model.decl(owner).as_nominal().is_some_and(|n| n.is_interface());
        if method.flags.contains(MethodFlags::ABSTRACT) || in_interface {
            flags |= DeclFlags::FORMAL;
        } else if !method.flags.contains(MethodFlags::FINAL) {
            flags |= DeclFlags::DEFAULT;
        }
        if model.inherited_member(owner, name).is_some() {
            flags |= DeclFlags::ACTUAL;
        }
        flags
    }

    /// Top-level attribute: a static getter, plus a static setter when the
    /// attribute is variable.
    fn complete_attribute(
        &mut self,
        model: &mut Model,
        id: DeclId,
        artifact: &ClassArtifact,
    ) -> Result<(), LoadError> {
        let name = model.simple_name(id);
        let qualified = model.qualified_name(id);
        let getter_name = naming::getter_name(name);
        let getter = artifact
            .find_method(&getter_name, |m| m.is_static() && m.params.is_empty())
            .ok_or_else(|| LoadError::MissingAccessor {
                holder: qualified.clone(),
                accessor: getter_name.clone(),
            })?;
        let variable = artifact
            .find_method(&naming::setter_name(name), |m| m.is_static() && m.params.len() == 1)
            .is_some();

        let meta = metadata_of(getter.metadata.as_deref(), &qualified)?;
        let ty = self.member_type(model, id, &getter.return_type, meta.as_ref(), &qualified)?;

        let decl = model.decl_mut(id);
        if variable {
            decl.flags |= DeclFlags::VARIABLE;
        }
        if is_unboxed(&getter.return_type) {
            decl.flags |= DeclFlags::UNBOXED;
        }
        if let DeclKind::Value(value) = &mut decl.kind {
            value.ty = Some(ty);
        }
        Ok(())
    }

    /// Top-level function: the holder's static method of the same name.
    fn complete_function(
        &mut self,
        model: &mut Model,
        id: DeclId,
        artifact: &ClassArtifact,
    ) -> Result<(), LoadError> {
        let name = model.simple_name(id);
        let qualified = model.qualified_name(id);
        let target = naming::quote_if_keyword(name);
        let method = artifact
            .find_method(&target, MethodArtifact::is_static)
            .ok_or_else(|| LoadError::MissingAccessor {
                holder: qualified.clone(),
                accessor: target.clone().into_owned(),
            })?;
        let meta = metadata_of(method.metadata.as_deref(), &qualified)?;
        if is_unboxed(&method.return_type) {
            model.decl_mut(id).flags |= DeclFlags::UNBOXED;
        }
        self.fill_function(model, id, method, meta.as_ref(), &qualified)
    }
}

/// A completed member of a binary declaration.
fn binary_member(name: tyb_ir::Name, owner: DeclId, kind: DeclKind) -> Declaration {
    let mut decl = Declaration::new(name, Some(owner), kind);
    decl.origin = Origin::Binary;
    decl
}

/// Whether the extended-type chain starting at `id` returns to `id`.
fn extends_cycle(model: &Model, id: DeclId) -> bool {
    let extended = |decl: DeclId| {
        model
            .decl(decl)
            .as_nominal()
            .and_then(|n| n.extended_type.as_ref())
            .and_then(Type::nominal_decl)
    };
    let mut seen = FxHashSet::default();
    let mut current = extended(id);
    while let Some(decl) = current {
        if decl == id {
            return true;
        }
        if !seen.insert(decl) {
            return false;
        }
        current = extended(decl);
    }
    false
}
