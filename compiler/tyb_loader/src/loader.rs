//! Lazy, memoizing construction of binary declarations.

mod complete;
mod reverse;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tyb_codec::{DeclMetadata, Marker, TypeNameResolver, TypeParamInfo};
use tyb_diagnostic::Diagnostic;
use tyb_ir::lang::platform;
use tyb_ir::{
    naming, DeclFlags, DeclId, DeclKind, Declaration, FunctionDecl, Model, NominalDecl,
    NominalKind, Type, ValueDecl, Variance,
};
use tyb_stack::ensure_sufficient_stack;

use crate::artifact::{ArtifactSource, ClassArtifact, JvmType, TypeParamArtifact};
use crate::{LoadError, LoaderConfig};

/// Which namespace a reference is looked up in.
///
/// A singleton object holder is both a type and a value; the requested kind
/// picks which of the two declarations is returned.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclarationKind {
    Type,
    Value,
}

impl DeclarationKind {
    fn prefix(self) -> char {
        match self {
            DeclarationKind::Type => 'C',
            DeclarationKind::Value => 'V',
        }
    }
}

fn cache_key(kind: DeclarationKind, qualified: &str) -> String {
    let mut key = String::with_capacity(qualified.len() + 1);
    key.push(kind.prefix());
    key.push_str(qualified);
    key
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Slot {
    /// Allocated, type parameters still loading. A hit here is a
    /// self-reference, such as an F-bounded type parameter.
    UnderConstruction(DeclId),
    Ready(DeclId),
}

impl Slot {
    fn id(self) -> DeclId {
        match self {
            Slot::UnderConstruction(id) | Slot::Ready(id) => id,
        }
    }
}

/// What a class artifact stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Shape {
    Class,
    Attribute,
    Function,
    Object,
}

impl Shape {
    fn of(meta: Option<&DeclMetadata>) -> Shape {
        match meta.and_then(|m| m.marker) {
            None => Shape::Class,
            Some(Marker::Attribute) => Shape::Attribute,
            Some(Marker::Method) => Shape::Function,
            Some(Marker::Object) => Shape::Object,
        }
    }

    /// Cache namespace of the declaration returned for `requested`.
    fn kind_for(self, requested: DeclarationKind) -> DeclarationKind {
        match self {
            Shape::Class => DeclarationKind::Type,
            Shape::Attribute | Shape::Function => DeclarationKind::Value,
            Shape::Object => requested,
        }
    }
}

/// Reconstructs declarations from compiled artifacts on first reference.
///
/// One loader serves one compilation run. Declarations are created with
/// their type parameters only; members, signatures and supertypes are filled
/// in by [`DeclarationLoader::ensure_complete`] on first real use.
pub struct DeclarationLoader<'s> {
    source: &'s dyn ArtifactSource,
    config: LoaderConfig,
    cache: FxHashMap<String, Slot>,
    /// Artifact each pending binary declaration completes from.
    artifacts: FxHashMap<DeclId, &'s ClassArtifact>,
    diagnostics: Vec<Diagnostic>,
}

impl<'s> DeclarationLoader<'s> {
    pub fn new(source: &'s dyn ArtifactSource) -> Self {
        Self::with_config(source, LoaderConfig::default())
    }

    pub fn with_config(source: &'s dyn ArtifactSource, config: LoaderConfig) -> Self {
        DeclarationLoader {
            source,
            config,
            cache: FxHashMap::default(),
            artifacts: FxHashMap::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Diagnostics reported for members and supertypes that were dropped
    /// while their siblings carried on.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Whether `qualified` has a memoized declaration of `kind`.
    pub fn is_cached(&self, kind: DeclarationKind, qualified: &str) -> bool {
        self.cache.contains_key(&cache_key(kind, qualified))
    }

    /// Resolve a qualified name to a declaration, constructing it from an
    /// artifact on first reference.
    ///
    /// Loading the same name twice yields the same [`DeclId`].
    #[tracing::instrument(level = "debug", skip(self, model), fields(name = qualified))]
    pub fn load(
        &mut self,
        model: &mut Model,
        qualified: &str,
        kind: DeclarationKind,
    ) -> Result<DeclId, LoadError> {
        ensure_sufficient_stack(|| self.load_inner(model, qualified, kind))
    }

    fn load_inner(
        &mut self,
        model: &mut Model,
        qualified: &str,
        kind: DeclarationKind,
    ) -> Result<DeclId, LoadError> {
        let key = cache_key(kind, qualified);
        if let Some(slot) = self.cache.get(&key) {
            return Ok(slot.id());
        }

        // Declarations the analyzer built win over artifacts.
        let existing = match kind {
            DeclarationKind::Type => model.find_type(qualified),
            DeclarationKind::Value => model.find_value(qualified),
        };
        if let Some(id) = existing {
            self.cache.insert(key, Slot::Ready(id));
            return Ok(id);
        }

        let (artifact, enclosing) = self
            .find_artifact(qualified)
            .ok_or_else(|| LoadError::Unresolved {
                name: qualified.to_owned(),
            })?;
        let meta = metadata_of(artifact.metadata.as_deref(), qualified)?;
        let shape = Shape::of(meta.as_ref());

        // The artifact may already be loaded under its own namespace.
        if let Some(slot) = self.cache.get(&cache_key(shape.kind_for(kind), qualified)) {
            return Ok(slot.id());
        }

        let container = match enclosing {
            Some(outer) => self.load(model, &outer, DeclarationKind::Type)?,
            None => self.package_for(model, &artifact.package),
        };

        let id = match shape {
            Shape::Class => self.construct_nominal(model, artifact, container, qualified, meta.as_ref(), false)?,
            Shape::Attribute => {
                let name = holder_name(artifact, meta.as_ref());
                self.construct_holder(model, artifact, container, qualified, &name, DeclKind::Value(ValueDecl { ty: None }))
            }
            Shape::Function => {
                let name = holder_name(artifact, meta.as_ref());
                self.construct_holder(
                    model,
                    artifact,
                    container,
                    qualified,
                    &name,
                    DeclKind::Function(FunctionDecl::default()),
                )
            }
            Shape::Object => {
                let class = self.construct_nominal(model, artifact, container, qualified, meta.as_ref(), true)?;
                let name = holder_name(artifact, meta.as_ref());
                let value = self.construct_object_value(model, artifact, container, qualified, &name, class);
                match kind {
                    DeclarationKind::Type => class,
                    DeclarationKind::Value => value,
                }
            }
        };
        tracing::debug!(
            decl = ?id,
            shape = ?shape,
            "constructed binary declaration"
        );
        Ok(id)
    }

    /// Find the artifact for `qualified`, falling back to nested classes:
    /// `a.b.C.D` is `D` inside the artifact `a.b.C`.
    ///
    /// For nested classes also returns the name of the enclosing class.
    fn find_artifact(&self, qualified: &str) -> Option<(&'s ClassArtifact, Option<String>)> {
        let source = self.source;
        if let Some(artifact) = source.find_class(qualified) {
            return Some((artifact, None));
        }
        let mut end = qualified.len();
        while let Some(dot) = qualified[..end].rfind('.') {
            end = dot;
            let Some(outer) = source.find_class(&qualified[..dot]) else {
                continue;
            };
            let path: SmallVec<[&str; 4]> = qualified[dot + 1..].split('.').collect();
            let mut current = outer;
            for segment in path {
                current = current.nested_class(segment)?;
            }
            let enclosing = qualified.rfind('.').map(|i| qualified[..i].to_owned());
            return Some((current, enclosing));
        }
        None
    }

    /// Package record for an artifact, created on demand. Platform packages
    /// land in the platform modules every model starts with; other packages
    /// get a module of their own.
    fn package_for(&self, model: &mut Model, package: &str) -> DeclId {
        if let Some(id) = model.package(package) {
            return id;
        }
        let module = if package.is_empty() {
            "default"
        } else {
            self.config.module_for_package(package)
        };
        let module = model.find_or_create_module(module);
        model.find_or_create_package(module, package)
    }

    fn construct_nominal(
        &mut self,
        model: &mut Model,
        artifact: &'s ClassArtifact,
        container: DeclId,
        qualified: &str,
        meta: Option<&DeclMetadata>,
        object_type: bool,
    ) -> Result<DeclId, LoadError> {
        let kind = if artifact.is_interface() {
            NominalKind::Interface
        } else {
            NominalKind::Class
        };
        let mut nominal = NominalDecl::new(kind);
        nominal.object_type = object_type;
        nominal.is_abstract |= artifact.flags.contains(crate::ClassFlags::ABSTRACT);
        nominal.is_final = artifact.flags.contains(crate::ClassFlags::FINAL) || object_type;

        let flags = declaration_flags(model, container, artifact.is_public());
        let name = model.intern(naming::unquote(&artifact.name));
        let id = model.alloc(
            Declaration::new(name, Some(container), DeclKind::Nominal(nominal))
                .with_flags(flags)
                .binary(),
        );

        let key = cache_key(DeclarationKind::Type, qualified);
        self.cache.insert(key.clone(), Slot::UnderConstruction(id));
        self.artifacts.insert(id, artifact);

        self.load_type_params(
            model,
            id,
            meta.and_then(|m| m.type_params.as_deref()),
            &artifact.type_params,
            qualified,
        );

        self.cache.insert(key, Slot::Ready(id));
        Ok(id)
    }

    fn construct_holder(
        &mut self,
        model: &mut Model,
        artifact: &'s ClassArtifact,
        container: DeclId,
        qualified: &str,
        name: &str,
        kind: DeclKind,
    ) -> DeclId {
        let flags = declaration_flags(model, container, artifact.is_public());
        let name = model.intern(name);
        let id = model.alloc(Declaration::new(name, Some(container), kind).with_flags(flags).binary());
        self.cache.insert(cache_key(DeclarationKind::Value, qualified), Slot::Ready(id));
        self.artifacts.insert(id, artifact);
        id
    }

    /// The value of a singleton object. Its type is known up front, so it
    /// needs no completion.
    fn construct_object_value(
        &mut self,
        model: &mut Model,
        artifact: &ClassArtifact,
        container: DeclId,
        qualified: &str,
        name: &str,
        class: DeclId,
    ) -> DeclId {
        let flags = declaration_flags(model, container, artifact.is_public());
        let name = model.intern(name);
        let mut decl = Declaration::new(
            name,
            Some(container),
            DeclKind::Value(ValueDecl {
                ty: Some(Type::simple(class)),
            }),
        )
        .with_flags(flags);
        decl.origin = tyb_ir::Origin::Binary;
        let id = model.alloc(decl);
        self.cache.insert(cache_key(DeclarationKind::Value, qualified), Slot::Ready(id));
        id
    }

    /// Add type parameters to `owner`: names and variance first, then
    /// bounds, so that bounds may refer to any parameter of the list.
    ///
    /// Metadata wins over the artifact's own type parameters. A bound that
    /// cannot be resolved is dropped with a diagnostic.
    fn load_type_params(
        &mut self,
        model: &mut Model,
        owner: DeclId,
        meta: Option<&[TypeParamInfo]>,
        artifact_params: &[TypeParamArtifact],
        subject: &str,
    ) {
        if let Some(infos) = meta {
            let ids: Vec<DeclId> = infos
                .iter()
                .map(|info| model.add_type_parameter(owner, &info.name, info.variance))
                .collect();
            for (&param, info) in ids.iter().zip(infos) {
                for bound in &info.satisfies {
                    match self.decode(model, bound, owner, subject) {
                        Ok(ty) => model.add_satisfied_type(param, ty),
                        Err(err) => self.report(err),
                    }
                }
            }
            return;
        }

        let ids: Vec<DeclId> = artifact_params
            .iter()
            .map(|p| model.add_type_parameter(owner, &p.name, Variance::Invariant))
            .collect();
        for (&param, artifact) in ids.iter().zip(artifact_params) {
            for bound in &artifact.bounds {
                let ty = if bound.is_class(platform::OBJECT) {
                    Ok(Type::simple(model.lang().object))
                } else {
                    self.structural(model, bound, owner, subject)
                };
                match ty {
                    Ok(ty) => model.add_satisfied_type(param, ty),
                    Err(err) => self.report(err),
                }
            }
        }
    }

    /// Decode an encoded type, loading referenced declarations as needed.
    fn decode(
        &mut self,
        model: &mut Model,
        text: &str,
        scope: DeclId,
        subject: &str,
    ) -> Result<Type, LoadError> {
        let mut resolver = LoaderResolver {
            loader: self,
            model,
        };
        tyb_codec::decode(text, scope, &mut resolver).map_err(|source| LoadError::Metadata {
            subject: subject.to_owned(),
            source,
        })
    }

    fn report(&mut self, err: LoadError) {
        tracing::debug!(%err, "dropped declaration");
        self.diagnostics.push(err.to_diagnostic());
    }

    fn warn(&mut self, diag: Diagnostic) {
        tracing::debug!(code = ?diag.code, subject = ?diag.subject, "loader warning");
        self.diagnostics.push(diag);
    }
}

/// Decode resolver that loads referenced declarations on demand.
struct LoaderResolver<'a, 's> {
    loader: &'a mut DeclarationLoader<'s>,
    model: &'a mut Model,
}

impl TypeNameResolver for LoaderResolver<'_, '_> {
    fn resolve_type(&mut self, qualified: &str) -> Option<DeclId> {
        self.loader
            .load(self.model, qualified, DeclarationKind::Type)
            .ok()
            .filter(|&id| self.model.decl(id).is_type())
    }

    fn type_parameter(&self, scope: DeclId, name: &str) -> Option<DeclId> {
        self.model.lookup_type_parameter(scope, name)
    }

    fn arity(&self, decl: DeclId) -> usize {
        self.model.type_params(decl).len()
    }
}

fn metadata_of(text: Option<&str>, subject: &str) -> Result<Option<DeclMetadata>, LoadError> {
    text.map(DeclMetadata::from_sidecar)
        .transpose()
        .map_err(|source| LoadError::Metadata {
            subject: subject.to_owned(),
            source,
        })
}

/// Source name of a top-level holder: from metadata, else the unquoted class
/// name.
fn holder_name(artifact: &ClassArtifact, meta: Option<&DeclMetadata>) -> String {
    meta.and_then(|m| m.name.clone())
        .unwrap_or_else(|| naming::unquote(&artifact.name).to_owned())
}

fn declaration_flags(model: &Model, container: DeclId, public: bool) -> DeclFlags {
    let mut flags = DeclFlags::empty();
    if public {
        flags |= DeclFlags::SHARED;
    }
    if matches!(model.decl(container).kind, DeclKind::Package) {
        flags |= DeclFlags::TOPLEVEL;
    }
    flags
}

/// Signature types stored natively.
fn is_unboxed(ty: &JvmType) -> bool {
    ty.is_primitive() || ty.is_class(platform::STRING)
}

#[cfg(test)]
mod tests;
