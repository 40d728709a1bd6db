//! The run-scoped declaration model.
//!
//! One [`Model`] exists per compilation run. It owns the interner and the
//! declaration arena; source declarations are added through the builder
//! methods, binary ones by the loader.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::decl::{
    DeclFlags, DeclKind, Declaration, FunctionDecl, NominalDecl, NominalKind, Parameter,
    ParameterList, TypeParamDecl, ValueDecl, Variance,
};
use crate::lang::{LangDecls, Wrapper, LANG_MODULE};
use crate::{DeclId, Name, StringInterner, Type};

pub struct Model {
    interner: StringInterner,
    decls: Vec<Declaration>,
    modules: FxHashMap<Name, DeclId>,
    packages: FxHashMap<Name, DeclId>,
    lang: LangDecls,
}

impl Model {
    /// Create a model with the language module bootstrapped and the
    /// platform modules registered.
    pub fn new() -> Self {
        let mut model = Model {
            interner: StringInterner::new(),
            decls: Vec::new(),
            modules: FxHashMap::default(),
            packages: FxHashMap::default(),
            lang: LangDecls::UNSET,
        };
        model.lang = model.bootstrap_lang();
        for module in crate::lang::platform::MODULES {
            model.find_or_create_module(module);
        }
        model
    }

    // Names

    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    #[inline]
    pub fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    // Arena

    /// Get a declaration.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this model.
    #[inline]
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    /// Get a declaration mutably.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this model.
    #[inline]
    pub fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.index()]
    }

    pub fn try_decl(&self, id: DeclId) -> Option<&Declaration> {
        self.decls.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Always false: the language module is bootstrapped on creation.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Add a declaration, registering it as a member of its container.
    pub fn alloc(&mut self, decl: Declaration) -> DeclId {
        let raw = u32::try_from(self.decls.len()).unwrap_or(u32::MAX);
        let id = DeclId::from_raw(raw);
        let container = decl.container;
        self.decls.push(decl);
        if let Some(container) = container {
            self.decls[container.index()].members.push(id);
        }
        id
    }

    #[inline]
    pub fn lang(&self) -> &LangDecls {
        &self.lang
    }

    // Modules and packages

    pub fn module(&self, name: &str) -> Option<DeclId> {
        let name = self.interner.get(name)?;
        self.modules.get(&name).copied()
    }

    pub fn package(&self, name: &str) -> Option<DeclId> {
        let name = self.interner.get(name)?;
        self.packages.get(&name).copied()
    }

    pub fn find_or_create_module(&mut self, name: &str) -> DeclId {
        let name = self.intern(name);
        if let Some(&id) = self.modules.get(&name) {
            return id;
        }
        let id = self.alloc(Declaration::new(name, None, DeclKind::Module));
        self.modules.insert(name, id);
        tracing::trace!(module = self.name(name), "created module");
        id
    }

    /// Find a package by its dotted name or create it inside `module`.
    ///
    /// An existing package is returned as is, whichever module holds it.
    pub fn find_or_create_package(&mut self, module: DeclId, name: &str) -> DeclId {
        let name = self.intern(name);
        if let Some(&id) = self.packages.get(&name) {
            return id;
        }
        let id = self.alloc(Declaration::new(name, Some(module), DeclKind::Package));
        self.packages.insert(name, id);
        tracing::trace!(package = self.name(name), "created package");
        id
    }

    /// The package a declaration lives in.
    pub fn package_of(&self, id: DeclId) -> Option<DeclId> {
        let mut current = Some(id);
        while let Some(c) = current {
            let decl = self.decl(c);
            if matches!(decl.kind, DeclKind::Package) {
                return Some(c);
            }
            current = decl.container;
        }
        None
    }

    // Naming and lookup

    /// Dotted name: package name followed by the member chain.
    pub fn qualified_name(&self, id: DeclId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            let decl = self.decl(c);
            match decl.kind {
                DeclKind::Module => break,
                DeclKind::Package => {
                    let package = self.name(decl.name);
                    if !package.is_empty() {
                        segments.push(package);
                    }
                    break;
                }
                _ => segments.push(self.name(decl.name)),
            }
            current = decl.container;
        }
        segments.reverse();
        segments.join(".")
    }

    #[inline]
    pub fn simple_name(&self, id: DeclId) -> &'static str {
        self.name(self.decl(id).name)
    }

    /// First direct member of `scope` named `name` that satisfies `filter`.
    pub fn direct_member_where(
        &self,
        scope: DeclId,
        name: &str,
        filter: impl Fn(&Declaration) -> bool,
    ) -> Option<DeclId> {
        let name = self.interner.get(name)?;
        self.decl(scope).members.iter().copied().find(|&m| {
            let member = self.decl(m);
            member.name == name && filter(member)
        })
    }

    /// Direct class or interface member.
    pub fn direct_type(&self, scope: DeclId, name: &str) -> Option<DeclId> {
        self.direct_member_where(scope, name, Declaration::is_type)
    }

    /// Direct value or function member.
    pub fn direct_value(&self, scope: DeclId, name: &str) -> Option<DeclId> {
        self.direct_member_where(scope, name, |d| {
            matches!(d.kind, DeclKind::Value(_) | DeclKind::Function(_))
        })
    }

    /// Resolve a qualified type name already present in the model.
    pub fn find_type(&self, qualified: &str) -> Option<DeclId> {
        self.find_qualified(qualified, Declaration::is_type)
    }

    /// Resolve a qualified value or function name already present in the
    /// model.
    pub fn find_value(&self, qualified: &str) -> Option<DeclId> {
        self.find_qualified(qualified, |d| {
            matches!(d.kind, DeclKind::Value(_) | DeclKind::Function(_))
        })
    }

    fn find_qualified(&self, qualified: &str, last: impl Fn(&Declaration) -> bool) -> Option<DeclId> {
        // Longest package prefix wins.
        let mut split_points: Vec<usize> = qualified.match_indices('.').map(|(i, _)| i).collect();
        split_points.reverse();
        for split in split_points {
            if let Some(package) = self.package(&qualified[..split]) {
                if let Some(found) = self.walk_members(package, &qualified[split + 1..], &last) {
                    return Some(found);
                }
            }
        }
        let default = self.package("")?;
        self.walk_members(default, qualified, &last)
    }

    fn walk_members(
        &self,
        package: DeclId,
        path: &str,
        last: &impl Fn(&Declaration) -> bool,
    ) -> Option<DeclId> {
        let mut segments = path.split('.').peekable();
        let mut scope = package;
        while let Some(segment) = segments.next() {
            scope = if segments.peek().is_some() {
                self.direct_type(scope, segment)?
            } else {
                self.direct_member_where(scope, segment, last)?
            };
        }
        Some(scope)
    }

    /// Find a type parameter visible from `scope` by walking the container
    /// chain outward.
    pub fn lookup_type_parameter(&self, scope: DeclId, name: &str) -> Option<DeclId> {
        let name = self.interner.get(name)?;
        let mut current = Some(scope);
        while let Some(c) = current {
            let decl = self.decl(c);
            if matches!(decl.kind, DeclKind::TypeParameter(_)) && decl.name == name {
                return Some(c);
            }
            if let Some(&p) = decl
                .type_params()
                .iter()
                .find(|&&p| self.decl(p).name == name)
            {
                return Some(p);
            }
            current = decl.container;
        }
        None
    }

    /// Declared or inherited member of a class or interface.
    ///
    /// Supertypes are searched depth first, extended type before satisfied
    /// types. Binary declarations are searched as far as they are completed.
    pub fn member(&self, type_decl: DeclId, name: &str) -> Option<DeclId> {
        let mut visited = FxHashSet::default();
        self.member_in(type_decl, name, &mut visited)
    }

    /// Member inherited from a supertype, ignoring those declared directly.
    pub fn inherited_member(&self, type_decl: DeclId, name: &str) -> Option<DeclId> {
        let mut visited = FxHashSet::default();
        visited.insert(type_decl);
        self.supertype_decls(type_decl)
            .into_iter()
            .find_map(|s| self.member_in(s, name, &mut visited))
    }

    fn member_in(
        &self,
        type_decl: DeclId,
        name: &str,
        visited: &mut FxHashSet<DeclId>,
    ) -> Option<DeclId> {
        if !visited.insert(type_decl) {
            return None;
        }
        if let Some(found) = self.direct_member_where(type_decl, name, |_| true) {
            return Some(found);
        }
        self.supertype_decls(type_decl)
            .into_iter()
            .find_map(|s| self.member_in(s, name, visited))
    }

    /// Declarations of the extended type and satisfied types, in that order.
    pub fn supertype_decls(&self, type_decl: DeclId) -> Vec<DeclId> {
        let Some(nominal) = self.decl(type_decl).as_nominal() else {
            return Vec::new();
        };
        nominal
            .extended_type
            .iter()
            .chain(&nominal.satisfied_types)
            .filter_map(Type::nominal_decl)
            .collect()
    }

    /// Type parameters of a nominal or function declaration.
    pub fn type_params(&self, decl: DeclId) -> &[DeclId] {
        self.decl(decl).type_params()
    }

    /// Variance of a type parameter; invariant for anything else.
    pub fn variance(&self, param: DeclId) -> Variance {
        self.decl(param)
            .as_type_param()
            .map_or(Variance::Invariant, |p| p.variance)
    }

    // Language sugar

    /// `Empty|Sequence<element>`.
    pub fn sequence_of(&self, element: Type) -> Type {
        Type::union([
            Type::simple(self.lang.empty),
            Type::nominal(self.lang.sequence, vec![element]),
        ])
    }

    /// Element type if `ty` is exactly `Empty|Sequence<X>`.
    pub fn sequence_element<'t>(&self, ty: &'t Type) -> Option<&'t Type> {
        let Type::Union(cases) = ty else {
            return None;
        };
        if cases.len() != 2 {
            return None;
        }
        let mut element = None;
        let mut saw_empty = false;
        for case in cases {
            match case {
                Type::Nominal { decl, args } if *decl == self.lang.empty && args.is_empty() => {
                    saw_empty = true;
                }
                Type::Nominal { decl, args } if *decl == self.lang.sequence && args.len() == 1 => {
                    element = args.first();
                }
                _ => return None,
            }
        }
        if saw_empty {
            element
        } else {
            None
        }
    }

    /// Wrapper-table entry for a plain (non-optional, argument-free) type.
    pub fn wrapper_of(&self, ty: &Type) -> Option<Wrapper> {
        match ty {
            Type::Nominal { decl, args } if args.is_empty() => self.lang.wrapper(*decl),
            _ => None,
        }
    }

    pub fn wrapper_type(&self, wrapper: Wrapper) -> Type {
        Type::simple(self.lang.wrapper_decl(wrapper))
    }

    // Builders

    /// Add a class or interface. Members of packages are marked top level.
    pub fn add_nominal(&mut self, container: DeclId, name: &str, kind: NominalKind) -> DeclId {
        let mut flags = DeclFlags::SHARED;
        if matches!(self.decl(container).kind, DeclKind::Package) {
            flags |= DeclFlags::TOPLEVEL;
        }
        let mut nominal = NominalDecl::new(kind);
        if matches!(kind, NominalKind::Interface) {
            nominal.extended_type = Some(Type::simple(self.lang.object));
        }
        let name = self.intern(name);
        self.alloc(Declaration::new(name, Some(container), DeclKind::Nominal(nominal)).with_flags(flags))
    }

    /// Add a type parameter to a class, interface or function.
    pub fn add_type_parameter(&mut self, owner: DeclId, name: &str, variance: Variance) -> DeclId {
        let name = self.intern(name);
        let id = self.alloc(Declaration::new(
            name,
            Some(owner),
            DeclKind::TypeParameter(TypeParamDecl {
                variance,
                satisfied_types: Vec::new(),
            }),
        ));
        match &mut self.decl_mut(owner).kind {
            DeclKind::Nominal(n) => n.type_params.push(id),
            DeclKind::Function(f) => f.type_params.push(id),
            _ => {}
        }
        id
    }

    pub fn set_extended_type(&mut self, type_decl: DeclId, extended: Option<Type>) {
        if let Some(n) = self.decl_mut(type_decl).as_nominal_mut() {
            n.extended_type = extended;
        }
    }

    pub fn add_satisfied_type(&mut self, decl: DeclId, satisfied: Type) {
        match &mut self.decl_mut(decl).kind {
            DeclKind::Nominal(n) => n.satisfied_types.push(satisfied),
            DeclKind::TypeParameter(p) => p.satisfied_types.push(satisfied),
            _ => {}
        }
    }

    pub fn set_parameters(&mut self, class: DeclId, parameters: ParameterList) {
        if let Some(n) = self.decl_mut(class).as_nominal_mut() {
            n.parameters = Some(parameters);
        }
    }

    /// Add an attribute. `SHARED` and `TOPLEVEL` are added as for
    /// [`Model::add_nominal`].
    pub fn add_value(&mut self, container: DeclId, name: &str, ty: Type, flags: DeclFlags) -> DeclId {
        let flags = flags | self.default_member_flags(container);
        let name = self.intern(name);
        self.alloc(
            Declaration::new(name, Some(container), DeclKind::Value(ValueDecl { ty: Some(ty) }))
                .with_flags(flags),
        )
    }

    /// Add a function with a single parameter list.
    pub fn add_function(
        &mut self,
        container: DeclId,
        name: &str,
        params: Vec<Parameter>,
        return_type: Type,
        flags: DeclFlags,
    ) -> DeclId {
        let flags = flags | self.default_member_flags(container);
        let name = self.intern(name);
        self.alloc(
            Declaration::new(
                name,
                Some(container),
                DeclKind::Function(FunctionDecl {
                    type_params: Vec::new(),
                    parameter_lists: vec![ParameterList::new(params)],
                    return_type: Some(return_type),
                }),
            )
            .with_flags(flags),
        )
    }

    /// A parameter named `name` of type `ty`.
    pub fn param(&self, name: &str, ty: Type) -> Parameter {
        Parameter::new(self.intern(name), ty)
    }

    fn default_member_flags(&self, container: DeclId) -> DeclFlags {
        if matches!(self.decl(container).kind, DeclKind::Package) {
            DeclFlags::SHARED | DeclFlags::TOPLEVEL
        } else {
            DeclFlags::SHARED
        }
    }

    fn bootstrap_lang(&mut self) -> LangDecls {
        let module = self.find_or_create_module(LANG_MODULE);
        let package = self.find_or_create_package(module, LANG_MODULE);

        let void = self.add_nominal(package, "Void", NominalKind::Class);
        let object = self.add_nominal(package, "Object", NominalKind::Class);
        let nothing = self.add_nominal(package, "Nothing", NominalKind::Class);
        let top = Type::simple(void);
        self.set_extended_type(object, Some(top.clone()));
        self.set_extended_type(nothing, Some(top));

        // Interfaces created by `add_nominal` extend `lang.Object`, which
        // needs `self.lang.object` set.
        self.lang.object = object;

        let equality = self.add_nominal(package, "Equality", NominalKind::Interface);
        let identifiable = self.add_nominal(package, "Identifiable", NominalKind::Interface);
        self.add_satisfied_type(identifiable, Type::simple(equality));

        let identifiable_object = self.add_nominal(package, "IdentifiableObject", NominalKind::Class);
        self.set_extended_type(identifiable_object, Some(Type::simple(object)));
        self.add_satisfied_type(identifiable_object, Type::simple(equality));
        self.add_satisfied_type(identifiable_object, Type::simple(identifiable));

        let scalar = |model: &mut Model, name: &str| {
            let id = model.add_nominal(package, name, NominalKind::Class);
            model.set_extended_type(id, Some(Type::simple(object)));
            if let Some(n) = model.decl_mut(id).as_nominal_mut() {
                n.is_final = true;
            }
            id
        };
        let string = scalar(self, "String");
        let boolean = scalar(self, "Boolean");
        let integer = scalar(self, "Integer");
        let float = scalar(self, "Float");
        let character = scalar(self, "Character");

        let iterable = self.add_nominal(package, "Iterable", NominalKind::Interface);
        self.add_type_parameter(iterable, "Element", Variance::Covariant);

        let empty = self.add_nominal(package, "Empty", NominalKind::Interface);
        self.add_satisfied_type(empty, Type::nominal(iterable, vec![Type::Bottom]));

        let sequence = self.add_nominal(package, "Sequence", NominalKind::Interface);
        let element = self.add_type_parameter(sequence, "Element", Variance::Covariant);
        self.add_satisfied_type(sequence, Type::nominal(iterable, vec![Type::Param(element)]));

        let exception = self.add_nominal(package, "Exception", NominalKind::Class);
        self.set_extended_type(exception, Some(Type::simple(identifiable_object)));

        for id in [void, object, nothing, identifiable_object] {
            if let Some(n) = self.decl_mut(id).as_nominal_mut() {
                n.is_abstract = true;
            }
        }

        // Members every object carries, refined by platform accessors.
        let default = DeclFlags::DEFAULT;
        self.add_value(object, "hash", Type::simple(integer), default);
        self.add_value(object, "string", Type::simple(string), default);
        let that = self.param("that", Type::simple(object));
        self.add_function(object, "equals", vec![that], Type::simple(boolean), default);

        tracing::debug!(decls = self.len(), "bootstrapped language module");

        LangDecls {
            module,
            package,
            void,
            object,
            identifiable_object,
            equality,
            identifiable,
            nothing,
            string,
            boolean,
            integer,
            float,
            character,
            empty,
            sequence,
            iterable,
            exception,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
