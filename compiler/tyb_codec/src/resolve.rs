use tyb_ir::{DeclId, Model};

/// Name resolution used while decoding.
///
/// The loader implements this to load referenced declarations on demand;
/// [`ModelResolver`] only sees what the model already holds.
pub trait TypeNameResolver {
    /// Resolve a qualified class or interface name.
    fn resolve_type(&mut self, qualified: &str) -> Option<DeclId>;

    /// Find a type parameter named `name` visible from `scope`.
    fn type_parameter(&self, scope: DeclId, name: &str) -> Option<DeclId>;

    /// Number of type parameters `decl` declares.
    fn arity(&self, decl: DeclId) -> usize;
}

/// Resolver over the declarations already in a [`Model`].
pub struct ModelResolver<'m> {
    model: &'m Model,
}

impl<'m> ModelResolver<'m> {
    pub fn new(model: &'m Model) -> Self {
        ModelResolver { model }
    }
}

impl TypeNameResolver for ModelResolver<'_> {
    fn resolve_type(&mut self, qualified: &str) -> Option<DeclId> {
        self.model.find_type(qualified)
    }

    fn type_parameter(&self, scope: DeclId, name: &str) -> Option<DeclId> {
        self.model.lookup_type_parameter(scope, name)
    }

    fn arity(&self, decl: DeclId) -> usize {
        self.model.type_params(decl).len()
    }
}
