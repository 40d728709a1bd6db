//! Synthetic members derived from erased types and boxing decisions.

mod adapter;
mod class;
mod companion;
mod holder;
mod named;

pub use adapter::{adapt, unbox_method, BOX_METHOD};
pub use companion::ForwarderSet;
pub use named::{NamedArg, NamedCall};

use tyb_codec::metadata::{describe, describe_parameter};
use tyb_codec::{encode, DeclMetadata, Marker};
use tyb_erase::{
    BoundarySite, BoxingAdapter, BoxingPolicy, ErasureContext, TargetType, TypeArg, TypeEraser,
    Usage,
};
use tyb_ir::{naming, DeclId, Model, Parameter, Type};

use crate::def::{ClassDef, MethodDef, Modifiers, ParamDef, TypeParamDef};
use crate::SynthError;

/// Builds synthetic definitions for declarations of one model.
///
/// Everything here is a pure function of the model: the same declaration
/// always yields the same definition.
#[derive(Copy, Clone)]
pub struct Synthesizer<'m> {
    model: &'m Model,
    eraser: TypeEraser<'m>,
    boxing: BoxingPolicy<'m>,
}

impl<'m> Synthesizer<'m> {
    pub fn new(model: &'m Model) -> Self {
        Synthesizer {
            model,
            eraser: TypeEraser::new(model),
            boxing: BoxingPolicy::new(model),
        }
    }

    /// Convert `value` of static type `produced` for a consumer expecting
    /// `required`, inserting a box or unbox call where representations
    /// differ.
    pub fn coerce(
        &self,
        value: crate::Expr,
        produced: &Type,
        required: &Type,
        site: BoundarySite,
    ) -> Result<crate::Expr, SynthError> {
        let from = self.boxing.decide(produced, Usage::Argument);
        let to = self.boxing.decide(required, Usage::Argument);
        let Some(adapter) = self.boxing.check_boundary(from, to, site)? else {
            return Ok(value);
        };
        let wrapper = match adapter {
            BoxingAdapter::Box => self.model.wrapper_of(produced),
            BoxingAdapter::Unbox => self.model.wrapper_of(required),
        };
        Ok(match wrapper {
            Some(wrapper) => adapt(adapter, wrapper, value),
            None => value,
        })
    }

    fn erase(&self, ty: &Type) -> Result<TargetType, SynthError> {
        Ok(self.eraser.erase_ordinary(ty)?)
    }

    /// `None` for `void`: functions returning the top type.
    fn return_type(&self, ty: Option<&Type>) -> Result<Option<TargetType>, SynthError> {
        match ty {
            None => Ok(None),
            Some(ty) if *ty == Type::simple(self.model.lang().void) => Ok(None),
            Some(ty) => self.erase(ty).map(Some),
        }
    }

    fn type_params(&self, params: &[DeclId]) -> Result<Vec<TypeParamDef>, SynthError> {
        params
            .iter()
            .map(|&p| {
                let bounds = self
                    .model
                    .decl(p)
                    .as_type_param()
                    .map_or(&[][..], |tp| tp.satisfied_types.as_slice());
                let mut erased = Vec::with_capacity(bounds.len());
                for bound in bounds {
                    erased.extend(self.eraser.erase(bound, ErasureContext::TypeParamBound, false)?);
                }
                Ok(TypeParamDef {
                    name: self.model.simple_name(p).to_owned(),
                    bounds: erased,
                })
            })
            .collect()
    }

    fn param_def(&self, param: &Parameter) -> Result<ParamDef, SynthError> {
        Ok(ParamDef {
            name: naming::quote_if_keyword(self.model.name(param.name)).into_owned(),
            ty: self.erase(&param.ty)?,
            metadata: Some(describe_parameter(self.model, param).to_sidecar()),
        })
    }

    /// Method with the name, type parameters, first parameter list and return
    /// type of `function`. The body is left to the caller.
    fn method_signature(&self, function: DeclId, modifiers: Modifiers) -> Result<MethodDef, SynthError> {
        self.method_signature_as(function, modifiers, &[])
    }

    /// [`Self::method_signature`] with `subst` applied to the parameter and
    /// return types, for a member seen through a parameterised supertype.
    fn method_signature_as(
        &self,
        function: DeclId,
        modifiers: Modifiers,
        subst: &[(DeclId, Type)],
    ) -> Result<MethodDef, SynthError> {
        let f = self
            .model
            .decl(function)
            .as_function()
            .ok_or_else(|| self.wrong_shape(function, "a method"))?;
        let name = naming::quote_if_keyword(self.model.simple_name(function));
        let mut method = MethodDef::new(name, modifiers);
        method.type_params = self.type_params(&f.type_params)?;
        if let Some(list) = f.parameter_lists.first() {
            for param in &list.params {
                let param = Parameter {
                    ty: param.ty.substitute(subst),
                    ..param.clone()
                };
                method.params.push(self.param_def(&param)?);
            }
        }
        let return_type = f.return_type.as_ref().map(|ty| ty.substitute(subst));
        method.return_type = self.return_type(return_type.as_ref())?;
        let mut meta = describe(self.model, function);
        if !subst.is_empty() {
            meta.type_info = return_type.as_ref().map(|ty| encode(self.model, ty));
        }
        method.metadata = Some(meta.to_sidecar());
        Ok(method)
    }

    /// Getter for an attribute. The body is left to the caller.
    fn getter_signature(&self, value: DeclId, modifiers: Modifiers) -> Result<MethodDef, SynthError> {
        self.getter_signature_as(value, modifiers, &[])
    }

    fn getter_signature_as(
        &self,
        value: DeclId,
        modifiers: Modifiers,
        subst: &[(DeclId, Type)],
    ) -> Result<MethodDef, SynthError> {
        let ty = self
            .model
            .decl(value)
            .as_value()
            .and_then(|v| v.ty.as_ref())
            .ok_or_else(|| self.wrong_shape(value, "a getter"))?
            .substitute(subst);
        let mut getter = MethodDef::new(accessor_name(self.model.simple_name(value)), modifiers)
            .returning(self.erase(&ty)?);
        let mut meta = describe(self.model, value);
        meta.type_info = Some(encode(self.model, &ty));
        getter.metadata = Some(meta.to_sidecar());
        Ok(getter)
    }

    /// Empty class named after a top-level declaration, carrying `meta`
    /// with `marker` as its sidecar.
    fn holder_class(&self, decl: DeclId, mut meta: DeclMetadata, marker: Marker) -> ClassDef {
        let simple = self.model.simple_name(decl);
        let name = naming::quote_if_keyword(simple);
        if name != simple {
            meta.name = Some(simple.to_owned());
        }
        meta.marker = Some(marker);
        let mut modifiers = Modifiers::FINAL;
        if self.model.decl(decl).is_shared() {
            modifiers |= Modifiers::PUBLIC;
        }
        let mut class = ClassDef::new(self.package_name(decl), name, modifiers);
        class.metadata = Some(meta.to_sidecar());
        class
    }

    fn package_name(&self, decl: DeclId) -> &'static str {
        self.model
            .package_of(decl)
            .map_or("", |p| self.model.simple_name(p))
    }

    /// Target type of a class or interface applied to its own type
    /// parameters.
    fn self_type(&self, decl: DeclId) -> TargetType {
        let name = self.model.qualified_name(decl);
        let params = self.model.type_params(decl);
        if params.is_empty() {
            return TargetType::class(name);
        }
        TargetType::generic(
            name,
            params
                .iter()
                .map(|&p| TypeArg::Exact(TargetType::Var(self.model.simple_name(p).to_owned()))),
        )
    }

    fn wrong_shape(&self, decl: DeclId, what: &'static str) -> SynthError {
        SynthError::WrongShape {
            subject: self.model.qualified_name(decl),
            what,
        }
    }
}

/// Target accessor for an attribute. `hash` and `string` map onto the
/// platform's own accessors.
fn accessor_name(attribute: &str) -> String {
    match attribute {
        "hash" => naming::HASH_ACCESSOR.to_owned(),
        "string" => naming::STRING_ACCESSOR.to_owned(),
        _ => naming::getter_name(attribute),
    }
}
