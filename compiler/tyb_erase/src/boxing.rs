//! Native versus boxed representation of wrapper-table values.

use tyb_ir::{DeclId, DeclKind, Model, Type, Wrapper};

use crate::BoxingMismatch;

/// How a value is consumed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Usage {
    Argument,
    Receiver,
    StorageSlot,
    /// Tested by a conditional.
    Condition,
    /// Spliced into a string template.
    Interpolation,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Boxing {
    Native,
    Boxed,
}

/// A boundary between a producer and a consumer of a value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BoundarySite {
    Assignment,
    Comparison,
    Interpolation,
    Call,
    Return,
}

impl BoundarySite {
    /// Sites where the synthesizer may insert a conversion.
    pub fn accepts_adapter(self) -> bool {
        matches!(
            self,
            BoundarySite::Assignment | BoundarySite::Comparison | BoundarySite::Interpolation
        )
    }
}

/// Conversion inserted where boxing states disagree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BoxingAdapter {
    /// Native to boxed.
    Box,
    /// Boxed to native.
    Unbox,
}

#[derive(Copy, Clone)]
pub struct BoxingPolicy<'m> {
    model: &'m Model,
}

impl<'m> BoxingPolicy<'m> {
    pub fn new(model: &'m Model) -> Self {
        BoxingPolicy { model }
    }

    /// Representation of a value of type `ty` consumed as `usage`.
    ///
    /// Native only for wrapper-table types that are statically non-optional;
    /// a condition additionally has to be a `Boolean`.
    pub fn decide(&self, ty: &Type, usage: Usage) -> Boxing {
        match (self.model.wrapper_of(ty), usage) {
            (Some(Wrapper::Boolean), Usage::Condition) => Boxing::Native,
            (Some(_), Usage::Condition) | (None, _) => Boxing::Boxed,
            (Some(_), _) => Boxing::Native,
        }
    }

    /// Representation of the storage slot behind an attribute or parameter
    /// declaration.
    pub fn storage(&self, decl: DeclId) -> Boxing {
        match &self.model.decl(decl).kind {
            DeclKind::Value(v) => v
                .ty
                .as_ref()
                .map_or(Boxing::Boxed, |ty| self.decide(ty, Usage::StorageSlot)),
            DeclKind::Function(f) => f
                .return_type
                .as_ref()
                .map_or(Boxing::Boxed, |ty| self.decide(ty, Usage::StorageSlot)),
            _ => Boxing::Boxed,
        }
    }

    /// Adapter needed where a `produced` value meets a `required` one.
    pub fn check_boundary(
        &self,
        produced: Boxing,
        required: Boxing,
        site: BoundarySite,
    ) -> Result<Option<BoxingAdapter>, BoxingMismatch> {
        check_boundary(produced, required, site)
    }
}

/// Adapter needed where a `produced` value meets a `required` one.
///
/// Agreement needs nothing. Assignments, comparisons and interpolations get
/// an adapter; calls and returns must already agree.
pub fn check_boundary(
    produced: Boxing,
    required: Boxing,
    site: BoundarySite,
) -> Result<Option<BoxingAdapter>, BoxingMismatch> {
    if produced == required {
        return Ok(None);
    }
    if !site.accepts_adapter() {
        return Err(BoxingMismatch {
            produced,
            required,
            site,
        });
    }
    Ok(Some(match produced {
        Boxing::Native => BoxingAdapter::Box,
        Boxing::Boxed => BoxingAdapter::Unbox,
    }))
}

#[cfg(test)]
mod tests;
