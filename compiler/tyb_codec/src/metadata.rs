//! Declaration metadata carried next to compiled artifacts.
//!
//! The target's own signatures lose unions, optionality, variance and
//! original names. A [`DeclMetadata`] keeps them, serialised with
//! [`DeclMetadata::to_sidecar`] and attached to the class, member or
//! parameter it describes.

use tyb_ir::{DeclId, DeclKind, Model, Parameter, Variance};

use crate::sidecar::{Reader, Writer};
use crate::{encode, CodecError};

/// Synthetic holder classes standing in for top-level declarations.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Marker {
    /// Holds a top-level attribute.
    Attribute,
    /// Holds a top-level function.
    Method,
    /// Singleton object: both a type and a value.
    Object,
}

impl Marker {
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Attribute => "attribute",
            Marker::Method => "method",
            Marker::Object => "object",
        }
    }

    pub fn parse(s: &str) -> Option<Marker> {
        match s {
            "attribute" => Some(Marker::Attribute),
            "method" => Some(Marker::Method),
            "object" => Some(Marker::Object),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeParamInfo {
    pub name: String,
    pub variance: Variance,
    /// Encoded upper bounds.
    pub satisfies: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclMetadata {
    /// Encoded type of an attribute or parameter, return type of a function.
    pub type_info: Option<String>,
    pub type_params: Option<Vec<TypeParamInfo>>,
    pub satisfied_types: Option<Vec<String>>,
    pub extended_type: Option<String>,
    /// Source name where the target name differs or is lost.
    pub name: Option<String>,
    pub sequenced: bool,
    pub defaulted: bool,
    pub marker: Option<Marker>,
}

mod tag {
    pub const TYPE: char = 't';
    pub const TYPE_PARAMS: char = 'g';
    pub const TYPE_PARAM: char = 'p';
    pub const PARAM_NAME: char = 'n';
    pub const VARIANCE: char = 'v';
    pub const BOUND: char = 'b';
    pub const SATISFIED_TYPES: char = 'S';
    pub const SATISFIED: char = 's';
    pub const EXTENDED: char = 'e';
    pub const NAME: char = 'a';
    pub const SEQUENCED: char = 'q';
    pub const DEFAULTED: char = 'd';
    pub const MARKER: char = 'm';
}

impl DeclMetadata {
    pub fn with_marker(marker: Marker) -> Self {
        DeclMetadata {
            marker: Some(marker),
            ..DeclMetadata::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == DeclMetadata::default()
    }

    pub fn to_sidecar(&self) -> String {
        let mut w = Writer::default();
        if let Some(ty) = &self.type_info {
            w.entry(tag::TYPE, ty);
        }
        if let Some(params) = &self.type_params {
            w.nested(tag::TYPE_PARAMS, |w| {
                for param in params {
                    w.nested(tag::TYPE_PARAM, |w| {
                        w.entry(tag::PARAM_NAME, &param.name);
                        w.entry(tag::VARIANCE, param.variance.keyword());
                        for bound in &param.satisfies {
                            w.entry(tag::BOUND, bound);
                        }
                    });
                }
            });
        }
        if let Some(satisfied) = &self.satisfied_types {
            w.nested(tag::SATISFIED_TYPES, |w| {
                for ty in satisfied {
                    w.entry(tag::SATISFIED, ty);
                }
            });
        }
        if let Some(extended) = &self.extended_type {
            w.entry(tag::EXTENDED, extended);
        }
        if let Some(name) = &self.name {
            w.entry(tag::NAME, name);
        }
        if self.sequenced {
            w.entry(tag::SEQUENCED, "");
        }
        if self.defaulted {
            w.entry(tag::DEFAULTED, "");
        }
        if let Some(marker) = self.marker {
            w.entry(tag::MARKER, marker.as_str());
        }
        w.finish()
    }

    pub fn from_sidecar(text: &str) -> Result<DeclMetadata, CodecError> {
        let mut meta = DeclMetadata::default();
        let mut r = Reader::new(text);
        while let Some((t, payload, offset)) = r.next_entry()? {
            match t {
                tag::TYPE => meta.type_info = Some(payload.to_owned()),
                tag::TYPE_PARAMS => {
                    let mut params = Vec::new();
                    let mut inner = r.nested(payload, offset);
                    while let Some((t, payload, offset)) = inner.next_entry()? {
                        if t == tag::TYPE_PARAM {
                            params.push(read_type_param(inner.nested(payload, offset))?);
                        }
                    }
                    meta.type_params = Some(params);
                }
                tag::SATISFIED_TYPES => {
                    let mut satisfied = Vec::new();
                    let mut inner = r.nested(payload, offset);
                    while let Some((t, payload, _)) = inner.next_entry()? {
                        if t == tag::SATISFIED {
                            satisfied.push(payload.to_owned());
                        }
                    }
                    meta.satisfied_types = Some(satisfied);
                }
                tag::EXTENDED => meta.extended_type = Some(payload.to_owned()),
                tag::NAME => meta.name = Some(payload.to_owned()),
                tag::SEQUENCED => meta.sequenced = true,
                tag::DEFAULTED => meta.defaulted = true,
                tag::MARKER => {
                    meta.marker = Some(
                        Marker::parse(payload)
                            .ok_or_else(|| r.malformed(offset, format!("unknown marker `{payload}`")))?,
                    );
                }
                other => tracing::trace!(tag = %other, "skipping unknown metadata entry"),
            }
        }
        Ok(meta)
    }
}

fn read_type_param(mut r: Reader<'_>) -> Result<TypeParamInfo, CodecError> {
    let mut info = TypeParamInfo::default();
    let mut saw_name = false;
    while let Some((t, payload, offset)) = r.next_entry()? {
        match t {
            tag::PARAM_NAME => {
                info.name = payload.to_owned();
                saw_name = true;
            }
            tag::VARIANCE => {
                info.variance = match payload {
                    "" => Variance::Invariant,
                    "out" => Variance::Covariant,
                    "in" => Variance::Contravariant,
                    other => return Err(r.malformed(offset, format!("unknown variance `{other}`"))),
                };
            }
            tag::BOUND => info.satisfies.push(payload.to_owned()),
            _ => {}
        }
    }
    if saw_name {
        Ok(info)
    } else {
        Err(r.malformed(0, "type parameter without a name"))
    }
}

/// Metadata for a declaration built by the analyzer.
///
/// Type parameters and supertypes are only recorded for declarations that
/// have them, so a reader can tell "none" from "not recorded".
pub fn describe(model: &Model, decl: DeclId) -> DeclMetadata {
    let d = model.decl(decl);
    let mut meta = DeclMetadata::default();
    match &d.kind {
        DeclKind::Value(v) => {
            meta.type_info = v.ty.as_ref().map(|ty| encode(model, ty));
        }
        DeclKind::Function(f) => {
            meta.type_info = f.return_type.as_ref().map(|ty| encode(model, ty));
            meta.type_params = describe_type_params(model, &f.type_params);
        }
        DeclKind::Nominal(n) => {
            meta.type_params = describe_type_params(model, &n.type_params);
            meta.extended_type = n.extended_type.as_ref().map(|ty| encode(model, ty));
            if !n.satisfied_types.is_empty() {
                meta.satisfied_types =
                    Some(n.satisfied_types.iter().map(|ty| encode(model, ty)).collect());
            }
        }
        DeclKind::TypeParameter(_) | DeclKind::Module | DeclKind::Package => {}
    }
    meta
}

/// Metadata for one function or initializer parameter.
pub fn describe_parameter(model: &Model, param: &Parameter) -> DeclMetadata {
    DeclMetadata {
        type_info: Some(encode(model, &param.ty)),
        name: Some(model.name(param.name).to_owned()),
        sequenced: param.sequenced,
        defaulted: param.defaulted,
        ..DeclMetadata::default()
    }
}

fn describe_type_params(model: &Model, params: &[DeclId]) -> Option<Vec<TypeParamInfo>> {
    if params.is_empty() {
        return None;
    }
    Some(
        params
            .iter()
            .map(|&p| {
                let decl = model.decl(p);
                let (variance, bounds) = decl
                    .as_type_param()
                    .map(|tp| (tp.variance, tp.satisfied_types.as_slice()))
                    .unwrap_or_default();
                TypeParamInfo {
                    name: model.name(decl.name).to_owned(),
                    variance,
                    satisfies: bounds.iter().map(|b| encode(model, b)).collect(),
                }
            })
            .collect(),
    )
}
