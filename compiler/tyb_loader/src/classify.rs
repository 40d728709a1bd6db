//! Classification of artifact members.

use tyb_ir::lang::platform;
use tyb_ir::naming;

use crate::artifact::{JvmType, MethodArtifact};

/// What an instance member of a class artifact becomes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Constructor,
    /// `getX()`/`isX()`: attribute `x`.
    Getter { attribute: String },
    /// `setX(v)`: makes attribute `x` variable.
    Setter { attribute: String },
    /// `hashCode()`: attribute `hash`.
    HashAccessor,
    /// `toString()`: attribute `string`.
    StringAccessor,
    Function,
}

impl MemberKind {
    pub fn classify(method: &MethodArtifact) -> MemberKind {
        if method.is_constructor() {
            return MemberKind::Constructor;
        }
        let returns_void = method.return_type == JvmType::Void;
        match method.params.len() {
            0 if !returns_void => {
                if let Some(attribute) = naming::attribute_from_getter(&method.name) {
                    return MemberKind::Getter { attribute };
                }
            }
            1 if returns_void => {
                if let Some(attribute) = naming::attribute_from_setter(&method.name) {
                    return MemberKind::Setter { attribute };
                }
            }
            _ => {}
        }
        if method.params.is_empty() {
            match method.name.as_str() {
                naming::HASH_ACCESSOR => return MemberKind::HashAccessor,
                naming::STRING_ACCESSOR => return MemberKind::StringAccessor,
                _ => {}
            }
        }
        MemberKind::Function
    }

    /// Attribute name for accessor kinds.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            MemberKind::Getter { attribute } | MemberKind::Setter { attribute } => Some(attribute),
            MemberKind::HashAccessor => Some("hash"),
            MemberKind::StringAccessor => Some("string"),
            MemberKind::Constructor | MemberKind::Function => None,
        }
    }
}

/// `equals(java.lang.Object)`.
pub fn is_equals(method: &MethodArtifact) -> bool {
    method.name == naming::EQUALS_METHOD
        && method.params.len() == 1
        && method.params[0].ty.is_class(platform::OBJECT)
}

#[cfg(test)]
mod tests;
