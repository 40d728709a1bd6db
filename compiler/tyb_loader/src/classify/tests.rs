use pretty_assertions::assert_eq;

use super::*;

fn kind(method: MethodArtifact) -> MemberKind {
    MemberKind::classify(&method)
}

#[test]
fn test_accessors() {
    assert_eq!(
        kind(MethodArtifact::new("getCount", JvmType::Long)),
        MemberKind::Getter {
            attribute: "count".to_owned()
        }
    );
    assert_eq!(
        kind(MethodArtifact::new("isEmpty", JvmType::Boolean)),
        MemberKind::Getter {
            attribute: "empty".to_owned()
        }
    );
    assert_eq!(
        kind(MethodArtifact::new("setCount", JvmType::Void).with_param("count", JvmType::Long)),
        MemberKind::Setter {
            attribute: "count".to_owned()
        }
    );
}

#[test]
fn test_near_accessors_are_functions() {
    // void getter
    assert_eq!(kind(MethodArtifact::new("getReady", JvmType::Void)), MemberKind::Function);
    // getter with a parameter
    assert_eq!(
        kind(MethodArtifact::new("getItem", JvmType::Long).with_param("i", JvmType::Int)),
        MemberKind::Function
    );
    // setter with a return value
    assert_eq!(
        kind(MethodArtifact::new("setCount", JvmType::Long).with_param("c", JvmType::Long)),
        MemberKind::Function
    );
    // lowercase after prefix
    assert_eq!(kind(MethodArtifact::new("getaway", JvmType::Long)), MemberKind::Function);
}

#[test]
fn test_object_accessors() {
    assert_eq!(kind(MethodArtifact::new("hashCode", JvmType::Int)), MemberKind::HashAccessor);
    assert_eq!(
        kind(MethodArtifact::new("toString", JvmType::class("java.lang.String"))),
        MemberKind::StringAccessor
    );
    assert_eq!(MemberKind::HashAccessor.attribute(), Some("hash"));
    assert_eq!(MemberKind::Function.attribute(), None);
}

#[test]
fn test_constructor_and_equals() {
    assert_eq!(kind(MethodArtifact::constructor()), MemberKind::Constructor);
    let equals = MethodArtifact::new("equals", JvmType::Boolean)
        .with_param("other", JvmType::class("java.lang.Object"));
    assert!(is_equals(&equals));
    assert_eq!(kind(equals), MemberKind::Function);
    let overload = MethodArtifact::new("equals", JvmType::Boolean)
        .with_param("other", JvmType::class("m.Item"));
    assert!(!is_equals(&overload));
}
