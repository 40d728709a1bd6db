use pretty_assertions::assert_eq;
use tyb_ir::Wrapper;

use super::*;

#[test]
fn test_display() {
    let list = TargetType::generic(
        "java.util.Map",
        [
            TypeArg::Exact(TargetType::class("lang.String")),
            TypeArg::Extends(TargetType::Var("V".to_owned())),
        ],
    );
    assert_eq!(list.to_string(), "java.util.Map<lang.String, ? extends V>");
    assert_eq!(
        TargetType::generic("m.Sink", [TypeArg::Super(TargetType::object())]).to_string(),
        "m.Sink<? super java.lang.Object>"
    );
    assert_eq!(TargetType::generic("m.Box", [TypeArg::Wildcard]).to_string(), "m.Box<?>");
    assert_eq!(TargetType::Native(Wrapper::Integer).to_string(), "long");
    assert_eq!(TargetType::Native(Wrapper::String).to_string(), "java.lang.String");
}

#[test]
fn test_predicates() {
    assert!(TargetType::object().is_object());
    assert!(!TargetType::class("m.Item").is_object());
    assert!(!TargetType::Native(Wrapper::Boolean).is_reference());
    assert!(TargetType::Native(Wrapper::String).is_reference());
    assert_eq!(TargetType::Native(Wrapper::Float).erased_name(), "double");
    assert_eq!(TargetType::class("m.Item").type_args(), &[] as &[TypeArg]);
}
