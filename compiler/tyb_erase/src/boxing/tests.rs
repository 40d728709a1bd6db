use pretty_assertions::assert_eq;
use tyb_ir::{DeclFlags, Model, Type};

use super::*;

const USAGES: [Usage; 5] = [
    Usage::Argument,
    Usage::Receiver,
    Usage::StorageSlot,
    Usage::Condition,
    Usage::Interpolation,
];

#[test]
fn test_wrapper_types_are_native() {
    let model = Model::new();
    let policy = BoxingPolicy::new(&model);
    let integer = Type::simple(model.lang().integer);
    for usage in [Usage::Argument, Usage::Receiver, Usage::StorageSlot, Usage::Interpolation] {
        assert_eq!(policy.decide(&integer, usage), Boxing::Native, "{usage:?}");
    }
    assert_eq!(policy.decide(&integer, Usage::Condition), Boxing::Boxed);
    let boolean = Type::simple(model.lang().boolean);
    assert_eq!(policy.decide(&boolean, Usage::Condition), Boxing::Native);
}

#[test]
fn test_optional_wrappers_are_boxed() {
    let model = Model::new();
    let policy = BoxingPolicy::new(&model);
    let lang = *model.lang();
    for decl in [lang.string, lang.boolean, lang.integer, lang.float, lang.character] {
        let ty = Type::optional(Type::simple(decl));
        for usage in USAGES {
            assert_eq!(policy.decide(&ty, usage), Boxing::Boxed);
        }
    }
}

#[test]
fn test_non_wrapper_types_are_boxed() {
    let model = Model::new();
    let policy = BoxingPolicy::new(&model);
    let lang = *model.lang();
    let seq = model.sequence_of(Type::simple(lang.integer));
    for ty in [Type::simple(lang.object), seq, Type::Bottom] {
        for usage in USAGES {
            assert_eq!(policy.decide(&ty, usage), Boxing::Boxed);
        }
    }
}

#[test]
fn test_storage_of_declarations() {
    let mut model = Model::new();
    let lang = *model.lang();
    let module = model.find_or_create_module("m");
    let package = model.find_or_create_package(module, "m");
    let count = model.add_value(package, "count", Type::simple(lang.integer), DeclFlags::empty());
    let label = model.add_value(
        package,
        "label",
        Type::optional(Type::simple(lang.string)),
        DeclFlags::empty(),
    );
    let policy = BoxingPolicy::new(&model);
    assert_eq!(policy.storage(count), Boxing::Native);
    assert_eq!(policy.storage(label), Boxing::Boxed);
    assert_eq!(policy.storage(lang.string), Boxing::Boxed);
}

#[test]
fn test_check_boundary() {
    use BoundarySite::*;

    for site in [Assignment, Comparison, Interpolation, Call, Return] {
        assert_eq!(check_boundary(Boxing::Native, Boxing::Native, site), Ok(None));
        assert_eq!(check_boundary(Boxing::Boxed, Boxing::Boxed, site), Ok(None));
    }
    assert_eq!(
        check_boundary(Boxing::Native, Boxing::Boxed, Assignment),
        Ok(Some(BoxingAdapter::Box))
    );
    assert_eq!(
        check_boundary(Boxing::Boxed, Boxing::Native, Comparison),
        Ok(Some(BoxingAdapter::Unbox))
    );
    assert_eq!(
        check_boundary(Boxing::Boxed, Boxing::Native, Interpolation),
        Ok(Some(BoxingAdapter::Unbox))
    );
    let err = check_boundary(Boxing::Native, Boxing::Boxed, Call);
    assert_eq!(
        err,
        Err(BoxingMismatch {
            produced: Boxing::Native,
            required: Boxing::Boxed,
            site: Call,
        })
    );
    assert!(check_boundary(Boxing::Boxed, Boxing::Native, Return).is_err());
}
