use pretty_assertions::assert_eq;

use super::*;
use crate::decl::Origin;

#[test]
fn test_lang_bootstrap() {
    let model = Model::new();
    let lang = *model.lang();

    assert_eq!(model.qualified_name(lang.string), "lang.String");
    assert_eq!(model.qualified_name(lang.void), "lang.Void");
    assert_eq!(model.find_type("lang.Sequence"), Some(lang.sequence));
    assert_eq!(model.module(LANG_MODULE), Some(lang.module));
    assert_eq!(model.package(LANG_MODULE), Some(lang.package));
    for module in crate::lang::platform::MODULES {
        assert!(model.module(module).is_some(), "{module}");
    }

    // Void is the universal top: no extended type.
    let void = model.decl(lang.void).as_nominal().map(|n| n.extended_type.clone());
    assert_eq!(void, Some(None));

    // Interfaces extend Object.
    let equality = model.decl(lang.equality).as_nominal().and_then(|n| n.extended_type.clone());
    assert_eq!(equality, Some(Type::simple(lang.object)));
}

#[test]
fn test_sequence_element_type_param_is_covariant() {
    let model = Model::new();
    let params = model.type_params(model.lang().sequence);
    assert_eq!(params.len(), 1);
    assert_eq!(model.variance(params[0]), Variance::Covariant);
}

#[test]
fn test_qualified_names_of_nested_members() {
    let mut model = Model::new();
    let module = model.find_or_create_module("com.acme");
    let package = model.find_or_create_package(module, "com.acme.util");
    let outer = model.add_nominal(package, "Outer", NominalKind::Class);
    let inner = model.add_nominal(outer, "Inner", NominalKind::Class);
    let count = model.add_value(inner, "count", Type::simple(model.lang().integer), DeclFlags::empty());

    assert_eq!(model.qualified_name(inner), "com.acme.util.Outer.Inner");
    assert_eq!(model.qualified_name(count), "com.acme.util.Outer.Inner.count");
    assert_eq!(model.find_type("com.acme.util.Outer.Inner"), Some(inner));
    assert_eq!(model.find_value("com.acme.util.Outer.Inner.count"), Some(count));
    assert_eq!(model.find_type("com.acme.util.Missing"), None);
    assert_eq!(model.package_of(count), Some(package));

    assert!(model.decl(outer).flags.contains(DeclFlags::TOPLEVEL));
    assert!(!model.decl(inner).flags.contains(DeclFlags::TOPLEVEL));
    assert_eq!(model.decl(inner).origin, Origin::Source);
}

#[test]
fn test_default_package() {
    let mut model = Model::new();
    let module = model.find_or_create_module("default");
    let package = model.find_or_create_package(module, "");
    let top = model.add_nominal(package, "Top", NominalKind::Class);
    assert_eq!(model.qualified_name(top), "Top");
    assert_eq!(model.find_type("Top"), Some(top));
}

#[test]
fn test_find_or_create_is_idempotent() {
    let mut model = Model::new();
    let m1 = model.find_or_create_module("a");
    let m2 = model.find_or_create_module("a");
    assert_eq!(m1, m2);
    let p1 = model.find_or_create_package(m1, "a.b");
    let p2 = model.find_or_create_package(m1, "a.b");
    assert_eq!(p1, p2);
}

#[test]
fn test_lookup_type_parameter_walks_outward() {
    let mut model = Model::new();
    let module = model.find_or_create_module("m");
    let package = model.find_or_create_package(module, "m");
    let class = model.add_nominal(package, "Box", NominalKind::Class);
    let t = model.add_type_parameter(class, "T", Variance::Invariant);
    let get = model.add_function(class, "get", Vec::new(), Type::Param(t), DeclFlags::empty());
    let u = model.add_type_parameter(get, "U", Variance::Invariant);

    assert_eq!(model.lookup_type_parameter(get, "T"), Some(t));
    assert_eq!(model.lookup_type_parameter(get, "U"), Some(u));
    assert_eq!(model.lookup_type_parameter(class, "U"), None);
    assert_eq!(model.lookup_type_parameter(class, "V"), None);
}

#[test]
fn test_member_lookup_through_supertypes() {
    let mut model = Model::new();
    let lang = *model.lang();
    let module = model.find_or_create_module("m");
    let package = model.find_or_create_package(module, "m");
    let base = model.add_nominal(package, "Base", NominalKind::Class);
    model.set_extended_type(base, Some(Type::simple(lang.object)));
    let size = model.add_value(base, "size", Type::simple(lang.integer), DeclFlags::empty());
    let derived = model.add_nominal(package, "Derived", NominalKind::Class);
    model.set_extended_type(derived, Some(Type::simple(base)));

    assert_eq!(model.member(derived, "size"), Some(size));
    assert!(model.member(derived, "hash").is_some());
    assert_eq!(model.inherited_member(base, "size"), None);
    assert!(model.inherited_member(base, "string").is_some());
}

#[test]
fn test_member_lookup_terminates_on_cycle() {
    let mut model = Model::new();
    let module = model.find_or_create_module("m");
    let package = model.find_or_create_package(module, "m");
    let a = model.add_nominal(package, "A", NominalKind::Class);
    let b = model.add_nominal(package, "B", NominalKind::Class);
    model.set_extended_type(a, Some(Type::simple(b)));
    model.set_extended_type(b, Some(Type::simple(a)));
    assert_eq!(model.member(a, "missing"), None);
}

#[test]
fn test_sequence_sugar() {
    let model = Model::new();
    let integer = Type::simple(model.lang().integer);
    let seq = model.sequence_of(integer.clone());
    assert_eq!(model.sequence_element(&seq), Some(&integer));
    assert_eq!(model.sequence_element(&integer), None);
    assert_eq!(model.sequence_element(&Type::optional(integer)), None);
}

#[test]
fn test_wrapper_of() {
    let model = Model::new();
    let lang = *model.lang();
    assert_eq!(model.wrapper_of(&Type::simple(lang.boolean)), Some(Wrapper::Boolean));
    assert_eq!(model.wrapper_of(&Type::simple(lang.object)), None);
    assert_eq!(model.wrapper_of(&Type::optional(Type::simple(lang.string))), None);
    assert_eq!(model.wrapper_type(Wrapper::Float), Type::simple(lang.float));
}

#[test]
fn test_erases_to_object_set() {
    let model = Model::new();
    let lang = model.lang();
    for id in [lang.void, lang.object, lang.identifiable_object, lang.equality, lang.identifiable, lang.nothing] {
        assert!(lang.erases_to_object(id), "{}", model.qualified_name(id));
    }
    assert!(!lang.erases_to_object(lang.string));
    assert!(!lang.erases_to_object(lang.sequence));
}
