use pretty_assertions::assert_eq;
use tyb_codec::{DeclMetadata, Marker, TypeParamInfo};
use tyb_diagnostic::ErrorCode;
use tyb_ir::{Completion, DeclFlags, Origin, ParameterList};

use super::*;
use crate::artifact::{ArtifactSet, ClassFlags, MethodArtifact, MethodFlags};

const STATIC: MethodFlags = MethodFlags::PUBLIC.union(MethodFlags::STATIC);

fn value_type(model: &Model, id: DeclId) -> Option<Type> {
    model.decl(id).as_value().and_then(|v| v.ty.clone())
}

fn direct(model: &Model, owner: DeclId, name: &str) -> Option<DeclId> {
    model.direct_member_where(owner, name, |_| true)
}

fn counter() -> ClassArtifact {
    ClassArtifact::class("a", "Counter")
        .with_method(MethodArtifact::constructor().with_param("start", JvmType::Long))
        .with_method(MethodArtifact::new("getCount", JvmType::Long))
        .with_method(MethodArtifact::new("setCount", JvmType::Void).with_param("count", JvmType::Long))
        .with_method(MethodArtifact::new("getLabel", JvmType::class(platform::STRING)))
        .with_method(MethodArtifact::new("reset", JvmType::Void))
        .with_method(MethodArtifact::new("create", JvmType::class("a.Counter")).with_flags(STATIC))
}

#[test]
fn test_load_is_idempotent() {
    let set = ArtifactSet::new().with(counter());
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);

    let first = loader.load(&mut model, "a.Counter", DeclarationKind::Type);
    let second = loader.load(&mut model, "a.Counter", DeclarationKind::Type);
    assert_eq!(first, second);
    assert!(loader.is_cached(DeclarationKind::Type, "a.Counter"));

    let id = first.unwrap_or_else(|e| panic!("{e}"));
    let decl = model.decl(id);
    assert_eq!(decl.origin, Origin::Binary);
    assert_eq!(decl.completion, Completion::Pending);
    assert_eq!(model.qualified_name(id), "a.Counter");
    assert!(decl.flags.contains(DeclFlags::SHARED | DeclFlags::TOPLEVEL));
    assert!(model.module("a").is_some());
}

#[test]
fn test_getter_and_setter_merge_into_variable_attribute() {
    let set = ArtifactSet::new().with(counter());
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);
    let lang = *model.lang();

    let id = loader.load(&mut model, "a.Counter", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(loader.ensure_complete(&mut model, id), Ok(()));
    assert_eq!(model.decl(id).completion, Completion::Complete);

    let count = direct(&model, id, "count").unwrap_or_else(|| panic!("no count"));
    assert!(model.decl(count).is_variable());
    assert!(model.decl(count).flags.contains(DeclFlags::UNBOXED));
    assert_eq!(value_type(&model, count), Some(Type::simple(lang.integer)));

    // Getter only: immutable, and a string may be null.
    let label = direct(&model, id, "label").unwrap_or_else(|| panic!("no label"));
    assert!(!model.decl(label).is_variable());
    assert_eq!(value_type(&model, label), Some(Type::optional(Type::simple(lang.string))));

    // Setters are not members; statics are skipped.
    assert_eq!(direct(&model, id, "setCount"), None);
    assert_eq!(direct(&model, id, "create"), None);
    assert!(direct(&model, id, "reset").is_some());

    let params = model.decl(id).as_nominal().and_then(|n| n.parameters.clone());
    let params = params.unwrap_or_else(|| panic!("no initializer parameters"));
    assert_eq!(params.len(), 1);
    assert_eq!(model.name(params.params[0].name), "start");
    assert!(params.params[0].unboxed);
    assert!(loader.take_diagnostics().is_empty());
}

#[test]
fn test_members_override_object_accessors() {
    let set = ArtifactSet::new().with(
        ClassArtifact::class("a", "Point")
            .with_method(MethodArtifact::new("hashCode", JvmType::Int))
            .with_method(MethodArtifact::new("toString", JvmType::class(platform::STRING)))
            .with_method(
                MethodArtifact::new("equals", JvmType::Boolean).with_param("other", JvmType::class(platform::OBJECT)),
            ),
    );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);
    let lang = *model.lang();
    let id = loader.load(&mut model, "a.Point", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));

    let members = loader.members(&mut model, id).unwrap_or_else(|e| panic!("{e}"));
    let names: Vec<&str> = members.iter().map(|&m| model.simple_name(m)).collect();
    assert_eq!(names, vec!["hash", "string", "equals"]);
    for &m in &members {
        assert!(model.decl(m).flags.contains(DeclFlags::ACTUAL), "{}", model.simple_name(m));
    }

    let extended = model.decl(id).as_nominal().and_then(|n| n.extended_type.clone());
    assert_eq!(extended, Some(Type::simple(lang.identifiable_object)));

    let equals = model.decl(members[2]).as_function().cloned().unwrap_or_default();
    let that = &equals.parameter_lists[0].params[0];
    assert_eq!(model.name(that.name), "that");
    assert_eq!(that.ty, Type::simple(lang.object));
    assert_eq!(equals.return_type, Some(Type::simple(lang.boolean)));
}

#[test]
fn test_attribute_holder() {
    let holder = ClassArtifact::class("a", "answer")
        .with_metadata(&DeclMetadata::with_marker(Marker::Attribute))
        .with_method(MethodArtifact::new("getAnswer", JvmType::Long).with_flags(STATIC));
    let variable = ClassArtifact::class("a", "total")
        .with_metadata(&DeclMetadata::with_marker(Marker::Attribute))
        .with_method(MethodArtifact::new("getTotal", JvmType::class(platform::STRING)).with_flags(STATIC))
        .with_method(
            MethodArtifact::new("setTotal", JvmType::Void)
                .with_flags(STATIC)
                .with_param("total", JvmType::class(platform::STRING)),
        );
    let set = ArtifactSet::new().with(holder).with(variable);
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);
    let lang = *model.lang();

    let answer = loader.load(&mut model, "a.answer", DeclarationKind::Value).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(value_type(&model, answer), None);
    assert_eq!(loader.ensure_complete(&mut model, answer), Ok(()));
    assert_eq!(value_type(&model, answer), Some(Type::simple(lang.integer)));
    assert!(!model.decl(answer).is_variable());
    assert!(model.decl(answer).flags.contains(DeclFlags::TOPLEVEL));

    let total = loader.load(&mut model, "a.total", DeclarationKind::Value).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(loader.ensure_complete(&mut model, total), Ok(()));
    assert!(model.decl(total).is_variable());
    assert_eq!(model.find_value("a.total"), Some(total));
}

#[test]
fn test_attribute_holder_without_getter_fails() {
    let set = ArtifactSet::new().with(
        ClassArtifact::class("a", "broken").with_metadata(&DeclMetadata::with_marker(Marker::Attribute)),
    );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);
    let id = loader.load(&mut model, "a.broken", DeclarationKind::Value).unwrap_or_else(|e| panic!("{e}"));

    let err = loader.ensure_complete(&mut model, id);
    assert_eq!(
        err,
        Err(LoadError::MissingAccessor {
            holder: "a.broken".to_owned(),
            accessor: "getBroken".to_owned(),
        })
    );
    assert_eq!(model.decl(id).completion, Completion::Failed);
    // Failure is sticky: no second attempt.
    assert_eq!(loader.ensure_complete(&mut model, id), Ok(()));
}

#[test]
fn test_function_holder_with_keyword_name() {
    let set = ArtifactSet::new().with(
        ClassArtifact::class("a", "$default")
            .with_metadata(&DeclMetadata::with_marker(Marker::Method))
            .with_method(
                MethodArtifact::new("$default", JvmType::class(platform::STRING))
                    .with_flags(STATIC)
                    .with_param("x", JvmType::Long),
            ),
    );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);
    let lang = *model.lang();

    let id = loader.load(&mut model, "a.$default", DeclarationKind::Value).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(model.simple_name(id), "default");
    assert_eq!(loader.ensure_complete(&mut model, id), Ok(()));

    let function = model.decl(id).as_function().cloned().unwrap_or_default();
    assert_eq!(function.return_type, Some(Type::optional(Type::simple(lang.string))));
    assert_eq!(function.parameter_lists[0].params[0].ty, Type::simple(lang.integer));
}

#[test]
fn test_object_holder_is_type_and_value() {
    let set = ArtifactSet::new().with(
        ClassArtifact::class("a", "origin")
            .with_flags(ClassFlags::PUBLIC | ClassFlags::FINAL)
            .with_metadata(&DeclMetadata::with_marker(Marker::Object))
            .with_method(MethodArtifact::constructor().with_flags(MethodFlags::PRIVATE | MethodFlags::CONSTRUCTOR))
            .with_method(MethodArtifact::new("getX", JvmType::Double)),
    );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);

    let value = loader.load(&mut model, "a.origin", DeclarationKind::Value).unwrap_or_else(|e| panic!("{e}"));
    let class = loader.load(&mut model, "a.origin", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    assert_ne!(value, class);
    assert_eq!(value_type(&model, value), Some(Type::simple(class)));
    assert_eq!(model.decl(value).completion, Completion::Complete);

    assert_eq!(loader.ensure_complete(&mut model, class), Ok(()));
    let nominal = model.decl(class).as_nominal().cloned();
    let nominal = nominal.unwrap_or_else(|| panic!("not a class"));
    assert!(nominal.object_type);
    assert_eq!(nominal.parameters, None);
    assert!(direct(&model, class, "x").is_some());
}

#[test]
fn test_nested_class_fallback() {
    let set = ArtifactSet::new().with(
        ClassArtifact::class("a.b", "Outer")
            .with_nested(ClassArtifact::class("", "Inner").with_method(MethodArtifact::new("getSize", JvmType::Int))),
    );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);

    let inner = loader.load(&mut model, "a.b.Outer.Inner", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    let outer = loader.load(&mut model, "a.b.Outer", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(model.decl(inner).container, Some(outer));
    assert_eq!(model.qualified_name(inner), "a.b.Outer.Inner");
    assert!(!model.decl(inner).flags.contains(DeclFlags::TOPLEVEL));

    assert_eq!(
        loader.load(&mut model, "a.b.Outer.Missing", DeclarationKind::Type),
        Err(LoadError::Unresolved {
            name: "a.b.Outer.Missing".to_owned()
        })
    );
}

#[test]
fn test_generic_class_and_self_referential_bound() {
    let set = ArtifactSet::new()
        .with(
            ClassArtifact::class("a", "Box")
                .with_type_param("T", vec![])
                .with_method(MethodArtifact::new("getValue", JvmType::var("T"))),
        )
        .with(
            ClassArtifact::interface("a", "Ordered")
                .with_type_param("T", vec![JvmType::generic("a.Ordered", vec![JvmType::var("T")])]),
        );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);

    let boxed = loader.load(&mut model, "a.Box", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    let t = model.type_params(boxed)[0];
    assert_eq!(loader.ensure_complete(&mut model, boxed), Ok(()));
    let value = direct(&model, boxed, "value").unwrap_or_else(|| panic!("no value"));
    assert_eq!(value_type(&model, value), Some(Type::Param(t)));

    let ordered = loader.load(&mut model, "a.Ordered", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    let t = model.type_params(ordered)[0];
    let bounds = model.decl(t).as_type_param().map(|p| p.satisfied_types.clone());
    assert_eq!(bounds, Some(vec![Type::nominal(ordered, vec![Type::Param(t)])]));
}

#[test]
fn test_metadata_overrides_signature_types() {
    let names = DeclMetadata {
        type_info: Some("lang.Empty|lang.Sequence<lang.String>".to_owned()),
        ..DeclMetadata::default()
    };
    let class_meta = DeclMetadata {
        type_params: Some(vec![TypeParamInfo {
            name: "Element".to_owned(),
            variance: Variance::Covariant,
            satisfies: vec![],
        }]),
        ..DeclMetadata::default()
    };
    let set = ArtifactSet::new().with(
        ClassArtifact::class("a", "Names")
            .with_type_param("Element", vec![])
            .with_metadata(&class_meta)
            .with_method(MethodArtifact::new("getNames", JvmType::class("java.util.List")).with_metadata(&names)),
    );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);
    let lang = *model.lang();

    let id = loader.load(&mut model, "a.Names", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(model.variance(model.type_params(id)[0]), Variance::Covariant);

    assert_eq!(loader.ensure_complete(&mut model, id), Ok(()));
    let attr = direct(&model, id, "names").unwrap_or_else(|| panic!("no names"));
    assert_eq!(value_type(&model, attr), Some(model.sequence_of(Type::simple(lang.string))));
    // The metadata type never needed java.util.List.
    assert!(!loader.is_cached(DeclarationKind::Type, "java.util.List"));
}

#[test]
fn test_failing_member_does_not_stop_siblings() {
    let set = ArtifactSet::new().with(
        ClassArtifact::class("a", "Service")
            .with_method(MethodArtifact::new("broken", JvmType::Void).with_param("x", JvmType::class("x.Missing")))
            .with_method(MethodArtifact::new("run", JvmType::Void)),
    );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);

    let id = loader.load(&mut model, "a.Service", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(loader.ensure_complete(&mut model, id), Ok(()));
    assert_eq!(direct(&model, id, "broken"), None);
    assert!(direct(&model, id, "run").is_some());

    let diags = loader.take_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, ErrorCode::E1001);
}

#[test]
fn test_cyclic_supertypes_are_cut() {
    let set = ArtifactSet::new()
        .with(ClassArtifact::class("a", "A").extends(JvmType::class("a.B")))
        .with(ClassArtifact::class("a", "B").extends(JvmType::class("a.A")));
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);
    let lang = *model.lang();

    let a = loader.load(&mut model, "a.A", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(loader.ensure_complete(&mut model, a), Ok(()));

    let b = loader.load(&mut model, "a.B", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(model.decl(b).completion, Completion::Failed);
    let extended = model.decl(b).as_nominal().and_then(|n| n.extended_type.clone());
    assert_eq!(extended, Some(Type::simple(lang.identifiable_object)));

    let diags = loader.take_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, ErrorCode::E1003);
    assert_eq!(diags[0].subject.as_deref(), Some("a.B"));
}

#[test]
fn test_extra_constructors_warn_once() {
    let set = ArtifactSet::new().with(
        ClassArtifact::class("a", "Many")
            .with_method(MethodArtifact::constructor().with_param("x", JvmType::Int))
            .with_method(MethodArtifact::constructor())
            .with_method(MethodArtifact::constructor().with_param("y", JvmType::Boolean)),
    );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);
    let id = loader.load(&mut model, "a.Many", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(loader.ensure_complete(&mut model, id), Ok(()));

    let params = model.decl(id).as_nominal().and_then(|n| n.parameters.as_ref()).map(ParameterList::len);
    assert_eq!(params, Some(1));
    let diags = loader.take_diagnostics();
    assert_eq!(diags.iter().map(|d| d.code).collect::<Vec<_>>(), vec![ErrorCode::W1001]);
}

#[test]
fn test_setter_without_attribute_warns() {
    let set = ArtifactSet::new().with(
        ClassArtifact::class("a", "Sink")
            .with_method(MethodArtifact::new("setLevel", JvmType::Void).with_param("level", JvmType::Int)),
    );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);
    let id = loader.load(&mut model, "a.Sink", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(loader.ensure_complete(&mut model, id), Ok(()));

    let diags = loader.take_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, ErrorCode::W1002);
    assert!(diags[0].is_warning());
}

#[test]
fn test_interface_members_are_formal() {
    let set = ArtifactSet::new().with(
        ClassArtifact::interface("a", "Shape")
            .with_method(MethodArtifact::new("area", JvmType::Double).with_flags(MethodFlags::PUBLIC | MethodFlags::ABSTRACT)),
    );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);
    let lang = *model.lang();
    let id = loader.load(&mut model, "a.Shape", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    let area = loader.member(&mut model, id, "area").unwrap_or_else(|e| panic!("{e}"));
    let area = area.unwrap_or_else(|| panic!("no area"));

    assert!(model.decl(area).flags.contains(DeclFlags::FORMAL | DeclFlags::SHARED));
    let nominal = model.decl(id).as_nominal().cloned().unwrap_or_else(|| panic!("not a type"));
    assert_eq!(nominal.extended_type, Some(Type::simple(lang.object)));
    assert_eq!(nominal.parameters, None);
    // Inherited through Object.
    assert!(loader.member(&mut model, id, "string").ok().flatten().is_some());
}

#[test]
fn test_platform_packages_hide_non_public_members() {
    let set = ArtifactSet::new().with(
        ClassArtifact::class("java.util", "Thing")
            .with_method(MethodArtifact::new("visible", JvmType::Void))
            .with_method(MethodArtifact::new("hidden", JvmType::Void).with_flags(MethodFlags::PRIVATE)),
    );
    let mut model = Model::new();
    let java = model.module("java");
    assert!(java.is_some());
    let mut loader = DeclarationLoader::new(&set);
    let id = loader.load(&mut model, "java.util.Thing", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(loader.ensure_complete(&mut model, id), Ok(()));

    assert!(direct(&model, id, "visible").is_some());
    assert_eq!(direct(&model, id, "hidden"), None);
    let package = model.package_of(id).unwrap_or_else(|| panic!("no package"));
    assert_eq!(model.decl(package).container, java);
}

#[test]
fn test_analyzer_declarations_win() {
    let set = ArtifactSet::new().with(ClassArtifact::class("a", "Shared"));
    let mut model = Model::new();
    let module = model.find_or_create_module("a");
    let package = model.find_or_create_package(module, "a");
    let source = model.add_nominal(package, "Shared", NominalKind::Class);
    let mut loader = DeclarationLoader::new(&set);

    assert_eq!(loader.load(&mut model, "a.Shared", DeclarationKind::Type), Ok(source));
    assert_eq!(loader.ensure_complete(&mut model, source), Ok(()));
    assert_eq!(model.decl(source).origin, Origin::Source);
}

#[test]
fn test_arrays_become_sequences() {
    let set = ArtifactSet::new().with(
        ClassArtifact::class("a", "Bytes").with_method(MethodArtifact::new("getData", JvmType::array(JvmType::Byte))),
    );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);
    let lang = *model.lang();
    let id = loader.load(&mut model, "a.Bytes", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(loader.ensure_complete(&mut model, id), Ok(()));

    let data = direct(&model, id, "data").unwrap_or_else(|| panic!("no data"));
    assert_eq!(value_type(&model, data), Some(model.sequence_of(Type::simple(lang.integer))));
    assert!(!model.decl(data).flags.contains(DeclFlags::UNBOXED));
}

#[test]
fn test_language_boxed_wrappers_are_optional() {
    let set = ArtifactSet::new().with(
        ClassArtifact::class("a", "Boxes")
            .with_method(MethodArtifact::new("getCount", JvmType::class("lang.Integer")))
            .with_method(MethodArtifact::new("getTotal", JvmType::class("java.lang.Long")))
            .with_method(MethodArtifact::new(
                "getItems",
                JvmType::generic("lang.Sequence", vec![JvmType::class("lang.Integer")]),
            )),
    );
    let mut model = Model::new();
    let mut loader = DeclarationLoader::new(&set);
    let lang = *model.lang();
    let id = loader.load(&mut model, "a.Boxes", DeclarationKind::Type).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(loader.ensure_complete(&mut model, id), Ok(()));

    let optional_integer = Some(Type::optional(Type::simple(lang.integer)));
    let count = direct(&model, id, "count").unwrap_or_else(|| panic!("no count"));
    assert_eq!(value_type(&model, count), optional_integer);
    let total = direct(&model, id, "total").unwrap_or_else(|| panic!("no total"));
    assert_eq!(value_type(&model, total), optional_integer);
    // Type arguments are never optional.
    let items = direct(&model, id, "items").unwrap_or_else(|| panic!("no items"));
    assert_eq!(
        value_type(&model, items),
        Some(Type::nominal(lang.sequence, vec![Type::simple(lang.integer)]))
    );
}
