//! Property-based tests for the bridge as a whole.
//!
//! Top-level attributes of any wrapper type, optional or not, variable or
//! not, are compiled into holder classes, lowered to artifacts and loaded
//! back in a fresh session. The loaded declaration must have the same type
//! and mutability, and target signatures must agree with the erased types
//! they came from.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use tyb_bridge::emit::{class_to_artifact, jvm_type};
use tyb_bridge::Session;
use tyb_erase::{TargetType, TypeArg};
use tyb_ir::{DeclFlags, Type, Wrapper};
use tyb_loader::{ArtifactSet, JvmType};

// -- Strategies --

fn wrapper_strategy() -> impl Strategy<Value = Wrapper> {
    prop::sample::select(Wrapper::ALL.to_vec())
}

/// Attribute names that can never collide with a keyword.
fn attribute_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("attr[a-z0-9]{0,8}").expect("valid regex")
}

fn target_type_strategy() -> impl Strategy<Value = TargetType> {
    let leaf = prop_oneof![
        wrapper_strategy().prop_map(TargetType::Native),
        "[A-Z]".prop_map(TargetType::Var),
        "app\\.[A-Z][a-z]{0,6}".prop_map(TargetType::class),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        (
            "app\\.[A-Z][a-z]{0,6}",
            prop::collection::vec(
                prop_oneof![
                    inner.clone().prop_map(TypeArg::Exact),
                    inner.clone().prop_map(TypeArg::Extends),
                    inner.prop_map(TypeArg::Super),
                    Just(TypeArg::Wildcard),
                ],
                1..3,
            ),
        )
            .prop_map(|(name, args)| TargetType::generic(name, args))
    })
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn holder_round_trip(
        wrapper in wrapper_strategy(),
        optional in any::<bool>(),
        variable in any::<bool>(),
        name in attribute_name_strategy(),
    ) {
        let empty = ArtifactSet::new();
        let mut source = Session::new(&empty);
        let model = source.model_mut();
        let module = model.find_or_create_module("app");
        let pkg = model.find_or_create_package(module, "app");
        let mut ty = model.wrapper_type(wrapper);
        if optional {
            ty = Type::optional(ty);
        }
        let flags = if variable { DeclFlags::VARIABLE } else { DeclFlags::empty() };
        let decl = model.add_value(pkg, &name, ty.clone(), flags);

        let output = source.compile_unit(&[decl]);
        prop_assert!(!output.has_errors(), "{:?}", output.diagnostics);
        let artifacts: ArtifactSet = output.classes.iter().map(class_to_artifact).collect();

        let mut binary = Session::new(&artifacts);
        let loaded = binary.load_value(&format!("app.{name}")).expect("holder loads");
        let loaded = binary.model().decl(loaded);
        prop_assert_eq!(loaded.is_variable(), variable);
        let loaded_ty = loaded.as_value().and_then(|v| v.ty.as_ref()).expect("typed");
        prop_assert_eq!(
            binary.model().format_type(loaded_ty),
            source.model().format_type(&ty)
        );
    }

    #[test]
    fn lowering_keeps_names_and_arity(ty in target_type_strategy()) {
        match (&ty, jvm_type(&ty)) {
            (TargetType::Native(Wrapper::String), jvm) => {
                prop_assert!(jvm.is_class("java.lang.String"));
            }
            (TargetType::Native(_), jvm) => prop_assert!(jvm.is_primitive()),
            (TargetType::Var(name), JvmType::TypeVar(lowered)) => prop_assert_eq!(name, &lowered),
            (TargetType::Class { name, args }, JvmType::Declared { name: lowered, args: lowered_args }) => {
                prop_assert_eq!(name, &lowered);
                prop_assert_eq!(args.len(), lowered_args.len());
            }
            (ty, jvm) => prop_assert!(false, "{ty} lowered to {jvm:?}"),
        }
    }
}
