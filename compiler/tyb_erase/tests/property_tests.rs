//! Property-based tests for erasure and boxing.
//!
//! 1. Boxing safety: an optional value is never native
//! 2. Determinism: erasing the same type twice gives the same result
//! 3. Satisfies is the only context without an expression

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use tyb_erase::{Boxing, BoxingPolicy, ErasureContext, TypeEraser, Usage};
use tyb_ir::{DeclId, Model, NominalKind, Type, Variance};

struct Fixture {
    model: Model,
    leaves: Vec<DeclId>,
    generics: Vec<DeclId>,
}

fn fixture() -> Fixture {
    let mut model = Model::new();
    let lang = *model.lang();
    let module = model.find_or_create_module("m");
    let package = model.find_or_create_package(module, "m");
    let item = model.add_nominal(package, "Item", NominalKind::Class);
    let mut generics = Vec::new();
    for (name, variance) in [
        ("Box", Variance::Invariant),
        ("Producer", Variance::Covariant),
        ("Consumer", Variance::Contravariant),
    ] {
        let id = model.add_nominal(package, name, NominalKind::Interface);
        model.add_type_parameter(id, "T", variance);
        generics.push(id);
    }
    Fixture {
        leaves: vec![
            lang.string,
            lang.boolean,
            lang.integer,
            lang.float,
            lang.character,
            lang.object,
            lang.void,
            item,
        ],
        generics,
        model,
    }
}

#[derive(Clone, Debug)]
enum Shape {
    Bottom,
    Leaf(usize),
    Apply(usize, Box<Shape>),
    Optional(Box<Shape>),
    Union(Box<Shape>, Box<Shape>),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![Just(Shape::Bottom), (0usize..8).prop_map(Shape::Leaf)];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (0usize..3, inner.clone()).prop_map(|(g, s)| Shape::Apply(g, Box::new(s))),
            inner.clone().prop_map(|s| Shape::Optional(Box::new(s))),
            (inner.clone(), inner).prop_map(|(a, b)| Shape::Union(Box::new(a), Box::new(b))),
        ]
    })
}

fn build(fx: &Fixture, shape: &Shape) -> Type {
    match shape {
        Shape::Bottom => Type::Bottom,
        Shape::Leaf(i) => Type::simple(fx.leaves[i % fx.leaves.len()]),
        Shape::Apply(g, s) => Type::nominal(fx.generics[g % fx.generics.len()], vec![build(fx, s)]),
        Shape::Optional(s) => Type::optional(build(fx, s)),
        Shape::Union(a, b) => Type::union([build(fx, a), build(fx, b)]),
    }
}

fn usage_strategy() -> impl Strategy<Value = Usage> {
    prop_oneof![
        Just(Usage::Argument),
        Just(Usage::Receiver),
        Just(Usage::StorageSlot),
        Just(Usage::Condition),
        Just(Usage::Interpolation),
    ]
}

proptest! {
    #[test]
    fn optional_is_never_native(shape in shape_strategy(), usage in usage_strategy()) {
        let fx = fixture();
        let ty = Type::optional(build(&fx, &shape));
        prop_assert_eq!(BoxingPolicy::new(&fx.model).decide(&ty, usage), Boxing::Boxed);
    }

    #[test]
    fn erasure_is_deterministic(shape in shape_strategy(), raw in any::<bool>()) {
        let fx = fixture();
        let ty = build(&fx, &shape);
        let eraser = TypeEraser::new(&fx.model);
        for ctx in [
            ErasureContext::Satisfies,
            ErasureContext::Extends,
            ErasureContext::TypeParamBound,
            ErasureContext::Ordinary,
        ] {
            let first = eraser.erase(&ty, ctx, raw);
            prop_assert!(first.is_ok());
            prop_assert_eq!(first, eraser.erase(&ty, ctx, raw));
        }
    }

    #[test]
    fn only_satisfies_omits_expression(shape in shape_strategy()) {
        let fx = fixture();
        let ty = build(&fx, &shape);
        let eraser = TypeEraser::new(&fx.model);
        for ctx in [ErasureContext::Extends, ErasureContext::TypeParamBound, ErasureContext::Ordinary] {
            prop_assert!(eraser.erase(&ty, ctx, false).unwrap().is_some());
        }
    }
}
