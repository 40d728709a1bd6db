use pretty_assertions::assert_eq;

use crate::{Model, Type};

#[test]
fn test_format_sugar() {
    let model = Model::new();
    let lang = *model.lang();
    let string = Type::simple(lang.string);
    let integer = Type::simple(lang.integer);

    assert_eq!(model.format_type(&string), "String");
    assert_eq!(model.format_type(&Type::optional(string.clone())), "String?");
    assert_eq!(model.format_type(&model.sequence_of(integer.clone())), "Integer[]");
    // An optional sequence flattens into a three-case union.
    assert_eq!(
        model.format_type(&Type::optional(model.sequence_of(integer))),
        "Bottom|Empty|Sequence<Integer>"
    );
    assert_eq!(model.format_type(&Type::Bottom), "Bottom");
}

#[test]
fn test_format_compound() {
    let model = Model::new();
    let lang = *model.lang();
    let string = Type::simple(lang.string);
    let integer = Type::simple(lang.integer);
    let float = Type::simple(lang.float);

    let union = Type::union([string.clone(), integer.clone()]);
    assert_eq!(model.format_type(&union), "String|Integer");

    let meet = Type::intersection([union.clone(), float]).unwrap_or(Type::Bottom);
    assert_eq!(model.format_type(&meet), "Float&(String|Integer)");

    let seq = Type::nominal(lang.sequence, vec![Type::optional(string)]);
    assert_eq!(model.format_type(&seq), "Sequence<String?>");
}
