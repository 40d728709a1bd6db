use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_accessor_names() {
    assert_eq!(getter_name("count"), "getCount");
    assert_eq!(setter_name("count"), "setCount");
    assert_eq!(getter_name(""), "get");
}

#[test]
fn test_attribute_from_getter() {
    assert_eq!(attribute_from_getter("getCount").as_deref(), Some("count"));
    assert_eq!(attribute_from_getter("isEmpty").as_deref(), Some("empty"));
    assert_eq!(attribute_from_getter("getaway"), None);
    assert_eq!(attribute_from_getter("island"), None);
    assert_eq!(attribute_from_getter("get"), None);
    assert_eq!(attribute_from_getter("size"), None);
}

#[test]
fn test_attribute_from_setter() {
    assert_eq!(attribute_from_setter("setCount").as_deref(), Some("count"));
    assert_eq!(attribute_from_setter("settle"), None);
    assert_eq!(attribute_from_setter("set"), None);
}

#[test]
fn test_getter_setter_agree() {
    for attr in ["count", "name", "x"] {
        assert_eq!(attribute_from_getter(&getter_name(attr)).as_deref(), Some(attr));
        assert_eq!(attribute_from_setter(&setter_name(attr)).as_deref(), Some(attr));
    }
}

#[test]
fn test_keyword_quoting() {
    assert_eq!(quote_if_keyword("default"), "$default");
    assert_eq!(quote_if_keyword("print"), "print");
    assert_eq!(unquote("$default"), "default");
    assert_eq!(unquote("$arg0"), "$arg0");
    assert_eq!(unquote("print"), "print");
}

#[test]
fn test_synthetic_names() {
    assert_eq!(companion_name("Printable"), "Printable$impl");
    assert_eq!(companion_field_name("Printable"), "$Printable$impl");
    assert_eq!(default_value_method("greet", "greeting"), "greet$greeting");
    assert_eq!(named_arg_local(2), "$arg2");
}
