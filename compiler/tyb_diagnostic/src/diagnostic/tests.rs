use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builder_sets_all_fields() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("cannot resolve `a.b.C`")
        .with_subject("a.b.D")
        .with_note("referenced from a supertype");

    assert!(diag.is_error());
    assert!(!diag.is_warning());
    assert_eq!(diag.message, "cannot resolve `a.b.C`");
    assert_eq!(diag.subject.as_deref(), Some("a.b.D"));
    assert_eq!(diag.notes, vec!["referenced from a supertype".to_string()]);
}

#[test]
fn or_subject_keeps_innermost_attribution() {
    let diag = Diagnostic::error(ErrorCode::E1002)
        .with_subject("a.Foo.bar")
        .or_subject("a.Foo");
    assert_eq!(diag.subject.as_deref(), Some("a.Foo.bar"));

    let diag = Diagnostic::error(ErrorCode::E1002).or_subject("a.Foo");
    assert_eq!(diag.subject.as_deref(), Some("a.Foo"));
}

#[test]
fn display_renders_header_subject_and_notes() {
    let diag = Diagnostic::warning(ErrorCode::W1001)
        .with_message("`a.Foo` has multiple constructors")
        .with_subject("a.Foo")
        .with_note("only the first one is used");

    assert_eq!(
        diag.to_string(),
        "warning[W1001]: `a.Foo` has multiple constructors\n  --> a.Foo\n  = note: only the first one is used"
    );
}
