use super::*;

#[test]
fn test_name_raw_roundtrip() {
    let name = Name::from_raw(42);
    assert_eq!(name.raw(), 42);
    assert_eq!(Name::from_raw(name.raw()), name);
}

#[test]
fn test_name_default_is_empty() {
    assert_eq!(Name::default(), Name::EMPTY);
    assert_eq!(format!("{:?}", Name::EMPTY), "Name(0)");
}
