use chainmap_core::sigid::normalize;

#[test]
fn source_format_is_uppercased_and_hyphenated() {
    assert_eq!(normalize(Some("abc123")).as_deref(), Some("ABC-123"));
    assert_eq!(normalize(Some("AbC123")).as_deref(), Some("ABC-123"));
    assert_eq!(normalize(Some("XYZ456")).as_deref(), Some("XYZ-456"));
}

#[test]
fn map_format_passes_through_unchanged() {
    assert_eq!(normalize(Some("ABC-123")).as_deref(), Some("ABC-123"));
}

#[test]
fn placeholder_and_missing_codes_are_unresolvable() {
    assert_eq!(normalize(Some("???")), None);
    assert_eq!(normalize(Some("")), None);
    assert_eq!(normalize(None), None);
}

#[test]
fn malformed_codes_are_rejected() {
    assert_eq!(normalize(Some("AB-123")), None);
    assert_eq!(normalize(Some("abcd123")), None);
    assert_eq!(normalize(Some("abc12")), None);
    assert_eq!(normalize(Some("ab1234")), None);
    assert_eq!(normalize(Some("abc-123")), None);
    assert_eq!(normalize(Some("123abc")), None);
    assert_eq!(normalize(Some("abc 23")), None);
}
