use super::*;

#[test]
fn test_generic_arity_marker() {
    assert!(has_generic_arity_marker("List`1"));
    assert!(has_generic_arity_marker("Dictionary`2"));
    assert!(has_generic_arity_marker("Tuple`12"));
    assert!(!has_generic_arity_marker("List"));
    assert!(!has_generic_arity_marker("List`"));
    assert!(!has_generic_arity_marker("Odd`name"));
    assert!(!has_generic_arity_marker(""));
}

#[test]
fn test_generic_arity_value() {
    assert_eq!(generic_arity("Dictionary`2"), Some(2));
    assert_eq!(generic_arity("Tuple`12"), Some(12));
    assert_eq!(generic_arity("String"), None);
}

#[test]
fn test_short_host_name_strips_paths() {
    assert_eq!(short_host_name("i32"), "i32");
    assert_eq!(short_host_name("alloc::string::String"), "String");
    assert_eq!(
        short_host_name("alloc::vec::Vec<alloc::string::String>"),
        "Vec<String>"
    );
    assert_eq!(
        short_host_name("std::collections::hash::map::HashMap<alloc::string::String, i32>"),
        "HashMap<String, i32>"
    );
}

#[test]
fn test_short_host_name_keeps_punctuation() {
    assert_eq!(short_host_name("&str"), "&str");
    assert_eq!(short_host_name("[u8; 4]"), "[u8; 4]");
    assert_eq!(
        short_host_name("(alloc::string::String, core::option::Option<u8>)"),
        "(String, Option<u8>)"
    );
}

#[test]
fn test_host_name_is_generic() {
    assert!(host_name_is_generic("alloc::vec::Vec<u8>"));
    assert!(!host_name_is_generic("alloc::string::String"));
}
