use crate::types::Type;
use pretty_assertions::assert_eq;

#[test]
fn test_surface_name_resolution() {
    assert_eq!(Type::from_surface_name("u256"), Some(Type::U256));
    assert_eq!(Type::from_surface_name("i256"), Some(Type::I256));
    assert_eq!(Type::from_surface_name("address"), Some(Type::Address));
    assert_eq!(Type::from_surface_name("bool"), Some(Type::Bool));
    assert_eq!(Type::from_surface_name("bytes"), Some(Type::Bytes));
    assert_eq!(Type::from_surface_name("string"), Some(Type::Bytes));
    assert_eq!(Type::from_surface_name("UserInfo"), None);
}

#[test]
fn test_sizes_and_alignment() {
    assert_eq!(Type::U256.size_bytes(), Some(32));
    assert_eq!(Type::Address.size_bytes(), Some(20));
    assert_eq!(Type::Address.align_bytes(), Some(32));
    assert_eq!(Type::Bool.size_bytes(), Some(1));
    assert_eq!(
        Type::Mapping(Box::new(Type::Address), Box::new(Type::U256)).size_bytes(),
        None
    );
}

#[test]
fn test_reference_like_categories() {
    assert!(Type::U256.is_reference_like());
    assert!(Type::Bytes.is_reference_like());
    assert!(Type::Struct("UserInfo".to_string()).is_reference_like());
    assert!(!Type::Bool.is_reference_like());
    assert!(!Type::Void.is_reference_like());
}

#[test]
fn test_display_round_trip_names() {
    let map = Type::Mapping(Box::new(Type::Address), Box::new(Type::U256));
    assert_eq!(map.to_string(), "map<address, u256>");
    assert_eq!(Type::Struct("UserInfo".to_string()).to_string(), "UserInfo");
}

#[test]
fn test_target_names() {
    assert_eq!(Type::U256.target_name(), "u256");
    assert_eq!(Type::Bool.target_name(), "bool_t");
    assert_eq!(Type::Struct("UserInfo".to_string()).target_name(), "UserInfo*");
}
