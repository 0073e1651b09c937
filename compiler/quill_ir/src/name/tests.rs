use super::*;

#[test]
fn test_name_empty_is_default() {
    assert_eq!(Name::default(), Name::EMPTY);
    assert_eq!(Name::EMPTY.index(), 0);
}

#[test]
fn test_name_raw_round_trip() {
    let name = Name::from_raw(17);
    assert_eq!(name.raw(), 17);
    assert_eq!(name.index(), 17);
}

#[test]
fn test_name_ord_follows_index() {
    assert!(Name::from_raw(1) < Name::from_raw(2));
}

#[test]
fn test_name_debug() {
    assert_eq!(format!("{:?}", Name::from_raw(3)), "Name(3)");
}
