use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_parts_round_trip() {
    let name = Name::from_parts(5, 1000).unwrap();
    assert_eq!((name.shard(), name.slot()), (5, 1000));
}

#[test]
fn test_empty_is_shard_zero_slot_zero() {
    assert_eq!(Name::from_parts(0, 0), Some(Name::EMPTY));
    assert_eq!(Name::default(), Name::EMPTY);
}

#[test]
fn test_out_of_range_parts_are_rejected() {
    assert_eq!(Name::from_parts(Name::SHARDS, 0), None);
    assert_eq!(Name::from_parts(0, Name::MAX_SLOT as usize + 1), None);
    assert!(Name::from_parts(Name::SHARDS - 1, Name::MAX_SLOT as usize).is_some());
}

#[test]
fn test_debug_shows_location() {
    let name = Name::from_parts(2, 7).unwrap();
    assert_eq!(format!("{name:?}"), "Name(2:7)");
}
