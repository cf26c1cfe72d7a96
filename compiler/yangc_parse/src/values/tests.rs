use super::*;
use yangc_diagnostic::ErrorCode;

#[test]
fn test_revision_date() {
    let rev = parse_revision_date("2024-02-29").unwrap();
    assert_eq!(rev.to_string(), "2024-02-29");
    let err = parse_revision_date("2024-13-01").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0005);
}

#[test]
fn test_yang_version() {
    assert_eq!(parse_yang_version("1.1").unwrap(), YangVersion::V1_1);
    assert_eq!(parse_yang_version("2").unwrap_err().code(), ErrorCode::E0006);
}

#[test]
fn test_semver() {
    let v = parse_semver("1.5.5").unwrap();
    assert_eq!((v.major, v.minor, v.patch), (1, 5, 5));
    assert_eq!(parse_semver("1.5").unwrap_err().code(), ErrorCode::E0007);
}

#[test]
fn test_boolean() {
    assert!(parse_boolean("true").unwrap());
    assert!(!parse_boolean("false").unwrap());
    assert!(parse_boolean("True").is_err());
}

#[test]
fn test_non_negative_integer() {
    assert_eq!(parse_non_negative_integer("0").unwrap(), 0);
    assert_eq!(parse_non_negative_integer("42").unwrap(), 42);
    assert!(matches!(
        parse_non_negative_integer("+1"),
        Err(ArgumentError::UnexpectedChar { found: '+', offset: 1, .. })
    ));
    assert!(parse_non_negative_integer("007").is_err());
    assert!(parse_non_negative_integer("99999999999").is_err());
    assert!(parse_non_negative_integer("").is_err());
}

#[test]
fn test_max_value() {
    assert_eq!(parse_max_value("unbounded").unwrap(), MaxValue::Unbounded);
    assert_eq!(parse_max_value("3").unwrap(), MaxValue::Bounded(3));
    assert!(parse_max_value("0").is_err());
}

#[test]
fn test_deviate() {
    assert_eq!(parse_deviate("not-supported").unwrap(), DeviateKind::NotSupported);
    assert_eq!(parse_deviate("replace").unwrap().to_string(), "replace");
    assert_eq!(parse_deviate("remove").unwrap_err().code(), ErrorCode::E0010);
}
