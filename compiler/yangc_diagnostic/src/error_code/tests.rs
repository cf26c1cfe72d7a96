use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E2001.as_str(), "E2001");
}

#[test]
fn test_all_variants_round_trip_through_from_str() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
    }
    assert!("E7777".parse::<ErrorCode>().is_err());
}

#[test]
fn test_kind_follows_leading_digit() {
    for code in ErrorCode::ALL {
        let expected = match &code.as_str()[1..2] {
            "0" => ErrorKind::Syntax,
            "1" => ErrorKind::Binding,
            "2" => ErrorKind::Conflict,
            "3" => ErrorKind::UnsatisfiableDependency,
            "4" => ErrorKind::UnknownStatement,
            "5" => ErrorKind::InvalidStatement,
            _ => ErrorKind::Internal,
        };
        assert_eq!(code.kind(), expected, "{code}");
    }
}

#[test]
fn test_fatal_kinds() {
    assert!(ErrorCode::E2001.is_fatal_to_phase());
    assert!(ErrorCode::E3001.is_fatal_to_phase());
    assert!(!ErrorCode::E0001.is_fatal_to_phase());
    assert!(ErrorCode::E0002.is_syntax_error());
}
