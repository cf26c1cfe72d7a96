use super::*;

#[test]
fn test_parse_and_display() {
    let rev: Revision = "2024-03-09".parse().unwrap();
    assert_eq!(rev.year(), 2024);
    assert_eq!(rev.month(), 3);
    assert_eq!(rev.day(), 9);
    assert_eq!(rev.to_string(), "2024-03-09");
}

#[test]
fn test_chronological_order() {
    let older: Revision = "2019-12-31".parse().unwrap();
    let newer: Revision = "2020-01-01".parse().unwrap();
    assert!(older < newer);
    assert_eq!([newer, older].iter().max(), Some(&newer));
}

#[test]
fn test_rejects_malformed() {
    let err = "2024/03/09".parse::<Revision>().unwrap_err();
    assert_eq!(err.offset, 4);

    let err = "2024-13-01".parse::<Revision>().unwrap_err();
    assert_eq!(err.message, "month out of range");

    let err = "20x4-01-01".parse::<Revision>().unwrap_err();
    assert_eq!(err.offset, 2);

    assert!("2024-01-1".parse::<Revision>().is_err());
}

#[test]
fn test_day_checked_against_month_length() {
    for text in ["2021-02-30", "2021-04-31", "2021-02-29", "2100-02-29"] {
        let err = text.parse::<Revision>().unwrap_err();
        assert_eq!(err.message, "day out of range", "{text}");
        assert_eq!(err.offset, 8);
    }
    for text in ["2020-02-29", "2000-02-29", "2021-01-31", "2021-04-30", "2021-12-31"] {
        assert!(text.parse::<Revision>().is_ok(), "{text}");
    }
    assert!(Revision::new(2024, 2, 29).is_ok());
    assert!(Revision::new(2023, 2, 29).is_err());
}
