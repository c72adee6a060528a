//! Property tests for the A1 codec

use proptest::prelude::*;
use sheetwire_core::{
    column_number_to_letters, letters_to_column_number, A1Range, CellAddress, Error,
};

#[test]
fn test_letters_round_trip_through_three_letters() {
    // A..ZZZ
    for n in 1..=18_278u32 {
        let letters = column_number_to_letters(n).unwrap();
        assert_eq!(letters_to_column_number(&letters).unwrap(), n, "{letters}");
    }
}

#[test]
fn test_known_columns() {
    for (n, letters) in [(1, "A"), (26, "Z"), (27, "AA"), (52, "AZ"), (702, "ZZ"), (703, "AAA")] {
        assert_eq!(column_number_to_letters(n).unwrap(), letters);
    }
    assert!(matches!(
        column_number_to_letters(0),
        Err(Error::MalformedReference(_))
    ));
}

proptest! {
    #[test]
    fn letters_round_trip(n in 1u32..i32::MAX as u32) {
        let letters = column_number_to_letters(n).unwrap();
        prop_assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
        prop_assert_eq!(letters_to_column_number(&letters).unwrap(), n);
    }

    #[test]
    fn parse_then_format_uppercases(letters in "[a-zA-Z]{1,3}", row in 1u32..1_000_000) {
        let input = format!("{letters}{row}");
        let addr = CellAddress::parse(&input).unwrap();
        prop_assert_eq!(addr.row, row - 1);
        prop_assert_eq!(addr.to_a1_string(), input.to_uppercase());
    }

    #[test]
    fn coordinates_round_trip(row in 0u32..i32::MAX as u32, col in 0u32..i32::MAX as u32) {
        let addr = CellAddress::new(row, col);
        prop_assert_eq!(CellAddress::parse(&addr.to_a1_string()).unwrap(), addr);
    }

    #[test]
    fn ranges_round_trip(
        a in (0u32..10_000, 0u32..702),
        b in (0u32..10_000, 0u32..702),
    ) {
        let range = A1Range::spanning(CellAddress::new(a.0, a.1), CellAddress::new(b.0, b.1))
            .on_sheet("Data");
        let parsed: A1Range = range.to_string().parse().unwrap();
        prop_assert_eq!(parsed, range);
    }

    #[test]
    fn garbage_is_rejected(s in "[0-9]+[A-Z]+|[A-Z]+|[0-9]+|[A-Z]+0") {
        prop_assert!(CellAddress::parse(&s).is_err());
    }
}
