use chrono::NaiveDate;
use vykaz_sync::workbook::excel_date::{
    NumberKind, classify_format, date_to_serial, number_to_cell_value, serial_to_date,
};
use vykaz_sync::workbook::{CellValue, MergedRange, column_letters, parse_cell_ref};

#[test]
fn a1_references() {
    assert_eq!(column_letters(1), "A");
    assert_eq!(column_letters(14), "N");
    assert_eq!(column_letters(28), "AB");
    assert_eq!(parse_cell_ref("E26"), Some((26, 5)));
    assert_eq!(parse_cell_ref("AB3"), Some((3, 28)));
    assert_eq!(parse_cell_ref("26"), None);

    let r = MergedRange::parse_a1("E26:H26").expect("range");
    assert_eq!(r, MergedRange::new(26, 5, 26, 8));
    assert_eq!(r.to_a1(), "E26:H26");
}

#[test]
fn range_geometry() {
    let region = MergedRange::new(26, 1, 56, 14);
    assert!(MergedRange::new(26, 5, 26, 8).is_within(&region));
    assert!(MergedRange::new(55, 1, 58, 1).intersects(&region));
    assert!(!MergedRange::new(55, 1, 58, 1).is_within(&region));
    assert!(!MergedRange::new(57, 1, 57, 14).intersects(&region));
}

#[test]
fn number_formats() {
    assert_eq!(classify_format("d.m.yyyy"), NumberKind::Date);
    assert_eq!(classify_format("[h]:mm:ss"), NumberKind::Time);
    assert_eq!(classify_format("hh:mm"), NumberKind::Time);
    assert_eq!(classify_format("0.00"), NumberKind::Plain);
    assert_eq!(classify_format("General"), NumberKind::Plain);

    assert_eq!(number_to_cell_value(0.5, Some("hh:mm")), CellValue::Time(43_200));
    assert_eq!(number_to_cell_value(7.0, None), CellValue::Number(7.0));
}

#[test]
fn excel_serial_dates() {
    let d = NaiveDate::from_ymd_opt(2025, 2, 1).expect("date");
    assert_eq!(date_to_serial(d), 45689.0);
    assert_eq!(serial_to_date(45689.75), Some(d));
    assert_eq!(serial_to_date(-1.0), None);
}
