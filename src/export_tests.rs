#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{Category, ExpenseDraft};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample() -> Vec<Expense> {
    vec![
        Expense::new(
            1,
            ExpenseDraft::new("Coffee", dec!(5), Category::Food, date(2024, 3, 1)),
        )
        .unwrap(),
        Expense::new(
            2,
            ExpenseDraft::new("Bus pass", dec!(12.50), Category::Transport, date(2024, 3, 15))
                .recurring(true),
        )
        .unwrap(),
    ]
}

#[test]
fn test_to_csv_header_and_rows_in_order() {
    let csv = to_csv(&sample()).unwrap();
    assert_eq!(
        csv,
        "Name,Amount,Category,Date,Recurring\n\
         Coffee,5,Food,2024-03-01,false\n\
         Bus pass,12.50,Transport,2024-03-15,true\n"
    );
}

#[test]
fn test_to_csv_quotes_names_with_commas() {
    let expenses = vec![Expense::new(
        1,
        ExpenseDraft::new("Dinner, drinks", dec!(40), Category::Entertainment, date(2024, 5, 4)),
    )
    .unwrap()];
    let csv = to_csv(&expenses).unwrap();
    assert!(csv.contains("\"Dinner, drinks\",40,Entertainment,2024-05-04,false"));
}

#[test]
fn test_to_csv_is_deterministic() {
    assert_eq!(to_csv(&sample()).unwrap(), to_csv(&sample()).unwrap());
}

#[test]
fn test_to_csv_empty_is_refused() {
    let err = to_csv(&[]).unwrap_err();
    assert_eq!(err.to_string(), "No data to export");
}

#[test]
fn test_export_to_file_roundtrip_with_csv_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let count = export_to_file(&path, &sample()).unwrap();
    assert_eq!(count, 2);

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), HEADERS.to_vec());
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[1][0], "Bus pass");
    assert_eq!(&rows[1][4], "true");
}

#[test]
fn test_default_file_name() {
    assert_eq!(default_file_name(date(2024, 3, 9)), "expenses_2024-03-09.csv");
}
