use hspdash_core::stats::quantile;
use hspdash_core::{summarize, ComputationError};
use hspdash_parser::{ColumnMapping, RowSet};
use polars::prelude::*;

fn approx(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("statistic should be present");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn rows() -> RowSet {
    let df = df!(
        "subjid" => &["S1", "S2", "S3", "S4"],
        "expression_malaria" => &[10.0f64, 5.0, 2.0, 7.0],
        "expression_treatment" => &[16.0f64, 4.0, 6.0, 7.0],
        "fold_change" => &[1.6f64, 0.8, 3.0, 1.0],
        "parasitemia" => &[Some(100i64), None, Some(300), Some(200)],
        "age_category" => &["adult", "child", "child", "adult"],
    )
    .unwrap();
    RowSet::new(df, &ColumnMapping::default()).unwrap()
}

#[test]
fn summary_covers_numeric_columns_only() {
    let summary = summarize(&rows()).unwrap();
    let names: Vec<&str> = summary.columns.iter().map(|c| c.column.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "expression_malaria",
            "expression_treatment",
            "fold_change",
            "parasitemia"
        ]
    );
    assert!(summary.get("age_category").is_none());
    assert!(summary.get("subjid").is_none());
}

#[test]
fn summary_statistics_match_hand_computation() {
    let summary = summarize(&rows()).unwrap();
    let baseline = summary.get("expression_malaria").unwrap();

    assert_eq!(baseline.count, 4);
    approx(baseline.mean, 6.0);
    // sample variance: (16 + 1 + 16 + 1) / 3
    approx(baseline.std, (34.0f64 / 3.0).sqrt());
    approx(baseline.min, 2.0);
    approx(baseline.q25, 4.25);
    approx(baseline.median, 6.0);
    approx(baseline.q75, 7.75);
    approx(baseline.max, 10.0);
}

#[test]
fn nulls_are_excluded_from_counts() {
    let summary = summarize(&rows()).unwrap();
    let parasitemia = summary.get("parasitemia").unwrap();

    assert_eq!(parasitemia.count, 3);
    approx(parasitemia.mean, 200.0);
    approx(parasitemia.median, 200.0);
    approx(parasitemia.std, 100.0);
}

#[test]
fn single_row_has_no_standard_deviation() {
    let df = df!(
        "subjid" => &["S1"],
        "expression_malaria" => &[10.0f64],
        "expression_treatment" => &[16.0f64],
        "fold_change" => &[1.6f64],
    )
    .unwrap();
    let rows = RowSet::new(df, &ColumnMapping::default()).unwrap();
    let summary = summarize(&rows).unwrap();
    let fold = summary.get("fold_change").unwrap();

    assert_eq!(fold.count, 1);
    assert_eq!(fold.std, None);
    approx(fold.q25, 1.6);
    approx(fold.q75, 1.6);
}

#[test]
fn summary_table_has_one_row_per_statistic() {
    let table = summarize(&rows()).unwrap().to_table();

    assert_eq!(table.width(), 5);
    assert_eq!(table.height(), 8);
    assert_eq!(table.rows[0][0], "count");
    assert_eq!(table.rows[0][1], "4.000000");
    assert_eq!(table.rows[7][0], "max");
    assert_eq!(table.rows[7][4], "300.000000");
}

#[test]
fn empty_rows_are_a_computation_error() {
    let df = df!(
        "subjid" => Vec::<&str>::new(),
        "expression_malaria" => Vec::<f64>::new(),
        "expression_treatment" => Vec::<f64>::new(),
        "fold_change" => Vec::<f64>::new(),
    )
    .unwrap();
    let rows = RowSet::new(df, &ColumnMapping::default()).unwrap();
    assert!(matches!(
        summarize(&rows),
        Err(ComputationError::EmptyRowSet)
    ));
}

#[test]
fn quantile_interpolates_linearly() {
    let sorted = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(quantile(&sorted, 0.0), Some(1.0));
    assert_eq!(quantile(&sorted, 0.5), Some(2.5));
    assert_eq!(quantile(&sorted, 0.25), Some(1.75));
    assert_eq!(quantile(&sorted, 1.0), Some(4.0));
    assert_eq!(quantile(&[], 0.5), None);
}
