// ABOUTME: Exported CSV files read back with a standard CSV reader

use churn_desk::export::{CsvFormat, DirectorySaver, TabularExporter};
use churn_desk::models::TabularRecord;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn exporter(dir: &TempDir) -> TabularExporter {
    TabularExporter::new(CsvFormat::default(), DirectorySaver::new(dir.path()))
}

fn read_back(text: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

#[test]
fn test_exported_file_matches_ranked_example() {
    let dir = TempDir::new().unwrap();
    let records = vec![
        TabularRecord::new().with("id", "A").with("risk", 0.9),
        TabularRecord::new().with("id", "B").with("risk", 0.9),
        TabularRecord::new().with("id", "C").with("risk", 0.2),
    ];

    let summary = exporter(&dir).export(&records, "risk", None, "ranked.csv");
    assert_eq!(summary.rows, 3);

    let written = fs::read_to_string(dir.path().join("ranked.csv")).unwrap();
    assert_eq!(written, "id,risk\nA,0.9\nB,0.9\nC,0.2");
}

#[test]
fn test_awkward_values_survive_read_back() {
    let dir = TempDir::new().unwrap();
    let records = vec![
        TabularRecord::new()
            .with("customerID", "7590-VHVEG")
            .with("notes", r#"said "cancel", then stayed"#)
            .with("Contract", "Month-to-month")
            .with("churn_probability", 0.42),
        TabularRecord::new()
            .with("customerID", "5575-GNVDE")
            .with("notes", "billing, support, price")
            .with("Contract", r#"Two "year""#)
            .with("churn_probability", 0.87),
        TabularRecord::new()
            .with("customerID", "3668-QPYBK")
            .with("notes", "")
            .with("Contract", "One year")
            .with("churn_probability", 0.05),
    ];

    exporter(&dir).export(&records, "churn_probability", None, "awkward.csv");
    let written = fs::read_to_string(dir.path().join("awkward.csv")).unwrap();
    let (headers, rows) = read_back(&written);

    assert_eq!(headers, vec!["customerID", "notes", "Contract", "churn_probability"]);
    assert_eq!(
        rows,
        vec![
            vec!["5575-GNVDE", "billing, support, price", r#"Two "year""#, "0.87"],
            vec!["7590-VHVEG", r#"said "cancel", then stayed"#, "Month-to-month", "0.42"],
            vec!["3668-QPYBK", "", "One year", "0.05"],
        ]
    );
}

#[test]
fn test_missing_fields_become_empty_cells() {
    let dir = TempDir::new().unwrap();
    let records = vec![
        TabularRecord::new().with("id", "A").with("plan", "basic").with("risk", 0.3),
        TabularRecord::new().with("id", "B").with("risk", 0.6),
    ];

    exporter(&dir).export(&records, "risk", None, "sparse.csv");
    let written = fs::read_to_string(dir.path().join("sparse.csv")).unwrap();
    let (headers, rows) = read_back(&written);

    assert_eq!(headers, vec!["id", "plan", "risk"]);
    assert_eq!(rows, vec![vec!["B", "", "0.6"], vec!["A", "basic", "0.3"]]);
}

#[test]
fn test_limit_keeps_highest_ranked_rows() {
    let dir = TempDir::new().unwrap();
    let records: Vec<TabularRecord> = (0..6)
        .map(|i| {
            TabularRecord::new()
                .with("id", format!("C{}", i))
                .with("risk", f64::from(i) / 10.0)
        })
        .collect();

    let summary = exporter(&dir).export(&records, "risk", Some(2), "top.csv");
    assert_eq!(summary.rows, 2);

    let written = fs::read_to_string(dir.path().join("top.csv")).unwrap();
    let (_, rows) = read_back(&written);
    assert_eq!(rows, vec![vec!["C5", "0.5"], vec!["C4", "0.4"]]);
}

#[test]
fn test_empty_export_writes_empty_file() {
    let dir = TempDir::new().unwrap();
    let summary = exporter(&dir).export(&[], "risk", None, "empty.csv");

    assert_eq!(summary.rows, 0);
    assert_eq!(fs::read_to_string(dir.path().join("empty.csv")).unwrap(), "");
}
