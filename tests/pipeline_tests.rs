//! End-to-end pipeline tests
//!
//! Summary workbooks are generated with rust_xlsxwriter, run through the
//! pipeline, and the output is read back with calamine.

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zaiko::config::Layout;
use zaiko::core::{run, RunOutcome};
use zaiko::error::ZaikoError;
use zaiko::excel::{SummaryWorkbook, TemplatePackage};

mod common;

use common::{Fixture, Num, Text, BOXED, SMALL, SUMMARY, WEEKDAY_STOCK_COL};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn output_values(path: &Path, sheet: &str) -> Vec<(String, String, String)> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range(sheet).unwrap();
    let mut rows = Vec::new();
    for row in 2.. {
        let cell = |col: u32| match range.get_value((row, col)) {
            Some(Data::String(s)) => s.clone(),
            Some(Data::Float(f)) => f.to_string(),
            Some(Data::Int(i)) => i.to_string(),
            _ => String::new(),
        };
        let values = (cell(0), cell(1), cell(2));
        if values == (String::new(), String::new(), String::new()) {
            break;
        }
        rows.push(values);
    }
    rows
}

fn strings(rows: &[(&str, &str, &str)]) -> Vec<(String, String, String)> {
    rows.iter()
        .map(|(a, b, c)| (a.to_string(), b.to_string(), c.to_string()))
        .collect()
}

fn package_part(path: &Path, name: &str) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut xml = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

fn run_sample(fixture: Fixture, layout: &Layout, on: NaiveDate) -> (TempDir, PathBuf, RunOutcome) {
    let dir = TempDir::new().unwrap();
    let input = fixture.write(dir.path());
    let outcome = run(&input, on, layout).unwrap();
    (dir, input, outcome)
}

// ═══════════════════════════════════════════════════════════════════════════
// SUCCESSFUL RUNS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_run_classifies_and_counts() {
    let (_dir, _input, outcome) = run_sample(Fixture::default(), &Layout::default(), date(2024, 5, 1));
    let summary = &outcome.summary;

    assert_eq!(summary.stock_column, "U");
    assert_eq!(outcome.column.date_column, Some(13));
    assert_eq!(summary.boxed, 2);
    assert_eq!(summary.small, 3);
    assert_eq!(summary.skipped.excluded_keyword, 1);
    assert_eq!(summary.skipped.zero_stock_marker, 1);
    assert_eq!(summary.skipped.blank_row, 1);
    assert_eq!(summary.file_name, "在庫集計結果_20240501.xlsx");
    assert_eq!(summary.dropped_names, vec!["ProductList".to_string()]);
    assert_eq!(
        summary.message(),
        "✅ 在庫集計が完了しました。\n・箱もの：2件\n・こもの：3件（▢優先ソート済み）\n"
    );
}

#[test]
fn test_saved_workbook_holds_only_output_sheets() {
    let (dir, _input, outcome) = run_sample(Fixture::default(), &Layout::default(), date(2024, 5, 1));
    let layout = Layout::default();
    let out = dir.path().join(&outcome.summary.file_name);
    outcome.save(&layout, &out).unwrap();

    let workbook: Xlsx<_> = open_workbook(&out).unwrap();
    assert_eq!(
        workbook.sheet_names().to_vec(),
        vec![BOXED.to_string(), SMALL.to_string()]
    );
    assert!(workbook
        .defined_names()
        .iter()
        .all(|(name, _)| name.starts_with("_xlnm.")));

    assert_eq!(
        output_values(&out, BOXED),
        strings(&[("1001", "■りんご箱", "5"), ("1002", "■なし箱", "2")])
    );
    // ▢ first, then codes compared as text: "2001" < "99"
    assert_eq!(
        output_values(&out, SMALL),
        strings(&[("205", "▢もも", "0"), ("2001", "みかん", "3"), ("99", "かき", "7")])
    );
}

#[test]
fn test_saved_workbook_keeps_headers_and_print_area() {
    let (dir, _input, outcome) = run_sample(Fixture::default(), &Layout::default(), date(2024, 5, 1));
    let out = dir.path().join("out.xlsx");
    outcome.save(&Layout::default(), &out).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&out).unwrap();
    let range = workbook.worksheet_range(BOXED).unwrap();
    assert_eq!(range.get_value((0, 0)), Some(&Data::String(BOXED.to_string())));
    assert_eq!(range.get_value((1, 1)), Some(&Data::String("品名".to_string())));

    let xml = package_part(&out, "xl/workbook.xml");
    assert!(xml.contains("_xlnm.Print_Area"));
    assert!(xml.contains("$A$1:$D$4"), "boxed print area: {xml}");
    assert!(xml.contains("$A$1:$D$5"), "small print area: {xml}");
}

#[test]
fn test_saved_workbook_carries_data_formatting() {
    let (dir, _input, outcome) = run_sample(Fixture::default(), &Layout::default(), date(2024, 5, 1));
    let layout = Layout::default();
    let out = dir.path().join("out.xlsx");
    outcome.save(&layout, &out).unwrap();

    // Boxed sheet holds 2 rows (3..=4); 5 is the spare row, 6..=2000 hidden
    let sheet = package_part(&out, "xl/worksheets/sheet1.xml");
    assert_eq!(sheet.matches("hidden=\"1\"").count(), 1995);
    assert!(sheet.contains("<row r=\"6\" ") && sheet.contains("<row r=\"2000\" "));
    assert!(!sheet.contains("<row r=\"2001\" "));
    let row3 = sheet
        .split("<row r=\"3\" ")
        .nth(1)
        .and_then(|rest| rest.split('>').next())
        .unwrap();
    assert!(row3.contains("ht=\"30\""), "row 3: {row3}");

    let styles = package_part(&out, "xl/styles.xml");
    assert!(styles.contains("ＭＳ Ｐゴシック"));
    assert!(styles.contains("<sz val=\"26\"/>"));
    assert!(styles.contains("shrinkToFit=\"1\""));

    // Captured back as a template, the first data row shows the applied styles
    let mut source = SummaryWorkbook::open(&out).unwrap();
    let grid = source.grid(BOXED).unwrap();
    let captured = TemplatePackage::open(&out)
        .unwrap()
        .capture(BOXED, &grid, &layout)
        .unwrap();
    assert_eq!(captured.row_height, 30.0);
    assert_eq!(captured.last_row, 2000);
    for col in 1..=3 {
        let font = captured.style(col).font;
        assert_eq!(font.name.as_deref(), Some("ＭＳ Ｐゴシック"));
        assert_eq!(font.size, Some(26.0));
    }
    assert!(captured.style(2).alignment.shrink_to_fit);
    assert!(!captured.style(1).alignment.shrink_to_fit);
    let right = captured.style(4).border.right.unwrap();
    assert_eq!(right.style, "thin");
    assert_eq!(
        captured.style(1).border.right.map(|edge| edge.style),
        Some("thin".to_string())
    );
}

#[test]
fn test_stale_template_values_are_replaced() {
    let fixture = Fixture {
        rows: vec![(Num(1.0), Text("みそ"), Num(4.0))],
        ..Fixture::default()
    };
    let (dir, _input, outcome) = run_sample(fixture, &Layout::default(), date(2024, 5, 1));
    let out = dir.path().join("out.xlsx");
    outcome.save(&Layout::default(), &out).unwrap();

    assert_eq!(output_values(&out, BOXED), vec![]);
    assert_eq!(output_values(&out, SMALL), strings(&[("1", "みそ", "4")]));
}

#[test]
fn test_output_sheet_order_follows_source() {
    let fixture = Fixture {
        output_sheets: vec![SMALL, BOXED],
        ..Fixture::default()
    };
    let (dir, _input, outcome) = run_sample(fixture, &Layout::default(), date(2024, 5, 1));
    let bytes = outcome.to_bytes(&Layout::default()).unwrap();
    let out = dir.path().join("ordered.xlsx");
    std::fs::write(&out, bytes).unwrap();

    let workbook: Xlsx<_> = open_workbook(&out).unwrap();
    assert_eq!(
        workbook.sheet_names().to_vec(),
        vec![SMALL.to_string(), BOXED.to_string()]
    );
    assert_eq!(output_values(&out, BOXED).len(), 2);
    assert_eq!(output_values(&out, SMALL).len(), 3);
}

#[test]
fn test_weekly_layout_uses_weekday_column() {
    let fixture = Fixture {
        stock_col: WEEKDAY_STOCK_COL,
        ..Fixture::default()
    };
    // 2024-05-01 is a Wednesday -> column AB
    let (_dir, _input, outcome) = run_sample(fixture, &Layout::weekly(), date(2024, 5, 1));
    assert_eq!(outcome.summary.stock_column, "AB");
    assert_eq!(outcome.column.date_column, None);
    assert_eq!(outcome.summary.boxed, 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// ERROR CASES
// ═══════════════════════════════════════════════════════════════════════════

fn run_err(fixture: Fixture, layout: &Layout, on: NaiveDate) -> ZaikoError {
    let dir = TempDir::new().unwrap();
    let input = fixture.write(dir.path());
    run(&input, on, layout).unwrap_err()
}

#[test]
fn test_missing_summary_sheet() {
    let fixture = Fixture {
        summary_name: "Sheet1",
        ..Fixture::default()
    };
    let err = run_err(fixture, &Layout::default(), date(2024, 5, 1));
    assert!(matches!(err, ZaikoError::SheetNotFound(ref s) if s == SUMMARY));
    assert_eq!(err.to_string(), "シート『在庫集計表』が見つかりません。");
}

#[test]
fn test_date_not_in_header_row() {
    let err = run_err(Fixture::default(), &Layout::default(), date(2024, 6, 1));
    assert!(matches!(err, ZaikoError::DateNotFound { row: 5, .. }));
}

#[test]
fn test_stock_header_mismatch() {
    let fixture = Fixture {
        stock_header: "出荷",
        ..Fixture::default()
    };
    let err = run_err(fixture, &Layout::default(), date(2024, 5, 1));
    match err {
        ZaikoError::StockColumnMismatch { cell, found, .. } => {
            assert_eq!(cell, "U7");
            assert_eq!(found, "出荷");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_output_sheets() {
    let fixture = Fixture {
        output_sheets: vec![BOXED],
        ..Fixture::default()
    };
    let err = run_err(fixture, &Layout::default(), date(2024, 5, 1));
    assert!(matches!(err, ZaikoError::OutputSheetsNotFound { .. }));
}

#[test]
fn test_weekly_rejects_saturday() {
    let err = run_err(Fixture::default(), &Layout::weekly(), date(2024, 5, 4));
    assert!(matches!(err, ZaikoError::UnsupportedWeekday(_)));
    assert_eq!(err.to_string(), "土曜日は集計対象外です。");
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let result = run(&dir.path().join("none.xlsx"), date(2024, 5, 1), &Layout::default());
    assert!(result.is_err());
}
