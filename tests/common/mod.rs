//! Summary workbook fixtures shared by the integration tests

#![allow(dead_code)]

use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::{Path, PathBuf};

pub const SUMMARY: &str = "在庫集計表";
pub const BOXED: &str = "在庫表（箱）";
pub const SMALL: &str = "在庫表（こもの）";

/// Column M (0-based 12) holds 2024-05-01, E holds 2024-04-30; the stock
/// column is U (20)
pub const DATE_COL: u16 = 12;
pub const STOCK_COL: u16 = 20;
/// Wednesday in the weekday table
pub const WEEKDAY_STOCK_COL: u16 = 27;

pub enum Cell {
    Blank,
    Num(f64),
    Text(&'static str),
}

pub use Cell::{Blank, Num, Text};

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) {
    match cell {
        Blank => {}
        Num(n) => {
            sheet.write_number(row, col, *n).unwrap();
        }
        Text(s) => {
            sheet.write_string(row, col, *s).unwrap();
        }
    }
}

pub fn sample_rows() -> Vec<(Cell, Cell, Cell)> {
    vec![
        (Num(1001.0), Text("■りんご箱"), Num(5.0)),
        (Num(2001.0), Text("みかん"), Num(3.0)),
        (Num(1500.0), Text("配達料"), Num(1.0)),
        (Num(3001.0), Text("東一 ねぎ"), Num(0.0)),
        (Num(205.0), Text("▢もも"), Blank),
        (Blank, Blank, Blank),
        (Num(1002.0), Text("■なし箱"), Num(2.0)),
        (Num(99.0), Text("かき"), Num(7.0)),
    ]
}

pub struct Fixture {
    pub rows: Vec<(Cell, Cell, Cell)>,
    pub stock_header: &'static str,
    pub stock_col: u16,
    pub output_sheets: Vec<&'static str>,
    pub summary_name: &'static str,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            rows: sample_rows(),
            stock_header: "本残",
            stock_col: STOCK_COL,
            output_sheets: vec![BOXED, SMALL],
            summary_name: SUMMARY,
        }
    }
}

impl Fixture {
    pub fn write(&self, dir: &Path) -> PathBuf {
        let path = dir.join("在庫.xlsx");
        let mut workbook = Workbook::new();

        let date_format = Format::new().set_num_format("yyyy/mm/dd");
        let summary = workbook.add_worksheet();
        summary.set_name(self.summary_name).unwrap();
        summary.write_string(0, 0, "在庫集計").unwrap();
        for (col, (m, d)) in [(4, (4, 30)), (DATE_COL, (5, 1))] {
            let dt = ExcelDateTime::from_ymd(2024, m, d).unwrap();
            summary
                .write_datetime_with_format(4, col, &dt, &date_format)
                .unwrap();
        }
        summary.write_string(6, 0, "コード").unwrap();
        summary.write_string(6, 1, "品名").unwrap();
        summary.write_string(6, STOCK_COL, self.stock_header).unwrap();
        for (i, (code, name, stock)) in self.rows.iter().enumerate() {
            let row = 7 + i as u32;
            write_cell(summary, row, 0, code);
            write_cell(summary, row, 1, name);
            write_cell(summary, row, self.stock_col, stock);
        }

        let title = Format::new().set_bold().set_align(FormatAlign::Center);
        let header = Format::new().set_bold().set_border(FormatBorder::Thin);
        let template = Format::new()
            .set_font_name("Meiryo")
            .set_font_size(12)
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::VerticalCenter);
        for name in &self.output_sheets {
            let sheet = workbook.add_worksheet();
            sheet.set_name(*name).unwrap();
            sheet.merge_range(0, 0, 0, 3, name.trim(), &title).unwrap();
            for (col, label) in ["コード", "品名", "在庫", "確認"].iter().enumerate() {
                sheet.write_string_with_format(1, col as u16, *label, &header).unwrap();
            }
            for col in [0u16, 2] {
                sheet.write_blank(2, col, &template).unwrap();
            }
            let check_column = template.clone().set_border_right(FormatBorder::Medium);
            sheet.write_blank(2, 3, &check_column).unwrap();
            sheet
                .write_string_with_format(2, 1, "旧データ", &template)
                .unwrap();
            sheet.set_row_height(2, 30).unwrap();
            sheet.set_column_width(1, 40).unwrap();
        }

        workbook
            .define_name("ProductList", &format!("='{}'!$A$8:$B$20", self.summary_name))
            .unwrap();
        workbook.save(&path).unwrap();
        path
    }
}
