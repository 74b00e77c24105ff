//! Summary workbook reader - values only, via calamine

use crate::error::{ZaikoError, ZaikoResult};
use crate::types::CellValue;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 1-based view over a worksheet's cached values
#[derive(Debug, Clone)]
pub struct Grid {
    range: Range<Data>,
}

impl Grid {
    pub fn new(range: Range<Data>) -> Self {
        Self { range }
    }

    /// Build a grid from rows of values starting at A1
    pub fn from_rows(rows: Vec<Vec<Data>>) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        if height == 0 || width == 0 {
            return Self::new(Range::empty());
        }

        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), value);
            }
        }
        Self::new(range)
    }

    /// Last used row (1-based), 0 for an empty sheet
    pub fn last_row(&self) -> u32 {
        self.range.end().map(|(r, _)| r + 1).unwrap_or(0)
    }

    /// Last used column (1-based), 0 for an empty sheet
    pub fn last_col(&self) -> u32 {
        self.range.end().map(|(_, c)| c + 1).unwrap_or(0)
    }

    pub fn raw(&self, row: u32, col: u32) -> Option<&Data> {
        if row == 0 || col == 0 {
            return None;
        }
        self.range.get_value((row - 1, col - 1))
    }

    pub fn value(&self, row: u32, col: u32) -> CellValue {
        self.raw(row, col).map(to_cell_value).unwrap_or_default()
    }

    /// The cell as a calendar date, if it holds one
    pub fn date(&self, row: u32, col: u32) -> Option<NaiveDate> {
        self.raw(row, col).and_then(to_date)
    }

    /// The cell rendered as text; empty cells give an empty string
    pub fn text(&self, row: u32, col: u32) -> String {
        self.value(row, col).to_string()
    }
}

/// Convert a calamine cell into the carried value
pub fn to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Date cells only; numbers that merely look like serials do not count
pub fn to_date(data: &Data) -> Option<NaiveDate> {
    match data {
        Data::DateTime(dt) if dt.is_datetime() => dt.as_datetime().map(|d| d.date()),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(|d| d.date())
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .ok(),
        _ => None,
    }
}

/// Find a sheet whose name matches after trimming surrounding whitespace
pub fn find_sheet_by_strip<'a>(names: &'a [String], target: &str) -> Option<&'a str> {
    let target = target.trim();
    names
        .iter()
        .find(|name| name.trim() == target)
        .map(String::as_str)
}

/// An opened summary workbook
pub struct SummaryWorkbook {
    path: PathBuf,
    workbook: Xlsx<BufReader<File>>,
}

impl SummaryWorkbook {
    pub fn open<P: AsRef<Path>>(path: P) -> ZaikoResult<Self> {
        let path = path.as_ref().to_path_buf();
        let workbook: Xlsx<_> = open_workbook(&path)?;
        debug!(path = %path.display(), sheets = ?workbook.sheet_names(), "opened workbook");
        Ok(Self { path, workbook })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// Exact-name lookup; the summary sheet name is not trimmed
    pub fn grid(&mut self, sheet: &str) -> ZaikoResult<Grid> {
        if !self.sheet_names().iter().any(|name| name == sheet) {
            return Err(ZaikoError::SheetNotFound(sheet.to_string()));
        }
        let range = self.workbook.worksheet_range(sheet)?;
        Ok(Grid::new(range))
    }

    /// Whitespace-tolerant lookup, returning the grid and the real sheet name
    pub fn grid_by_strip(&mut self, sheet: &str) -> ZaikoResult<Option<(String, Grid)>> {
        let names = self.sheet_names();
        let Some(real) = find_sheet_by_strip(&names, sheet) else {
            return Ok(None);
        };
        let real = real.to_string();
        let range = self.workbook.worksheet_range(&real)?;
        Ok(Some((real, Grid::new(range))))
    }

    pub fn defined_names(&self) -> Vec<(String, String)> {
        self.workbook.defined_names().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_find_sheet_by_strip() {
        let names = vec![
            "在庫集計表".to_string(),
            " 在庫表（箱） ".to_string(),
            "在庫表（こもの）".to_string(),
        ];
        assert_eq!(
            find_sheet_by_strip(&names, "在庫表（箱）"),
            Some(" 在庫表（箱） ")
        );
        assert_eq!(
            find_sheet_by_strip(&names, " 在庫表（こもの）"),
            Some("在庫表（こもの）")
        );
        assert_eq!(find_sheet_by_strip(&names, "集計"), None);
    }

    #[test]
    fn test_grid_is_one_based() {
        let grid = Grid::from_rows(vec![
            vec![Data::String("A1".to_string()), Data::Float(2.0)],
            vec![Data::Empty, Data::Int(7)],
        ]);
        assert_eq!(grid.last_row(), 2);
        assert_eq!(grid.last_col(), 2);
        assert_eq!(grid.value(1, 1), CellValue::Text("A1".to_string()));
        assert_eq!(grid.value(2, 2), CellValue::Number(7.0));
        assert_eq!(grid.value(2, 1), CellValue::Empty);
        assert_eq!(grid.value(0, 1), CellValue::Empty);
        assert_eq!(grid.value(9, 9), CellValue::Empty);
    }

    #[test]
    fn test_error_cells_keep_excel_text() {
        assert_eq!(
            to_cell_value(&Data::Error(CellErrorType::NA)),
            CellValue::Text("#N/A".to_string())
        );
        assert_eq!(
            to_cell_value(&Data::Error(CellErrorType::Div0)),
            CellValue::Text("#DIV/0!".to_string())
        );
    }

    #[test]
    fn test_bool_cells_stay_boolean() {
        assert_eq!(to_cell_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(to_cell_value(&Data::Bool(false)), CellValue::Bool(false));
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::from_rows(vec![]);
        assert_eq!(grid.last_row(), 0);
        assert_eq!(grid.last_col(), 0);
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(
            to_date(&Data::DateTimeIso("2024-05-01T00:00:00".to_string())),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(
            to_date(&Data::DateTimeIso("2024-05-01".to_string())),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(to_date(&Data::Float(45413.0)), None);
        assert_eq!(to_date(&Data::String("2024-05-01".to_string())), None);
    }
}
