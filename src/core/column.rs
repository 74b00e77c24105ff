//! Stock column resolution

use crate::config::ColumnSelection;
use crate::core::date::weekday_label;
use crate::error::{ZaikoError, ZaikoResult};
use crate::excel::Grid;
use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

/// The column the stock figures are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockColumn {
    /// 1-based column index
    pub index: u32,
    pub letter: String,
    /// Column where the target date was found (date-offset mode only)
    pub date_column: Option<u32>,
}

impl StockColumn {
    fn at(index: u32, date_column: Option<u32>) -> Self {
        Self {
            index,
            letter: column_letter(index),
            date_column,
        }
    }
}

/// Locate the stock column for `date`
pub fn resolve_stock_column(
    grid: &Grid,
    selection: &ColumnSelection,
    date: NaiveDate,
) -> ZaikoResult<StockColumn> {
    match selection {
        ColumnSelection::DateOffset {
            date_row,
            header_row,
            offset,
            marker,
        } => resolve_by_date(grid, date, *date_row, *header_row, *offset, marker),
        ColumnSelection::Weekday { columns } => resolve_by_weekday(columns, date),
    }
}

fn resolve_by_date(
    grid: &Grid,
    date: NaiveDate,
    date_row: u32,
    header_row: u32,
    offset: u32,
    marker: &str,
) -> ZaikoResult<StockColumn> {
    let date_col = (1..=grid.last_col())
        .find(|&col| grid.date(date_row, col) == Some(date))
        .ok_or_else(|| ZaikoError::DateNotFound {
            row: date_row,
            date: date.format("%Y-%m-%d").to_string(),
        })?;

    let stock_col = date_col + offset;
    let header = grid.text(header_row, stock_col);
    debug!(
        date_column = %column_letter(date_col),
        stock_column = %column_letter(stock_col),
        header = %header,
        "date matched"
    );

    if !header.contains(marker) {
        return Err(ZaikoError::StockColumnMismatch {
            date: date.format("%Y-%m-%d").to_string(),
            cell: format!("{}{}", column_letter(stock_col), header_row),
            found: header,
        });
    }

    Ok(StockColumn::at(stock_col, Some(date_col)))
}

fn resolve_by_weekday(columns: &[String], date: NaiveDate) -> ZaikoResult<StockColumn> {
    let weekday = date.weekday();
    let slot = match weekday {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => {
            return Err(ZaikoError::UnsupportedWeekday(
                weekday_label(weekday).to_string(),
            ))
        }
    };

    let letter = columns.get(slot).ok_or_else(|| {
        ZaikoError::Config(format!(
            "no column configured for {}",
            weekday_label(weekday)
        ))
    })?;
    let index = column_index(letter)?;
    debug!(weekday = weekday_label(weekday), column = %letter, "weekday column");
    Ok(StockColumn::at(index, None))
}

/// 1-based column index to letters: 1 → A, 27 → AA
pub fn column_letter(index: u32) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Column letters to a 1-based index: A → 1, AB → 28
pub fn column_index(letters: &str) -> ZaikoResult<u32> {
    let trimmed = letters.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ZaikoError::Config(format!(
            "invalid column letter '{letters}'"
        )));
    }
    Ok(trimmed
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .fold(0u32, |acc, c| acc * 26 + (c as u32 - 'A' as u32 + 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;
    use calamine::{Data, ExcelDateTime, ExcelDateTimeType};

    fn excel_date(serial: f64) -> Data {
        Data::DateTime(ExcelDateTime::new(
            serial,
            ExcelDateTimeType::DateTime,
            false,
        ))
    }

    /// Summary sheet with dates in row 5 starting at column `first_date_col`
    /// and `本残` headers eight columns to the right of each date.
    fn two_week_grid(first_date_col: usize, serials: &[f64], header: &str) -> Grid {
        let width = first_date_col + serials.len() + 10;
        let mut rows = vec![vec![Data::Empty; width]; 7];
        for (i, serial) in serials.iter().enumerate() {
            rows[4][first_date_col - 1 + i] = excel_date(*serial);
            rows[6][first_date_col - 1 + i + 8] = Data::String(header.to_string());
        }
        Grid::from_rows(rows)
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(38), "AL");
        assert_eq!(column_letter(703), "AAA");
        assert_eq!(column_letter(0), "");
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A").unwrap(), 1);
        assert_eq!(column_index("m").unwrap(), 13);
        assert_eq!(column_index("AB").unwrap(), 28);
        assert_eq!(column_index("AL").unwrap(), 38);
        assert!(column_index("").is_err());
        assert!(column_index("A1").is_err());
    }

    #[test]
    fn test_date_offset_finds_stock_column() {
        // 45413 = 2024-05-01, 45414 = 2024-05-02
        let grid = two_week_grid(12, &[45413.0, 45414.0], "前夜本残");
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let col = resolve_stock_column(&grid, &ColumnSelection::default(), date).unwrap();
        assert_eq!(col.date_column, Some(13));
        assert_eq!(col.index, 21);
        assert_eq!(col.letter, "U");
    }

    #[test]
    fn test_date_offset_ignores_time_of_day() {
        let grid = two_week_grid(3, &[45413.5], "本残");
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let col = resolve_stock_column(&grid, &ColumnSelection::default(), date).unwrap();
        assert_eq!(col.index, 11);
    }

    #[test]
    fn test_date_offset_missing_date() {
        let grid = two_week_grid(3, &[45413.0], "本残");
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let err = resolve_stock_column(&grid, &ColumnSelection::default(), date).unwrap_err();
        assert_eq!(
            err.to_string(),
            "在庫集計表の5行目に 2024-06-01 が見つかりません。"
        );
    }

    #[test]
    fn test_date_offset_header_guard() {
        let grid = two_week_grid(3, &[45413.0], "出荷");
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let err = resolve_stock_column(&grid, &ColumnSelection::default(), date).unwrap_err();
        match err {
            ZaikoError::StockColumnMismatch { cell, found, .. } => {
                assert_eq!(cell, "K7");
                assert_eq!(found, "出荷");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_weekday_columns() {
        let layout = Layout::weekly();
        let grid = Grid::from_rows(vec![]);
        // 2024-05-05 is a Sunday
        let cases = [(5, "M"), (6, "R"), (7, "W"), (8, "AB"), (9, "AG"), (10, "AL")];
        for (day, letter) in cases {
            let date = NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
            let col = resolve_stock_column(&grid, &layout.column, date).unwrap();
            assert_eq!(col.letter, letter, "day {day}");
            assert_eq!(col.date_column, None);
        }
    }

    #[test]
    fn test_weekday_rejects_saturday() {
        let layout = Layout::weekly();
        let grid = Grid::from_rows(vec![]);
        let date = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();
        let err = resolve_stock_column(&grid, &layout.column, date).unwrap_err();
        assert_eq!(err.to_string(), "土曜日は集計対象外です。");
    }
}
