use serde::{Deserialize, Serialize};
use std::fmt;

//==============================================================================
// Cell values
//==============================================================================

/// A cell value as it is carried from the summary sheet to the stock sheets.
///
/// Only the shapes that survive the transfer are modelled: the source grid
/// is read with cached formula results, so formulas never appear here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// True for an empty cell or a cell holding only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Bool(_) | CellValue::Number(_) => false,
        }
    }

    /// True for numeric zero, `FALSE` or the literal text `"0"`
    pub fn is_zero(&self) -> bool {
        match self {
            CellValue::Bool(b) => !*b,
            CellValue::Number(n) => *n == 0.0,
            CellValue::Text(s) => s == "0",
            CellValue::Empty => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    /// Integral numbers print without a fractional part, so the product code
    /// `1001` sorts and displays as `1001` rather than `1001.0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

//==============================================================================
// Stock records
//==============================================================================

/// Which output sheet a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Names starting with the boxed prefix (`■`)
    Boxed,
    /// Everything else
    Small,
}

/// One product row carried to an output sheet: code (A), name (B), stock (C)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub code: CellValue,
    pub name: String,
    pub stock: CellValue,
    /// 1-based row in the summary sheet, kept for diagnostics
    pub source_row: u32,
}

impl StockRecord {
    pub fn new(code: CellValue, name: impl Into<String>, stock: CellValue) -> Self {
        Self {
            code,
            name: name.into(),
            stock,
            source_row: 0,
        }
    }

    pub fn with_source_row(mut self, row: u32) -> Self {
        self.source_row = row;
        self
    }

    /// Values in output column order A..C
    pub fn cells(&self) -> [CellValue; 3] {
        [
            self.code.clone(),
            CellValue::Text(self.name.clone()),
            self.stock.clone(),
        ]
    }
}

//==============================================================================
// Skip accounting
//==============================================================================

/// Why a summary-sheet row did not reach an output sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    BlankRow,
    NameNotText,
    ExcludedKeyword,
    ZeroStockMarker,
    Compacted,
}

/// Per-reason skip counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    pub blank_row: usize,
    pub name_not_text: usize,
    pub excluded_keyword: usize,
    pub zero_stock_marker: usize,
    pub compacted: usize,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::BlankRow => self.blank_row += 1,
            SkipReason::NameNotText => self.name_not_text += 1,
            SkipReason::ExcludedKeyword => self.excluded_keyword += 1,
            SkipReason::ZeroStockMarker => self.zero_stock_marker += 1,
            SkipReason::Compacted => self.compacted += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.blank_row
            + self.name_not_text
            + self.excluded_keyword
            + self.zero_stock_marker
            + self.compacted
    }
}

/// The two sorted record lists plus skip accounting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub boxed: Vec<StockRecord>,
    pub small: Vec<StockRecord>,
    pub skipped: SkipCounts,
}

impl Classified {
    pub fn records(&self, category: Category) -> &[StockRecord] {
        match category {
            Category::Boxed => &self.boxed,
            Category::Small => &self.small,
        }
    }
}
