//! Template layout configuration
//!
//! Every sheet name, row number and matching rule the pipeline relies on
//! lives here. [`Layout::default`] describes the two-week template;
//! [`Layout::weekly`] the older weekday template. A YAML file can override
//! any subset of fields:
//!
//! ```yaml
//! exclusion_keywords: [配達料, 運賃]
//! hide_until_row: 1500
//! column:
//!   date_offset:
//!     date_row: 5
//!     header_row: 7
//!     offset: 8
//!     marker: 本残
//! ```

use crate::error::{ZaikoError, ZaikoResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How the stock column is located in the summary sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSelection {
    /// Find the target date in `date_row`, step `offset` columns right, and
    /// require `marker` in that column's `header_row` cell.
    DateOffset {
        date_row: u32,
        header_row: u32,
        offset: u32,
        marker: String,
    },
    /// Fixed column letters for Sunday through Friday (Saturday is not
    /// collected).
    Weekday { columns: Vec<String> },
}

impl Default for ColumnSelection {
    fn default() -> Self {
        ColumnSelection::DateOffset {
            date_row: 5,
            header_row: 7,
            offset: 8,
            marker: "本残".to_string(),
        }
    }
}

/// Font of every written value cell; replaces the template row's font
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFont {
    pub name: String,
    pub size: f64,
}

impl Default for DataFont {
    fn default() -> Self {
        Self {
            name: "ＭＳ Ｐゴシック".to_string(),
            size: 26.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub input_sheet: String,
    pub boxed_sheet: String,
    pub small_sheet: String,

    #[serde(with = "serde_yaml::with::singleton_map")]
    pub column: ColumnSelection,

    /// Last header row of the summary sheet; data starts on the next row
    pub header_row: u32,
    pub code_column: String,
    pub name_column: String,

    /// Case-insensitive substrings that drop a row
    pub exclusion_keywords: Vec<String>,
    /// Rows whose name contains this marker are dropped when stock is zero
    pub zero_stock_marker: String,
    pub boxed_prefix: String,
    /// Small items with this prefix sort ahead of the rest
    pub priority_prefix: String,

    /// First data row of each output sheet; its formatting is the template
    pub template_row: u32,
    /// Used when the template row has no explicit height
    pub fallback_row_height: f64,
    pub data_font: DataFont,
    /// Rows after the data are hidden up to this row (or the sheet's last
    /// row when that is further down)
    pub hide_until_row: u32,
    /// Number of value columns written (A..C)
    pub columns_written: u16,
    /// Column whose right border is forced to thin on every data row
    pub border_column: u16,
    /// Print area width in columns (A..D)
    pub print_columns: u16,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            input_sheet: "在庫集計表".to_string(),
            boxed_sheet: "在庫表（箱）".to_string(),
            small_sheet: "在庫表（こもの）".to_string(),
            column: ColumnSelection::default(),
            header_row: 7,
            code_column: "A".to_string(),
            name_column: "B".to_string(),
            exclusion_keywords: [
                "配達料",
                "運賃",
                "カステラ",
                "十勝の息吹",
                "有機納豆",
                "ひきわり",
                "豆腐",
                "丸大豆",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            zero_stock_marker: "東一".to_string(),
            boxed_prefix: "■".to_string(),
            priority_prefix: "▢".to_string(),
            template_row: 3,
            fallback_row_height: 39.0,
            data_font: DataFont::default(),
            hide_until_row: 2000,
            columns_written: 3,
            border_column: 4,
            print_columns: 4,
        }
    }
}

impl Layout {
    /// Preset for the weekday template (Sunday=M ... Friday=AL)
    pub fn weekly() -> Self {
        Self {
            column: ColumnSelection::Weekday {
                columns: ["M", "R", "W", "AB", "AG", "AL"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            ..Self::default()
        }
    }

    /// Load a layout from YAML; missing fields take the preset's defaults
    pub fn from_file(path: &Path) -> ZaikoResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> ZaikoResult<Self> {
        let layout: Layout = serde_yaml::from_str(content)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_yaml(&self) -> ZaikoResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> ZaikoResult<()> {
        for (field, name) in [
            ("input_sheet", &self.input_sheet),
            ("boxed_sheet", &self.boxed_sheet),
            ("small_sheet", &self.small_sheet),
        ] {
            if name.trim().is_empty() {
                return Err(ZaikoError::Config(format!("{field} must not be empty")));
            }
        }

        if self.header_row == 0 || self.template_row == 0 {
            return Err(ZaikoError::Config(
                "header_row and template_row are 1-based".to_string(),
            ));
        }

        if self.columns_written == 0 || self.print_columns < self.columns_written {
            return Err(ZaikoError::Config(format!(
                "print_columns ({}) must cover columns_written ({})",
                self.print_columns, self.columns_written
            )));
        }

        if self.border_column == 0 || self.border_column > self.print_columns {
            return Err(ZaikoError::Config(format!(
                "border_column ({}) must lie within print_columns ({})",
                self.border_column, self.print_columns
            )));
        }

        match &self.column {
            ColumnSelection::DateOffset {
                date_row,
                header_row,
                ..
            } => {
                if *date_row == 0 || *header_row == 0 {
                    return Err(ZaikoError::Config(
                        "date_row and header_row are 1-based".to_string(),
                    ));
                }
            }
            ColumnSelection::Weekday { columns } => {
                if columns.len() != 6 {
                    return Err(ZaikoError::Config(format!(
                        "weekday columns need 6 entries (Sunday..Friday), got {}",
                        columns.len()
                    )));
                }
                for letter in columns {
                    crate::core::column::column_index(letter)?;
                }
            }
        }

        crate::core::column::column_index(&self.code_column)?;
        crate::core::column::column_index(&self.name_column)?;
        Ok(())
    }
}
