//! Excel access for the stock sheets
//!
//! - `reader`: summary workbook values (calamine)
//! - `template`: output sheet formatting straight from the package
//! - `writer`: the rebuilt two-sheet workbook (rust_xlsxwriter)

pub mod reader;
pub mod template;
pub mod writer;

pub use reader::{find_sheet_by_strip, Grid, SummaryWorkbook};
pub use template::{CellStyle, SheetTemplate, TemplatePackage};
pub use writer::{SheetExtent, SheetJob, StockWorkbookWriter};
