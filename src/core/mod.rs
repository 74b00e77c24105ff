//! Core pipeline: date → stock column → classified records → output

pub mod classify;
pub mod column;
pub mod date;
pub mod pipeline;

pub use classify::classify;
pub use column::{column_index, column_letter, resolve_stock_column, StockColumn};
pub use date::{output_file_name, parse_target_date, today_in_japan};
pub use pipeline::{run, RunOutcome, RunSummary};
