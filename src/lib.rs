//! Zaiko - inventory stock sheet builder
//!
//! Reads the inventory summary sheet (`在庫集計表`), picks the stock column
//! for a collection date, drops excluded products, splits the rest into
//! boxed items and small items, and rebuilds the two stock sheets with the
//! template's formatting.
//!
//! # Example
//!
//! ```no_run
//! use zaiko::config::Layout;
//! use zaiko::core::{parse_target_date, run};
//! use std::path::Path;
//!
//! let layout = Layout::default();
//! let date = parse_target_date("2024-05-01")?;
//! let outcome = run(Path::new("在庫.xlsm"), date, &layout)?;
//!
//! println!("{}", outcome.summary.message());
//! outcome.save(&layout, Path::new(&outcome.summary.file_name))?;
//! # Ok::<(), zaiko::error::ZaikoError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;

// Re-export commonly used types
pub use config::Layout;
pub use error::{ZaikoError, ZaikoResult};
pub use types::{CellValue, Classified, StockRecord};
