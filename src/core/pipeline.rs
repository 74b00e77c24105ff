//! End-to-end run: summary workbook in, two-sheet stock workbook out

use crate::config::Layout;
use crate::core::classify::classify;
use crate::core::column::{resolve_stock_column, StockColumn};
use crate::core::date::output_file_name;
use crate::error::{ZaikoError, ZaikoResult};
use crate::excel::{SheetJob, SheetTemplate, StockWorkbookWriter, SummaryWorkbook, TemplatePackage};
use crate::types::{Category, Classified, SkipCounts, StockRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Defined names Excel treats as macro content
fn is_macro_name(name: &str) -> bool {
    name.starts_with("_xleta.")
}

/// What a run produced, in a form the CLI can print or serialise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub date: NaiveDate,
    pub stock_column: String,
    pub boxed_sheet: String,
    pub small_sheet: String,
    pub boxed: usize,
    pub small: usize,
    pub skipped: SkipCounts,
    /// Defined names in the source that the output does not carry
    pub dropped_names: Vec<String>,
    pub file_name: String,
}

impl RunSummary {
    /// The completion message shown to the operator
    pub fn message(&self) -> String {
        format!(
            "✅ 在庫集計が完了しました。\n・箱もの：{}件\n・こもの：{}件（▢優先ソート済み）\n",
            self.boxed, self.small
        )
    }
}

/// A finished run before anything is written to disk
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub column: StockColumn,
    pub classified: Classified,
    pub templates: [SheetTemplate; 2],
}

impl RunOutcome {
    fn jobs(&self) -> [SheetJob<'_>; 2] {
        [
            SheetJob {
                template: &self.templates[0],
                records: self.records_for(0),
            },
            SheetJob {
                template: &self.templates[1],
                records: self.records_for(1),
            },
        ]
    }

    fn records_for(&self, index: usize) -> &[StockRecord] {
        let category = if self.templates[index].name.trim() == self.summary.boxed_sheet.trim() {
            Category::Boxed
        } else {
            Category::Small
        };
        self.classified.records(category)
    }

    /// Serialise the output workbook
    pub fn to_bytes(&self, layout: &Layout) -> ZaikoResult<Vec<u8>> {
        StockWorkbookWriter::new(layout).to_buffer(&self.jobs())
    }

    pub fn save(&self, layout: &Layout, path: &Path) -> ZaikoResult<()> {
        StockWorkbookWriter::new(layout).save(&self.jobs(), path)?;
        info!(path = %path.display(), "workbook saved");
        Ok(())
    }
}

/// Run every stage up to (not including) writing the output
pub fn run(input: &Path, date: NaiveDate, layout: &Layout) -> ZaikoResult<RunOutcome> {
    layout.validate()?;
    info!(input = %input.display(), %date, "starting run");

    let mut workbook = SummaryWorkbook::open(input)?;
    let grid = workbook.grid(&layout.input_sheet)?;

    let column = resolve_stock_column(&grid, &layout.column, date)?;
    info!(column = %column.letter, "stock column resolved");

    let classified = classify(&grid, layout, column.index)?;

    let boxed = workbook.grid_by_strip(&layout.boxed_sheet)?;
    let small = workbook.grid_by_strip(&layout.small_sheet)?;
    let (Some((boxed_name, boxed_grid)), Some((small_name, small_grid))) = (boxed, small) else {
        return Err(ZaikoError::OutputSheetsNotFound {
            boxed: layout.boxed_sheet.clone(),
            small: layout.small_sheet.clone(),
        });
    };

    let mut package = TemplatePackage::open(input)?;
    let boxed_template = package.capture(&boxed_name, &boxed_grid, layout)?;
    let small_template = package.capture(&small_name, &small_grid, layout)?;

    // Output sheets keep their order in the source workbook
    let names = workbook.sheet_names();
    let boxed_first = names.iter().position(|n| *n == boxed_name)
        <= names.iter().position(|n| *n == small_name);
    let templates = if boxed_first {
        [boxed_template, small_template]
    } else {
        [small_template, boxed_template]
    };

    let dropped_names: Vec<String> = workbook
        .defined_names()
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| !name.starts_with("_xlnm."))
        .collect();
    for name in dropped_names.iter().filter(|n| is_macro_name(n)) {
        warn!(name = %name, "macro defined name dropped");
    }

    let summary = RunSummary {
        date,
        stock_column: column.letter.clone(),
        boxed_sheet: boxed_name,
        small_sheet: small_name,
        boxed: classified.boxed.len(),
        small: classified.small.len(),
        skipped: classified.skipped.clone(),
        dropped_names,
        file_name: output_file_name(date),
    };

    Ok(RunOutcome {
        summary,
        column,
        classified,
        templates,
    })
}
