//! Row extraction, exclusion rules, bucketing and ordering

use crate::config::Layout;
use crate::core::column::column_index;
use crate::error::ZaikoResult;
use crate::excel::Grid;
use crate::types::{CellValue, Classified, SkipCounts, SkipReason, StockRecord};
use tracing::{debug, info};

/// Compiled form of the layout's matching rules
#[derive(Debug, Clone)]
pub struct Rules {
    code_col: u32,
    name_col: u32,
    first_row: u32,
    keywords: Vec<String>,
    zero_stock_marker: String,
    boxed_prefix: String,
    priority_prefix: String,
}

impl Rules {
    pub fn from_layout(layout: &Layout) -> ZaikoResult<Self> {
        Ok(Self {
            code_col: column_index(&layout.code_column)?,
            name_col: column_index(&layout.name_column)?,
            first_row: layout.header_row + 1,
            keywords: layout
                .exclusion_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            zero_stock_marker: layout.zero_stock_marker.clone(),
            boxed_prefix: layout.boxed_prefix.clone(),
            priority_prefix: layout.priority_prefix.clone(),
        })
    }

    /// Apply the per-row rules; `Ok` carries the record, `Err` the reason
    /// the row was dropped.
    fn admit(&self, grid: &Grid, row: u32, stock_col: u32) -> Result<StockRecord, SkipReason> {
        let code = grid.value(row, self.code_col);
        let name = grid.value(row, self.name_col);

        if code.is_blank() && name.is_blank() {
            return Err(SkipReason::BlankRow);
        }

        let Some(name) = name.as_text() else {
            return Err(SkipReason::NameNotText);
        };

        let lowered = name.to_lowercase();
        if self.keywords.iter().any(|k| lowered.contains(k.as_str())) {
            return Err(SkipReason::ExcludedKeyword);
        }

        let stock = match grid.value(row, stock_col) {
            CellValue::Empty => CellValue::Number(0.0),
            CellValue::Text(s) if s.is_empty() => CellValue::Number(0.0),
            v => v,
        };

        if !self.zero_stock_marker.is_empty()
            && name.contains(self.zero_stock_marker.as_str())
            && stock.is_zero()
        {
            return Err(SkipReason::ZeroStockMarker);
        }

        Ok(StockRecord::new(code, name, stock).with_source_row(row))
    }

    pub fn is_boxed(&self, record: &StockRecord) -> bool {
        record.name.starts_with(self.boxed_prefix.as_str())
    }

    /// Sort key for small items: priority-prefixed names first, then code
    /// compared as text.
    fn small_sort_key(&self, record: &StockRecord) -> (bool, String) {
        (
            !record.name.trim().starts_with(self.priority_prefix.as_str()),
            record.code.to_string(),
        )
    }
}

/// Scan the summary grid and split rows into boxed and small items
pub fn classify(grid: &Grid, layout: &Layout, stock_col: u32) -> ZaikoResult<Classified> {
    let rules = Rules::from_layout(layout)?;
    let mut skipped = SkipCounts::default();
    let mut boxed = Vec::new();
    let mut small = Vec::new();

    for row in rules.first_row..=grid.last_row() {
        match rules.admit(grid, row, stock_col) {
            Ok(record) if rules.is_boxed(&record) => boxed.push(record),
            Ok(record) => small.push(record),
            Err(reason) => {
                debug!(row, ?reason, "row skipped");
                skipped.record(reason);
            }
        }
    }

    small.sort_by_cached_key(|r| rules.small_sort_key(r));

    let boxed = compact(boxed, &mut skipped);
    let small = compact(small, &mut skipped);

    info!(
        boxed = boxed.len(),
        small = small.len(),
        skipped = skipped.total(),
        "classified summary rows"
    );

    Ok(Classified {
        boxed,
        small,
        skipped,
    })
}

/// Drop records whose code, name and stock are all blank (stock 0 counts
/// as blank)
fn compact(records: Vec<StockRecord>, skipped: &mut SkipCounts) -> Vec<StockRecord> {
    records
        .into_iter()
        .filter(|r| {
            let empty = r.code.is_blank()
                && r.name.trim().is_empty()
                && (r.stock.is_blank() || matches!(r.stock, CellValue::Number(n) if n == 0.0));
            if empty {
                skipped.record(SkipReason::Compacted);
            }
            !empty
        })
        .collect()
}
