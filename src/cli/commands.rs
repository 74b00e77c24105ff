use crate::config::{ColumnSelection, Layout};
use crate::core::{self, parse_target_date, today_in_japan, RunOutcome};
use crate::error::ZaikoResult;
use crate::types::StockRecord;
use chrono::NaiveDate;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Load the layout for a run: the YAML file when given, else the preset.
/// `--weekly` always swaps in the weekday column table.
pub fn load_layout(path: Option<&Path>, weekly: bool) -> ZaikoResult<Layout> {
    let mut layout = match path {
        Some(path) => Layout::from_file(path)?,
        None => Layout::default(),
    };
    if weekly {
        layout.column = Layout::weekly().column;
    }
    layout.validate()?;
    Ok(layout)
}

/// The collection date: the argument when given, else today in Japan
pub fn resolve_date(date: Option<&str>) -> ZaikoResult<NaiveDate> {
    match date {
        Some(text) => parse_target_date(text),
        None => Ok(today_in_japan()),
    }
}

/// Where the workbook goes: `--output` wins, then `--out-dir` joined with
/// the dated file name, then the dated file name in the current directory
pub fn output_path(output: Option<PathBuf>, out_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    match (output, out_dir) {
        (Some(path), _) => path,
        (None, Some(dir)) => dir.join(file_name),
        (None, None) => PathBuf::from(file_name),
    }
}

fn describe_column(layout: &Layout) -> &'static str {
    match layout.column {
        ColumnSelection::DateOffset { .. } => "date row + offset",
        ColumnSelection::Weekday { .. } => "weekday table",
    }
}

/// Execute the build command
#[allow(clippy::too_many_arguments)]
pub fn build(
    input: PathBuf,
    date: Option<String>,
    output: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    layout_file: Option<PathBuf>,
    weekly: bool,
    json: bool,
    verbose: bool,
) -> ZaikoResult<()> {
    let layout = load_layout(layout_file.as_deref(), weekly)?;
    let date = resolve_date(date.as_deref())?;

    if !json {
        println!("{}", "📦 Zaiko - 在庫集計".bold().green());
        println!("   Input: {}", input.display());
        println!("   Date:  {}", core::date::date_label(date));
        println!();
    }

    if verbose && !json {
        println!(
            "{}",
            format!("🔎 Resolving stock column ({})...", describe_column(&layout)).cyan()
        );
    }

    let outcome = core::run(&input, date, &layout)?;
    let path = output_path(output, out_dir, &outcome.summary.file_name);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    outcome.save(&layout, &path)?;

    if json {
        let report = serde_json::json!({
            "output": path.display().to_string(),
            "summary": &outcome.summary,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if verbose {
        print_details(&outcome);
    }

    print!("{}", outcome.summary.message().bold().green());
    println!("   File: {}", path.display().to_string().bright_blue());
    Ok(())
}

/// Execute the inspect command (no output is written)
pub fn inspect(
    input: PathBuf,
    date: Option<String>,
    layout_file: Option<PathBuf>,
    weekly: bool,
) -> ZaikoResult<()> {
    let layout = load_layout(layout_file.as_deref(), weekly)?;
    let date = resolve_date(date.as_deref())?;

    println!("{}", "🔍 Zaiko - Inspect".bold().green());
    println!("   Input: {}", input.display());
    println!("   Date:  {}", core::date::date_label(date));
    println!();

    let outcome = core::run(&input, date, &layout)?;
    print_details(&outcome);

    println!("{}", "📋 Records".bold());
    print_records(&outcome.summary.boxed_sheet, &outcome.classified.boxed);
    print_records(&outcome.summary.small_sheet, &outcome.classified.small);
    Ok(())
}

/// Execute the layout command
pub fn layout(layout_file: Option<PathBuf>, weekly: bool) -> ZaikoResult<()> {
    let layout = load_layout(layout_file.as_deref(), weekly)?;
    print!("{}", layout.to_yaml()?);
    Ok(())
}

fn print_details(outcome: &RunOutcome) {
    let summary = &outcome.summary;
    println!(
        "   Stock column: {}",
        summary.stock_column.bright_blue().bold()
    );
    if let Some(date_col) = outcome.column.date_column {
        println!(
            "   Date header:  {}",
            core::column_letter(date_col).bright_blue()
        );
    }

    let skipped = &summary.skipped;
    println!("   Skipped rows: {}", skipped.total());
    println!("      blank            {}", skipped.blank_row);
    println!("      name not text    {}", skipped.name_not_text);
    println!("      excluded keyword {}", skipped.excluded_keyword);
    println!("      zero stock       {}", skipped.zero_stock_marker);
    println!("      compacted        {}", skipped.compacted);

    if !summary.dropped_names.is_empty() {
        println!(
            "{}",
            format!(
                "⚠️  Defined names not carried: {}",
                summary.dropped_names.join(", ")
            )
            .yellow()
        );
    }
    println!();
}

fn print_records(sheet: &str, records: &[StockRecord]) {
    println!(
        "   📄 {} ({} rows)",
        sheet.trim().bright_blue().bold(),
        records.len()
    );
    for record in records {
        println!(
            "      {:>8}  {}  {}",
            record.code.to_string(),
            record.name,
            record.stock.to_string().bold()
        );
    }
    println!();
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
