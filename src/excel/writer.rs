//! Stock sheet writer - re-creates the two output sheets with rust_xlsxwriter

use crate::config::Layout;
use crate::error::ZaikoResult;
use crate::excel::template::{BorderEdge, CellStyle, FontSpec, NumFormat, SheetTemplate};
use crate::types::{CellValue, StockRecord};
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatPattern, FormatUnderline, Workbook, Worksheet,
};
use std::path::Path;
use tracing::debug;

/// Excel's last row, 0-based
const MAX_ROW: u32 = 1_048_575;
/// Excel's last column, 1-based
const MAX_COL: u32 = 16_384;

/// One output sheet: its captured template plus the records to write
#[derive(Debug, Clone, Copy)]
pub struct SheetJob<'a> {
    pub template: &'a SheetTemplate,
    pub records: &'a [StockRecord],
}

/// Rows touched while writing one sheet, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetExtent {
    /// Last row holding a record (the template row minus one when empty)
    pub last_data_row: u32,
    pub print_last_row: u32,
    /// First hidden row; rows up to `hidden_until` are hidden
    pub hidden_from: u32,
    pub hidden_until: u32,
}

impl SheetExtent {
    pub fn compute(layout: &Layout, template: &SheetTemplate, count: usize) -> Self {
        let first = layout.template_row;
        let last_data_row = first - 1 + count as u32;
        Self {
            last_data_row,
            print_last_row: last_data_row.max(first),
            hidden_from: first + count as u32 + 1,
            hidden_until: template.last_row.max(layout.hide_until_row),
        }
    }
}

/// Builds the output workbook holding exactly the given sheets, in order
pub struct StockWorkbookWriter<'a> {
    layout: &'a Layout,
}

impl<'a> StockWorkbookWriter<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    pub fn build(&self, jobs: &[SheetJob<'_>]) -> ZaikoResult<Workbook> {
        let mut workbook = Workbook::new();
        for (index, job) in jobs.iter().enumerate() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&job.template.name)?;
            if index == 0 {
                worksheet.set_active(true);
            }
            self.write_sheet(worksheet, job)?;
        }
        Ok(workbook)
    }

    pub fn save(&self, jobs: &[SheetJob<'_>], path: &Path) -> ZaikoResult<()> {
        let mut workbook = self.build(jobs)?;
        workbook.save(path)?;
        Ok(())
    }

    pub fn to_buffer(&self, jobs: &[SheetJob<'_>]) -> ZaikoResult<Vec<u8>> {
        let mut workbook = self.build(jobs)?;
        Ok(workbook.save_to_buffer()?)
    }

    fn write_sheet(&self, worksheet: &mut Worksheet, job: &SheetJob<'_>) -> ZaikoResult<SheetExtent> {
        let layout = self.layout;
        let template = job.template;
        let extent = SheetExtent::compute(layout, template, job.records.len());

        apply_columns(worksheet, template)?;
        apply_page_setup(worksheet, template);
        self.write_header(worksheet, template)?;

        let value_formats: Vec<Format> = (1..=u32::from(layout.columns_written))
            .map(|col| to_format(&self.data_style(template, col)))
            .collect();
        let border_col = u32::from(layout.border_column);
        let border_format = to_format(&forced_right_border(&template.style(border_col)));

        for (i, record) in job.records.iter().enumerate() {
            let row = layout.template_row + i as u32;
            let row0 = row - 1;
            for (col0, (value, format)) in record.cells().iter().zip(&value_formats).enumerate() {
                write_value(worksheet, row0, col0 as u16, value, format)?;
            }
            if border_col > u32::from(layout.columns_written) {
                worksheet.write_blank(row0, (border_col - 1) as u16, &border_format)?;
            }
            worksheet.set_row_height(row0, template.row_height)?;
        }

        worksheet.set_print_area(
            0,
            0,
            extent.print_last_row - 1,
            layout.print_columns - 1,
        )?;

        let hidden_until = extent.hidden_until.min(MAX_ROW + 1);
        for row in extent.hidden_from..=hidden_until {
            worksheet.set_row_hidden(row - 1)?;
        }

        debug!(
            sheet = %template.name,
            rows = job.records.len(),
            print_last_row = extent.print_last_row,
            hidden_from = extent.hidden_from,
            hidden_until,
            "sheet written"
        );
        Ok(extent)
    }

    fn write_header(&self, worksheet: &mut Worksheet, template: &SheetTemplate) -> ZaikoResult<()> {
        for merge in &template.merges {
            if merge.is_single_cell() {
                continue;
            }
            let style = template
                .header_rows
                .iter()
                .find(|r| r.row == merge.first_row)
                .and_then(|r| r.cells.iter().find(|c| c.col == merge.first_col))
                .map(|c| c.style.clone())
                .unwrap_or_default();
            worksheet.merge_range(
                merge.first_row - 1,
                (merge.first_col - 1) as u16,
                merge.last_row - 1,
                (merge.last_col - 1) as u16,
                "",
                &to_format(&style),
            )?;
        }

        for header in &template.header_rows {
            let row0 = header.row - 1;
            if let Some(height) = header.height {
                worksheet.set_row_height(row0, height)?;
            }
            for cell in &header.cells {
                let col0 = (cell.col - 1) as u16;
                write_value(worksheet, row0, col0, &cell.value, &to_format(&cell.style))?;
            }
        }
        Ok(())
    }

    /// Template style of a value column with the data font swapped in;
    /// the name column (B) also shrinks to fit.
    fn data_style(&self, template: &SheetTemplate, col: u32) -> CellStyle {
        let mut style = template.style(col);
        style.font = FontSpec {
            name: Some(self.layout.data_font.name.clone()),
            size: Some(self.layout.data_font.size),
            ..Default::default()
        };
        if col == 2 {
            style.alignment.shrink_to_fit = true;
        }
        style
    }
}

fn forced_right_border(style: &CellStyle) -> CellStyle {
    let mut style = style.clone();
    style.border.right = Some(BorderEdge::thin());
    style
}

fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: &Format,
) -> ZaikoResult<()> {
    match value {
        CellValue::Empty => worksheet.write_blank(row, col, format)?,
        CellValue::Bool(b) => worksheet.write_boolean_with_format(row, col, *b, format)?,
        CellValue::Number(n) => worksheet.write_number_with_format(row, col, *n, format)?,
        CellValue::Text(s) => worksheet.write_string_with_format(row, col, s, format)?,
    };
    Ok(())
}

fn apply_columns(worksheet: &mut Worksheet, template: &SheetTemplate) -> ZaikoResult<()> {
    for span in &template.column_widths {
        let last = span.last_col.min(MAX_COL);
        for col in span.first_col.max(1)..=last {
            let col0 = (col - 1) as u16;
            worksheet.set_column_width(col0, stored_to_user_width(span.width))?;
            if span.hidden {
                worksheet.set_column_hidden(col0)?;
            }
        }
    }
    Ok(())
}

/// The package stores widths with cell padding included; rust_xlsxwriter
/// adds the padding itself.
fn stored_to_user_width(stored: f64) -> f64 {
    const PADDING: f64 = 5.0 / 7.0;
    if stored > 1.0 + PADDING {
        stored - PADDING
    } else {
        (stored / (1.0 + PADDING)).max(0.0)
    }
}

fn apply_page_setup(worksheet: &mut Worksheet, template: &SheetTemplate) {
    let setup = &template.page_setup;
    match setup.landscape {
        Some(true) => {
            worksheet.set_landscape();
        }
        Some(false) => {
            worksheet.set_portrait();
        }
        None => {}
    }
    if let Some(size) = setup.paper_size {
        worksheet.set_paper_size(size);
    }
    if setup.fit_to_page {
        worksheet.set_print_fit_to_pages(
            setup.fit_width.unwrap_or(1),
            setup.fit_height.unwrap_or(1),
        );
    } else if let Some(scale) = setup.scale {
        worksheet.set_print_scale(scale);
    }
    if setup.center_horizontally {
        worksheet.set_print_center_horizontally(true);
    }
    if let Some([left, right, top, bottom, header, footer]) = setup.margins {
        worksheet.set_margins(left, right, top, bottom, header, footer);
    }
}

//==============================================================================
// Style → Format
//==============================================================================

pub fn to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    let font = &style.font;
    if let Some(name) = &font.name {
        format = format.set_font_name(name);
    }
    if let Some(size) = font.size {
        format = format.set_font_size(size);
    }
    if font.bold {
        format = format.set_bold();
    }
    if font.italic {
        format = format.set_italic();
    }
    if font.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    if font.strikethrough {
        format = format.set_font_strikethrough();
    }
    if let Some(rgb) = font.color {
        format = format.set_font_color(Color::RGB(rgb));
    }

    if let Some(rgb) = style.fill {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(rgb));
    }

    let border = &style.border;
    if let Some(edge) = &border.left {
        format = format.set_border_left(border_line(&edge.style));
        if let Some(rgb) = edge.color {
            format = format.set_border_left_color(Color::RGB(rgb));
        }
    }
    if let Some(edge) = &border.right {
        format = format.set_border_right(border_line(&edge.style));
        if let Some(rgb) = edge.color {
            format = format.set_border_right_color(Color::RGB(rgb));
        }
    }
    if let Some(edge) = &border.top {
        format = format.set_border_top(border_line(&edge.style));
        if let Some(rgb) = edge.color {
            format = format.set_border_top_color(Color::RGB(rgb));
        }
    }
    if let Some(edge) = &border.bottom {
        format = format.set_border_bottom(border_line(&edge.style));
        if let Some(rgb) = edge.color {
            format = format.set_border_bottom_color(Color::RGB(rgb));
        }
    }

    format = match &style.num_format {
        NumFormat::BuiltIn(0) => format,
        NumFormat::BuiltIn(index) => format.set_num_format_index(*index),
        NumFormat::Custom(code) => format.set_num_format(code),
    };

    let align = &style.alignment;
    if let Some(h) = align.horizontal.as_deref().and_then(horizontal_align) {
        format = format.set_align(h);
    }
    if let Some(v) = align.vertical.as_deref().and_then(vertical_align) {
        format = format.set_align(v);
    }
    if align.wrap_text {
        format = format.set_text_wrap();
    }
    if align.shrink_to_fit {
        format = format.set_shrink();
    }
    if align.indent > 0 {
        format = format.set_indent(align.indent);
    }

    if !style.locked {
        format = format.set_unlocked();
    }
    if style.hidden {
        format = format.set_hidden();
    }

    format
}

fn border_line(style: &str) -> FormatBorder {
    match style {
        "thin" => FormatBorder::Thin,
        "medium" => FormatBorder::Medium,
        "dashed" => FormatBorder::Dashed,
        "dotted" => FormatBorder::Dotted,
        "thick" => FormatBorder::Thick,
        "double" => FormatBorder::Double,
        "hair" => FormatBorder::Hair,
        "mediumDashed" => FormatBorder::MediumDashed,
        "dashDot" => FormatBorder::DashDot,
        "mediumDashDot" => FormatBorder::MediumDashDot,
        "dashDotDot" => FormatBorder::DashDotDot,
        "mediumDashDotDot" => FormatBorder::MediumDashDotDot,
        "slantDashDot" => FormatBorder::SlantDashDot,
        _ => FormatBorder::None,
    }
}

fn horizontal_align(value: &str) -> Option<FormatAlign> {
    match value {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        "centerContinuous" => Some(FormatAlign::CenterAcross),
        "distributed" => Some(FormatAlign::Distributed),
        _ => None,
    }
}

fn vertical_align(value: &str) -> Option<FormatAlign> {
    match value {
        "top" => Some(FormatAlign::Top),
        "center" => Some(FormatAlign::VerticalCenter),
        "bottom" => Some(FormatAlign::Bottom),
        "justify" => Some(FormatAlign::VerticalJustify),
        "distributed" => Some(FormatAlign::VerticalDistributed),
        _ => None,
    }
}
