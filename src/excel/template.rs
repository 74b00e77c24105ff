//! Template formatting capture - reads styles.xml and the output sheet
//! parts straight from the package, since calamine only exposes values.

use crate::config::Layout;
use crate::error::{ZaikoError, ZaikoResult};
use crate::excel::reader::Grid;
use crate::types::CellValue;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

//==============================================================================
// Style model
//==============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontSpec {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    /// 0xRRGGBB
    pub color: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BorderEdge {
    /// OOXML line style name (`thin`, `medium`, `double`, ...)
    pub style: String,
    pub color: Option<u32>,
}

impl BorderEdge {
    pub fn thin() -> Self {
        Self {
            style: "thin".to_string(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BorderSpec {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignmentSpec {
    pub horizontal: Option<String>,
    pub vertical: Option<String>,
    pub wrap_text: bool,
    pub shrink_to_fit: bool,
    pub indent: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumFormat {
    BuiltIn(u8),
    Custom(String),
}

/// The attributes copied from a template cell onto each written cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellStyle {
    pub font: FontSpec,
    pub border: BorderSpec,
    /// Solid fill colour (0xRRGGBB); pattern fills other than solid are dropped
    pub fill: Option<u32>,
    pub num_format: NumFormat,
    pub alignment: AlignmentSpec,
    pub locked: bool,
    pub hidden: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            border: BorderSpec::default(),
            fill: None,
            num_format: NumFormat::BuiltIn(0),
            alignment: AlignmentSpec::default(),
            locked: true,
            hidden: false,
        }
    }
}

//==============================================================================
// Sheet template
//==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub col: u32,
    pub value: CellValue,
    pub style: CellStyle,
}

/// A row above the template row, re-created as-is
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderRow {
    pub row: u32,
    pub height: Option<f64>,
    pub cells: Vec<HeaderCell>,
}

/// 1-based inclusive cell range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl CellRange {
    pub fn parse(reference: &str) -> Option<Self> {
        let (start, end) = reference.split_once(':').unwrap_or((reference, reference));
        let (first_row, first_col) = parse_cell_ref(start)?;
        let (last_row, last_col) = parse_cell_ref(end)?;
        Some(Self {
            first_row,
            first_col,
            last_row,
            last_col,
        })
    }

    pub fn is_single_cell(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }
}

/// 1-based inclusive column span with a width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWidth {
    pub first_col: u32,
    pub last_col: u32,
    pub width: f64,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageSetup {
    pub landscape: Option<bool>,
    pub paper_size: Option<u8>,
    pub scale: Option<u16>,
    pub fit_to_page: bool,
    pub fit_width: Option<u16>,
    pub fit_height: Option<u16>,
    pub center_horizontally: bool,
    /// left, right, top, bottom, header, footer (inches)
    pub margins: Option<[f64; 6]>,
}

/// What an output sheet looks like before any data is written
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTemplate {
    /// Name as stored in the workbook (may carry stray whitespace)
    pub name: String,
    pub header_rows: Vec<HeaderRow>,
    /// Template-row styles for columns A.. up to the print width
    pub row_styles: Vec<CellStyle>,
    pub row_height: f64,
    pub column_widths: Vec<ColumnWidth>,
    /// Merged ranges lying entirely above the template row
    pub merges: Vec<CellRange>,
    pub page_setup: PageSetup,
    /// Last row the sheet part mentions (1-based)
    pub last_row: u32,
}

impl SheetTemplate {
    /// Style of a template-row cell, 1-based column
    pub fn style(&self, col: u32) -> CellStyle {
        col.checked_sub(1)
            .and_then(|i| self.row_styles.get(i as usize))
            .cloned()
            .unwrap_or_default()
    }

    /// A template with no captured formatting, for sheets built from scratch
    pub fn bare(name: &str, layout: &Layout) -> Self {
        Self {
            name: name.to_string(),
            header_rows: Vec::new(),
            row_styles: vec![CellStyle::default(); layout.print_columns as usize],
            row_height: layout.fallback_row_height,
            column_widths: Vec::new(),
            merges: Vec::new(),
            page_setup: PageSetup::default(),
            last_row: 0,
        }
    }
}

//==============================================================================
// Package access
//==============================================================================

/// An opened template package with its resolved style table
pub struct TemplatePackage<R: Read + Seek> {
    archive: ZipArchive<R>,
    styles: Vec<CellStyle>,
    /// sheet name -> part path inside the package
    sheet_parts: HashMap<String, String>,
}

impl TemplatePackage<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> ZaikoResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> TemplatePackage<R> {
    pub fn from_reader(reader: R) -> ZaikoResult<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let rels = match read_part(&mut archive, "xl/_rels/workbook.xml.rels")? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };
        let workbook_xml = read_part(&mut archive, "xl/workbook.xml")?
            .ok_or_else(|| ZaikoError::Template("xl/workbook.xml is missing".to_string()))?;
        let sheet_parts = parse_sheet_parts(&workbook_xml, &rels)?;

        let styles = match read_part(&mut archive, "xl/styles.xml")? {
            Some(xml) => parse_styles(&xml)?,
            None => vec![CellStyle::default()],
        };
        debug!(
            sheets = sheet_parts.len(),
            styles = styles.len(),
            "template package opened"
        );

        Ok(Self {
            archive,
            styles,
            sheet_parts,
        })
    }

    pub fn styles(&self) -> &[CellStyle] {
        &self.styles
    }

    fn style(&self, xf: u32) -> CellStyle {
        self.styles.get(xf as usize).cloned().unwrap_or_default()
    }

    /// Capture the layout of `sheet`; `values` supplies the header values
    pub fn capture(
        &mut self,
        sheet: &str,
        values: &Grid,
        layout: &Layout,
    ) -> ZaikoResult<SheetTemplate> {
        let part = self
            .sheet_parts
            .get(sheet)
            .cloned()
            .ok_or_else(|| ZaikoError::Template(format!("no part for sheet '{sheet}'")))?;
        let xml = read_part(&mut self.archive, &part)?
            .ok_or_else(|| ZaikoError::Template(format!("{part} is missing")))?;
        let scan = scan_sheet(&xml)?;

        let template_row = layout.template_row;
        let row_styles = (1..=u32::from(layout.print_columns))
            .map(|col| {
                scan.cell_styles
                    .get(&(template_row, col))
                    .map(|xf| self.style(*xf))
                    .unwrap_or_default()
            })
            .collect();

        let row_height = scan
            .row_heights
            .get(&template_row)
            .copied()
            .unwrap_or(layout.fallback_row_height);

        let mut header_rows = Vec::new();
        for row in 1..template_row {
            let last_col = values
                .last_col()
                .max(scan.max_styled_col(row))
                .max(u32::from(layout.print_columns));
            let cells = (1..=last_col)
                .filter_map(|col| {
                    let value = values.value(row, col);
                    let xf = scan.cell_styles.get(&(row, col));
                    if value == CellValue::Empty && xf.is_none() {
                        return None;
                    }
                    Some(HeaderCell {
                        col,
                        value,
                        style: xf.map(|xf| self.style(*xf)).unwrap_or_default(),
                    })
                })
                .collect();
            header_rows.push(HeaderRow {
                row,
                height: scan.row_heights.get(&row).copied(),
                cells,
            });
        }

        let (merges, dropped): (Vec<_>, Vec<_>) = scan
            .merges
            .into_iter()
            .partition(|m| m.last_row < template_row);
        if !dropped.is_empty() {
            warn!(sheet, count = dropped.len(), "merged ranges in the data area are not carried");
        }

        Ok(SheetTemplate {
            name: sheet.to_string(),
            header_rows,
            row_styles,
            row_height,
            column_widths: scan.column_widths,
            merges,
            page_setup: scan.page_setup,
            last_row: scan.last_row,
        })
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> ZaikoResult<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

//==============================================================================
// XML helpers
//==============================================================================

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn attr_parse<T: std::str::FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Option<T> {
    attr(e, key).and_then(|v| v.parse().ok())
}

/// OOXML booleans: absent → `default`, `0`/`false` → false
fn attr_flag(e: &BytesStart<'_>, key: &[u8], default: bool) -> bool {
    match attr(e, key).as_deref() {
        None => default,
        Some("0") | Some("false") => false,
        Some(_) => true,
    }
}

/// `FFRRGGBB` or `RRGGBB` → 0xRRGGBB; theme and indexed colours give None
fn rgb_color(e: &BytesStart<'_>) -> Option<u32> {
    let hex = attr(e, b"rgb")?;
    let hex = hex.trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = if hex.len() == 8 { hex.get(2..)? } else { hex };
    u32::from_str_radix(rgb, 16).ok()
}

/// `B3` → (3, 2)
pub fn parse_cell_ref(reference: &str) -> Option<(u32, u32)> {
    let reference = reference.trim().replace('$', "");
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }
    let col = crate::core::column::column_index(letters).ok()?;
    let row = digits.parse().ok()?;
    Some((row, col))
}

fn parse_relationships(xml: &str) -> ZaikoResult<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rels = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attr(&e, b"Id"), attr(&e, b"Target")) {
                    let path = match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("xl/{target}"),
                    };
                    rels.insert(id, path);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rels)
}

fn parse_sheet_parts(
    xml: &str,
    rels: &HashMap<String, String>,
) -> ZaikoResult<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut parts = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let name = attr(&e, b"name");
                let target = attr(&e, b"id").and_then(|id| rels.get(&id).cloned());
                if let (Some(name), Some(target)) = (name, target) {
                    parts.insert(name, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(parts)
}

//==============================================================================
// styles.xml
//==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleSection {
    Other,
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellXfs,
}

#[derive(Debug, Default)]
struct RawXf {
    num_fmt_id: u32,
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    alignment: AlignmentSpec,
    locked: bool,
    hidden: bool,
}

/// Resolve every `cellXfs` entry into a [`CellStyle`], indexed by xf id
pub fn parse_styles(xml: &str) -> ZaikoResult<Vec<CellStyle>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut section = StyleSection::Other;
    let mut num_fmts: HashMap<u32, String> = HashMap::new();
    let mut fonts: Vec<FontSpec> = Vec::new();
    let mut fills: Vec<Option<u32>> = Vec::new();
    let mut borders: Vec<BorderSpec> = Vec::new();
    let mut xfs: Vec<RawXf> = Vec::new();

    let mut font: Option<FontSpec> = None;
    let mut fill_solid = false;
    let mut fill_color: Option<u32> = None;
    let mut border: Option<BorderSpec> = None;
    let mut edge: Option<(&'static str, BorderEdge)> = None;
    let mut xf: Option<RawXf> = None;

    loop {
        let event = reader.read_event()?;
        let (e, empty) = match &event {
            Event::Start(e) => (Some(e.clone()), false),
            Event::Empty(e) => (Some(e.clone()), true),
            Event::End(e) => {
                match e.local_name().as_ref() {
                    b"numFmts" | b"fonts" | b"fills" | b"borders" | b"cellXfs" => {
                        section = StyleSection::Other;
                    }
                    b"font" if section == StyleSection::Fonts => {
                        fonts.extend(font.take());
                    }
                    b"fill" if section == StyleSection::Fills => {
                        fills.push(if fill_solid { fill_color } else { None });
                    }
                    b"left" | b"right" | b"top" | b"bottom" => {
                        if let (Some(b), Some((side, e))) = (border.as_mut(), edge.take()) {
                            set_edge(b, side, e);
                        }
                    }
                    b"border" if section == StyleSection::Borders => {
                        borders.extend(border.take());
                    }
                    b"xf" if section == StyleSection::CellXfs => {
                        xfs.extend(xf.take());
                    }
                    _ => {}
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };
        let Some(e) = e else { continue };

        match (section, e.local_name().as_ref()) {
            (_, b"numFmts") => section = StyleSection::NumFmts,
            (_, b"fonts") => section = StyleSection::Fonts,
            (_, b"fills") => section = StyleSection::Fills,
            (_, b"borders") => section = StyleSection::Borders,
            (_, b"cellXfs") => section = StyleSection::CellXfs,
            (_, b"cellStyleXfs") | (_, b"dxfs") | (_, b"cellStyles") => {
                section = StyleSection::Other
            }

            (StyleSection::NumFmts, b"numFmt") => {
                if let (Some(id), Some(code)) =
                    (attr_parse::<u32>(&e, b"numFmtId"), attr(&e, b"formatCode"))
                {
                    num_fmts.insert(id, code);
                }
            }

            (StyleSection::Fonts, b"font") => {
                font = Some(FontSpec::default());
                if empty {
                    fonts.extend(font.take());
                }
            }
            (StyleSection::Fonts, tag) => {
                if let Some(f) = font.as_mut() {
                    match tag {
                        b"name" => f.name = attr(&e, b"val"),
                        b"sz" => f.size = attr_parse(&e, b"val"),
                        b"b" => f.bold = attr_flag(&e, b"val", true),
                        b"i" => f.italic = attr_flag(&e, b"val", true),
                        b"u" => f.underline = attr(&e, b"val").as_deref() != Some("none"),
                        b"strike" => f.strikethrough = attr_flag(&e, b"val", true),
                        b"color" => f.color = rgb_color(&e),
                        _ => {}
                    }
                }
            }

            (StyleSection::Fills, b"fill") => {
                fill_solid = false;
                fill_color = None;
                if empty {
                    fills.push(None);
                }
            }
            (StyleSection::Fills, b"patternFill") => {
                fill_solid = attr(&e, b"patternType").as_deref() == Some("solid");
            }
            (StyleSection::Fills, b"fgColor") => fill_color = rgb_color(&e),

            (StyleSection::Borders, b"border") => {
                border = Some(BorderSpec::default());
                if empty {
                    borders.extend(border.take());
                }
            }
            (StyleSection::Borders, side @ (b"left" | b"right" | b"top" | b"bottom")) => {
                let side: &'static str = match side {
                    b"left" => "left",
                    b"right" => "right",
                    b"top" => "top",
                    _ => "bottom",
                };
                let parsed = attr(&e, b"style")
                    .filter(|s| s != "none")
                    .map(|style| (side, BorderEdge { style, color: None }));
                if empty {
                    if let (Some(b), Some((side, e))) = (border.as_mut(), parsed) {
                        set_edge(b, side, e);
                    }
                } else {
                    edge = parsed;
                }
            }
            (StyleSection::Borders, b"color") => {
                if let Some((_, e2)) = edge.as_mut() {
                    e2.color = rgb_color(&e);
                }
            }

            (StyleSection::CellXfs, b"xf") => {
                let raw = RawXf {
                    num_fmt_id: attr_parse(&e, b"numFmtId").unwrap_or(0),
                    font_id: attr_parse(&e, b"fontId").unwrap_or(0),
                    fill_id: attr_parse(&e, b"fillId").unwrap_or(0),
                    border_id: attr_parse(&e, b"borderId").unwrap_or(0),
                    locked: true,
                    ..RawXf::default()
                };
                if empty {
                    xfs.push(raw);
                } else {
                    xf = Some(raw);
                }
            }
            (StyleSection::CellXfs, b"alignment") => {
                if let Some(x) = xf.as_mut() {
                    x.alignment = AlignmentSpec {
                        horizontal: attr(&e, b"horizontal"),
                        vertical: attr(&e, b"vertical"),
                        wrap_text: attr_flag(&e, b"wrapText", false),
                        shrink_to_fit: attr_flag(&e, b"shrinkToFit", false),
                        indent: attr_parse(&e, b"indent").unwrap_or(0),
                    };
                }
            }
            (StyleSection::CellXfs, b"protection") => {
                if let Some(x) = xf.as_mut() {
                    x.locked = attr_flag(&e, b"locked", true);
                    x.hidden = attr_flag(&e, b"hidden", false);
                }
            }
            _ => {}
        }
    }

    let styles: Vec<CellStyle> = xfs
        .into_iter()
        .map(|x| CellStyle {
            font: fonts.get(x.font_id).cloned().unwrap_or_default(),
            border: borders.get(x.border_id).cloned().unwrap_or_default(),
            fill: fills.get(x.fill_id).copied().flatten(),
            num_format: match num_fmts.get(&x.num_fmt_id) {
                Some(code) => NumFormat::Custom(code.clone()),
                None => NumFormat::BuiltIn(u8::try_from(x.num_fmt_id).unwrap_or(0)),
            },
            alignment: x.alignment,
            locked: x.locked,
            hidden: x.hidden,
        })
        .collect();

    if styles.is_empty() {
        return Ok(vec![CellStyle::default()]);
    }
    Ok(styles)
}

fn set_edge(border: &mut BorderSpec, side: &str, edge: BorderEdge) {
    match side {
        "left" => border.left = Some(edge),
        "right" => border.right = Some(edge),
        "top" => border.top = Some(edge),
        _ => border.bottom = Some(edge),
    }
}

//==============================================================================
// Sheet parts
//==============================================================================

#[derive(Debug, Default)]
struct SheetScan {
    /// (row, col) -> xf id
    cell_styles: HashMap<(u32, u32), u32>,
    /// row -> xf id for rows with `customFormat`
    row_defaults: HashMap<u32, u32>,
    row_heights: HashMap<u32, f64>,
    column_widths: Vec<ColumnWidth>,
    merges: Vec<CellRange>,
    page_setup: PageSetup,
    last_row: u32,
}

impl SheetScan {
    fn max_styled_col(&self, row: u32) -> u32 {
        self.cell_styles
            .keys()
            .filter(|(r, _)| *r == row)
            .map(|(_, c)| *c)
            .max()
            .unwrap_or(0)
    }
}

fn scan_sheet(xml: &str) -> ZaikoResult<SheetScan> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut scan = SheetScan::default();
    let mut current_row: u32 = 0;

    loop {
        let e = match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => e,
            Event::Eof => break,
            _ => continue,
        };

        match e.local_name().as_ref() {
            b"row" => {
                current_row = attr_parse(&e, b"r").unwrap_or(current_row + 1);
                scan.last_row = scan.last_row.max(current_row);
                if let Some(ht) = attr_parse::<f64>(&e, b"ht") {
                    scan.row_heights.insert(current_row, ht);
                }
                if attr_flag(&e, b"customFormat", false) {
                    if let Some(s) = attr_parse::<u32>(&e, b"s") {
                        scan.row_defaults.insert(current_row, s);
                    }
                }
            }
            b"c" => {
                let position = attr(&e, b"r").and_then(|r| parse_cell_ref(&r));
                if let (Some((row, col)), Some(s)) = (position, attr_parse::<u32>(&e, b"s")) {
                    scan.cell_styles.insert((row, col), s);
                }
            }
            b"col" => {
                if let (Some(first_col), Some(last_col), Some(width)) = (
                    attr_parse(&e, b"min"),
                    attr_parse(&e, b"max"),
                    attr_parse(&e, b"width"),
                ) {
                    scan.column_widths.push(ColumnWidth {
                        first_col,
                        last_col,
                        width,
                        hidden: attr_flag(&e, b"hidden", false),
                    });
                }
            }
            b"mergeCell" => {
                if let Some(range) = attr(&e, b"ref").and_then(|r| CellRange::parse(&r)) {
                    scan.merges.push(range);
                }
            }
            b"pageSetUpPr" => {
                scan.page_setup.fit_to_page = attr_flag(&e, b"fitToPage", false);
            }
            b"printOptions" => {
                scan.page_setup.center_horizontally =
                    attr_flag(&e, b"horizontalCentered", false);
            }
            b"pageMargins" => {
                let get = |key: &[u8]| attr_parse::<f64>(&e, key);
                if let (Some(l), Some(r), Some(t), Some(b), Some(h), Some(f)) = (
                    get(b"left"),
                    get(b"right"),
                    get(b"top"),
                    get(b"bottom"),
                    get(b"header"),
                    get(b"footer"),
                ) {
                    scan.page_setup.margins = Some([l, r, t, b, h, f]);
                }
            }
            b"pageSetup" => {
                let setup = &mut scan.page_setup;
                setup.landscape = attr(&e, b"orientation").map(|o| o == "landscape");
                setup.paper_size = attr_parse(&e, b"paperSize");
                setup.scale = attr_parse(&e, b"scale");
                setup.fit_width = attr_parse(&e, b"fitToWidth");
                setup.fit_height = attr_parse(&e, b"fitToHeight");
            }
            _ => {}
        }
    }

    // Row-level styles apply to the row's cells that have none of their own
    let row_defaults: Vec<(u32, u32)> = scan.row_defaults.iter().map(|(r, s)| (*r, *s)).collect();
    for (row, style) in row_defaults {
        let width = scan.max_styled_col(row).max(1);
        for col in 1..=width {
            scan.cell_styles.entry((row, col)).or_insert(style);
        }
    }

    Ok(scan)
}
