//! Sheet layout: places every slip string into a fixed-width page grid.
//!
//! Geometry is computed in unscaled sheet pixels from the document text
//! alone, so the same document always lays out identically. Line wrapping
//! uses an estimated character width; the raster stage measures real glyph
//! advances only for alignment within the boxes chosen here.

use crate::rendering::{ReceiptDocument, Row, COLUMN_HEADERS};

/// Unscaled sheet width.
pub const SHEET_WIDTH: u32 = 760;

/// Padding between the outer frame and the content.
const PAGE_PADDING: u32 = 32;
/// Stroke width of the outer slip frame.
const FRAME_BORDER: u32 = 2;
/// Stroke width of the charge-table outline.
const TABLE_BORDER: u32 = 2;
/// Stroke width of interior cell borders.
const GRID_BORDER: u32 = 2;
const CELL_PADDING: u32 = 8;

/// Business-name point size.
pub const TITLE_SIZE: u32 = 20;
/// Point size of everything else.
pub const BODY_SIZE: u32 = 14;
const TITLE_LEADING: u32 = 28;
const BODY_LEADING: u32 = 20;

/// Width of each of the five numeric columns; the detail column takes the
/// remaining content width.
const METER_COL_WIDTH: u32 = 96;
/// Gap under the business name.
const HEADER_GAP: u32 = 4;
/// Gap above the table and above the footer notice.
const BLOCK_GAP: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A single line of text positioned on the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub rect: Rect,
    pub text: String,
    pub size: u32,
    pub align: Align,
    pub bold: bool,
}

/// The positioned slip: fills, strokes and text lines in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub width: u32,
    pub height: u32,
    /// Rects filled with the row shade before borders and text.
    pub shaded: Vec<Rect>,
    /// Rects stroked at the given width.
    pub borders: Vec<(Rect, u32)>,
    pub texts: Vec<TextBox>,
}

/// Thai combining marks take no horizontal advance.
fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{0e31}' | '\u{0e34}'..='\u{0e3a}' | '\u{0e47}'..='\u{0e4e}')
}

/// Estimated display width of `text` in characters, skipping marks that
/// stack on the previous glyph.
pub fn display_width(text: &str) -> usize {
    text.chars().filter(|&c| !is_zero_width(c)).count()
}

fn est_char_width(size: u32) -> u32 {
    (size * 4 / 7).max(4)
}

/// Greedy word wrap against an estimated line capacity. Words longer than a
/// line are kept whole and overflow their box, like the table cells they
/// model.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cur = String::new();
    let mut cur_width = 0usize;
    for word in text.split_whitespace() {
        let word_width = display_width(word);
        if cur_width + word_width + 1 > max_chars && !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
            cur_width = 0;
        }
        if !cur.is_empty() {
            cur.push(' ');
            cur_width += 1;
        }
        cur.push_str(word);
        cur_width += word_width;
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn cell_capacity(cell_width: u32) -> usize {
    let inner = cell_width.saturating_sub(CELL_PADDING * 2);
    (inner / est_char_width(BODY_SIZE)).max(1) as usize
}

struct SheetBuilder {
    shaded: Vec<Rect>,
    borders: Vec<(Rect, u32)>,
    texts: Vec<TextBox>,
}

impl SheetBuilder {
    fn text_line(&mut self, rect: Rect, text: &str, size: u32, align: Align, bold: bool) {
        self.texts.push(TextBox {
            rect,
            text: text.to_string(),
            size,
            align,
            bold,
        });
    }

    /// One bordered cell holding pre-wrapped lines.
    fn cell(&mut self, rect: Rect, lines: &[String], align: Align, bold: bool) {
        self.borders.push((rect, GRID_BORDER));
        for (i, line) in lines.iter().enumerate() {
            let line_rect = Rect {
                x: rect.x + CELL_PADDING as i32,
                y: rect.y + CELL_PADDING as i32 + (i as u32 * BODY_LEADING) as i32,
                width: rect.width.saturating_sub(CELL_PADDING * 2),
                height: BODY_LEADING,
            };
            self.text_line(line_rect, line, BODY_SIZE, align, bold);
        }
    }

    fn single_cell(&mut self, rect: Rect, text: &str, align: Align, bold: bool) {
        let lines = [text.to_string()];
        self.cell(rect, &lines, align, bold);
    }
}

/// Lays the document out on the sheet.
pub fn layout_document(doc: &ReceiptDocument) -> SheetLayout {
    let content_x = (PAGE_PADDING + FRAME_BORDER) as i32;
    let content_width = SHEET_WIDTH - 2 * (PAGE_PADDING + FRAME_BORDER);
    let detail_width = content_width - 5 * METER_COL_WIDTH;

    // Left edge of each column followed by the table's right edge.
    let mut edges = [0u32; 7];
    edges[1] = detail_width;
    for i in 2..7 {
        edges[i] = edges[i - 1] + METER_COL_WIDTH;
    }

    let mut b = SheetBuilder {
        shaded: Vec::new(),
        borders: Vec::new(),
        texts: Vec::new(),
    };
    let mut y = (PAGE_PADDING + FRAME_BORDER) as i32;

    b.text_line(
        Rect {
            x: content_x,
            y,
            width: content_width,
            height: TITLE_LEADING,
        },
        &doc.business_name,
        TITLE_SIZE,
        Align::Center,
        false,
    );
    y += (TITLE_LEADING + HEADER_GAP) as i32;

    let header_capacity = (content_width / est_char_width(BODY_SIZE)).max(1) as usize;
    for line in wrap_text(&doc.address_line, header_capacity) {
        b.text_line(
            Rect {
                x: content_x,
                y,
                width: content_width,
                height: BODY_LEADING,
            },
            &line,
            BODY_SIZE,
            Align::Center,
            false,
        );
        y += BODY_LEADING as i32;
    }

    b.text_line(
        Rect {
            x: content_x,
            y,
            width: content_width,
            height: BODY_LEADING,
        },
        &doc.date_line,
        BODY_SIZE,
        Align::Center,
        false,
    );
    y += (BODY_LEADING + BLOCK_GAP) as i32;

    let table_top = y;
    // Collapsed borders: every cell but the rightmost reaches one stroke
    // width under its right neighbour, so both stroke the same boundary
    // line and interior verticals stay GRID_BORDER wide.
    let column_rect = |col: usize, y: i32, height: u32| Rect {
        x: content_x + edges[col] as i32,
        y,
        width: edges[col + 1] - edges[col] + if col < 5 { GRID_BORDER } else { 0 },
        height,
    };
    let row_height = |lines: usize| (lines as u32 * BODY_LEADING + 2 * CELL_PADDING).max(1);

    // Header row, shaded cell by cell.
    let header_h = row_height(1);
    for (col, title) in COLUMN_HEADERS.iter().enumerate() {
        let rect = column_rect(col, y, header_h);
        b.shaded.push(rect);
        b.single_cell(rect, title, Align::Center, true);
    }
    // Each later row starts on the previous row's bottom border line, so
    // horizontal grid lines are shared the same way.
    y += (header_h - GRID_BORDER) as i32;

    for row in &doc.rows {
        match row {
            Row::Flat { label, amount } => {
                let lines = wrap_text(label, cell_capacity(detail_width));
                let h = row_height(lines.len());
                b.cell(column_rect(0, y, h), &lines, Align::Left, false);
                for col in 1..5 {
                    b.single_cell(column_rect(col, y, h), "-", Align::Center, false);
                }
                b.single_cell(column_rect(5, y, h), amount, Align::Right, false);
                y += (h - GRID_BORDER) as i32;
            }
            Row::Metered {
                label,
                start,
                end,
                units,
                unit_price,
                amount,
            } => {
                let h = row_height(1);
                b.single_cell(column_rect(0, y, h), label, Align::Left, false);
                b.single_cell(column_rect(1, y, h), start, Align::Center, false);
                b.single_cell(column_rect(2, y, h), end, Align::Center, false);
                b.single_cell(column_rect(3, y, h), units, Align::Center, false);
                b.single_cell(column_rect(4, y, h), unit_price, Align::Center, false);
                b.single_cell(column_rect(5, y, h), amount, Align::Right, false);
                y += (h - GRID_BORDER) as i32;
            }
            Row::Spanned { label, amount } => {
                let span_width = edges[5] + GRID_BORDER;
                let lines = wrap_text(label, cell_capacity(span_width));
                let h = row_height(lines.len());
                let span_rect = Rect {
                    x: content_x,
                    y,
                    width: span_width,
                    height: h,
                };
                b.cell(span_rect, &lines, Align::Left, false);
                b.single_cell(column_rect(5, y, h), amount, Align::Right, false);
                y += (h - GRID_BORDER) as i32;
            }
            Row::Total { label, amount } => {
                let h = row_height(1);
                b.shaded.push(Rect {
                    x: content_x,
                    y,
                    width: content_width,
                    height: h,
                });
                let span_rect = Rect {
                    x: content_x,
                    y,
                    width: edges[5] + GRID_BORDER,
                    height: h,
                };
                b.single_cell(span_rect, label, Align::Center, false);
                b.single_cell(column_rect(5, y, h), amount, Align::Right, false);
                y += (h - GRID_BORDER) as i32;
            }
        }
    }

    // The loop leaves y on the table's bottom border line.
    y += GRID_BORDER as i32;
    b.borders.push((
        Rect {
            x: content_x,
            y: table_top,
            width: content_width,
            height: (y - table_top) as u32,
        },
        TABLE_BORDER,
    ));

    y += BLOCK_GAP as i32;
    b.text_line(
        Rect {
            x: content_x,
            y,
            width: content_width,
            height: BODY_LEADING,
        },
        &doc.payment_notice,
        BODY_SIZE,
        Align::Center,
        false,
    );
    y += BODY_LEADING as i32;

    let height = y as u32 + PAGE_PADDING + FRAME_BORDER;
    b.borders.push((
        Rect {
            x: 0,
            y: 0,
            width: SHEET_WIDTH,
            height,
        },
        FRAME_BORDER,
    ));

    SheetLayout {
        width: SHEET_WIDTH,
        height,
        shaded: b.shaded,
        borders: b.borders,
        texts: b.texts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::ReceiptRecord;
    use crate::rendering::ReceiptDocument;
    use chrono::NaiveDate;

    fn sample_sheet() -> SheetLayout {
        let mut r = ReceiptRecord::new("101");
        r.room_rate = 3000.0;
        r.billing_date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        r.water_unit_start = 100;
        r.water_unit_end = 120;
        r.electric_unit_start = 50;
        r.electric_unit_end = 80;
        r.garbage_fee = 50.0;
        r.parking_spaces = 1;
        layout_document(&ReceiptDocument::from_record(&r))
    }

    #[test]
    fn display_width_skips_combining_marks() {
        assert_eq!(display_width("ค่าน้ำ"), 4);
        assert_eq!(display_width("abc"), 3);
    }

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap_text("hello world", 20), vec!["hello world"]);
    }

    #[test]
    fn wrap_splits_on_word_boundaries() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
    }

    #[test]
    fn wrap_of_empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn sheet_has_fixed_width_and_grows_down() {
        let sheet = sample_sheet();
        assert_eq!(sheet.width, SHEET_WIDTH);
        assert!(sheet.height > 400, "height was {}", sheet.height);
    }

    #[test]
    fn header_cells_and_total_row_are_shaded() {
        let sheet = sample_sheet();
        // Six header cells plus the one full-width total band.
        assert_eq!(sheet.shaded.len(), 7);
        let band = sheet.shaded.last().unwrap();
        assert_eq!(band.width, SHEET_WIDTH - 2 * 34);
    }

    #[test]
    fn sheet_frame_encloses_everything() {
        let sheet = sample_sheet();
        let (frame, stroke) = sheet.borders.last().unwrap();
        assert_eq!(*stroke, 2);
        assert_eq!(frame.x, 0);
        assert_eq!(frame.width, sheet.width);
        assert_eq!(frame.height, sheet.height);
        for text in &sheet.texts {
            assert!(text.rect.x >= 0 && (text.rect.x as u32) < sheet.width);
            assert!(text.rect.y >= 0 && (text.rect.y as u32) < sheet.height);
        }
    }

    #[test]
    fn table_rows_follow_document_order() {
        let sheet = sample_sheet();
        let y_of = |needle: &str| {
            sheet
                .texts
                .iter()
                .find(|t| t.text == needle)
                .unwrap_or_else(|| panic!("missing {needle}"))
                .rect
                .y
        };
        assert!(y_of("ค่าน้ำ") < y_of("ค่าไฟฟ้า"));
        assert!(y_of("ค่าไฟฟ้า") < y_of("ค่าขยะ"));
        assert!(y_of("ค่าขยะ") < y_of("รวมเป็นเงินทั้งหมด"));
    }

    #[test]
    fn flat_rows_dash_out_the_meter_columns() {
        let sheet = sample_sheet();
        let dashes = sheet.texts.iter().filter(|t| t.text == "-").count();
        // Only the room row dashes its four meter columns.
        assert_eq!(dashes, 4);
    }

    #[test]
    fn amounts_hug_the_right_column() {
        let sheet = sample_sheet();
        let total = sheet
            .texts
            .iter()
            .find(|t| t.text == "4,180")
            .expect("total amount");
        assert_eq!(total.align, Align::Right);
        assert_eq!(total.size, BODY_SIZE);
    }

    #[test]
    fn adjacent_cells_share_one_border_line() {
        let sheet = sample_sheet();
        // The first six borders are the header cells in column order.
        let header: Vec<Rect> = sheet.borders.iter().take(6).map(|(r, _)| *r).collect();
        for pair in header.windows(2) {
            let line = pair[0].x + pair[0].width as i32 - GRID_BORDER as i32;
            assert_eq!(pair[1].x, line);
        }
        // The first data row starts on the header row's bottom border line.
        let (first_cell, _) = sheet.borders[6];
        assert_eq!(first_cell.y, header[0].y + header[0].height as i32 - GRID_BORDER as i32);
        // The table outline ends on the total row's bottom edge.
        let (outline, _) = sheet.borders[sheet.borders.len() - 2];
        let (total_cell, _) = sheet.borders[sheet.borders.len() - 3];
        assert_eq!(outline.y + outline.height as i32, total_cell.y + total_cell.height as i32);
    }

    #[test]
    fn only_the_header_row_is_bold() {
        let sheet = sample_sheet();
        let header = sheet
            .texts
            .iter()
            .find(|t| t.text == "รายละเอียด")
            .expect("header cell");
        assert!(header.bold);
        let label = sheet
            .texts
            .iter()
            .find(|t| t.text == "ค่าน้ำ")
            .expect("water label");
        assert!(!label.bold);
    }
}
