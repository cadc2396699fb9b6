use pdf_writer::{Content, Name, Str};

use crate::fonts::{FontSet, to_winansi_bytes};

const CELL_PADDING: f32 = 5.0;
const GRID_LINE_WIDTH: f32 = 0.75;
const TABLE_FONT_SIZE: f32 = 9.5;

/// Draw a bordered grid with per-cell text at a fixed row height and return
/// the y of the table's bottom edge. The first row renders bold as the
/// header. Cell values are pre-formatted short strings; no wrapping happens
/// here, the caller owns truncation and the column widths.
pub(crate) fn render_table(
    content: &mut Content,
    fonts: &FontSet,
    rows: &[Vec<String>],
    col_widths: &[f32],
    left_x: f32,
    top_y: f32,
    row_height: f32,
) -> f32 {
    let table_width: f32 = col_widths.iter().sum();
    let table_height = rows.len() as f32 * row_height;
    let bottom_y = top_y - table_height;

    log::debug!(
        "table: {} rows x {} cols at y={:.1}, bottom={:.1}",
        rows.len(),
        col_widths.len(),
        top_y,
        bottom_y,
    );

    for (ri, row) in rows.iter().enumerate() {
        let font = if ri == 0 { &fonts.bold } else { &fonts.regular };
        let row_top = top_y - ri as f32 * row_height;
        // Vertically center the text box in the row.
        let baseline = row_top - (row_height + TABLE_FONT_SIZE * 0.7) / 2.0;

        content.begin_text();
        content.set_font(Name(font.pdf_name.as_bytes()), TABLE_FONT_SIZE);
        let mut td_x = 0.0_f32;
        let mut td_y = 0.0_f32;
        let mut cell_x = left_x;
        for (ci, cell) in row.iter().enumerate() {
            let tx = cell_x + CELL_PADDING;
            content.next_line(tx - td_x, baseline - td_y);
            td_x = tx;
            td_y = baseline;
            content.show(Str(&to_winansi_bytes(cell)));
            cell_x += col_widths.get(ci).copied().unwrap_or(0.0);
        }
        content.end_text();
    }

    // Grid: internal dividers as one path, then the outer border rectangle.
    content.save_state();
    content.set_line_width(GRID_LINE_WIDTH);

    let mut x = left_x;
    for w in &col_widths[..col_widths.len().saturating_sub(1)] {
        x += w;
        content.move_to(x, top_y);
        content.line_to(x, bottom_y);
    }
    for ri in 1..rows.len() {
        let y = top_y - ri as f32 * row_height;
        content.move_to(left_x, y);
        content.line_to(left_x + table_width, y);
    }
    content.stroke();

    content.rect(left_x, bottom_y, table_width, table_height);
    content.stroke();
    content.restore_state();

    bottom_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_writer::{Pdf, Ref};

    fn fonts() -> FontSet {
        let mut pdf = Pdf::new();
        let mut next = 1;
        let mut alloc = || {
            let r = Ref::new(next);
            next += 1;
            r
        };
        FontSet::register(&mut pdf, &mut alloc)
    }

    fn count_ops(stream: &[u8], op: &[u8]) -> usize {
        // Operators are whitespace-delimited tokens in the content stream.
        stream
            .split(|&b| b == b' ' || b == b'\n')
            .filter(|tok| *tok == op)
            .count()
    }

    fn sample_rows(r: usize, c: usize) -> Vec<Vec<String>> {
        (0..r)
            .map(|ri| (0..c).map(|ci| format!("r{ri}c{ci}")).collect())
            .collect()
    }

    #[test]
    fn divider_and_border_counts() {
        let fonts = fonts();
        let mut content = Content::new();
        let rows = sample_rows(4, 6);
        render_table(&mut content, &fonts, &rows, &[60.0; 6], 56.7, 700.0, 22.0);
        let bytes = content.finish();
        // (C-1) vertical + (R-1) horizontal internal dividers, one `l` each.
        assert_eq!(count_ops(&bytes, b"l"), 5 + 3);
        // One enclosing border rectangle.
        assert_eq!(count_ops(&bytes, b"re"), 1);
    }

    #[test]
    fn two_column_table_has_single_divider() {
        let fonts = fonts();
        let mut content = Content::new();
        let rows = sample_rows(5, 2);
        render_table(&mut content, &fonts, &rows, &[180.0, 300.0], 56.7, 700.0, 22.0);
        let bytes = content.finish();
        assert_eq!(count_ops(&bytes, b"l"), 1 + 4);
    }

    #[test]
    fn returns_bottom_of_table() {
        let fonts = fonts();
        let mut content = Content::new();
        let rows = sample_rows(3, 2);
        let bottom = render_table(&mut content, &fonts, &rows, &[100.0, 100.0], 56.7, 500.0, 20.0);
        assert_eq!(bottom, 500.0 - 3.0 * 20.0);
    }

    #[test]
    fn header_row_uses_bold_font() {
        let fonts = fonts();
        let mut content = Content::new();
        let rows = sample_rows(2, 2);
        render_table(&mut content, &fonts, &rows, &[100.0, 100.0], 56.7, 500.0, 20.0);
        let bytes = content.finish();
        let text = String::from_utf8_lossy(&bytes);
        // Header sets F2 (bold), body rows F1.
        let f2 = text.find("/F2").expect("bold header font");
        let f1 = text.find("/F1").expect("regular body font");
        assert!(f2 < f1);
    }
}
