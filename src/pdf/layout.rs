use pdf_writer::{Content, Name, Str};

use crate::fonts::{ASCENDER_RATIO, FontEntry, to_winansi_bytes};

pub(crate) struct WordChunk {
    pub(crate) text: String,
    /// x relative to the line start, at natural (unjustified) spacing.
    pub(crate) x_offset: f32,
    pub(crate) width: f32,
}

pub(crate) struct TextLine {
    pub(crate) chunks: Vec<WordChunk>,
    pub(crate) total_width: f32,
}

fn finish_line(chunks: &mut Vec<WordChunk>) -> TextLine {
    let total_width = chunks.last().map(|c| c.x_offset + c.width).unwrap_or(0.0);
    TextLine {
        chunks: std::mem::take(chunks),
        total_width,
    }
}

/// Greedy word wrap. Whitespace runs collapse to single spaces; a word is
/// never split, so a word wider than `max_width` occupies a line alone.
/// Empty (or whitespace-only) text yields no lines.
pub(crate) fn wrap_text(
    text: &str,
    font: &FontEntry,
    font_size: f32,
    max_width: f32,
) -> Vec<TextLine> {
    let space_w = font.space_width(font_size);
    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<WordChunk> = Vec::new();
    let mut current_x: f32 = 0.0;

    for word in text.split_whitespace() {
        let ww = font.text_width(word, font_size);
        let proposed_x = if current.is_empty() {
            0.0
        } else {
            current_x + space_w
        };

        if !current.is_empty() && proposed_x + ww > max_width {
            lines.push(finish_line(&mut current));
            current_x = 0.0;
        } else {
            current_x = proposed_x;
        }

        current.push(WordChunk {
            text: word.to_string(),
            x_offset: current_x,
            width: ww,
        });
        current_x += ww;
    }

    if !current.is_empty() {
        lines.push(finish_line(&mut current));
    }
    lines
}

/// Extra advance added to every inter-word gap of a justified line.
/// Zero for single-word lines.
pub(crate) fn justify_extra_per_gap(line: &TextLine, max_width: f32) -> f32 {
    if line.chunks.len() < 2 {
        return 0.0;
    }
    (max_width - line.total_width) / (line.chunks.len() - 1) as f32
}

/// Render pre-wrapped lines top-down from `top_y` and return the advanced
/// cursor (`top_y - lines * line_height`). With `justify`, every line except
/// the paragraph's last is stretched to `max_width`; last and single-word
/// lines keep natural spacing.
pub(crate) fn render_lines(
    content: &mut Content,
    lines: &[TextLine],
    font: &FontEntry,
    font_size: f32,
    justify: bool,
    x: f32,
    max_width: f32,
    top_y: f32,
    line_height: f32,
) -> f32 {
    if lines.is_empty() {
        return top_y;
    }

    let first_baseline = top_y - font_size * ASCENDER_RATIO;
    for (line_num, line) in lines.iter().enumerate() {
        let y = first_baseline - line_num as f32 * line_height;
        let is_justified = justify && line_num + 1 != lines.len() && line.chunks.len() > 1;
        let extra_per_gap = if is_justified {
            justify_extra_per_gap(line, max_width)
        } else {
            0.0
        };

        content.begin_text();
        content.set_font(Name(font.pdf_name.as_bytes()), font_size);
        let mut td_x = 0.0_f32;
        let mut td_y = 0.0_f32;
        for (chunk_idx, chunk) in line.chunks.iter().enumerate() {
            let cx = x + chunk.x_offset + chunk_idx as f32 * extra_per_gap;
            content.next_line(cx - td_x, y - td_y);
            td_x = cx;
            td_y = y;
            content.show(Str(&to_winansi_bytes(&chunk.text)));
        }
        content.end_text();
    }

    top_y - lines.len() as f32 * line_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_writer::{Pdf, Ref};

    use crate::fonts::FontSet;

    fn regular() -> FontEntry {
        let mut pdf = Pdf::new();
        let mut next = 1;
        let mut alloc = || {
            let r = Ref::new(next);
            next += 1;
            r
        };
        let set = FontSet::register(&mut pdf, &mut alloc);
        set.regular
    }

    #[test]
    fn wrapped_lines_stay_within_max_width() {
        let font = regular();
        let text = "The quick brown fox jumps over the lazy dog and keeps \
                    running until the margin forces a break somewhere sensible";
        let lines = wrap_text(text, &font, 10.5, 180.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.total_width <= 180.0 + 1e-3);
        }
    }

    #[test]
    fn rejoining_lines_reproduces_normalized_input() {
        let font = regular();
        let text = "  spaced\t\tout   text\nwith   odd\n\nwhitespace  ";
        let lines = wrap_text(text, &font, 10.5, 120.0);
        let rejoined: Vec<String> = lines
            .iter()
            .flat_map(|l| l.chunks.iter().map(|c| c.text.clone()))
            .collect();
        assert_eq!(rejoined.join(" "), "spaced out text with odd whitespace");
    }

    #[test]
    fn overwide_word_gets_its_own_line_unsplit() {
        let font = regular();
        let lines = wrap_text("a Pneumonoultramicroscopicsilicovolcanoconiosis b", &font, 10.5, 40.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].chunks.len(), 1);
        assert_eq!(lines[1].chunks[0].text, "Pneumonoultramicroscopicsilicovolcanoconiosis");
        assert!(lines[1].total_width > 40.0);
    }

    #[test]
    fn empty_text_produces_no_lines_and_no_advance() {
        let font = regular();
        assert!(wrap_text("", &font, 10.5, 200.0).is_empty());
        assert!(wrap_text("   \t\n ", &font, 10.5, 200.0).is_empty());

        let mut content = Content::new();
        let cursor = render_lines(&mut content, &[], &font, 10.5, true, 0.0, 200.0, 700.0, 14.0);
        assert_eq!(cursor, 700.0);
    }

    #[test]
    fn justified_line_fills_max_width_exactly() {
        let font = regular();
        let max_width = 200.0;
        let lines = wrap_text(
            "several words of varying width that will surely wrap across lines here",
            &font,
            10.5,
            max_width,
        );
        assert!(lines.len() >= 2);
        // Every non-last line stretched by the per-gap extra reaches max_width.
        for line in &lines[..lines.len() - 1] {
            let extra = justify_extra_per_gap(line, max_width);
            let last = line.chunks.last().unwrap();
            let stretched_end =
                last.x_offset + (line.chunks.len() - 1) as f32 * extra + last.width;
            assert!((stretched_end - max_width).abs() < 1e-3);
        }
    }

    #[test]
    fn single_word_line_gets_no_justification() {
        let font = regular();
        let lines = wrap_text("alone", &font, 10.5, 300.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(justify_extra_per_gap(&lines[0], 300.0), 0.0);
    }

    #[test]
    fn render_advances_cursor_by_line_count() {
        let font = regular();
        let lines = wrap_text(
            "enough words here to give us at least two wrapped lines of output",
            &font,
            10.5,
            150.0,
        );
        let n = lines.len() as f32;
        let mut content = Content::new();
        let cursor = render_lines(&mut content, &lines, &font, 10.5, true, 56.7, 150.0, 700.0, 14.5);
        assert!((cursor - (700.0 - n * 14.5)).abs() < 1e-3);
        // Text operators made it into the stream.
        let bytes = content.finish();
        assert!(bytes.windows(2).any(|w| w == b"BT"));
    }
}
