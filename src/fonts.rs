use pdf_writer::{Name, Pdf, Ref};

/// Helvetica ascender in em units / 1000. Used to place the first baseline of
/// a block below its top edge.
pub(crate) const ASCENDER_RATIO: f32 = 0.718;

/// A registered base-14 font: PDF resource name plus the 1000-unit advance
/// widths for WinAnsi bytes 32..=255.
pub(crate) struct FontEntry {
    pub(crate) pdf_name: &'static str,
    pub(crate) font_ref: Ref,
    widths_1000: Vec<f32>,
}

impl FontEntry {
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub(crate) fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub(crate) fn space_width(&self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }
}

/// The three variants the document uses. Registered once per build and shared
/// by every drawing operation.
pub(crate) struct FontSet {
    pub(crate) regular: FontEntry,
    pub(crate) bold: FontEntry,
    pub(crate) oblique: FontEntry,
}

impl FontSet {
    pub(crate) fn register(pdf: &mut Pdf, alloc: &mut impl FnMut() -> Ref) -> FontSet {
        let mut base14 = |base_font: &'static [u8], pdf_name, widths| {
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(base_font))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            FontEntry {
                pdf_name,
                font_ref,
                widths_1000: widths,
            }
        };
        FontSet {
            regular: base14(b"Helvetica", "F1", helvetica_widths()),
            bold: base14(b"Helvetica-Bold", "F2", helvetica_bold_widths()),
            // Oblique shares the regular advance widths.
            oblique: base14(b"Helvetica-Oblique", "F3", helvetica_widths()),
        }
    }

    pub(crate) fn resource_pairs(&self) -> [(&'static str, Ref); 3] {
        [
            (self.regular.pdf_name, self.regular.font_ref),
            (self.bold.pdf_name, self.bold.font_ref),
            (self.oblique.pdf_name, self.oblique.font_ref),
        ]
    }
}

/// Map a single Unicode char to its WinAnsi (Windows-1252) byte, or 0 if
/// unmappable. Text is sanitized through this mapping before measurement and
/// encoding, so both agree on which characters survive.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi bytes for PDF Str encoding, dropping
/// characters outside the encodable subset.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Adobe AFM advance widths for Helvetica at 1000 units/em, WinAnsi 32..=255.
fn helvetica_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,  // space
            33 => 278.0,  // !
            34 => 355.0,  // "
            35..=36 => 556.0,
            37 => 889.0,  // %
            38 => 667.0,  // &
            39 => 191.0,  // '
            40..=41 => 333.0,
            42 => 389.0,  // *
            43 => 584.0,  // +
            44 => 278.0,
            45 => 333.0,  // -
            46..=47 => 278.0,
            48..=57 => 556.0, // digits
            58..=59 => 278.0,
            60..=62 => 584.0,
            63 => 556.0,   // ?
            64 => 1015.0,  // @
            65..=66 => 667.0,
            67..=68 => 722.0,
            69 => 667.0,
            70 => 611.0,
            71 => 778.0,
            72 => 722.0,
            73 => 278.0,
            74 => 500.0,
            75 => 667.0,
            76 => 556.0,
            77 => 833.0,
            78 => 722.0,
            79 => 778.0,
            80 => 667.0,
            81 => 778.0,
            82 => 722.0,
            83 => 667.0,
            84 => 611.0,
            85 => 722.0,
            86 => 667.0,
            87 => 944.0,
            88..=89 => 667.0,
            90 => 611.0,
            91..=93 => 278.0,
            94 => 469.0,
            95 => 556.0,
            96 => 333.0,
            97..=98 => 556.0,
            99 => 500.0,
            100..=101 => 556.0,
            102 => 278.0,
            103..=104 => 556.0,
            105..=106 => 222.0,
            107 => 500.0,
            108 => 222.0,
            109 => 833.0,
            110..=113 => 556.0,
            114 => 333.0,
            115 => 500.0,
            116 => 278.0,
            117 => 556.0,
            118 => 500.0,
            119 => 722.0,
            120..=122 => 500.0,
            123 => 334.0,
            124 => 260.0,
            125 => 334.0,
            126 => 584.0,
            0x85 => 1000.0,        // ellipsis
            0x91..=0x92 => 222.0,  // curly single quotes
            0x93..=0x94 => 333.0,  // curly double quotes
            0x95 => 350.0,         // bullet
            0x96 => 556.0,         // en dash
            0x97 => 1000.0,        // em dash
            0x99 => 1000.0,        // trademark
            0xA0 => 278.0,         // nbsp
            0xA9 | 0xAE => 737.0,  // copyright, registered
            0xB0 => 400.0,         // degree
            _ => 556.0,
        })
        .collect()
}

/// Adobe AFM advance widths for Helvetica-Bold.
fn helvetica_bold_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,
            33 => 333.0,
            34 => 474.0,
            35..=36 => 556.0,
            37 => 889.0,
            38 => 722.0,
            39 => 238.0,
            40..=41 => 333.0,
            42 => 389.0,
            43 => 584.0,
            44 => 278.0,
            45 => 333.0,
            46..=47 => 278.0,
            48..=57 => 556.0,
            58..=59 => 333.0,
            60..=62 => 584.0,
            63 => 611.0,
            64 => 975.0,
            65..=68 => 722.0,
            69 => 667.0,
            70 => 611.0,
            71 => 778.0,
            72 => 722.0,
            73 => 278.0,
            74 => 556.0,
            75 => 722.0,
            76 => 611.0,
            77 => 833.0,
            78 => 722.0,
            79 => 778.0,
            80 => 667.0,
            81 => 778.0,
            82 => 722.0,
            83 => 667.0,
            84 => 611.0,
            85 => 722.0,
            86 => 667.0,
            87 => 944.0,
            88..=89 => 667.0,
            90 => 611.0,
            91 => 333.0,
            92 => 278.0,
            93 => 333.0,
            94 => 584.0,
            95 => 556.0,
            96 => 333.0,
            97 => 556.0,
            98 => 611.0,
            99 => 556.0,
            100 => 611.0,
            101 => 556.0,
            102 => 333.0,
            103..=104 => 611.0,
            105..=106 => 278.0,
            107 => 556.0,
            108 => 278.0,
            109 => 889.0,
            110..=113 => 611.0,
            114 => 389.0,
            115 => 556.0,
            116 => 333.0,
            117 => 611.0,
            118 => 556.0,
            119 => 778.0,
            120..=121 => 556.0,
            122 => 500.0,
            123 => 389.0,
            124 => 280.0,
            125 => 389.0,
            126 => 584.0,
            0x85 => 1000.0,
            0x91..=0x92 => 278.0,
            0x93..=0x94 => 500.0,
            0x95 => 350.0,
            0x96 => 556.0,
            0x97 => 1000.0,
            0x99 => 1000.0,
            0xA0 => 278.0,
            0xA9 | 0xAE => 737.0,
            0xB0 => 400.0,
            _ => 556.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> FontEntry {
        FontEntry {
            pdf_name: "F1",
            font_ref: Ref::new(1),
            widths_1000: helvetica_widths(),
        }
    }

    #[test]
    fn winansi_sanitizes_unencodable_chars() {
        assert_eq!(to_winansi_bytes("abc"), b"abc");
        // Typographic punctuation maps into the 0x80-0x9F window.
        assert_eq!(to_winansi_bytes("\u{2022} \u{2013}"), vec![0x95, 0x20, 0x96]);
        // CJK and emoji are dropped, not replaced.
        assert_eq!(to_winansi_bytes("a\u{4E2D}b"), b"ab");
    }

    #[test]
    fn measurement_matches_encoding_subset() {
        let f = entry();
        // A dropped char must contribute zero width so layout and rendering agree.
        assert_eq!(
            f.text_width("a\u{4E2D}b", 10.0),
            f.text_width("ab", 10.0)
        );
    }

    #[test]
    fn known_advance_widths() {
        let f = entry();
        assert_eq!(f.char_width_1000(' '), 278.0);
        assert_eq!(f.char_width_1000('W'), 944.0);
        assert_eq!(f.char_width_1000('i'), 222.0);
        assert_eq!(f.char_width_1000('0'), 556.0);
        let bold = FontEntry {
            pdf_name: "F2",
            font_ref: Ref::new(2),
            widths_1000: helvetica_bold_widths(),
        };
        assert_eq!(bold.char_width_1000('i'), 278.0);
    }

    #[test]
    fn text_width_scales_with_font_size() {
        let f = entry();
        let w10 = f.text_width("Return", 10.0);
        let w20 = f.text_width("Return", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-4);
    }
}
