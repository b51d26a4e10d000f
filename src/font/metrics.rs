//! Glyph metrics for the standard Helvetica faces, from the Adobe AFM files.
//!
//! Widths are in 1/1000 em for WinAnsi codes 32..=126. Oblique faces share
//! the widths of their upright counterparts.

/// Metrics for one standard font face.
#[derive(Debug)]
pub struct StandardFontMetrics {
    /// Advance widths for codes 32..=126.
    widths: &'static [u16; 95],
    /// Width used for characters outside the table with no known base letter.
    pub default_width: u16,
    pub ascender: i16,
    pub descender: i16,
    /// FontBBox yMin / yMax; the gap between them and ascender/descender is
    /// the face's built-in line gap.
    pub bbox_y_min: i16,
    pub bbox_y_max: i16,
}

impl StandardFontMetrics {
    /// Advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.units(ch) as f64 / 1000.0 * font_size
    }

    /// Width of a string in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }

    /// Distance between consecutive baselines, including the face's own
    /// line gap, in points.
    pub fn line_height(&self, font_size: f64) -> f64 {
        (self.bbox_y_max - self.bbox_y_min) as f64 / 1000.0 * font_size
    }

    /// Distance from the top of a line box to its baseline, in points.
    pub fn ascent(&self, font_size: f64) -> f64 {
        self.ascender as f64 / 1000.0 * font_size
    }

    fn units(&self, ch: char) -> u16 {
        let code = ch as u32;
        if (32..=126).contains(&code) {
            return self.widths[(code - 32) as usize];
        }
        match ch {
            '\u{00A0}' => self.widths[0],
            '\u{2022}' => 350,
            '\u{2013}' => 556,
            '\u{2014}' => 1000,
            '\u{2018}' | '\u{2019}' | '\u{201A}' => 222,
            '\u{201C}' | '\u{201D}' | '\u{201E}' => 333,
            '\u{2026}' => 1000,
            '\u{20AC}' => 556,
            '\u{00B0}' => 400,
            '\u{00A9}' | '\u{00AE}' => 737,
            _ => match latin1_base_letter(ch) {
                Some(base) => self.units(base),
                None => self.default_width,
            },
        }
    }
}

/// Accented Latin-1 letters take the width of their base letter in the
/// Helvetica family.
fn latin1_base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(base)
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    333, 333, 584, 584, 584, 611, 975,
    // A-Z
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    333, 278, 333, 584, 556, 333,
    // a-z
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    // { | } ~
    389, 280, 389, 584,
];

pub static HELVETICA: StandardFontMetrics = StandardFontMetrics {
    widths: &HELVETICA_WIDTHS,
    default_width: 556,
    ascender: 718,
    descender: -207,
    bbox_y_min: -225,
    bbox_y_max: 931,
};

pub static HELVETICA_OBLIQUE: StandardFontMetrics = StandardFontMetrics {
    widths: &HELVETICA_WIDTHS,
    default_width: 556,
    ascender: 718,
    descender: -207,
    bbox_y_min: -225,
    bbox_y_max: 931,
};

pub static HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
    widths: &HELVETICA_BOLD_WIDTHS,
    default_width: 611,
    ascender: 718,
    descender: -207,
    bbox_y_min: -228,
    bbox_y_max: 962,
};

pub static HELVETICA_BOLD_OBLIQUE: StandardFontMetrics = StandardFontMetrics {
    widths: &HELVETICA_BOLD_WIDTHS,
    default_width: 611,
    ascender: 718,
    descender: -207,
    bbox_y_min: -228,
    bbox_y_max: 962,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_width() {
        assert!((HELVETICA.char_width(' ', 12.0) - 3.336).abs() < 1e-9);
    }

    #[test]
    fn table_lookups_line_up() {
        assert_eq!(HELVETICA.units('A'), 667);
        assert_eq!(HELVETICA.units('W'), 944);
        assert_eq!(HELVETICA.units('i'), 222);
        assert_eq!(HELVETICA.units('~'), 584);
        assert_eq!(HELVETICA_BOLD.units('m'), 889);
        assert_eq!(HELVETICA_BOLD.units('z'), 500);
    }

    #[test]
    fn accented_letters_use_base_width() {
        assert_eq!(HELVETICA.units('Ã'), HELVETICA.units('A'));
        assert_eq!(HELVETICA_BOLD.units('é'), HELVETICA_BOLD.units('e'));
    }

    #[test]
    fn line_height_includes_face_gap() {
        assert!((HELVETICA.line_height(12.0) - 13.872).abs() < 1e-9);
        assert!((HELVETICA_BOLD.line_height(10.0) - 11.9).abs() < 1e-9);
    }
}
