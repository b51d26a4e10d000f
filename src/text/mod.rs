//! # Text Layout
//!
//! Line breaking and wrapped-height measurement.
//!
//! Lines are broken greedily at UAX#14 break opportunities using the
//! standard font widths from [`FontContext`]. A word wider than the whole
//! line is force-broken at the character that overflows.

use crate::font::FontContext;
use crate::style::FontName;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    /// The text as a string, trailing whitespace included.
    pub text: String,
    /// Width of the line, excluding trailing spaces.
    pub width: f64,
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Returns a vec of length `text.chars().count()`. Each entry is the break
/// opportunity *before* that character position. Index 0 is always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let byte_to_char: Vec<usize> = {
        let mut map = vec![0usize; text.len() + 1];
        for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
            map[byte_idx] = char_idx;
        }
        map[text.len()] = char_count;
        map
    };

    // linebreaks() yields the byte offset of the start of the next segment;
    // the final "break at end" entry is ignored.
    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

fn is_line_separator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextLayout;

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break a string into lines that fit within `max_width`.
    ///
    /// Empty input yields a single empty line so that every text node
    /// occupies at least one line box.
    pub fn break_into_lines(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        font: FontName,
        font_size: f64,
    ) -> Vec<BrokenLine> {
        if text.is_empty() {
            return vec![BrokenLine {
                text: String::new(),
                width: 0.0,
            }];
        }

        let chars: Vec<char> = text.chars().collect();
        let char_widths: Vec<f64> = chars
            .iter()
            .map(|&ch| {
                if is_line_separator(ch) {
                    0.0
                } else {
                    font_context.char_width(ch, font, font_size)
                }
            })
            .collect();
        let break_opps = compute_break_opportunities(text);

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break_point: Option<usize> = None;

        for (i, &ch) in chars.iter().enumerate() {
            let char_width = char_widths[i];

            if i > 0 {
                match break_opps[i] {
                    Some(BreakOpportunity::Mandatory) => {
                        let end = if is_line_separator(chars[i - 1]) { i - 1 } else { i };
                        lines.push(self.make_line(&chars[line_start..end], &char_widths[line_start..end]));
                        line_start = i;
                        line_width = 0.0;
                        last_break_point = None;
                    }
                    Some(BreakOpportunity::Allowed) => {
                        // The char before this position may end a line
                        last_break_point = Some(i - 1);
                    }
                    None => {}
                }
            }

            if is_line_separator(ch) {
                continue;
            }

            if line_width + char_width > max_width && line_start < i {
                if let Some(bp) = last_break_point.filter(|&bp| bp >= line_start) {
                    let break_at = bp + 1;
                    lines.push(self.make_line(&chars[line_start..break_at], &char_widths[line_start..break_at]));
                    line_start = break_at;
                    line_width = char_widths[line_start..=i].iter().sum();
                    last_break_point = None;
                    continue;
                }

                // No break opportunity on this line: force a break here
                lines.push(self.make_line(&chars[line_start..i], &char_widths[line_start..i]));
                line_start = i;
                line_width = char_width;
                last_break_point = None;
                continue;
            }

            line_width += char_width;
        }

        if line_start < chars.len() {
            let tail = &chars[line_start..];
            let end = if tail.last().copied().is_some_and(is_line_separator) {
                chars.len() - 1
            } else {
                chars.len()
            };
            lines.push(self.make_line(&chars[line_start..end], &char_widths[line_start..end]));
        }

        if lines.is_empty() {
            lines.push(BrokenLine {
                text: String::new(),
                width: 0.0,
            });
        }

        lines
    }

    /// Height of `text` wrapped to `max_width`: one line box per line, each
    /// followed by `line_gap`.
    pub fn measure_height(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        font: FontName,
        font_size: f64,
        line_gap: f64,
    ) -> f64 {
        let lines = self.break_into_lines(font_context, text, max_width, font, font_size);
        lines.len() as f64 * (font_context.line_height(font, font_size) + line_gap)
    }

    fn make_line(&self, chars: &[char], widths: &[f64]) -> BrokenLine {
        let mut width: f64 = widths.iter().sum();

        // Trailing spaces don't count toward alignment
        let mut i = chars.len();
        while i > 0 && chars[i - 1] == ' ' {
            i -= 1;
            width -= widths[i];
        }

        BrokenLine {
            text: chars.iter().filter(|c| !is_line_separator(**c)).collect(),
            width: width.max(0.0),
        }
    }
}
