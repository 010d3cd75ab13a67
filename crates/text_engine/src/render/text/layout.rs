//! Glyph placement math
//!
//! Pure layout helpers shared by the font provider: line measurement,
//! intrinsic glyph placement, block anchoring, and word wrapping. Glyph
//! metrics are supplied by the caller as an advance-lookup closure, so these
//! functions stay independent of any particular atlas.
//!
//! Layout coordinate system: origin at the top-left of the text block,
//! +X right, +Y down (screen convention). Glyph positions mark the top-left
//! of each glyph's line cell; bearing offsets are applied when quads are
//! emitted.

use super::align::TextAlign;
use crate::foundation::math::{Rect, Vec2};

/// Measure the width of each `\n`-separated line by summing glyph advances
pub fn line_widths(text: &str, advance_of: impl Fn(char) -> f32) -> Vec<f32> {
    text.split('\n')
        .map(|line| line.chars().map(&advance_of).sum())
        .collect()
}

/// Compute intrinsic glyph placements and the measured block size
///
/// Returns one position per `char` of `text` in order. Newlines are included
/// so that character index always equals position index; they carry the
/// end-of-line cursor and are never emitted as quads. Each line is offset
/// horizontally within the block according to the horizontal component of
/// `align`.
pub fn place_glyphs(
    text: &str,
    align: TextAlign,
    line_height: f32,
    advance_of: impl Fn(char) -> f32,
) -> (Vec<Vec2>, Vec2) {
    let widths = line_widths(text, &advance_of);
    let block_width = widths.iter().copied().fold(0.0f32, f32::max);
    let align_x = align.horizontal();

    let mut positions = Vec::with_capacity(text.len());
    let mut line = 0usize;
    let mut cursor_x = (block_width - widths[0]) * align_x;

    for ch in text.chars() {
        let line_top = line as f32 * line_height;
        positions.push(Vec2::new(cursor_x, line_top));

        if ch == '\n' {
            line += 1;
            cursor_x = (block_width - widths[line]) * align_x;
        } else {
            cursor_x += advance_of(ch);
        }
    }

    let measured = Vec2::new(block_width, widths.len() as f32 * line_height);
    (positions, measured)
}

/// Top-left origin of a measured block anchored inside `rect`
pub fn block_origin(rect: Rect, measured: Vec2, align: TextAlign) -> Vec2 {
    let (align_x, align_y) = align.to_normalized();

    Vec2::new(
        rect.x + (rect.width - measured.x) * align_x,
        rect.y + (rect.height - measured.y) * align_y,
    )
}

/// Word-wrap `text` so that no line measures wider than `max_width`
///
/// Greedy fill: words move to the next line when they would overflow, and a
/// single word wider than the limit is split hard at the overflowing glyph.
/// Existing newlines are respected; runs of spaces collapse to single
/// separators.
pub fn wrap_text(text: &str, max_width: f32, advance_of: impl Fn(char) -> f32) -> String {
    let space_width = advance_of(' ');
    let mut out = String::with_capacity(text.len());

    for (line_index, line) in text.split('\n').enumerate() {
        if line_index > 0 {
            out.push('\n');
        }

        let mut line_width = 0.0f32;
        let mut first_word = true;

        for word in line.split(' ').filter(|word| !word.is_empty()) {
            let word_width: f32 = word.chars().map(&advance_of).sum();

            if !first_word {
                if line_width + space_width + word_width > max_width {
                    out.push('\n');
                    line_width = 0.0;
                } else {
                    out.push(' ');
                    line_width += space_width;
                }
            }

            if word_width > max_width {
                // Hard-split a word that cannot fit on any line
                for ch in word.chars() {
                    let advance = advance_of(ch);
                    if line_width > 0.0 && line_width + advance > max_width {
                        out.push('\n');
                        line_width = 0.0;
                    }
                    out.push(ch);
                    line_width += advance;
                }
            } else {
                out.push_str(word);
                line_width += word_width;
            }

            first_word = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Fixed-advance metrics keep the expectations readable
    fn ten(_ch: char) -> f32 {
        10.0
    }

    #[test]
    fn test_line_widths_sum_advances() {
        let widths = line_widths("abc\nde", ten);

        assert_eq!(widths, vec![30.0, 20.0]);
    }

    #[test]
    fn test_place_glyphs_single_line() {
        let (positions, measured) = place_glyphs("abc", TextAlign::TopLeft, 12.0, ten);

        assert_eq!(positions.len(), 3);
        assert_eq!(positions[0], Vec2::new(0.0, 0.0));
        assert_eq!(positions[2], Vec2::new(20.0, 0.0));
        assert_eq!(measured, Vec2::new(30.0, 12.0));
    }

    #[test]
    fn test_place_glyphs_centers_short_line() {
        // Second line is 20 units narrower, so center alignment shifts it by 10
        let (positions, measured) = place_glyphs("abcd\nab", TextAlign::Center, 12.0, ten);

        assert_eq!(measured, Vec2::new(40.0, 24.0));
        // Newline glyph carries the end-of-line cursor on line 0
        assert_eq!(positions[4], Vec2::new(40.0, 0.0));
        assert_relative_eq!(positions[5].x, 10.0);
        assert_relative_eq!(positions[5].y, 12.0);
    }

    #[test]
    fn test_place_glyphs_index_matches_char_index() {
        let text = "a\nb\nc";
        let (positions, _) = place_glyphs(text, TextAlign::TopLeft, 10.0, ten);

        assert_eq!(positions.len(), text.chars().count());
        assert_eq!(positions[2], Vec2::new(0.0, 10.0));
        assert_eq!(positions[4], Vec2::new(0.0, 20.0));
    }

    #[test]
    fn test_block_origin_anchors() {
        let rect = Rect::new(100.0, 200.0, 50.0, 30.0);
        let measured = Vec2::new(30.0, 10.0);

        assert_eq!(
            block_origin(rect, measured, TextAlign::TopLeft),
            Vec2::new(100.0, 200.0)
        );
        assert_eq!(
            block_origin(rect, measured, TextAlign::Center),
            Vec2::new(110.0, 210.0)
        );
        assert_eq!(
            block_origin(rect, measured, TextAlign::BottomRight),
            Vec2::new(120.0, 220.0)
        );
    }

    #[test]
    fn test_wrap_breaks_at_space() {
        // "aaa bbb" at width 40: "aaa" (30) + space + "bbb" would measure 70
        let wrapped = wrap_text("aaa bbb", 40.0, ten);

        assert_eq!(wrapped, "aaa\nbbb");
    }

    #[test]
    fn test_wrap_keeps_fitting_words_together() {
        let wrapped = wrap_text("aa bb cc", 80.0, ten);

        assert_eq!(wrapped, "aa bb cc");
    }

    #[test]
    fn test_wrap_hard_splits_overwide_word() {
        let wrapped = wrap_text("aaaaaa", 30.0, ten);

        assert_eq!(wrapped, "aaa\naaa");
    }

    #[test]
    fn test_wrap_respects_existing_newlines() {
        let wrapped = wrap_text("aa\nbb cc", 40.0, ten);

        assert_eq!(wrapped, "aa\nbb\ncc");
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let once = wrap_text("one two three four", 80.0, ten);
        let twice = wrap_text(&once, 80.0, ten);

        assert_eq!(once, twice);
    }
}
