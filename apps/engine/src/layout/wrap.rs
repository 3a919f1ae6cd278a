//! Greedy line wrapping.
//!
//! Every pagination decision is pre-computed (measure-then-place): a block's
//! height is estimated with [`wrapped_height`] before anything is drawn, and
//! the draw pass then calls [`wrap_lines`] with the same arguments. Because
//! both passes run the identical algorithm, the estimate is exact — never
//! approximate — which is what keeps page breaks correct.

use crate::layout::font_metrics::{measure_width, FontStyle};

/// Greedily packs whitespace-separated words into lines not exceeding
/// `max_width` points.
///
/// A word is added to the accumulating line; when the candidate's measured
/// width would meet or exceed `max_width`, the previous accumulated line is
/// committed (without the just-added word) and a new line starts with it.
/// A single word wider than `max_width` is placed on its own line without
/// being split.
///
/// Empty or whitespace-only input yields exactly one empty line, so an empty
/// field still reserves one `line_height` of vertical space in estimates.
pub fn wrap_lines(text: &str, max_width: f32, style: FontStyle, size: f32) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![String::new()];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in words {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if !current.is_empty() && measure_width(&candidate, style, size) >= max_width {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    lines.push(current);
    lines
}

/// Vertical space `text` occupies when wrapped at `max_width`:
/// line count × `line_height`. Never less than one `line_height`.
pub fn wrapped_height(
    text: &str,
    max_width: f32,
    style: FontStyle,
    size: f32,
    line_height: f32,
) -> f32 {
    wrap_lines(text, max_width, style, size).len() as f32 * line_height
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: f32 = 11.0;
    const LINE_HEIGHT: f32 = 15.5;

    #[test]
    fn test_short_text_is_one_line() {
        let lines = wrap_lines("Built X", 475.0, FontStyle::Regular, BODY);
        assert_eq!(lines, vec!["Built X"]);
    }

    #[test]
    fn test_empty_input_yields_one_empty_line() {
        assert_eq!(wrap_lines("", 475.0, FontStyle::Regular, BODY).len(), 1);
        assert_eq!(wrap_lines("   ", 475.0, FontStyle::Regular, BODY).len(), 1);
    }

    #[test]
    fn test_empty_field_height_floor() {
        // measure_height("", w) == line_height, never zero, for any w > 0
        for width in [1.0, 120.0, 475.0] {
            let h = wrapped_height("", width, FontStyle::Regular, BODY, LINE_HEIGHT);
            assert_eq!(h, LINE_HEIGHT);
        }
    }

    #[test]
    fn test_wrap_height_consistency() {
        // measure_height(s, w) == wrap(s, w).len() * line_height, exactly
        let samples = [
            "Built a real-time sentiment analysis engine processing 50k events per second",
            "Shipped Y",
            "a b c d e f g h i j k l m n o p q r s t u v w x y z",
        ];
        for s in samples {
            for width in [80.0, 200.0, 475.0] {
                let lines = wrap_lines(s, width, FontStyle::Regular, BODY);
                let height = wrapped_height(s, width, FontStyle::Regular, BODY, LINE_HEIGHT);
                assert_eq!(height, lines.len() as f32 * LINE_HEIGHT);
            }
        }
    }

    #[test]
    fn test_words_never_split_mid_word() {
        let text = "Led development of a distributed caching layer for production workloads";
        let lines = wrap_lines(text, 150.0, FontStyle::Regular, BODY);
        assert!(lines.len() > 1, "narrow width must force wrapping");
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, original, "every word survives intact and in order");
    }

    #[test]
    fn test_oversized_word_gets_its_own_line() {
        let lines = wrap_lines(
            "short supercalifragilisticexpialidocious end",
            40.0,
            FontStyle::Regular,
            BODY,
        );
        assert!(lines.contains(&"supercalifragilisticexpialidocious".to_string()));
        // no line holds a fragment of the long word
        assert!(lines.iter().all(|l| !l.contains('-')));
    }

    #[test]
    fn test_committed_lines_fit_within_width() {
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let width = 120.0;
        let lines = wrap_lines(text, width, FontStyle::Regular, BODY);
        // every committed line except a lone oversized word measures under max_width
        for line in &lines {
            if line.split_whitespace().count() > 1 {
                assert!(
                    measure_width(line, FontStyle::Regular, BODY) < width,
                    "line {line:?} exceeds the wrap width"
                );
            }
        }
    }
}
