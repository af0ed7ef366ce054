use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 13.0,
            font_weight: None,
        }
    }
}

impl TextStyle {
    pub fn sized(font_size: f64) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Character-cell measurer: every terminal column counts as a fixed fraction of the font size,
/// so wide (CJK) glyphs take two cells. Output depends on nothing but the input.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    pub fn normalized_text_lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let lines = Self::normalized_text_lines(text);
        let font_size = style.font_size.max(1.0);
        let max_cells = lines.iter().map(|l| l.width()).max().unwrap_or(0);

        TextMetrics {
            width: max_cells as f64 * font_size * char_width_factor,
            height: lines.len() as f64 * font_size * line_height_factor,
            line_count: lines.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widest_line_wins() {
        let m = DeterministicTextMeasurer::default();
        let metrics = m.measure("ab\nabcd", &TextStyle::sized(10.0));
        assert_eq!(metrics.line_count, 2);
        assert_eq!(metrics.width, 24.0);
        assert_eq!(metrics.height, 24.0);
    }

    #[test]
    fn wide_glyphs_take_two_cells() {
        let m = DeterministicTextMeasurer::default();
        let ascii = m.measure("ab", &TextStyle::sized(10.0));
        let cjk = m.measure("日本", &TextStyle::sized(10.0));
        assert_eq!(cjk.width, ascii.width * 2.0);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let m = DeterministicTextMeasurer::default();
        let metrics = m.measure("", &TextStyle::default());
        assert_eq!(metrics.width, 0.0);
        assert_eq!(metrics.line_count, 1);
    }
}
