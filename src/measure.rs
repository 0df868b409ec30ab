//! Text measurement.
//!
//! The popover only needs one thing from text layout: the extent of a message
//! wrapped at a maximum width. Hosts plug in their own [`TextMeasurer`];
//! [`ProportionalMeasurer`] is a font-agnostic approximation used by the SVG
//! renderer and the demo.

use crate::config::Font;
use crate::types::Size;

/// Measures a text block wrapped at `max_width`.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &Font, max_width: f64) -> Size;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font: &Font, max_width: f64) -> Size {
        (**self).measure(text, font, max_width)
    }
}

/// Size of a message inside a popover of `preferred_width`.
///
/// Empty text is `Size::ZERO` without consulting the measurer. Otherwise the
/// text wraps inside the margins and both sides round up to whole points.
pub fn message_size<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font: &Font,
    preferred_width: f64,
    text_margin: f64,
) -> Size {
    if text.is_empty() {
        return Size::ZERO;
    }
    measurer.measure(text, font, preferred_width - text_margin * 2.0).ceil()
}

/// Proportional character advances for printable ASCII, in hundredths of a
/// character cell.
#[rustfmt::skip]
const ADVANCES: [u8; 95] = [
    45,  55,  62, 115,  90, 132, 125,  40,
    55,  55,  71, 115,  45,  48,  45,  50,
    91,  91,  91,  91,  91,  91,  91,  91,
    91,  91,  50,  50, 120, 120, 120,  78,
   142, 102, 105, 110, 115, 105,  98, 105,
   125,  58,  58, 107,  95, 145, 125, 115,
    95, 115, 107,  95,  97, 118, 102, 150,
   100,  93, 100,  58,  50,  58, 119,  72,
    72,  86,  92,  80,  92,  85,  52,  92,
    92,  47,  47,  88,  48, 135,  92,  86,
    92,  92,  69,  75,  58,  92,  80, 121,
    81,  80,  76,  91,  49,  91, 118,
];

/// Width of one character cell relative to the font size.
const CELL_EM: f64 = 4.0 / 7.0;
const LINE_HEIGHT_EM: f64 = 1.2;
const EPSILON: f64 = 1e-9;

fn advance_units(c: char) -> u32 {
    if (' '..='~').contains(&c) {
        u32::from(ADVANCES[(c as usize) - 0x20])
    } else {
        100
    }
}

/// Approximate measurer using a fixed proportional advance table and greedy
/// word wrapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalMeasurer;

#[derive(Default)]
struct Line {
    text: String,
    width: f64,
}

impl ProportionalMeasurer {
    pub fn new() -> Self {
        Self
    }

    fn advance(&self, c: char, font: &Font) -> f64 {
        f64::from(advance_units(c)) * 0.01 * font.size * CELL_EM
    }

    /// Unwrapped width of `text`.
    pub fn text_width(&self, text: &str, font: &Font) -> f64 {
        let units: u32 = text.chars().map(advance_units).sum();
        f64::from(units) * 0.01 * font.size * CELL_EM
    }

    pub fn line_height(&self, font: &Font) -> f64 {
        font.size * LINE_HEIGHT_EM
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// Explicit newlines always break. Runs of whitespace collapse to one
    /// space. A word wider than `max_width` is split between characters, with
    /// at least one character per line.
    pub fn wrap_lines(&self, text: &str, font: &Font, max_width: f64) -> Vec<String> {
        let space = self.advance(' ', font);
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut line = Line::default();

            for word in paragraph.split_whitespace() {
                let word_width = self.text_width(word, font);

                if !line.text.is_empty() {
                    if line.width + space + word_width <= max_width + EPSILON {
                        line.text.push(' ');
                        line.text.push_str(word);
                        line.width += space + word_width;
                        continue;
                    }
                    lines.push(std::mem::take(&mut line).text);
                }

                if word_width <= max_width + EPSILON {
                    line = Line {
                        text: word.to_string(),
                        width: word_width,
                    };
                    continue;
                }

                for c in word.chars() {
                    let cw = self.advance(c, font);
                    if !line.text.is_empty() && line.width + cw > max_width + EPSILON {
                        lines.push(std::mem::take(&mut line).text);
                    }
                    line.text.push(c);
                    line.width += cw;
                }
            }

            lines.push(line.text);
        }

        lines
    }
}

impl TextMeasurer for ProportionalMeasurer {
    fn measure(&self, text: &str, font: &Font, max_width: f64) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let lines = self.wrap_lines(text, font, max_width);
        let width = lines
            .iter()
            .map(|l| self.text_width(l, font))
            .fold(0.0, f64::max);
        Size::new(width, lines.len() as f64 * self.line_height(font))
    }
}
