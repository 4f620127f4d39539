pub const ELLIPSIS: &str = "...";

const CJK_IDEOGRAPH_START: char = '\u{4E00}';
const CJK_IDEOGRAPH_END: char = '\u{9FA5}';
const FALLBACK_ASPECT_RATIO: f64 = 1.0;

/// Per-character width source used when estimating rendered label widths.
pub trait GlyphMetrics {
    fn char_width(&self, ch: char, font_size: f64) -> f64;
}

impl<F> GlyphMetrics for F
where
    F: Fn(char, f64) -> f64,
{
    fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self(ch, font_size)
    }
}

/// Sans-serif width estimate: `font_size` scaled by a per-letter aspect ratio.
///
/// The ratios are approximate Helvetica advances, not the table any particular
/// graph view measures with, so widths are close but not pixel-identical.
/// Characters outside the table are treated as one em wide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LetterAspectMetrics;

impl GlyphMetrics for LetterAspectMetrics {
    fn char_width(&self, ch: char, font_size: f64) -> f64 {
        font_size * letter_aspect_ratio(ch).unwrap_or(FALLBACK_ASPECT_RATIO)
    }
}

fn letter_aspect_ratio(ch: char) -> Option<f64> {
    let ratio = match ch {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | '[' | '\\' | ']' | 'f' | 't' => 0.278,
        'i' | 'j' | 'l' | '\'' => 0.222,
        '"' => 0.355,
        '#' | '$' | '0'..='9' | '_' => 0.556,
        '%' | 'M' | 'm' => 0.833,
        '&' | 'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 0.667,
        '(' | ')' | '-' | '`' | 'r' => 0.333,
        '*' => 0.389,
        '+' | '<' | '=' | '>' | '~' => 0.584,
        '?' | 'L' | 'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 0.556,
        '@' => 1.015,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' | 'w' => 0.722,
        'F' | 'T' | 'Z' => 0.611,
        'G' | 'O' | 'Q' => 0.778,
        'I' => 0.278,
        'J' | 'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 0.5,
        'W' => 0.944,
        '^' => 0.469,
        '{' | '}' => 0.334,
        '|' => 0.26,
        _ => return None,
    };
    Some(ratio)
}

pub fn is_cjk_ideograph(ch: char) -> bool {
    (CJK_IDEOGRAPH_START..=CJK_IDEOGRAPH_END).contains(&ch)
}

/// Width of a single character; CJK ideographs are always one em wide.
pub fn char_width(ch: char, font_size: f64, metrics: &dyn GlyphMetrics) -> f64 {
    if is_cjk_ideograph(ch) {
        font_size
    } else {
        metrics.char_width(ch, font_size)
    }
}

pub fn measure_label(text: &str, font_size: f64, metrics: &dyn GlyphMetrics) -> f64 {
    text.chars()
        .map(|ch| char_width(ch, font_size, metrics))
        .sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrimmedLabel {
    pub text: String,
    /// Measured width of the kept prefix; the ellipsis is not included.
    pub width: f64,
    pub truncated: bool,
}

/// Keeps the longest prefix of `text` whose estimated width fits in `max_width`.
///
/// When a character would overflow, the prefix before it is returned with
/// `...` appended and the width accumulated so far.
pub fn trim_label(
    text: &str,
    font_size: f64,
    max_width: f64,
    metrics: &dyn GlyphMetrics,
) -> TrimmedLabel {
    let mut width = 0.0;

    for (byte_index, ch) in text.char_indices() {
        let ch_width = char_width(ch, font_size, metrics);
        if width + ch_width > max_width {
            return TrimmedLabel {
                text: format!("{}{ELLIPSIS}", &text[..byte_index]),
                width,
                truncated: true,
            };
        }
        width += ch_width;
    }

    TrimmedLabel {
        text: text.to_owned(),
        width,
        truncated: false,
    }
}
