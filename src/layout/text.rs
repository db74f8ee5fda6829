use crate::config::LayoutConfig;
use crate::text_metrics;
use crate::theme::{Font, FontWeight, Theme};

/// Font sizes are in points; page geometry is in millimetres.
pub const PT_TO_UNIT: f32 = 0.352_778;

const BOLD_WIDTH_FACTOR: f32 = 1.07;
const ELLIPSIS: char = '\u{2026}';

/// Width of `text` set in `font`, in page units.
pub fn text_width(text: &str, font: Font, theme: &Theme, config: &LayoutConfig) -> f32 {
    let width_pt = if config.fast_text_metrics && text.is_ascii() {
        fallback_text_width(text, font.size)
    } else {
        text_metrics::measure_text_width(text, font.size, theme.font_family.as_str())
            .unwrap_or_else(|| fallback_text_width(text, font.size))
    };
    let weight_factor = match font.weight {
        FontWeight::Regular => 1.0,
        FontWeight::Bold => BOLD_WIDTH_FACTOR,
    };
    width_pt * weight_factor * PT_TO_UNIT
}

/// Shortens `text` so it fits in `max_width`, ending it with an ellipsis.
pub fn truncate_to_width(
    text: &str,
    max_width: f32,
    font: Font,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    if text_width(text, font, theme, config) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let prefix: String = chars.iter().collect();
        let candidate = format!("{}{}", prefix.trim_end(), ELLIPSIS);
        if text_width(&candidate, font, theme, config) <= max_width {
            return candidate;
        }
    }
    String::new()
}

/// Greedy word wrap. Words wider than the line are truncated on their own line.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    font: Font,
    theme: &Theme,
    config: &LayoutConfig,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph_line in split_lines(text) {
        if text_width(&paragraph_line, font, theme, config) <= max_width {
            lines.push(paragraph_line);
            continue;
        }
        let mut current = String::new();
        for word in paragraph_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if text_width(&candidate, font, theme, config) > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                if text_width(word, font, theme, config) > max_width {
                    lines.push(truncate_to_width(word, max_width, font, theme, config));
                } else {
                    current.push_str(word);
                }
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.replace("\\n", "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

pub(crate) fn char_width_factor(ch: char) -> f32 {
    // Helvetica advance widths, in ems.
    match ch {
        ' ' | ',' | '.' | '/' | ':' | ';' | '!' | 'I' | '[' | ']' | '\\' => 0.278,
        '|' => 0.26,
        '(' | ')' | '-' | 'r' | 't' | 'f' => 0.333,
        'i' | 'j' | 'l' => 0.222,
        '"' => 0.355,
        '*' => 0.389,
        'J' | 'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 0.5,
        'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 0.556,
        '0'..='9' | '$' | '#' | '?' | '_' => 0.556,
        '+' | '<' | '=' | '>' | '~' => 0.584,
        'F' | 'T' | 'Z' => 0.611,
        'L' => 0.556,
        'E' | 'P' | 'S' | 'V' | 'X' | 'Y' | 'K' | 'A' | 'B' => 0.667,
        'w' | 'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 0.722,
        'G' | 'O' | 'Q' => 0.778,
        'm' | 'M' => 0.833,
        '%' => 0.889,
        'W' => 0.944,
        '@' => 1.015,
        '&' => 0.667,
        '\u{2026}' => 1.0,
        _ => 0.6,
    }
}

fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}
