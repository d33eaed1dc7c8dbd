// Text formatters
//
// Column fitting for names that may contain accents or wide characters.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Cut `text` to at most `max` display columns, marking the cut with `…`
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Truncate or pad `text` to exactly `width` display columns
pub fn fit(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let pad = width.saturating_sub(cut.width());
    format!("{}{}", cut, " ".repeat(pad))
}
