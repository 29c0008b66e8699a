//! Display formatting shared by the CLI report and the TUI

/// Format number with thousands separators (e.g., 1234567 -> "1,234,567")
pub fn format_number(n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// One-decimal score, "n/a" when the score is not a finite number
pub fn format_score(score: f64) -> String {
    if score.is_finite() {
        format!("{:.1}", score)
    } else {
        "n/a".to_string()
    }
}

pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.1}%", value)
    } else {
        "n/a".to_string()
    }
}

pub fn format_usd(value: f64) -> String {
    if value.is_finite() {
        format!("${:.2}", value)
    } else {
        "n/a".to_string()
    }
}

/// Truncate to `max` chars, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
