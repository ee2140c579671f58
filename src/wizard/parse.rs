//! Parsing of free-text answers.

/// Reads a yes/no answer.
pub(crate) fn yes_no(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Reads a whole number.
pub(crate) fn count(text: &str) -> Option<u32> {
    text.trim().parse().ok()
}

/// Reads a finite decimal number.
pub(crate) fn number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads a percentage, with or without a `%` sign.
pub(crate) fn percentage(text: &str) -> Option<f64> {
    number(&text.replace('%', ""))
}

/// Reads rectangular dimensions written as `24 x 18`, `24×18` or `24,18`.
pub(crate) fn dimensions(text: &str) -> Option<(f64, f64)> {
    let lc = text.to_lowercase();
    let mut parts = lc
        .split(|c: char| c == 'x' || c == '×' || c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty());
    let a = number(parts.next()?)?;
    let b = number(parts.next()?)?;
    Some((a, b))
}
