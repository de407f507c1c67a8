//! Currency formatting for the snapshot table.

/// Rendered in place of a missing or non-finite value. Never "$nan".
pub const PLACEHOLDER: &str = "-";

/// Format a USD amount as `$1,234.568` at the given decimal precision.
///
/// `None` and non-finite values render as [`PLACEHOLDER`].
pub fn format_usd(value: Option<f64>, precision: usize) -> String {
    let v = match value {
        Some(v) if v.is_finite() => v,
        _ => return PLACEHOLDER.to_string(),
    };

    let formatted = format!("{v:.precision$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let grouped = group_thousands(digits);

    match frac_part {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
