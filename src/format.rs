//! Display formatting for metric values.

/// Format a sales amount as `$1,234.50`.
///
/// The sign goes after the currency symbol (`$-1,234.50`), and non-finite
/// values render as `n/a`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };

    format!("${}{}.{}", sign, group_thousands(int_part), frac_part)
}

/// Format a unit count, truncating toward zero like an integer cast.
pub fn format_units(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    format!("{}", value.trunc() as i64)
}

/// Format a fraction in `[0, 1]` as a one-decimal percentage (`12.5%`).
pub fn format_share(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Insert `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
