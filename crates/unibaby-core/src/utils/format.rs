/// Digit group separator used for prices (Kazakh/Russian locales group by
/// thousands with a space)
const GROUP_SEPARATOR: char = ' ';

/// Format a price with thousands grouping, e.g. `18000.0` -> `18 000`.
/// Fractions are kept only when present, with at most two digits.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return price.to_string();
    }

    let negative = price < 0.0;
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(c);
    }

    let sign = if negative && cents > 0 { "-" } else { "" };
    match fraction {
        0 => format!("{}{}", sign, grouped),
        f if f % 10 == 0 => format!("{}{},{}", sign, grouped, f / 10),
        f => format!("{}{},{:02}", sign, grouped, f),
    }
}

/// Format a phone number for display
/// Handles Kazakh mobile numbers and normalizes to +7 (XXX) XXX-XX-XX
pub fn format_phone(phone: &str) -> String {
    // Extract just the digits
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    let national = match digits.len() {
        10 => &digits[..],
        11 if digits.starts_with('7') || digits.starts_with('8') => &digits[1..],
        _ => return phone.to_string(), // Return original if can't format
    };

    format!(
        "+7 ({}) {}-{}-{}",
        &national[0..3],
        &national[3..6],
        &national[6..8],
        &national[8..10]
    )
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
