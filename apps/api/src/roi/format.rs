//! Number-to-text rules for every figure the calculator shows.
//!
//! Fixed-decimal output breaks exact ties away from zero (`2.5` -> `3`), which is
//! what browsers do and what users of the interactive page already see. Rust's
//! own `{:.N}` formatting rounds those ties to even, so ties are handled here.

/// Formats `value` with exactly `digits` decimals.
///
/// Ties are only detected while `value * 10^digits` is exact, which holds well
/// past any realistic figure; above roughly 5e14 at one decimal an exact tie can
/// round to even instead of up.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // -0.0 + 0.0 == +0.0
    let value = value + 0.0;
    let scale = 10f64.powi(digits as i32);
    let scaled = value * scale;
    // A tie only when the product was exact; the fma yields its rounding error.
    if scaled.fract().abs() == 0.5 && value.mul_add(scale, -scaled) == 0.0 {
        let rounded = scaled.trunc() + scaled.signum();
        return format!("{:.*}", digits, rounded / scale);
    }
    format!("{:.*}", digits, value)
}

/// Inserts `,` between every group of three integer digits.
pub fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(idx) => unsigned.split_at(idx),
        None => (unsigned, ""),
    };
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return number.to_string();
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}{frac_part}")
}

/// Hours with one decimal, as in the efficiency table.
pub fn format_hours(value: f64) -> String {
    to_fixed(value, 1)
}

/// Whole units without grouping.
pub fn format_whole(value: f64) -> String {
    to_fixed(value, 0)
}

/// Whole dollars without grouping (`$4335`), as in the efficiency table.
///
/// The sign follows the dollar sign: `$-20`.
pub fn format_currency(value: f64) -> String {
    format!("${}", to_fixed(value, 0))
}

/// Whole dollars with thousands grouping (`$104,040`, `$-1,234`).
pub fn format_currency_grouped(value: f64) -> String {
    format!("${}", group_thousands(&to_fixed(value, 0)))
}

/// Echoes a percentage field as typed.
pub fn format_percent(text: &str) -> String {
    format!("{text}%")
}
