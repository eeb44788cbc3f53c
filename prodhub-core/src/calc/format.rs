//! Canonical decimal rendering of results.
//!
//! Results are shown the way the calculator has always shown them:
//! shortest digits that round-trip, plain notation for magnitudes in
//! `[1e-7, 1e21)`, exponent notation with an explicit sign otherwise
//! (`1e+21`, `1.5e-7`). Every rendering parses back through the lexer,
//! so a result can seed the next calculation.

/// Render `x` in canonical form.
#[must_use]
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }

    let sign = if x < 0.0 { "-" } else { "" };
    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e3".
    let sci = format!("{:e}", x.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exp: i32 = exp.parse().unwrap_or(0);

    let k = i32::try_from(digits.len()).unwrap_or(i32::MAX);
    let n = exp + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat(usize::try_from(n - k).unwrap_or(0)))
    } else if 0 < n && n <= 21 {
        let split = usize::try_from(n).unwrap_or(0);
        format!("{}.{}", &digits[..split], &digits[split..])
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(usize::try_from(-n).unwrap_or(0)))
    } else {
        let exp_sign = if n - 1 >= 0 { "+" } else { "-" };
        let exp_abs = (n - 1).abs();
        if digits.len() == 1 {
            format!("{digits}e{exp_sign}{exp_abs}")
        } else {
            format!("{}.{}e{exp_sign}{exp_abs}", &digits[..1], &digits[1..])
        }
    };

    format!("{sign}{body}")
}
