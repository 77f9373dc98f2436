/// Below this magnitude values switch to scientific notation.
pub const SCIENTIFIC_BELOW: f64 = 0.001;
/// Above this magnitude values switch to scientific notation.
pub const SCIENTIFIC_ABOVE: f64 = 10_000.0;

const DISPLAY_DIGITS: usize = 3;

/// Digits requested from the exact formatter; an f64 never needs more than
/// 1074 fractional digits, so the tail past the rounding point is exact.
const EXACT_DIGITS: usize = 1100;

/// Format a metric or axis value for display.
///
/// Magnitudes below `0.001` or above `10000` use scientific notation with three
/// fractional digits (`1.235e+4`), everything else fixed-point with three (`12.346`).
/// Exact ties round away from zero (`0.0625` gives `0.063`).
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return format_non_finite(value);
    }
    // Drop the sign of negative zero.
    let value = if value == 0.0 { 0.0 } else { value };
    let abs = value.abs();
    if abs < SCIENTIFIC_BELOW || abs > SCIENTIFIC_ABOVE {
        format_scientific(value, DISPLAY_DIGITS)
    } else {
        format_fixed(value, DISPLAY_DIGITS)
    }
}

/// Fixed-point with `digits` fractional digits, ties away from zero.
pub fn format_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format_non_finite(value);
    }
    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut all: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).collect();
    let int_len = int_part.len() + usize::from(round_half_up(&mut all, int_part.len() + digits));

    let (int_digits, frac_digits) = all.split_at(int_len);
    let mut out = String::with_capacity(all.len() + 2);
    if is_negative(value, &all) {
        out.push('-');
    }
    out.extend(int_digits.iter().map(|&b| b as char));
    if digits > 0 {
        out.push('.');
        out.extend(frac_digits.iter().map(|&b| b as char));
    }
    out
}

/// `d.ddde±N`, with an explicit `+` on non-negative exponents; ties away from zero.
pub fn format_scientific(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format_non_finite(value);
    }
    let exact = format!("{:.*e}", EXACT_DIGITS, value.abs());
    let Some((mantissa, exp)) = exact.split_once('e') else {
        return exact;
    };
    let mut exp: i32 = exp.parse().unwrap_or(0);
    let mut all: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    if round_half_up(&mut all, 1 + digits) {
        // 9.999.. became 10.00..; renormalize to one leading digit.
        all.pop();
        exp += 1;
    }
    if all.iter().all(|&b| b == b'0') {
        exp = 0;
    }

    let mut out = String::with_capacity(digits + 8);
    if is_negative(value, &all) {
        out.push('-');
    }
    out.push(all[0] as char);
    if digits > 0 {
        out.push('.');
        out.extend(all[1..].iter().map(|&b| b as char));
    }
    let sign = if exp < 0 { '-' } else { '+' };
    out.push('e');
    out.push(sign);
    out.push_str(&exp.unsigned_abs().to_string());
    out
}

/// Round the ASCII digit string to its first `keep` digits, half away from
/// zero. Returns true when the carry added a new leading digit.
fn round_half_up(digits: &mut Vec<u8>, keep: usize) -> bool {
    if digits.len() < keep {
        digits.resize(keep, b'0');
        return false;
    }
    let round_up = digits.get(keep).is_some_and(|&d| d >= b'5');
    digits.truncate(keep);
    if !round_up {
        return false;
    }
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return false;
        }
    }
    digits.insert(0, b'1');
    true
}

/// A negative value that rounds to all zeros prints without a sign.
fn is_negative(value: f64, digits: &[u8]) -> bool {
    value < 0.0 && digits.iter().any(|&b| b != b'0')
}

fn format_non_finite(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_sign_positive() {
        "Inf".to_string()
    } else {
        "-Inf".to_string()
    }
}
