//! Parsing of EXIF rational strings (`"72/1"`, `"-3/2"`, `"2.8"`).

/// Parse a fraction-encoded or bare numeric string into an `f64`.
///
/// Splits on the first `/`. Returns `None` for anything that is not a
/// numeral, for a zero denominator, and for results that are not finite.
/// No rounding is applied.
pub fn parse_rational(text: &str) -> Option<f64> {
    let value = match text.split_once('/') {
        None => parse_numeral(text)?,
        Some((num, den)) => {
            let num = parse_numeral(num)?;
            let den = parse_numeral(den)?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
    };
    value.is_finite().then_some(value)
}

fn parse_numeral(text: &str) -> Option<f64> {
    let text = text.trim();
    // `f64::from_str` also accepts "inf" and "NaN", which are not numerals.
    if !text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
    {
        return None;
    }
    text.parse::<f64>().ok()
}
