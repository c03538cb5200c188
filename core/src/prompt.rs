//! Purchase Prompt
//!
//! Text and parsing for the "how many tokens" question. The surface owns the
//! prompt itself; the widget only sees the raw answer.

/// Question shown when the user wants to buy tokens
pub const PURCHASE_PROMPT: &str = "How many tokens to buy?";

/// Pre-filled answer
pub const DEFAULT_PURCHASE_AMOUNT: &str = "10";

/// Parse the leading integer of `input`
///
/// Leading whitespace and one optional sign are skipped, then digits are read
/// up to the first non-digit, so `"12abc"` is 12 and `" -3"` is -3. Returns
/// `None` when no digit follows. Values beyond `i64` saturate at its bounds.
#[must_use]
pub fn parse_amount(input: &str) -> Option<i64> {
    let rest = input.trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };

    let digits_end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude = rest[..digits_end].bytes().fold(0_i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Amount to purchase for a prompt answer, if the purchase should go ahead
///
/// A cancelled prompt, an answer without a leading integer, and zero or
/// negative amounts all abort.
#[must_use]
pub fn purchase_amount(answer: Option<&str>) -> Option<i64> {
    answer.and_then(parse_amount).filter(|amount| *amount > 0)
}
