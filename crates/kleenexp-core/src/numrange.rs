//! Compiles ranges of integers into a regular expression matching only them.
//!
//! ```text
//! number_range_to_regex(0, 5)   => "[0-5]"
//! number_range_to_regex(0, 255) => "\d|[1-9]\d|1\d\d|2[0-4]\d|25[0-5]"
//! ```
//!
//! The result is composed of "single ranges" separated by `|`. A single
//! range shares a fixed decimal prefix, varies exactly one digit position
//! through a bracket class, and matches any full `0-9` span below it with
//! `\d`.

/// The decimal digit of `x` at position `i`, counting from the least
/// significant digit.
fn digit_at(x: u64, i: u32) -> u64 {
    (x / 10u64.pow(i)) % 10
}

/// Replace the digit of `a` at position `i` with `digit`.
fn replace_with(a: u64, i: u32, digit: u64) -> u64 {
    let above = a / 10u64.pow(i + 1);
    let below = a % 10u64.pow(i);
    above * 10u64.pow(i + 1) + digit * 10u64.pow(i) + below
}

fn try_replace(a: u64, b: u64, index: u32, digit: u64) -> Option<u64> {
    let replaced = replace_with(a, index, digit);
    if replaced <= b {
        Some(replaced)
    } else {
        None
    }
}

/// Raise the digit of `a` at `index` as far as it can go without the result
/// exceeding `b`: all the way to 9 if possible, otherwise toward the
/// ceiling dictated by `b`'s digit at that position.
fn try_to_replace_lowest_nonzero_digit(a: u64, b: u64, index: u32) -> u64 {
    debug_assert!(a <= b);
    let digit = if index == 0 {
        digit_at(b, 0).min(9)
    } else {
        digit_at(b, index).saturating_sub(1).max(1)
    };
    try_replace(a, b, index, 9)
        .or_else(|| try_replace(a, b, index, digit))
        .unwrap_or(a)
}

/// Promote trailing zero digits of `a` to 9, one position at a time, as long
/// as the result stays at most `b`. Returns how many positions were promoted
/// and the promoted value.
fn replace_all_zero_digits_staying_below(a: u64, b: u64) -> (u32, u64) {
    if a == 0 {
        return (0, 0);
    }
    let mut promoted = a;
    let mut rest = a;
    let mut nine = 9;
    let mut count = 0;
    while rest % 10 == 0 {
        let candidate = promoted + nine;
        if candidate > b {
            break;
        }
        promoted = candidate;
        count += 1;
        rest /= 10;
        nine *= 10;
    }
    (count, promoted)
}

/// The largest value `m` such that `[a, m]` is expressible as one single
/// range and `m <= b`.
fn max_single_range_below(a: u64, b: u64) -> u64 {
    debug_assert!(a <= b);
    let (index, promoted) = replace_all_zero_digits_staying_below(a, b);
    try_to_replace_lowest_nonzero_digit(promoted, b, index)
}

/// Render `[a, b]` as one single-range pattern. The caller guarantees the
/// interval is expressible as one: at most one digit position differs once
/// fully-variable `0-9` spans are stripped.
fn single_range_to_regex(a: u64, b: u64) -> String {
    if a == b {
        return a.to_string();
    }

    let mut a = a;
    let mut b = b;
    let mut below = String::new();
    while a / 10 != b / 10 {
        a /= 10;
        b /= 10;
        below.push_str(r"\d");
    }

    let digit_a = a % 10;
    let digit_b = b % 10;
    let class = if digit_a == digit_b {
        digit_a.to_string()
    } else if digit_a == 0 && digit_b == 9 {
        r"\d".to_string()
    } else {
        format!("[{}-{}]", digit_a, digit_b)
    };

    let above = if a / 10 > 0 {
        (a / 10).to_string()
    } else {
        String::new()
    };

    format!("{}{}{}", above, class, below)
}

/// Produce a minimal-alternative regex matching exactly the decimal
/// representations of the integers in `[a, b]`, with no leading zeros.
///
/// Requires `a <= b`.
pub fn number_range_to_regex(a: u64, b: u64) -> String {
    assert!(a <= b, "number range start must not exceed end");

    let mut parts = Vec::new();
    let mut a = a;
    loop {
        if a == b {
            parts.push(a.to_string());
            break;
        }
        let max_a = max_single_range_below(a, b);
        parts.push(single_range_to_regex(a, max_a));
        if max_a == b {
            break;
        }
        a = max_a + 1;
    }
    parts.join("|")
}
