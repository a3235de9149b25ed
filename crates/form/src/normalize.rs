//! Per-field coercion of raw user input.
//!
//! Input is never rejected with feedback: out-of-range values are clamped and
//! unparseable values either leave the field untouched or, for the return
//! rate, fall back to zero.

use pp_core::{round2, CustomerMetricsRecord, Field, Region};

/// Leading integer of `raw`, clamped at zero. `"12abc"` -> 12, `"3.7"` -> 3,
/// `"-4"` -> 0. `None` when no digits lead the input.
pub fn parse_count(raw: &str) -> Option<u64> {
    let s = raw.trim();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }
    if negative {
        return Some(0);
    }
    Some(digits.parse::<u64>().unwrap_or(u64::MAX))
}

/// Longest numeric prefix of `raw` that parses as a float. NaN counts as no number.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(s.len());
    let candidate = &s[..end];
    (1..=candidate.len())
        .rev()
        .find_map(|len| candidate[..len].parse::<f64>().ok())
        .filter(|v| !v.is_nan())
}

/// Clamp to `[0, 1]` and round to two decimals. Unparseable input becomes 0.
pub fn normalize_return_rate(raw: &str) -> f64 {
    let value = parse_leading_float(raw).unwrap_or(0.0);
    round2(value.clamp(0.0, 1.0))
}

/// Non-negative finite amount, or `None` to leave the field untouched.
pub fn normalize_total_spent(raw: &str) -> Option<f64> {
    parse_leading_float(raw)
        .filter(|v| v.is_finite())
        .map(|v| v.max(0.0))
}

pub fn parse_region(raw: &str) -> Option<Region> {
    let code = parse_count(raw)?;
    u8::try_from(code).ok().and_then(|c| Region::try_from(c).ok())
}

pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Apply one raw edit to a copy of `record`.
///
/// Returns `None` when the edit is a no-op (unparseable input, or a field that
/// does not accept input). Keeps `product_diversity <= total_orders` whichever
/// side of that bound changes. Derived fields are not touched here.
pub fn normalize(
    record: &CustomerMetricsRecord,
    field: Field,
    raw: &str,
) -> Option<CustomerMetricsRecord> {
    let mut next = *record;
    match field {
        Field::TotalOrders => {
            next.total_orders = parse_count(raw)?;
            next.product_diversity = next.product_diversity.min(next.total_orders);
        }
        Field::TotalSpent => next.total_spent = normalize_total_spent(raw)?,
        Field::PrinterPurchasesLast6m => next.printer_purchases_last_6m = parse_count(raw)?,
        Field::ReturnRate => next.return_rate = normalize_return_rate(raw),
        Field::ProductDiversity => {
            next.product_diversity = parse_count(raw)?.min(record.total_orders);
        }
        Field::Region => next.region = parse_region(raw)?,
        Field::HighValueCustomer => next.high_value_customer = parse_flag(raw)?,
        Field::AverageOrderValue => return None,
    }
    Some(next)
}

/// Bring an arbitrary record into range: clamps every quantity the same way
/// an edit would.
pub fn sanitize(record: CustomerMetricsRecord) -> CustomerMetricsRecord {
    let mut next = record;
    if !next.total_spent.is_finite() || next.total_spent < 0.0 {
        next.total_spent = 0.0;
    }
    next.return_rate = if next.return_rate.is_nan() {
        0.0
    } else {
        round2(next.return_rate.clamp(0.0, 1.0))
    };
    if !next.average_order_value.is_finite() || next.average_order_value < 0.0 {
        next.average_order_value = 0.0;
    }
    next.product_diversity = next.product_diversity.min(next.total_orders);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_take_leading_integer() {
        assert_eq!(parse_count("12"), Some(12));
        assert_eq!(parse_count(" 12abc "), Some(12));
        assert_eq!(parse_count("3.7"), Some(3));
        assert_eq!(parse_count("+8"), Some(8));
        assert_eq!(parse_count("-4"), Some(0));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("abc"), None);
        assert_eq!(parse_count("-"), None);
        assert_eq!(parse_count("99999999999999999999999"), Some(u64::MAX));
    }

    #[test]
    fn floats_take_leading_number() {
        assert_eq!(parse_leading_float("0.25"), Some(0.25));
        assert_eq!(parse_leading_float("0.5abc"), Some(0.5));
        assert_eq!(parse_leading_float("1e-1x"), Some(0.1));
        assert_eq!(parse_leading_float("12."), Some(12.0));
        assert_eq!(parse_leading_float("-3"), Some(-3.0));
        assert_eq!(parse_leading_float("x1"), None);
        assert_eq!(parse_leading_float(""), None);
    }

    #[test]
    fn return_rate_is_clamped_and_rounded() {
        assert_eq!(normalize_return_rate("0.456"), 0.46);
        assert_eq!(normalize_return_rate("1.7"), 1.0);
        assert_eq!(normalize_return_rate("-0.2"), 0.0);
        assert_eq!(normalize_return_rate("garbage"), 0.0);
        assert_eq!(normalize_return_rate(""), 0.0);
    }

    #[test]
    fn total_spent_rejects_garbage_and_clamps_negatives() {
        assert_eq!(normalize_total_spent("250.75"), Some(250.75));
        assert_eq!(normalize_total_spent("-10"), Some(0.0));
        assert_eq!(normalize_total_spent("n/a"), None);
        assert_eq!(normalize_total_spent("1e999"), None);
    }

    #[test]
    fn region_and_flag_accept_known_codes_only() {
        assert_eq!(parse_region("2"), Some(Region::West));
        assert_eq!(parse_region("4"), None);
        assert_eq!(parse_region("300"), None);
        assert_eq!(parse_region("east"), None);
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("No"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn diversity_is_capped_by_orders() {
        let r = CustomerMetricsRecord::SAMPLE;
        let next = normalize(&r, Field::ProductDiversity, "25").unwrap();
        assert_eq!(next.product_diversity, 10);

        let next = normalize(&r, Field::TotalOrders, "3").unwrap();
        assert_eq!(next.total_orders, 3);
        assert_eq!(next.product_diversity, 3);
    }

    #[test]
    fn unparseable_or_locked_edits_are_noops() {
        let r = CustomerMetricsRecord::SAMPLE;
        assert_eq!(normalize(&r, Field::TotalOrders, "abc"), None);
        assert_eq!(normalize(&r, Field::TotalSpent, ""), None);
        assert_eq!(normalize(&r, Field::AverageOrderValue, "99"), None);
        assert_eq!(normalize(&r, Field::Region, "7"), None);
    }

    #[test]
    fn sanitize_repairs_out_of_range_records() {
        let mut r = CustomerMetricsRecord::SAMPLE;
        r.total_spent = -5.0;
        r.return_rate = 3.0;
        r.product_diversity = 40;
        let fixed = sanitize(r);
        assert_eq!(fixed.total_spent, 0.0);
        assert_eq!(fixed.return_rate, 1.0);
        assert_eq!(fixed.product_diversity, 10);
    }
}
