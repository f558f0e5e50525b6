//! Integer arithmetic used by the stat formulas.
//!
//! Sheet formulas are written in terms of real division followed by
//! `floor`/`ceil`. These helpers give the same results on integers,
//! including for negative numerators, which `/` alone gets wrong.

/// `floor(numerator / divisor)` for a positive divisor.
///
/// Returns `numerator` unchanged when `divisor` is not positive; divisor
/// directives are validated upstream, this only guards arithmetic.
///
/// # Examples
///
/// ```rust
/// use sheetstat::numeric::floor_div;
///
/// assert_eq!(floor_div(7, 2), 3);
/// assert_eq!(floor_div(-7, 2), -4);
/// ```
pub fn floor_div(numerator: i32, divisor: i32) -> i32 {
    if divisor <= 0 {
        return numerator;
    }
    numerator.div_euclid(divisor)
}

/// `ceil(numerator / divisor)` for a positive divisor.
///
/// Exact over the whole `i32` range, `i32::MIN` included.
///
/// # Examples
///
/// ```rust
/// use sheetstat::numeric::ceil_div;
///
/// assert_eq!(ceil_div(7, 2), 4);
/// assert_eq!(ceil_div(-5, 2), -2);
/// ```
pub fn ceil_div(numerator: i32, divisor: i32) -> i32 {
    if divisor <= 0 {
        return numerator;
    }
    let quotient = -(-i64::from(numerator)).div_euclid(i64::from(divisor));
    i32::try_from(quotient).unwrap_or(numerator)
}

/// `floor(floor(numerator / first) / second)`, which equals
/// `floor(numerator / first / second)` for real division.
///
/// Used by the wound and death overrides, where the state divisor is
/// applied before the modifier divisor.
pub fn nested_floor_div(numerator: i32, first: i32, second: i32) -> i32 {
    floor_div(floor_div(numerator, first), second)
}

/// Overweight penalty: one point per started `step` of weight over `capacity`.
///
/// Weights are fractional (coins weigh a thousandth each), so this is the
/// one formula computed in `f64`.
pub fn overweight_penalty(total_weight: f64, capacity: i32, step: i32) -> i32 {
    let capacity = f64::from(capacity);
    if step <= 0 || total_weight <= capacity {
        return 0;
    }
    ((total_weight - capacity) / f64::from(step)).ceil() as i32
}
