// 2.0: fixed-point helpers. every arithmetic step in the engine routes through these
// so overflow and zero-division surface as errors instead of panics.
// rounding always truncates toward zero, applied explicitly at each use site.

use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,
}

pub fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

pub fn checked_sub(a: Decimal, b: Decimal) -> Result<Decimal, MathError> {
    a.checked_sub(b).ok_or(MathError::Overflow)
}

pub fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal, MathError> {
    a.checked_mul(b).ok_or(MathError::Overflow)
}

pub fn checked_div(a: Decimal, b: Decimal) -> Result<Decimal, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    a.checked_div(b).ok_or(MathError::Overflow)
}

// 2.1: drop fractional digits past `decimals`, toward zero.
pub fn truncate(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::ToZero)
}

// 2.2: ratio scaling: a * b / c, truncated. the workhorse behind pro-rata
// splits and reward-share dilution.
pub fn mul_div(a: Decimal, b: Decimal, c: Decimal, decimals: u32) -> Result<Decimal, MathError> {
    let product = checked_mul(a, b)?;
    Ok(truncate(checked_div(product, c)?, decimals))
}

// multiplicative inverse, truncated. used for inverted oracle prices.
pub fn invert(value: Decimal, decimals: u32) -> Result<Decimal, MathError> {
    Ok(truncate(checked_div(Decimal::ONE, value)?, decimals))
}
