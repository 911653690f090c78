use crate::error::MathError;
use soroban_sdk::{panic_with_error, Env, U256};

/// floor(a * b / denominator), with a 256-bit intermediate so the product may
/// exceed u128 as long as the quotient does not.
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic_with_error!(env, MathError::DivisionByZero);
    }

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let quotient = product.div(&U256::from_u128(env, denominator));
    u256_to_u128(env, &quotient)
}

/// ceil(a * b / denominator). The rounding step reuses the remainder of the
/// same 256-bit product, so the ceiling never diverges from the floor by more
/// than one.
pub fn mul_div_rounding_up(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic_with_error!(env, MathError::DivisionByZero);
    }

    let denom = U256::from_u128(env, denominator);
    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let floor = u256_to_u128(env, &product.div(&denom));

    if product.rem_euclid(&denom).gt(&U256::from_u32(env, 0)) {
        match floor.checked_add(1) {
            Some(v) => v,
            None => panic_with_error!(env, MathError::Overflow),
        }
    } else {
        floor
    }
}

/// ceil(a / b) on plain u128 operands.
pub fn div_rounding_up(a: u128, b: u128) -> u128 {
    if b == 0 {
        panic!("division by zero");
    }
    a.div_ceil(b)
}

pub(crate) fn u256_to_u128(env: &Env, value: &U256) -> u128 {
    match value.to_u128() {
        Some(v) => v,
        None => panic_with_error!(env, MathError::Overflow),
    }
}

/// ceil division of a 256-bit numerator, staying in U256.
pub(crate) fn u256_div_rounding_up(env: &Env, numerator: &U256, denominator: &U256) -> U256 {
    let quotient = numerator.div(denominator);
    if numerator.rem_euclid(denominator).gt(&U256::from_u32(env, 0)) {
        quotient.add(&U256::from_u32(env, 1))
    } else {
        quotient
    }
}
