use crate::error::MathError;
use crate::full_math::{mul_div, mul_div_rounding_up, u256_div_rounding_up, u256_to_u128};
use amm_types::Q96;
use soroban_sdk::{panic_with_error, Env, U256};

/// Token0 owed for moving the price across [sqrt_a, sqrt_b] at `liquidity`:
/// delta0 = L * Q96 * (sqrt_upper - sqrt_lower) / (sqrt_upper * sqrt_lower).
/// Computed fully in 256 bits; `L * Q96` alone can exceed u128.
pub fn get_amount0_delta(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
    round_up: bool,
) -> u128 {
    let (sqrt_lower, sqrt_upper) = sort_ratios(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if sqrt_lower == 0 {
        panic_with_error!(env, MathError::DivisionByZero);
    }

    let numerator = U256::from_u128(env, liquidity)
        .mul(&U256::from_u128(env, Q96))
        .mul(&U256::from_u128(env, sqrt_upper - sqrt_lower));
    let upper = U256::from_u128(env, sqrt_upper);
    let lower = U256::from_u128(env, sqrt_lower);

    if round_up {
        let partial = u256_div_rounding_up(env, &numerator, &upper);
        u256_to_u128(env, &u256_div_rounding_up(env, &partial, &lower))
    } else {
        u256_to_u128(env, &numerator.div(&upper).div(&lower))
    }
}

/// Token1 owed for the same move: delta1 = L * (sqrt_upper - sqrt_lower) / Q96.
pub fn get_amount1_delta(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
    round_up: bool,
) -> u128 {
    let (sqrt_lower, sqrt_upper) = sort_ratios(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if round_up {
        mul_div_rounding_up(env, liquidity, sqrt_upper - sqrt_lower, Q96)
    } else {
        mul_div(env, liquidity, sqrt_upper - sqrt_lower, Q96)
    }
}

/// Price after consuming `amount_in` of the input asset. Rounds so the pool
/// never moves further than the input pays for.
pub fn get_next_sqrt_price_from_input(
    env: &Env,
    sqrt_price_x96: u128,
    liquidity: u128,
    amount_in: u128,
    zero_for_one: bool,
) -> u128 {
    if sqrt_price_x96 == 0 || liquidity == 0 {
        panic_with_error!(env, MathError::InputOutOfBounds);
    }

    if zero_for_one {
        next_sqrt_price_from_amount0(env, sqrt_price_x96, liquidity, amount_in, true)
    } else {
        next_sqrt_price_from_amount1(env, sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Price after producing `amount_out` of the output asset.
pub fn get_next_sqrt_price_from_output(
    env: &Env,
    sqrt_price_x96: u128,
    liquidity: u128,
    amount_out: u128,
    zero_for_one: bool,
) -> u128 {
    if sqrt_price_x96 == 0 || liquidity == 0 {
        panic_with_error!(env, MathError::InputOutOfBounds);
    }

    if zero_for_one {
        next_sqrt_price_from_amount1(env, sqrt_price_x96, liquidity, amount_out, false)
    } else {
        next_sqrt_price_from_amount0(env, sqrt_price_x96, liquidity, amount_out, false)
    }
}

/// next = L * Q96 * sqrt_price / (L * Q96 ± amount * sqrt_price), rounded up
/// so the price concedes nothing to the trader.
fn next_sqrt_price_from_amount0(
    env: &Env,
    sqrt_price_x96: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> u128 {
    if amount == 0 {
        return sqrt_price_x96;
    }

    let liquidity_q96 = U256::from_u128(env, liquidity).mul(&U256::from_u128(env, Q96));
    let product = U256::from_u128(env, amount).mul(&U256::from_u128(env, sqrt_price_x96));
    let numerator = liquidity_q96.mul(&U256::from_u128(env, sqrt_price_x96));

    let denominator = if add {
        liquidity_q96.add(&product)
    } else {
        // removing token0 pushes the price up; the virtual reserve must stay
        // positive
        if !liquidity_q96.gt(&product) {
            panic_with_error!(env, MathError::Overflow);
        }
        liquidity_q96.sub(&product)
    };

    u256_to_u128(env, &u256_div_rounding_up(env, &numerator, &denominator))
}

/// next = sqrt_price ± amount * Q96 / L. Adding token1 rounds the quotient
/// down, removing rounds it up; both directions favor the pool.
fn next_sqrt_price_from_amount1(
    env: &Env,
    sqrt_price_x96: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> u128 {
    if add {
        let quotient = mul_div(env, amount, Q96, liquidity);
        match sqrt_price_x96.checked_add(quotient) {
            Some(next) => next,
            None => panic_with_error!(env, MathError::Overflow),
        }
    } else {
        let quotient = mul_div_rounding_up(env, amount, Q96, liquidity);
        if sqrt_price_x96 <= quotient {
            panic_with_error!(env, MathError::Overflow);
        }
        sqrt_price_x96 - quotient
    }
}

fn sort_ratios(a: u128, b: u128) -> (u128, u128) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}
