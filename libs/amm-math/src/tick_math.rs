use crate::error::MathError;
use crate::full_math::u256_to_u128;
use amm_types::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use soroban_sdk::{panic_with_error, Env, U256};

/// Precomputed sqrt(1.0001^-(2^i)) factors in Q128, one per bit of the tick
/// magnitude. Multiplying the factors selected by the set bits of |tick|
/// yields sqrt(1.0001^-|tick|); positive ticks invert the product.
const SQRT_FACTORS_Q128: [u128; 19] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
];

/// sqrt(1.0001^tick) * 2^96, strictly increasing in `tick`.
pub fn get_sqrt_ratio_at_tick(env: &Env, tick: i32) -> u128 {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        panic_with_error!(env, MathError::InputOutOfBounds);
    }

    let abs_tick = tick.unsigned_abs();
    let mut ratio = q128(env);
    for (bit, factor) in SQRT_FACTORS_Q128.iter().enumerate() {
        if abs_tick & (1 << bit) != 0 {
            ratio = mul_shift_right_128(env, &ratio, *factor);
        }
    }

    // The table encodes negative exponents; flip for positive ticks.
    if tick > 0 {
        ratio = u256_max(env).div(&ratio);
    }

    // Q128 -> Q96
    let sqrt_ratio = u256_to_u128(env, &ratio.div(&U256::from_u128(env, 1u128 << 32)));
    sqrt_ratio.clamp(MIN_SQRT_RATIO, MAX_SQRT_RATIO)
}

/// Greatest tick whose sqrt ratio is at most `sqrt_price_x96`. Inverse of
/// `get_sqrt_ratio_at_tick` up to the one-tick granularity, found by binary
/// search over the tick range.
pub fn get_tick_at_sqrt_ratio(env: &Env, sqrt_price_x96: u128) -> i32 {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        panic_with_error!(env, MathError::InputOutOfBounds);
    }

    let mut low = MIN_TICK;
    let mut high = MAX_TICK;
    while low < high {
        let mid = (low + high + 1) / 2;
        if get_sqrt_ratio_at_tick(env, mid) <= sqrt_price_x96 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    low
}

fn q128(env: &Env) -> U256 {
    let q64 = U256::from_u128(env, 1u128 << 64);
    q64.mul(&q64)
}

fn u256_max(env: &Env) -> U256 {
    let max_u128 = U256::from_u128(env, u128::MAX);
    max_u128.mul(&q128(env)).add(&max_u128)
}

fn mul_shift_right_128(env: &Env, x: &U256, y: u128) -> U256 {
    x.mul(&U256::from_u128(env, y)).div(&q128(env))
}
