use crate::full_math::mul_div;
use crate::sqrt_price_math::{get_amount0_delta, get_amount1_delta};
use amm_types::Q96;
use soroban_sdk::Env;

/// Liquidity purchasable with `amount0` over [sqrt_a, sqrt_b]:
/// L = amount0 * (sqrt_lower * sqrt_upper / Q96) / (sqrt_upper - sqrt_lower)
pub fn get_liquidity_for_amount0(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount0: u128,
) -> u128 {
    let (sqrt_lower, sqrt_upper) = sort_ratios(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let intermediate = mul_div(env, sqrt_lower, sqrt_upper, Q96);
    mul_div(env, amount0, intermediate, sqrt_upper - sqrt_lower)
}

/// Liquidity purchasable with `amount1`:
/// L = amount1 * Q96 / (sqrt_upper - sqrt_lower)
pub fn get_liquidity_for_amount1(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount1: u128,
) -> u128 {
    let (sqrt_lower, sqrt_upper) = sort_ratios(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    mul_div(env, amount1, Q96, sqrt_upper - sqrt_lower)
}

/// Largest liquidity fully collateralized by both amounts at the current
/// price. Below the range only token0 counts, above it only token1.
pub fn get_liquidity_for_amounts(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount0: u128,
    amount1: u128,
) -> u128 {
    let (sqrt_lower, sqrt_upper) = sort_ratios(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_lower {
        get_liquidity_for_amount0(env, sqrt_lower, sqrt_upper, amount0)
    } else if sqrt_ratio_x96 < sqrt_upper {
        let liquidity0 = get_liquidity_for_amount0(env, sqrt_ratio_x96, sqrt_upper, amount0);
        let liquidity1 = get_liquidity_for_amount1(env, sqrt_lower, sqrt_ratio_x96, amount1);
        liquidity0.min(liquidity1)
    } else {
        get_liquidity_for_amount1(env, sqrt_lower, sqrt_upper, amount1)
    }
}

/// Token amounts currently backing `liquidity` over the range, at the given
/// price. Rounds down on both sides.
pub fn get_amounts_for_liquidity(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
) -> (u128, u128) {
    let (sqrt_lower, sqrt_upper) = sort_ratios(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_lower {
        (
            get_amount0_delta(env, sqrt_lower, sqrt_upper, liquidity, false),
            0,
        )
    } else if sqrt_ratio_x96 < sqrt_upper {
        (
            get_amount0_delta(env, sqrt_ratio_x96, sqrt_upper, liquidity, false),
            get_amount1_delta(env, sqrt_lower, sqrt_ratio_x96, liquidity, false),
        )
    } else {
        (
            0,
            get_amount1_delta(env, sqrt_lower, sqrt_upper, liquidity, false),
        )
    }
}

/// Apply a signed delta to an unsigned liquidity total.
pub fn add_delta(liquidity: u128, delta: i128) -> u128 {
    if delta < 0 {
        match liquidity.checked_sub(delta.unsigned_abs()) {
            Some(v) => v,
            None => panic!("liquidity underflow"),
        }
    } else {
        match liquidity.checked_add(delta as u128) {
            Some(v) => v,
            None => panic!("liquidity overflow"),
        }
    }
}

fn sort_ratios(a: u128, b: u128) -> (u128, u128) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    fn range() -> (u128, u128) {
        (Q96 * 9 / 10, Q96 * 11 / 10)
    }

    #[test]
    fn add_delta_signs() {
        assert_eq!(add_delta(100, 50), 150);
        assert_eq!(add_delta(100, -100), 0);
        assert_eq!(add_delta(0, i128::MAX), i128::MAX as u128);
    }

    #[test]
    #[should_panic(expected = "liquidity underflow")]
    fn add_delta_underflow() {
        add_delta(10, -11);
    }

    #[test]
    fn below_range_only_token0_counts() {
        let env = Env::default();
        let (lower, upper) = range();
        let price = Q96 * 8 / 10;
        let with0 = get_liquidity_for_amounts(&env, price, lower, upper, 1_000_000_000, 0);
        let with_both =
            get_liquidity_for_amounts(&env, price, lower, upper, 1_000_000_000, 1_000_000_000);
        assert!(with0 > 0);
        assert_eq!(with0, with_both);
    }

    #[test]
    fn above_range_only_token1_counts() {
        let env = Env::default();
        let (lower, upper) = range();
        let price = Q96 * 12 / 10;
        let with1 = get_liquidity_for_amounts(&env, price, lower, upper, 0, 1_000_000_000);
        let with_both =
            get_liquidity_for_amounts(&env, price, lower, upper, 1_000_000_000, 1_000_000_000);
        assert!(with1 > 0);
        assert_eq!(with1, with_both);
    }

    #[test]
    fn in_range_takes_the_binding_side() {
        let env = Env::default();
        let (lower, upper) = range();
        let both = get_liquidity_for_amounts(&env, Q96, lower, upper, 1_000_000, 1_000_000);
        let scarce0 = get_liquidity_for_amounts(&env, Q96, lower, upper, 1, 1_000_000);
        assert!(scarce0 < both);
    }

    #[test]
    fn amounts_split_by_price_position() {
        let env = Env::default();
        let (lower, upper) = range();
        let liquidity = 1_000_000_000_000u128;

        let (a0, a1) = get_amounts_for_liquidity(&env, Q96 * 8 / 10, lower, upper, liquidity);
        assert!(a0 > 0 && a1 == 0);

        let (a0, a1) = get_amounts_for_liquidity(&env, Q96, lower, upper, liquidity);
        assert!(a0 > 0 && a1 > 0);

        let (a0, a1) = get_amounts_for_liquidity(&env, Q96 * 12 / 10, lower, upper, liquidity);
        assert!(a0 == 0 && a1 > 0);
    }

    #[test]
    fn amounts_scale_with_liquidity() {
        let env = Env::default();
        let (lower, upper) = range();
        let (a0, a1) = get_amounts_for_liquidity(&env, Q96, lower, upper, 1_000_000_000);
        let (b0, b1) = get_amounts_for_liquidity(&env, Q96, lower, upper, 2_000_000_000);
        assert_eq!(b0 / 2, a0);
        assert_eq!(b1 / 2, a1);
    }

    #[test]
    fn one_sided_deposit_round_trips_through_liquidity() {
        let env = Env::default();
        let (lower, upper) = range();
        let amount1 = 5_000_000_000_000u128;

        let liquidity = get_liquidity_for_amount1(&env, lower, upper, amount1);
        let back = get_amount1_delta(&env, lower, upper, liquidity, false);
        assert!(back <= amount1);
        assert!(amount1 - back <= 1);
    }

    #[test]
    fn redeeming_computed_liquidity_never_overdraws() {
        let env = Env::default();
        let (lower, upper) = range();
        let (amount0, amount1) = (7_777_777_777u128, 9_999_999_999u128);
        let liquidity = get_liquidity_for_amounts(&env, Q96, lower, upper, amount0, amount1);
        let (need0, need1) = get_amounts_for_liquidity(&env, Q96, lower, upper, liquidity);
        assert!(need0 <= amount0);
        assert!(need1 <= amount1);
    }
}
