use crate::full_math::{mul_div, mul_div_rounding_up};
use crate::sqrt_price_math::{
    get_amount0_delta, get_amount1_delta, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};
use soroban_sdk::Env;

/// Outcome of consuming liquidity within a single tick range.
#[derive(Clone, Debug)]
pub struct SwapStep {
    /// Price at the end of the step
    pub sqrt_ratio_next_x96: u128,
    /// Input-asset units consumed, fee excluded
    pub amount_in: u128,
    /// Output-asset units produced
    pub amount_out: u128,
    /// Fee taken from the input
    pub fee_amount: u128,
}

const FEE_DENOMINATOR: u128 = 1_000_000;

/// Consume as much of `amount_remaining` as the range between the current
/// price and `sqrt_ratio_target_x96` allows.
///
/// Positive `amount_remaining` is exact input (fee comes out of it first);
/// negative is exact output. The target price already encodes the swap
/// direction: a target below the current price means token0 is being sold.
pub fn compute_swap_step(
    env: &Env,
    sqrt_ratio_current_x96: u128,
    sqrt_ratio_target_x96: u128,
    liquidity: u128,
    amount_remaining: i128,
    fee_pips: u32,
) -> SwapStep {
    let zero_for_one = sqrt_ratio_current_x96 >= sqrt_ratio_target_x96;
    let exact_in = amount_remaining >= 0;
    let fee = fee_pips as u128;

    let sqrt_ratio_next_x96;
    let mut amount_in = 0u128;
    let mut amount_out = 0u128;

    if exact_in {
        let amount_after_fee = mul_div(
            env,
            amount_remaining as u128,
            FEE_DENOMINATOR - fee,
            FEE_DENOMINATOR,
        );

        // input needed to reach the target outright
        amount_in = if zero_for_one {
            get_amount0_delta(
                env,
                sqrt_ratio_target_x96,
                sqrt_ratio_current_x96,
                liquidity,
                true,
            )
        } else {
            get_amount1_delta(
                env,
                sqrt_ratio_current_x96,
                sqrt_ratio_target_x96,
                liquidity,
                true,
            )
        };

        sqrt_ratio_next_x96 = if amount_after_fee >= amount_in {
            sqrt_ratio_target_x96
        } else {
            get_next_sqrt_price_from_input(
                env,
                sqrt_ratio_current_x96,
                liquidity,
                amount_after_fee,
                zero_for_one,
            )
        };
    } else {
        amount_out = if zero_for_one {
            get_amount1_delta(
                env,
                sqrt_ratio_target_x96,
                sqrt_ratio_current_x96,
                liquidity,
                false,
            )
        } else {
            get_amount0_delta(
                env,
                sqrt_ratio_current_x96,
                sqrt_ratio_target_x96,
                liquidity,
                false,
            )
        };

        let amount_out_wanted = amount_remaining.unsigned_abs();
        sqrt_ratio_next_x96 = if amount_out_wanted >= amount_out {
            sqrt_ratio_target_x96
        } else {
            get_next_sqrt_price_from_output(
                env,
                sqrt_ratio_current_x96,
                liquidity,
                amount_out_wanted,
                zero_for_one,
            )
        };
    }

    let reached_target = sqrt_ratio_next_x96 == sqrt_ratio_target_x96;

    // Recompute whichever side was not fixed above from the realized price
    // move. Input rounds up, output rounds down.
    if zero_for_one {
        if !reached_target || !exact_in {
            amount_in = get_amount0_delta(
                env,
                sqrt_ratio_next_x96,
                sqrt_ratio_current_x96,
                liquidity,
                true,
            );
        }
        if !reached_target || exact_in {
            amount_out = get_amount1_delta(
                env,
                sqrt_ratio_next_x96,
                sqrt_ratio_current_x96,
                liquidity,
                false,
            );
        }
    } else {
        if !reached_target || !exact_in {
            amount_in = get_amount1_delta(
                env,
                sqrt_ratio_current_x96,
                sqrt_ratio_next_x96,
                liquidity,
                true,
            );
        }
        if !reached_target || exact_in {
            amount_out = get_amount0_delta(
                env,
                sqrt_ratio_current_x96,
                sqrt_ratio_next_x96,
                liquidity,
                false,
            );
        }
    }

    if !exact_in && amount_out > amount_remaining.unsigned_abs() {
        amount_out = amount_remaining.unsigned_abs();
    }

    let fee_amount = if exact_in && !reached_target {
        // stopped short of the boundary: whatever input is left over is fee
        (amount_remaining as u128) - amount_in
    } else {
        mul_div_rounding_up(env, amount_in, fee, FEE_DENOMINATOR - fee)
    };

    SwapStep {
        sqrt_ratio_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    }
}
