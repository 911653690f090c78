use crate::error::Error;
use crate::events;
use crate::orders;
use crate::storage::{get_config, get_state, set_state, MAX_TICK_CROSSINGS_PER_SWAP};
use crate::tick::{cross, next_initialized_tick_within_one_word};
use crate::SwapCallbackClient;
use amm_math::{add_delta, compute_swap_step, get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio, mul_div};
use amm_types::{Q96, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use soroban_sdk::{panic_with_error, token, Address, Bytes, Env};

/// Execute a swap.
///
/// Positive `amount_specified` is exact input, negative exact output. A zero
/// price limit defaults to the directional extreme. The loop walks tick
/// boundaries until the amount is spent, the limit is hit, or liquidity and
/// initialized ticks run out — leftover input in the last case is simply not
/// taken from the caller.
///
/// Settlement transfers the output to `recipient` first, then invokes the
/// callback and verifies the input actually arrived.
pub fn execute_swap(
    env: &Env,
    recipient: Address,
    zero_for_one: bool,
    amount_specified: i128,
    sqrt_price_limit_x96: u128,
    callback: Address,
    data: Bytes,
) -> (i128, i128) {
    if amount_specified == 0 {
        panic_with_error!(env, Error::ZeroAmount);
    }

    let config = get_config(env);
    let mut state = get_state(env);

    let sqrt_price_limit = if sqrt_price_limit_x96 == 0 {
        if zero_for_one {
            MIN_SQRT_RATIO + 1
        } else {
            MAX_SQRT_RATIO - 1
        }
    } else {
        sqrt_price_limit_x96
    };

    if zero_for_one {
        if sqrt_price_limit >= state.sqrt_price_x96 || sqrt_price_limit <= MIN_SQRT_RATIO {
            panic_with_error!(env, Error::PriceLimitInvalid);
        }
    } else if sqrt_price_limit <= state.sqrt_price_x96 || sqrt_price_limit >= MAX_SQRT_RATIO {
        panic_with_error!(env, Error::PriceLimitInvalid);
    }

    let exact_input = amount_specified > 0;

    let mut amount_remaining = amount_specified;
    let mut amount_calculated: i128 = 0;
    let mut sqrt_price_x96 = state.sqrt_price_x96;
    let mut tick = state.tick;
    let mut liquidity = state.liquidity;
    let mut fee_growth_global_x96 = if zero_for_one {
        state.fee_growth_global_0_x96
    } else {
        state.fee_growth_global_1_x96
    };

    // initialized crossings are the expensive part; cap them per call to
    // respect the ledger's write-entry budget
    let mut tick_crossings: u32 = 0;

    while amount_remaining != 0
        && sqrt_price_x96 != sqrt_price_limit
        && tick_crossings < MAX_TICK_CROSSINGS_PER_SWAP
    {
        let (tick_next, initialized) =
            next_initialized_tick_within_one_word(env, tick, config.tick_spacing, zero_for_one);
        let tick_next = tick_next.clamp(MIN_TICK, MAX_TICK);
        let sqrt_price_next_x96 = get_sqrt_ratio_at_tick(env, tick_next);

        // step no further than the boundary or the caller's limit
        let sqrt_price_target_x96 = if zero_for_one {
            sqrt_price_next_x96.max(sqrt_price_limit)
        } else {
            sqrt_price_next_x96.min(sqrt_price_limit)
        };

        let step = compute_swap_step(
            env,
            sqrt_price_x96,
            sqrt_price_target_x96,
            liquidity,
            amount_remaining,
            config.fee,
        );

        if exact_input {
            amount_remaining -= (step.amount_in + step.fee_amount) as i128;
            amount_calculated -= step.amount_out as i128;
        } else {
            amount_remaining += step.amount_out as i128;
            amount_calculated += (step.amount_in + step.fee_amount) as i128;
        }

        if liquidity > 0 && step.fee_amount > 0 {
            fee_growth_global_x96 =
                fee_growth_global_x96.wrapping_add(mul_div(env, step.fee_amount, Q96, liquidity));
        }

        sqrt_price_x96 = step.sqrt_ratio_next_x96;

        if sqrt_price_x96 == sqrt_price_next_x96 {
            // boundary reached; cross it
            if initialized {
                let (fee_growth_0, fee_growth_1) = if zero_for_one {
                    (fee_growth_global_x96, state.fee_growth_global_1_x96)
                } else {
                    (state.fee_growth_global_0_x96, fee_growth_global_x96)
                };

                let liquidity_net = cross(env, tick_next, fee_growth_0, fee_growth_1);
                let liquidity_net = if zero_for_one {
                    -liquidity_net
                } else {
                    liquidity_net
                };
                liquidity = add_delta(liquidity, liquidity_net);

                // a completed traversal of a limit-order range settles the
                // order: falling through its anchor, or rising through its
                // upper boundary
                let tick_after = if zero_for_one { tick_next - 1 } else { tick_next };
                if zero_for_one {
                    orders::fill_crossed_order(
                        env,
                        &config,
                        tick_next,
                        true,
                        tick_after,
                        fee_growth_0,
                        fee_growth_1,
                    );
                } else {
                    orders::fill_crossed_order(
                        env,
                        &config,
                        tick_next - config.tick_spacing,
                        false,
                        tick_after,
                        fee_growth_0,
                        fee_growth_1,
                    );
                }

                tick_crossings += 1;
            }

            tick = if zero_for_one { tick_next - 1 } else { tick_next };
        } else if sqrt_price_x96 != state.sqrt_price_x96 {
            // stopped inside the range
            tick = get_tick_at_sqrt_ratio(env, sqrt_price_x96);
        }
    }

    state.sqrt_price_x96 = sqrt_price_x96;
    state.tick = tick;
    state.liquidity = liquidity;
    if zero_for_one {
        state.fee_growth_global_0_x96 = fee_growth_global_x96;
    } else {
        state.fee_growth_global_1_x96 = fee_growth_global_x96;
    }
    set_state(env, &state);

    // positive: owed to the pool; negative: paid out by the pool
    let (amount0, amount1) = if zero_for_one == exact_input {
        (amount_specified - amount_remaining, amount_calculated)
    } else {
        (amount_calculated, amount_specified - amount_remaining)
    };

    settle(
        env,
        &config,
        &recipient,
        zero_for_one,
        amount0,
        amount1,
        callback,
        data,
    );

    events::emit_swap(
        env,
        &recipient,
        zero_for_one,
        amount0,
        amount1,
        state.sqrt_price_x96,
        state.tick,
    );
    (amount0, amount1)
}

/// Pay the output, then pull the input through the callback and verify the
/// pool's balance actually grew by what is owed.
#[allow(clippy::too_many_arguments)]
fn settle(
    env: &Env,
    config: &amm_types::PoolConfig,
    recipient: &Address,
    zero_for_one: bool,
    amount0: i128,
    amount1: i128,
    callback: Address,
    data: Bytes,
) {
    let pool = env.current_contract_address();
    let token0 = token::Client::new(env, &config.token0);
    let token1 = token::Client::new(env, &config.token1);

    let (input_token, input_owed, output_token, output_amount) = if zero_for_one {
        (&token0, amount0, &token1, -amount1)
    } else {
        (&token1, amount1, &token0, -amount0)
    };

    if output_amount > 0 {
        output_token.transfer(&pool, recipient, &output_amount);
    }

    if input_owed > 0 {
        let balance_before = input_token.balance(&pool);
        SwapCallbackClient::new(env, &callback).on_swap_owed(&amount0, &amount1, &data);
        if input_token.balance(&pool) - balance_before < input_owed {
            panic_with_error!(env, Error::DeliveryNotReceived);
        }
    }
}
