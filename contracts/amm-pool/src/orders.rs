use crate::error::Error;
use crate::events;
use crate::storage::{
    get_config, get_limit_order, get_receipt_token, get_state, set_limit_order, set_state,
};
use crate::tick::{flip_tick, update as update_tick};
use crate::ReceiptTokenClient;
use amm_math::{
    add_delta, get_amount0_delta, get_amount1_delta, get_amounts_for_liquidity,
    get_liquidity_for_amount0, get_liquidity_for_amount1, get_sqrt_ratio_at_tick, mul_div,
};
use amm_types::{PoolConfig, Q96};
use soroban_sdk::{panic_with_error, token, Address, Env};

/// Deterministic receipt token id for a (tick, direction) pair.
pub fn token_id(env: &Env, tick: i32, direction: bool) -> u128 {
    if !(amm_types::MIN_TICK..=amm_types::MAX_TICK).contains(&tick) {
        panic_with_error!(env, Error::TickOutOfRange);
    }
    let offset = (tick - amm_types::MIN_TICK) as u128;
    (offset << 1) | direction as u128
}

/// Inverse of `token_id`. Unknown ids simply resolve to an empty order.
pub fn token_id_parts(id: u128) -> (i32, bool) {
    let tick = (id >> 1) as i64 + amm_types::MIN_TICK as i64;
    (tick as i32, id & 1 == 1)
}

/// Deposit a one-sided amount at an anchor tick.
///
/// Direction `true` sells token1 for token0: the deposit sits in
/// [tick, tick + spacing] below the current price and converts as the price
/// falls through the anchor. Direction `false` is the mirror image, selling
/// token0 as the price rises through the range. Receipt units are minted 1:1
/// with the deposited amount under the derived token id.
pub fn create_limit_order(
    env: &Env,
    owner: Address,
    tick: i32,
    amount: i128,
    direction: bool,
) -> u128 {
    let config = get_config(env);
    let mut state = get_state(env);
    let receipt = get_receipt_token(env);

    if amount <= 0 {
        panic_with_error!(env, Error::ZeroAmount);
    }

    let tick_upper = tick + config.tick_spacing;
    if tick < amm_types::MIN_TICK || tick_upper > amm_types::MAX_TICK {
        panic_with_error!(env, Error::TickOutOfRange);
    }
    if tick % config.tick_spacing != 0 {
        panic_with_error!(env, Error::InvalidTick);
    }

    let sqrt_lower = get_sqrt_ratio_at_tick(env, tick);
    let sqrt_upper = get_sqrt_ratio_at_tick(env, tick_upper);

    // the deposit must be strictly one-sided at the current price
    if direction {
        if state.sqrt_price_x96 < sqrt_upper {
            panic_with_error!(env, Error::InvalidTick);
        }
    } else if state.sqrt_price_x96 > sqrt_lower {
        panic_with_error!(env, Error::InvalidTick);
    }

    let liquidity = if direction {
        get_liquidity_for_amount1(env, sqrt_lower, sqrt_upper, amount as u128)
    } else {
        get_liquidity_for_amount0(env, sqrt_lower, sqrt_upper, amount as u128)
    };
    if liquidity == 0 {
        panic_with_error!(env, Error::ZeroAmount);
    }

    // anchor the liquidity in the tick registry so swaps trade through it
    anchor_liquidity(env, &config, &state, tick, tick_upper, liquidity as i128);
    if state.tick >= tick && state.tick < tick_upper {
        state.liquidity = add_delta(state.liquidity, liquidity as i128);
        set_state(env, &state);
    }

    let deposit_token = if direction {
        &config.token1
    } else {
        &config.token0
    };
    token::Client::new(env, deposit_token).transfer(
        &owner,
        &env.current_contract_address(),
        &amount,
    );

    let mut order = get_limit_order(env, tick, direction);
    order.liquidity += liquidity;
    order.receipt_supply += amount as u128;
    set_limit_order(env, tick, direction, &order);

    let id = token_id(env, tick, direction);
    ReceiptTokenClient::new(env, &receipt).mint(&owner, &id, &amount);

    events::emit_limit_order_created(env, &owner, tick, direction, amount, liquidity, id);
    id
}

/// Swap-engine hook: the price has fully traversed the order's range, so its
/// whole live liquidity is withdrawn in one step and the converted output is
/// credited to the fill accumulator, divided over the receipts outstanding
/// right now.
///
/// Called after the engine has applied the crossed tick's net delta, so the
/// withdrawal must not touch in-range liquidity (the range is now entirely
/// behind the price).
pub fn fill_crossed_order(
    env: &Env,
    config: &PoolConfig,
    anchor: i32,
    direction: bool,
    tick_current: i32,
    fee_growth_global_0_x96: u128,
    fee_growth_global_1_x96: u128,
) {
    let mut order = get_limit_order(env, anchor, direction);
    if order.liquidity == 0 {
        return;
    }

    let tick_upper = anchor + config.tick_spacing;
    let sqrt_lower = get_sqrt_ratio_at_tick(env, anchor);
    let sqrt_upper = get_sqrt_ratio_at_tick(env, tick_upper);

    // full conversion of the deposited side across the range, rounded down
    let output = if direction {
        get_amount0_delta(env, sqrt_lower, sqrt_upper, order.liquidity, false)
    } else {
        get_amount1_delta(env, sqrt_lower, sqrt_upper, order.liquidity, false)
    };

    withdraw_anchored_liquidity(
        env,
        config,
        anchor,
        tick_upper,
        order.liquidity,
        tick_current,
        fee_growth_global_0_x96,
        fee_growth_global_1_x96,
    );

    if output > 0 && order.receipt_supply > 0 {
        order.fill_growth_x96 += mul_div(env, output, Q96, order.receipt_supply);
    }
    let filled_liquidity = order.liquidity;
    order.liquidity = 0;
    set_limit_order(env, anchor, direction, &order);

    events::emit_limit_order_filled(env, anchor, direction, filled_liquidity, output);
}

/// Aggregate converted-and-unclaimed output for a token id.
pub fn claimable(env: &Env, id: u128) -> u128 {
    let (tick, direction) = token_id_parts(id);
    let order = get_limit_order(env, tick, direction);
    mul_div(env, order.receipt_supply, order.fill_growth_x96, Q96)
}

/// Burn `amount` receipt units and settle the holder's share: the credited
/// output for the filled part plus the proportional slice of any live
/// liquidity at the current price (which pays in both assets when a swap
/// stopped inside the range).
pub fn claim_limit_order(
    env: &Env,
    owner: Address,
    tick: i32,
    direction: bool,
    amount: i128,
) -> (i128, i128) {
    let config = get_config(env);
    let mut state = get_state(env);
    let receipt = get_receipt_token(env);

    if amount <= 0 {
        panic_with_error!(env, Error::ZeroAmount);
    }

    let id = token_id(env, tick, direction);
    let receipt_client = ReceiptTokenClient::new(env, &receipt);
    if receipt_client.balance(&owner, &id) < amount {
        panic_with_error!(env, Error::InsufficientReceiptBalance);
    }

    let mut order = get_limit_order(env, tick, direction);
    if order.receipt_supply < amount as u128 {
        panic_with_error!(env, Error::InsufficientReceiptBalance);
    }

    let filled_output = mul_div(env, amount as u128, order.fill_growth_x96, Q96);

    // share of the still-anchored liquidity, withdrawn at the current price
    let liquidity_share = if order.liquidity > 0 {
        mul_div(env, order.liquidity, amount as u128, order.receipt_supply)
    } else {
        0
    };

    let tick_upper = tick + config.tick_spacing;
    let (mut unfilled0, mut unfilled1) = (0u128, 0u128);
    if liquidity_share > 0 {
        let sqrt_lower = get_sqrt_ratio_at_tick(env, tick);
        let sqrt_upper = get_sqrt_ratio_at_tick(env, tick_upper);

        withdraw_anchored_liquidity(
            env,
            &config,
            tick,
            tick_upper,
            liquidity_share,
            state.tick,
            state.fee_growth_global_0_x96,
            state.fee_growth_global_1_x96,
        );
        if state.tick >= tick && state.tick < tick_upper {
            state.liquidity = add_delta(state.liquidity, -(liquidity_share as i128));
            set_state(env, &state);
        }

        let (amount0, amount1) = get_amounts_for_liquidity(
            env,
            state.sqrt_price_x96,
            sqrt_lower,
            sqrt_upper,
            liquidity_share,
        );
        unfilled0 = amount0;
        unfilled1 = amount1;
    }

    let (payout0, payout1) = if direction {
        (filled_output + unfilled0, unfilled1)
    } else {
        (unfilled0, filled_output + unfilled1)
    };
    if payout0 == 0 && payout1 == 0 {
        panic_with_error!(env, Error::NothingToClaim);
    }

    receipt_client.burn(&owner, &id, &amount);
    order.receipt_supply -= amount as u128;
    order.liquidity -= liquidity_share;
    set_limit_order(env, tick, direction, &order);

    let pool = env.current_contract_address();
    if payout0 > 0 {
        token::Client::new(env, &config.token0).transfer(&pool, &owner, &(payout0 as i128));
    }
    if payout1 > 0 {
        token::Client::new(env, &config.token1).transfer(&pool, &owner, &(payout1 as i128));
    }

    events::emit_limit_order_claimed(
        env,
        &owner,
        tick,
        direction,
        amount,
        payout0 as i128,
        payout1 as i128,
    );
    (payout0 as i128, payout1 as i128)
}

fn anchor_liquidity(
    env: &Env,
    config: &PoolConfig,
    state: &amm_types::PoolState,
    tick_lower: i32,
    tick_upper: i32,
    liquidity_delta: i128,
) {
    let flipped_lower = update_tick(
        env,
        tick_lower,
        state.tick,
        liquidity_delta,
        state.fee_growth_global_0_x96,
        state.fee_growth_global_1_x96,
        false,
        config.max_liquidity_per_tick,
    );
    let flipped_upper = update_tick(
        env,
        tick_upper,
        state.tick,
        liquidity_delta,
        state.fee_growth_global_0_x96,
        state.fee_growth_global_1_x96,
        true,
        config.max_liquidity_per_tick,
    );

    if flipped_lower {
        flip_tick(env, tick_lower, config.tick_spacing);
    }
    if flipped_upper {
        flip_tick(env, tick_upper, config.tick_spacing);
    }
}

#[allow(clippy::too_many_arguments)]
fn withdraw_anchored_liquidity(
    env: &Env,
    config: &PoolConfig,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    tick_current: i32,
    fee_growth_global_0_x96: u128,
    fee_growth_global_1_x96: u128,
) {
    let flipped_lower = update_tick(
        env,
        tick_lower,
        tick_current,
        -(liquidity as i128),
        fee_growth_global_0_x96,
        fee_growth_global_1_x96,
        false,
        config.max_liquidity_per_tick,
    );
    let flipped_upper = update_tick(
        env,
        tick_upper,
        tick_current,
        -(liquidity as i128),
        fee_growth_global_0_x96,
        fee_growth_global_1_x96,
        true,
        config.max_liquidity_per_tick,
    );

    if flipped_lower {
        flip_tick(env, tick_lower, config.tick_spacing);
    }
    if flipped_upper {
        flip_tick(env, tick_upper, config.tick_spacing);
    }
}
