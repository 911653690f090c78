use crate::error::Error;
use crate::events;
use crate::storage::{get_config, get_position, get_state, set_position, set_state};
use crate::tick::{flip_tick, get_fee_growth_inside, update as update_tick};
use crate::MintCallbackClient;
use amm_math::{
    add_delta, get_amount0_delta, get_amount1_delta, get_amounts_for_liquidity,
    get_sqrt_ratio_at_tick, mul_div,
};
use amm_types::{PoolConfig, PositionKey, Q96};
use soroban_sdk::{panic_with_error, token, Address, Bytes, Env};

/// Add liquidity to a position.
///
/// The owed amounts are not taken from an authorized balance; instead the
/// given callback contract is invoked and must deliver them before it
/// returns. The pool samples its own balances around the callback and traps
/// with `DeliveryNotReceived` on any shortfall.
pub fn mint(
    env: &Env,
    recipient: Address,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    callback: Address,
    data: Bytes,
) -> (u128, u128) {
    if liquidity == 0 {
        panic_with_error!(env, Error::ZeroAmount);
    }

    let config = get_config(env);
    let mut state = get_state(env);
    check_ticks(env, tick_lower, tick_upper, config.tick_spacing);

    let sqrt_lower = get_sqrt_ratio_at_tick(env, tick_lower);
    let sqrt_upper = get_sqrt_ratio_at_tick(env, tick_upper);

    // amounts owed round against the depositor
    let (amount0, amount1) = amounts_owed(
        env,
        state.sqrt_price_x96,
        sqrt_lower,
        sqrt_upper,
        liquidity,
    );

    apply_liquidity_change(
        env,
        &config,
        &mut state,
        &recipient,
        tick_lower,
        tick_upper,
        liquidity as i128,
    );

    // pull-then-verify delivery through the callback
    let pool = env.current_contract_address();
    let token0 = token::Client::new(env, &config.token0);
    let token1 = token::Client::new(env, &config.token1);
    let balance0_before = token0.balance(&pool);
    let balance1_before = token1.balance(&pool);

    MintCallbackClient::new(env, &callback).on_mint_owed(
        &(amount0 as i128),
        &(amount1 as i128),
        &data,
    );

    if amount0 > 0 && token0.balance(&pool) - balance0_before < amount0 as i128 {
        panic_with_error!(env, Error::DeliveryNotReceived);
    }
    if amount1 > 0 && token1.balance(&pool) - balance1_before < amount1 as i128 {
        panic_with_error!(env, Error::DeliveryNotReceived);
    }

    events::emit_mint(
        env,
        &recipient,
        tick_lower,
        tick_upper,
        liquidity,
        amount0,
        amount1,
    );
    (amount0, amount1)
}

/// Remove liquidity from a position. The freed amounts (and any accrued
/// fees) become collectible via `collect`; nothing is transferred here.
/// A zero-liquidity burn is allowed as a fee checkpoint refresh.
pub fn burn(
    env: &Env,
    owner: Address,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> (u128, u128) {
    let config = get_config(env);
    let mut state = get_state(env);
    check_ticks(env, tick_lower, tick_upper, config.tick_spacing);

    let sqrt_lower = get_sqrt_ratio_at_tick(env, tick_lower);
    let sqrt_upper = get_sqrt_ratio_at_tick(env, tick_upper);

    // freed amounts round against the withdrawer
    let (amount0, amount1) = get_amounts_for_liquidity(
        env,
        state.sqrt_price_x96,
        sqrt_lower,
        sqrt_upper,
        liquidity,
    );

    apply_liquidity_change(
        env,
        &config,
        &mut state,
        &owner,
        tick_lower,
        tick_upper,
        -(liquidity as i128),
    );

    let key = PositionKey {
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    };
    let mut position = get_position(env, &key);
    position.tokens_owed_0 += amount0;
    position.tokens_owed_1 += amount1;
    set_position(env, &key, &position);

    events::emit_burn(
        env,
        &owner,
        tick_lower,
        tick_upper,
        liquidity,
        amount0,
        amount1,
    );
    (amount0, amount1)
}

/// Release collectible amounts accumulated by burns and fee accrual.
pub fn collect(
    env: &Env,
    owner: Address,
    recipient: Address,
    tick_lower: i32,
    tick_upper: i32,
    amount0_requested: u128,
    amount1_requested: u128,
) -> (u128, u128) {
    let config = get_config(env);

    let key = PositionKey {
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    };
    let mut position = get_position(env, &key);

    let amount0 = amount0_requested.min(position.tokens_owed_0);
    let amount1 = amount1_requested.min(position.tokens_owed_1);

    position.tokens_owed_0 -= amount0;
    position.tokens_owed_1 -= amount1;
    set_position(env, &key, &position);

    let pool = env.current_contract_address();
    if amount0 > 0 {
        token::Client::new(env, &config.token0).transfer(&pool, &recipient, &(amount0 as i128));
    }
    if amount1 > 0 {
        token::Client::new(env, &config.token1).transfer(&pool, &recipient, &(amount1 as i128));
    }

    events::emit_collect(
        env,
        &owner,
        &recipient,
        tick_lower,
        tick_upper,
        amount0,
        amount1,
    );
    (amount0, amount1)
}

/// Shared mint/burn plumbing: boundary ticks, bitmap, position fees, and the
/// in-range liquidity total, in that order.
fn apply_liquidity_change(
    env: &Env,
    config: &PoolConfig,
    state: &mut amm_types::PoolState,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    liquidity_delta: i128,
) {
    if liquidity_delta != 0 {
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

    let (fee_growth_inside_0, fee_growth_inside_1) = get_fee_growth_inside(
        env,
        tick_lower,
        tick_upper,
        state.tick,
        state.fee_growth_global_0_x96,
        state.fee_growth_global_1_x96,
    );

    let key = PositionKey {
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    };
    update_position(
        env,
        &key,
        liquidity_delta,
        fee_growth_inside_0,
        fee_growth_inside_1,
    );

    if liquidity_delta != 0 && state.tick >= tick_lower && state.tick < tick_upper {
        state.liquidity = add_delta(state.liquidity, liquidity_delta);
        set_state(env, state);
    }
}

/// Settle accrued fees against the checkpoint, then apply the liquidity
/// delta. Over-withdrawal surfaces here as `InsufficientLiquidity`.
fn update_position(
    env: &Env,
    key: &PositionKey,
    liquidity_delta: i128,
    fee_growth_inside_0_x96: u128,
    fee_growth_inside_1_x96: u128,
) {
    let mut position = get_position(env, key);

    if liquidity_delta < 0 && position.liquidity < liquidity_delta.unsigned_abs() {
        panic_with_error!(env, Error::InsufficientLiquidity);
    }

    if position.liquidity > 0 {
        let delta_0 = fee_growth_inside_0_x96.wrapping_sub(position.fee_growth_inside_0_last_x96);
        let delta_1 = fee_growth_inside_1_x96.wrapping_sub(position.fee_growth_inside_1_last_x96);

        position.tokens_owed_0 += mul_div(env, delta_0, position.liquidity, Q96);
        position.tokens_owed_1 += mul_div(env, delta_1, position.liquidity, Q96);
    }

    position.liquidity = add_delta(position.liquidity, liquidity_delta);
    position.fee_growth_inside_0_last_x96 = fee_growth_inside_0_x96;
    position.fee_growth_inside_1_last_x96 = fee_growth_inside_1_x96;

    set_position(env, key, &position);
}

/// Amounts a depositor owes for `liquidity` over the range, rounded up.
fn amounts_owed(
    env: &Env,
    sqrt_price_x96: u128,
    sqrt_lower: u128,
    sqrt_upper: u128,
    liquidity: u128,
) -> (u128, u128) {
    if sqrt_price_x96 <= sqrt_lower {
        (
            get_amount0_delta(env, sqrt_lower, sqrt_upper, liquidity, true),
            0,
        )
    } else if sqrt_price_x96 < sqrt_upper {
        (
            get_amount0_delta(env, sqrt_price_x96, sqrt_upper, liquidity, true),
            get_amount1_delta(env, sqrt_lower, sqrt_price_x96, liquidity, true),
        )
    } else {
        (
            0,
            get_amount1_delta(env, sqrt_lower, sqrt_upper, liquidity, true),
        )
    }
}

fn check_ticks(env: &Env, tick_lower: i32, tick_upper: i32, tick_spacing: i32) {
    if tick_lower >= tick_upper {
        panic_with_error!(env, Error::InvalidRange);
    }
    if tick_lower < amm_types::MIN_TICK
        || tick_upper > amm_types::MAX_TICK
        || tick_lower % tick_spacing != 0
        || tick_upper % tick_spacing != 0
    {
        panic_with_error!(env, Error::TickOutOfRange);
    }
}
