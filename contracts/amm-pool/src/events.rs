use soroban_sdk::{symbol_short, Address, Env};

pub fn emit_initialized(env: &Env, fee: u32, tick_spacing: i32, sqrt_price_x96: u128, tick: i32) {
    env.events().publish(
        (symbol_short!("init"),),
        (fee, tick_spacing, sqrt_price_x96, tick),
    );
}

pub fn emit_mint(
    env: &Env,
    recipient: &Address,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    amount0: u128,
    amount1: u128,
) {
    env.events().publish(
        (symbol_short!("mint"), recipient.clone()),
        (tick_lower, tick_upper, liquidity, amount0, amount1),
    );
}

pub fn emit_burn(
    env: &Env,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    amount0: u128,
    amount1: u128,
) {
    env.events().publish(
        (symbol_short!("burn"), owner.clone()),
        (tick_lower, tick_upper, liquidity, amount0, amount1),
    );
}

pub fn emit_collect(
    env: &Env,
    owner: &Address,
    recipient: &Address,
    tick_lower: i32,
    tick_upper: i32,
    amount0: u128,
    amount1: u128,
) {
    env.events().publish(
        (symbol_short!("collect"), owner.clone(), recipient.clone()),
        (tick_lower, tick_upper, amount0, amount1),
    );
}

pub fn emit_swap(
    env: &Env,
    recipient: &Address,
    zero_for_one: bool,
    amount0: i128,
    amount1: i128,
    sqrt_price_x96: u128,
    tick: i32,
) {
    env.events().publish(
        (symbol_short!("swap"), recipient.clone()),
        (zero_for_one, amount0, amount1, sqrt_price_x96, tick),
    );
}

pub fn emit_limit_order_created(
    env: &Env,
    owner: &Address,
    tick: i32,
    direction: bool,
    amount: i128,
    liquidity: u128,
    token_id: u128,
) {
    env.events().publish(
        (symbol_short!("lo_create"), owner.clone()),
        (tick, direction, amount, liquidity, token_id),
    );
}

pub fn emit_limit_order_filled(
    env: &Env,
    tick: i32,
    direction: bool,
    liquidity: u128,
    output: u128,
) {
    env.events().publish(
        (symbol_short!("lo_fill"),),
        (tick, direction, liquidity, output),
    );
}

pub fn emit_limit_order_claimed(
    env: &Env,
    owner: &Address,
    tick: i32,
    direction: bool,
    amount: i128,
    payout0: i128,
    payout1: i128,
) {
    env.events().publish(
        (symbol_short!("lo_claim"), owner.clone()),
        (tick, direction, amount, payout0, payout1),
    );
}
