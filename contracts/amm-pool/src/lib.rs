#![no_std]

mod error;
mod events;
mod liquidity;
mod orders;
mod storage;
mod swap;
mod tick;

pub use error::Error;

use amm_types::{
    fee_to_tick_spacing, max_liquidity_per_tick, LimitOrderInfo, PoolConfig, PoolState,
    PositionInfo, PositionKey, TickInfo,
};
use soroban_sdk::{
    contract, contractclient, contractimpl, panic_with_error, Address, Bytes, Env,
};
use storage::{
    acquire_lock, get_config, get_limit_order, get_position, get_state, get_tick, is_initialized,
    release_lock, set_config, set_state,
};

/// Contract expected on the other side of a `mint` call: it must deliver the
/// owed amounts to the pool before returning.
#[contractclient(name = "MintCallbackClient")]
pub trait MintCallback {
    fn on_mint_owed(env: Env, amount0: i128, amount1: i128, data: Bytes);
}

/// Contract expected on the other side of a `swap` call. The deltas are the
/// pool's view: positive amounts are owed to the pool.
#[contractclient(name = "SwapCallbackClient")]
pub trait SwapCallback {
    fn on_swap_owed(env: Env, amount0: i128, amount1: i128, data: Bytes);
}

/// Multi-token receipt ledger used for limit-order claims. Lives in its own
/// contract; the pool only mints, burns and reads balances.
#[contractclient(name = "ReceiptTokenClient")]
pub trait ReceiptToken {
    fn mint(env: Env, to: Address, id: u128, amount: i128);
    fn burn(env: Env, from: Address, id: u128, amount: i128);
    fn balance(env: Env, owner: Address, id: u128) -> i128;
}

#[contract]
pub struct AmmPool;

#[contractimpl]
impl AmmPool {
    /// Set up the pool exactly once. Tick spacing is fixed by the fee tier.
    pub fn initialize(
        env: Env,
        factory: Address,
        token0: Address,
        token1: Address,
        fee: u32,
        sqrt_price_x96: u128,
    ) {
        if is_initialized(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        if token0 >= token1 {
            panic_with_error!(&env, Error::InvalidTokenOrder);
        }
        let tick_spacing = match fee_to_tick_spacing(fee) {
            Some(spacing) => spacing,
            None => panic_with_error!(&env, Error::InvalidFee),
        };

        let tick = amm_math::get_tick_at_sqrt_ratio(&env, sqrt_price_x96);

        set_config(
            &env,
            &PoolConfig {
                factory,
                token0,
                token1,
                fee,
                tick_spacing,
                max_liquidity_per_tick: max_liquidity_per_tick(tick_spacing),
            },
        );
        set_state(&env, &PoolState::new(sqrt_price_x96, tick));

        events::emit_initialized(&env, fee, tick_spacing, sqrt_price_x96, tick);
    }

    /// One-time wiring of the receipt-token collaborator; factory-gated.
    pub fn set_receipt_token(env: Env, receipt_token: Address) {
        let config = get_config(&env);
        config.factory.require_auth();
        if storage::has_receipt_token(&env) {
            panic_with_error!(&env, Error::ReceiptTokenAlreadySet);
        }
        storage::set_receipt_token(&env, &receipt_token);
    }

    /// Add liquidity. Returns the (amount0, amount1) the callback delivered.
    pub fn mint(
        env: Env,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        callback: Address,
        data: Bytes,
    ) -> (u128, u128) {
        acquire_lock(&env);
        let amounts = liquidity::mint(
            &env, recipient, tick_lower, tick_upper, liquidity, callback, data,
        );
        release_lock(&env);
        amounts
    }

    /// Remove liquidity; the freed amounts become collectible, not
    /// transferred.
    pub fn burn(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
    ) -> (u128, u128) {
        owner.require_auth();
        acquire_lock(&env);
        let amounts = liquidity::burn(&env, owner, tick_lower, tick_upper, liquidity);
        release_lock(&env);
        amounts
    }

    /// Release collectible amounts from a position.
    pub fn collect(
        env: Env,
        owner: Address,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> (u128, u128) {
        owner.require_auth();
        acquire_lock(&env);
        let amounts = liquidity::collect(
            &env,
            owner,
            recipient,
            tick_lower,
            tick_upper,
            amount0_requested,
            amount1_requested,
        );
        release_lock(&env);
        amounts
    }

    /// Swap. Returns net (amount0, amount1) from the pool's perspective:
    /// positive owed to the pool, negative paid out.
    pub fn swap(
        env: Env,
        recipient: Address,
        zero_for_one: bool,
        amount_specified: i128,
        sqrt_price_limit_x96: u128,
        callback: Address,
        data: Bytes,
    ) -> (i128, i128) {
        acquire_lock(&env);
        let amounts = swap::execute_swap(
            &env,
            recipient,
            zero_for_one,
            amount_specified,
            sqrt_price_limit_x96,
            callback,
            data,
        );
        release_lock(&env);
        amounts
    }

    /// Deposit a one-sided limit order; mints receipt units 1:1 with
    /// `amount`. Returns the receipt token id.
    pub fn create_limit_order(
        env: Env,
        owner: Address,
        tick: i32,
        amount: i128,
        direction: bool,
    ) -> u128 {
        owner.require_auth();
        acquire_lock(&env);
        let id = orders::create_limit_order(&env, owner, tick, amount, direction);
        release_lock(&env);
        id
    }

    /// Burn receipt units and collect the holder's share of fills and any
    /// withdrawable remainder.
    pub fn claim_limit_order(
        env: Env,
        owner: Address,
        tick: i32,
        direction: bool,
        amount: i128,
    ) -> (i128, i128) {
        owner.require_auth();
        acquire_lock(&env);
        let payouts = orders::claim_limit_order(&env, owner, tick, direction, amount);
        release_lock(&env);
        payouts
    }

    /// Deterministic receipt token id for (tick, direction).
    pub fn get_token_id(env: Env, tick: i32, direction: bool) -> u128 {
        orders::token_id(&env, tick, direction)
    }

    /// Aggregate converted-and-unclaimed output currently claimable against
    /// a token id. Zero until the order's range has been fully crossed.
    pub fn token_id_claimable(env: Env, token_id: u128) -> u128 {
        orders::claimable(&env, token_id)
    }

    // === Views ===

    pub fn get_state(env: Env) -> PoolState {
        get_state(&env)
    }

    pub fn get_config(env: Env) -> PoolConfig {
        get_config(&env)
    }

    pub fn get_tick(env: Env, tick: i32) -> TickInfo {
        get_tick(&env, tick)
    }

    pub fn get_position(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
    ) -> PositionInfo {
        get_position(
            &env,
            &PositionKey {
                owner,
                tick_lower,
                tick_upper,
            },
        )
    }

    pub fn get_limit_order(env: Env, tick: i32, direction: bool) -> LimitOrderInfo {
        get_limit_order(&env, tick, direction)
    }

    pub fn sqrt_price_x96(env: Env) -> u128 {
        get_state(&env).sqrt_price_x96
    }

    pub fn tick(env: Env) -> i32 {
        get_state(&env).tick
    }

    pub fn liquidity(env: Env) -> u128 {
        get_state(&env).liquidity
    }

    pub fn token0(env: Env) -> Address {
        get_config(&env).token0
    }

    pub fn token1(env: Env) -> Address {
        get_config(&env).token1
    }

    pub fn fee(env: Env) -> u32 {
        get_config(&env).fee
    }

    pub fn tick_spacing(env: Env) -> i32 {
        get_config(&env).tick_spacing
    }
}
