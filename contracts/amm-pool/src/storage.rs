use crate::error::Error;
use amm_types::{LimitOrderInfo, PoolConfig, PoolState, PositionInfo, PositionKey, TickInfo};
use soroban_sdk::{contracttype, panic_with_error, Address, Env};

// Soroban ledger limits shape the storage layout: entries are read and
// written individually, and a transaction may touch at most ~100 read /
// ~50 write entries. Ticks, bitmap words, positions and limit-order records
// are therefore separate persistent entries, and empty ones are removed.
//
// A swap writes one tick entry per crossing (plus bitmap words when limit
// orders are withdrawn), so crossings per swap are capped below the write
// limit with headroom for state and settlement entries.
pub const MAX_TICK_CROSSINGS_PER_SWAP: u32 = 40;

/// Storage keys for the pool contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Immutable pool parameters (instance)
    Config,
    /// Mutable pool state (instance)
    State,
    /// Reentrancy flag, present while a mutating call is in progress
    Locked,
    /// Receipt multi-token collaborator address (instance)
    ReceiptToken,
    /// tick index -> TickInfo (persistent)
    Tick(i32),
    /// bitmap word index -> u128 (persistent)
    TickBitmap(i32),
    /// PositionKey -> PositionInfo (persistent)
    Position(PositionKey),
    /// (anchor tick, direction) -> LimitOrderInfo (persistent)
    LimitOrder(i32, bool),
}

const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Config / State ===

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> PoolConfig {
    extend_instance_ttl(env);
    match env.storage().instance().get(&DataKey::Config) {
        Some(config) => config,
        None => panic_with_error!(env, Error::NotInitialized),
    }
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

pub fn get_state(env: &Env) -> PoolState {
    extend_instance_ttl(env);
    match env.storage().instance().get(&DataKey::State) {
        Some(state) => state,
        None => panic_with_error!(env, Error::NotInitialized),
    }
}

pub fn set_state(env: &Env, state: &PoolState) {
    env.storage().instance().set(&DataKey::State, state);
    extend_instance_ttl(env);
}

// === Reentrancy lock ===

pub fn acquire_lock(env: &Env) {
    if env.storage().instance().has(&DataKey::Locked) {
        panic_with_error!(env, Error::ReentrancyLocked);
    }
    env.storage().instance().set(&DataKey::Locked, &true);
}

pub fn release_lock(env: &Env) {
    env.storage().instance().remove(&DataKey::Locked);
}

// === Receipt token collaborator ===

pub fn get_receipt_token(env: &Env) -> Address {
    match env.storage().instance().get(&DataKey::ReceiptToken) {
        Some(address) => address,
        None => panic_with_error!(env, Error::ReceiptTokenNotSet),
    }
}

pub fn has_receipt_token(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::ReceiptToken)
}

pub fn set_receipt_token(env: &Env, address: &Address) {
    env.storage().instance().set(&DataKey::ReceiptToken, address);
    extend_instance_ttl(env);
}

// === Ticks ===

pub fn get_tick(env: &Env, tick: i32) -> TickInfo {
    env.storage()
        .persistent()
        .get(&DataKey::Tick(tick))
        .unwrap_or_default()
}

pub fn set_tick(env: &Env, tick: i32, info: &TickInfo) {
    let key = DataKey::Tick(tick);
    if info.liquidity_gross == 0 && !info.initialized {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, info);
        extend_persistent_ttl(env, &key);
    }
}

// === Tick bitmap ===

pub fn get_tick_bitmap_word(env: &Env, word_pos: i32) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::TickBitmap(word_pos))
        .unwrap_or(0u128)
}

pub fn set_tick_bitmap_word(env: &Env, word_pos: i32, word: u128) {
    let key = DataKey::TickBitmap(word_pos);
    if word == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &word);
        extend_persistent_ttl(env, &key);
    }
}

// === Positions ===

pub fn get_position(env: &Env, key: &PositionKey) -> PositionInfo {
    env.storage()
        .persistent()
        .get(&DataKey::Position(key.clone()))
        .unwrap_or_default()
}

pub fn set_position(env: &Env, key: &PositionKey, info: &PositionInfo) {
    let data_key = DataKey::Position(key.clone());
    if info.liquidity == 0 && info.tokens_owed_0 == 0 && info.tokens_owed_1 == 0 {
        env.storage().persistent().remove(&data_key);
    } else {
        env.storage().persistent().set(&data_key, info);
        extend_persistent_ttl(env, &data_key);
    }
}

// === Limit orders ===

pub fn get_limit_order(env: &Env, tick: i32, direction: bool) -> LimitOrderInfo {
    env.storage()
        .persistent()
        .get(&DataKey::LimitOrder(tick, direction))
        .unwrap_or_default()
}

/// Order records persist once created; the aggregate's running values are
/// the claim ledger, so the entry is never removed.
pub fn set_limit_order(env: &Env, tick: i32, direction: bool, info: &LimitOrderInfo) {
    let key = DataKey::LimitOrder(tick, direction);
    env.storage().persistent().set(&key, info);
    extend_persistent_ttl(env, &key);
}
