#![allow(dead_code)]

use amm_pool::{AmmPool, AmmPoolClient};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Bytes, Env};

pub const FEE: u32 = 3000;
pub const SPACING: i32 = 60;

/// sqrt price at a 1:1 exchange rate
pub const SQRT_PRICE_1: u128 = 1u128 << 96;

pub struct PoolFixture<'a> {
    pub pool: AmmPoolClient<'a>,
    pub pool_address: Address,
    pub factory: Address,
    pub admin: Address,
    pub token0: Address,
    pub token1: Address,
    pub receipt: Address,
    pub payer: Address,
}

/// Register and initialize a pool plus its collaborators: a sorted token
/// pair, the receipt multi-token mock, and a funded callback payer.
pub fn setup_pool(env: &Env, sqrt_price_x96: u128) -> PoolFixture<'_> {
    let fixture = setup_pool_without_receipt(env, sqrt_price_x96);
    let receipt = env.register(TestReceiptToken, ());
    fixture.pool.set_receipt_token(&receipt);
    PoolFixture { receipt, ..fixture }
}

pub fn setup_pool_without_receipt(env: &Env, sqrt_price_x96: u128) -> PoolFixture<'_> {
    let admin = Address::generate(env);
    let factory = Address::generate(env);
    let (token0, token1) = create_token_pair(env, &admin);

    let pool_address = env.register(AmmPool, ());
    let pool = AmmPoolClient::new(env, &pool_address);
    pool.initialize(&factory, &token0, &token1, &FEE, &sqrt_price_x96);

    let payer = env.register(TestPayer, ());
    TestPayerClient::new(env, &payer).init(&pool_address, &token0, &token1);
    fund(env, &token0, &payer, 1_000_000_000_000_000_000_000_000_000);
    fund(env, &token1, &payer, 1_000_000_000_000_000_000_000_000_000);

    PoolFixture {
        pool,
        pool_address,
        // placeholder; `setup_pool` swaps in the real mock
        receipt: factory.clone(),
        factory,
        admin,
        token0,
        token1,
        payer,
    }
}

pub fn create_token(env: &Env, admin: &Address) -> Address {
    env.register_stellar_asset_contract_v2(admin.clone())
        .address()
}

/// Two fresh tokens with the ordering the pool requires.
pub fn create_token_pair(env: &Env, admin: &Address) -> (Address, Address) {
    let a = create_token(env, admin);
    let b = create_token(env, admin);
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

pub fn fund(env: &Env, token: &Address, to: &Address, amount: i128) {
    token::StellarAssetClient::new(env, token).mint(to, &amount);
}

pub fn balance_of(env: &Env, token: &Address, owner: &Address) -> i128 {
    token::Client::new(env, token).balance(owner)
}

pub fn receipt_balance(env: &Env, receipt: &Address, owner: &Address, id: u128) -> i128 {
    TestReceiptTokenClient::new(env, receipt).balance(owner, &id)
}

pub fn no_data(env: &Env) -> Bytes {
    Bytes::new(env)
}

// === Receipt multi-token mock ===

#[contracttype]
#[derive(Clone)]
pub struct ReceiptBalanceKey {
    pub owner: Address,
    pub id: u128,
}

#[contract]
pub struct TestReceiptToken;

#[contractimpl]
impl TestReceiptToken {
    pub fn mint(env: Env, to: Address, id: u128, amount: i128) {
        let key = ReceiptBalanceKey { owner: to, id };
        let balance: i128 = env.storage().persistent().get(&key).unwrap_or(0);
        env.storage().persistent().set(&key, &(balance + amount));
    }

    pub fn burn(env: Env, from: Address, id: u128, amount: i128) {
        let key = ReceiptBalanceKey { owner: from, id };
        let balance: i128 = env.storage().persistent().get(&key).unwrap_or(0);
        if balance < amount {
            panic!("burn exceeds balance");
        }
        env.storage().persistent().set(&key, &(balance - amount));
    }

    pub fn balance(env: Env, owner: Address, id: u128) -> i128 {
        env.storage()
            .persistent()
            .get(&ReceiptBalanceKey { owner, id })
            .unwrap_or(0)
    }
}

// === Callback payer ===
//
// Plays the part of the external caller in the pull-then-verify protocol:
// whatever the pool says is owed, it transfers — minus an optional shortfall
// for exercising DeliveryNotReceived.

#[contracttype]
#[derive(Clone)]
pub enum PayerKey {
    Pool,
    Token0,
    Token1,
    Shortfall,
}

#[contract]
pub struct TestPayer;

#[contractimpl]
impl TestPayer {
    pub fn init(env: Env, pool: Address, token0: Address, token1: Address) {
        env.storage().instance().set(&PayerKey::Pool, &pool);
        env.storage().instance().set(&PayerKey::Token0, &token0);
        env.storage().instance().set(&PayerKey::Token1, &token1);
    }

    pub fn set_shortfall(env: Env, amount: i128) {
        env.storage().instance().set(&PayerKey::Shortfall, &amount);
    }

    pub fn on_mint_owed(env: Env, amount0: i128, amount1: i128, _data: Bytes) {
        deliver(&env, amount0, amount1);
    }

    pub fn on_swap_owed(env: Env, amount0: i128, amount1: i128, _data: Bytes) {
        deliver(&env, amount0, amount1);
    }
}

fn deliver(env: &Env, amount0: i128, amount1: i128) {
    let pool: Address = env.storage().instance().get(&PayerKey::Pool).unwrap();
    let token0: Address = env.storage().instance().get(&PayerKey::Token0).unwrap();
    let token1: Address = env.storage().instance().get(&PayerKey::Token1).unwrap();
    let shortfall: i128 = env.storage().instance().get(&PayerKey::Shortfall).unwrap_or(0);
    let me = env.current_contract_address();

    let owed0 = amount0 - shortfall;
    if owed0 > 0 {
        token::Client::new(env, &token0).transfer(&me, &pool, &owed0);
    }
    let owed1 = amount1 - shortfall;
    if owed1 > 0 {
        token::Client::new(env, &token1).transfer(&me, &pool, &owed1);
    }
}
