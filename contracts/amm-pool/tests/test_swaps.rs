mod common;

use amm_math::get_sqrt_ratio_at_tick;
use common::{balance_of, no_data, setup_pool, SQRT_PRICE_1};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, Env};

const LIQUIDITY: u128 = 1_000_000_000_000_000_000_000;

#[test]
fn exact_input_swap_moves_price_down_and_pays_out() {
    let env = Env::default();
    env.mock_all_auths();
    let f = setup_pool(&env, SQRT_PRICE_1);
    let lp = Address::generate(&env);
    let trader = Address::generate(&env);

    f.pool
        .mint(&lp, &-600, &600, &LIQUIDITY, &f.payer, &no_data(&env));

    let amount_in = 1_000_000_000_000i128;
    let (amount0, amount1) =
        f.pool
            .swap(&trader, &true, &amount_in, &0u128, &f.payer, &no_data(&env));

    assert_eq!(amount0, amount_in, "exact input fully consumed");
    assert!(amount1 < 0, "token1 flows out");
    assert_eq!(balance_of(&env, &f.token1, &trader), -amount1);

    let state = f.pool.get_state();
    assert!(state.sqrt_price_x96 < SQRT_PRICE_1);
    assert!(state.tick <= 0);
    // output is worth slightly less than input: price impact plus fee
    assert!(-amount1 < amount0);
}

#[test]
fn exact_input_swap_other_direction() {
    let env = Env::default();
    env.mock_all_auths();
    let f = setup_pool(&env, SQRT_PRICE_1);
    let lp = Address::generate(&env);
    let trader = Address::generate(&env);

    f.pool
        .mint(&lp, &-600, &600, &LIQUIDITY, &f.payer, &no_data(&env));

    let amount_in = 1_000_000_000_000i128;
    let (amount0, amount1) =
        f.pool
            .swap(&trader, &false, &amount_in, &0u128, &f.payer, &no_data(&env));

    assert_eq!(amount1, amount_in);
    assert!(amount0 < 0);
    assert_eq!(balance_of(&env, &f.token0, &trader), -amount0);
    assert!(f.pool.sqrt_price_x96() > SQRT_PRICE_1);
}

#[test]
fn exact_output_swap_delivers_what_was_asked() {
    let env = Env::default();
    env.mock_all_auths();
    let f = setup_pool(&env, SQRT_PRICE_1);
    let lp = Address::generate(&env);
    let trader = Address::generate(&env);

    f.pool
        .mint(&lp, &-600, &600, &LIQUIDITY, &f.payer, &no_data(&env));

    let wanted = 1_000_000_000_000i128;
    let (amount0, amount1) =
        f.pool
            .swap(&trader, &true, &(-wanted), &0u128, &f.payer, &no_data(&env));

    assert_eq!(amount1, -wanted, "requested output delivered in full");
    assert!(amount0 > wanted, "input covers output plus fee and slippage");
    assert_eq!(balance_of(&env, &f.token1, &trader), wanted);
}

#[test]
fn crossing_a_tick_adjusts_active_liquidity() {
    let env = Env::default();
    env.mock_all_auths();
    let f = setup_pool(&env, SQRT_PRICE_1);
    let lp = Address::generate(&env);
    let trader = Address::generate(&env);

    f.pool
        .mint(&lp, &-600, &600, &LIQUIDITY, &f.payer, &no_data(&env));
    f.pool
        .mint(&lp, &-60, &60, &LIQUIDITY, &f.payer, &no_data(&env));
    assert_eq!(f.pool.liquidity(), 2 * LIQUIDITY);

    // drive the price below -60, leaving only the wide range active
    let limit = get_sqrt_ratio_at_tick(&env, -300);
    let amount_in = 100_000_000_000_000_000_000i128; // plenty
    f.pool
        .swap(&trader, &true, &amount_in, &limit, &f.payer, &no_data(&env));

    let state = f.pool.get_state();
    assert!(state.tick < -60);
    assert_eq!(state.liquidity, LIQUIDITY);
}

#[test]
fn price_limit_stops_the_swap_with_input_to_spare() {
    let env = Env::default();
    env.mock_all_auths();
    let f = setup_pool(&env, SQRT_PRICE_1);
    let lp = Address::generate(&env);
    let trader = Address::generate(&env);

    f.pool
        .mint(&lp, &-600, &600, &LIQUIDITY, &f.payer, &no_data(&env));

    let limit = get_sqrt_ratio_at_tick(&env, -120);
    let huge = 100_000_000_000_000_000_000_000i128;
    let (amount0, _) =
        f.pool
            .swap(&trader, &true, &huge, &limit, &f.payer, &no_data(&env));

    assert_eq!(f.pool.sqrt_price_x96(), limit);
    assert!(amount0 < huge, "leftover input is simply not taken");
}

#[test]
fn running_out_of_liquidity_ends_the_swap_without_error() {
    let env = Env::default();
    env.mock_all_auths();
    let f = setup_pool(&env, SQRT_PRICE_1);
    let lp = Address::generate(&env);
    let trader = Address::generate(&env);

    // one narrow range is all the liquidity there is
    f.pool
        .mint(&lp, &-60, &60, &LIQUIDITY, &f.payer, &no_data(&env));

    let limit = get_sqrt_ratio_at_tick(&env, -3000);
    let huge = 100_000_000_000_000_000_000_000i128;
    let (amount0, amount1) =
        f.pool
            .swap(&trader, &true, &huge, &limit, &f.payer, &no_data(&env));

    // consumed only what the range could absorb, then walked to the limit
    assert!(amount0 > 0 && amount0 < huge);
    assert!(amount1 < 0);
    assert_eq!(f.pool.liquidity(), 0);
    assert_eq!(f.pool.sqrt_price_x96(), limit);
}

#[test]
fn fee_growth_is_monotone_across_swaps() {
    let env = Env::default();
    env.mock_all_auths();
    let f = setup_pool(&env, SQRT_PRICE_1);
    let lp = Address::generate(&env);
    let trader = Address::generate(&env);

    f.pool
        .mint(&lp, &-600, &600, &LIQUIDITY, &f.payer, &no_data(&env));

    let mut last_0 = 0u128;
    let mut last_1 = 0u128;
    for direction in [true, false, true, false, false] {
        f.pool.swap(
            &trader,
            &direction,
            &1_000_000_000_000i128,
            &0u128,
            &f.payer,
            &no_data(&env),
        );
        let state = f.pool.get_state();
        assert!(state.fee_growth_global_0_x96 >= last_0);
        assert!(state.fee_growth_global_1_x96 >= last_1);
        last_0 = state.fee_growth_global_0_x96;
        last_1 = state.fee_growth_global_1_x96;
    }
    assert!(last_0 > 0);
    assert!(last_1 > 0);
}

#[test]
fn fees_accrue_to_positions_and_are_collectible() {
    let env = Env::default();
    env.mock_all_auths();
    let f = setup_pool(&env, SQRT_PRICE_1);
    let lp = Address::generate(&env);
    let trader = Address::generate(&env);

    f.pool
        .mint(&lp, &-600, &600, &LIQUIDITY, &f.payer, &no_data(&env));
    f.pool.swap(
        &trader,
        &true,
        &1_000_000_000_000_000i128,
        &0u128,
        &f.payer,
        &no_data(&env),
    );

    // a zero burn refreshes the fee checkpoint without touching liquidity
    f.pool.burn(&lp, &-600, &600, &0u128);
    let position = f.pool.get_position(&lp, &-600, &600);
    assert!(position.tokens_owed_0 > 0, "input-side fees accrued");
    assert_eq!(position.liquidity, LIQUIDITY);

    let (collected0, _) =
        f.pool
            .collect(&lp, &lp, &-600, &600, &u128::MAX, &u128::MAX);
    assert_eq!(collected0, position.tokens_owed_0);
}

#[test]
#[should_panic(expected = "Error(Contract, #8)")]
fn price_limit_on_wrong_side_is_rejected() {
    let env = Env::default();
    env.mock_all_auths();
    let f = setup_pool(&env, SQRT_PRICE_1);
    let trader = Address::generate(&env);

    // zero_for_one moves the price down; a limit above spot is nonsense
    f.pool.swap(
        &trader,
        &true,
        &1_000_000i128,
        &(SQRT_PRICE_1 * 2),
        &f.payer,
        &no_data(&env),
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #10)")]
fn zero_amount_swap_is_rejected() {
    let env = Env::default();
    env.mock_all_auths();
    let f = setup_pool(&env, SQRT_PRICE_1);
    let trader = Address::generate(&env);

    f.pool
        .swap(&trader, &true, &0i128, &0u128, &f.payer, &no_data(&env));
}

#[test]
#[should_panic(expected = "Error(Contract, #2)")]
fn swap_requires_initialization() {
    let env = Env::default();
    env.mock_all_auths();

    let pool_address = env.register(amm_pool::AmmPool, ());
    let pool = amm_pool::AmmPoolClient::new(&env, &pool_address);
    let trader = Address::generate(&env);

    pool.swap(&trader, &true, &1i128, &0u128, &trader, &no_data(&env));
}

#[test]
#[should_panic(expected = "Error(Contract, #9)")]
fn swap_short_delivery_is_detected() {
    let env = Env::default();
    env.mock_all_auths();
    let f = setup_pool(&env, SQRT_PRICE_1);
    let lp = Address::generate(&env);
    let trader = Address::generate(&env);

    f.pool
        .mint(&lp, &-600, &600, &LIQUIDITY, &f.payer, &no_data(&env));
    common::TestPayerClient::new(&env, &f.payer).set_shortfall(&1);
    f.pool.swap(
        &trader,
        &true,
        &1_000_000_000_000i128,
        &0u128,
        &f.payer,
        &no_data(&env),
    );
}
