use crate::error::Error;
use crate::storage::{get_tick, get_tick_bitmap_word, set_tick, set_tick_bitmap_word};
use soroban_sdk::{panic_with_error, Env};

/// Apply a liquidity delta to a tick boundary.
///
/// Initializes the record on first reference (snapshotting the growth
/// accumulators when the tick is at or below the current tick) and clears it
/// when gross liquidity returns to zero, so the record's existence always
/// mirrors the bitmap bit. Returns whether the initialized state flipped.
pub fn update(
    env: &Env,
    tick: i32,
    tick_current: i32,
    liquidity_delta: i128,
    fee_growth_global_0_x96: u128,
    fee_growth_global_1_x96: u128,
    upper: bool,
    max_liquidity: u128,
) -> bool {
    let mut info = get_tick(env, tick);

    let gross_before = info.liquidity_gross;
    let gross_after = amm_math::add_delta(gross_before, liquidity_delta);
    if gross_after > max_liquidity {
        panic_with_error!(env, Error::LiquidityOverflow);
    }

    let flipped = (gross_after == 0) != (gross_before == 0);

    if gross_before == 0 {
        // By convention everything accumulated so far happened below the
        // tick, so a tick at or under the current price starts with the
        // global values as its "outside" snapshot.
        if tick <= tick_current {
            info.fee_growth_outside_0_x96 = fee_growth_global_0_x96;
            info.fee_growth_outside_1_x96 = fee_growth_global_1_x96;
            info.seconds_outside = env.ledger().timestamp();
        }
        info.initialized = true;
    }

    info.liquidity_gross = gross_after;
    info.liquidity_net = if upper {
        info.liquidity_net - liquidity_delta
    } else {
        info.liquidity_net + liquidity_delta
    };

    if gross_after == 0 {
        // last reference gone; reset so storage drops the record
        info = Default::default();
    }

    set_tick(env, tick, &info);
    flipped
}

/// Cross a tick during a swap: flip the outside snapshots against the
/// current global accumulators and report the net liquidity change.
/// Wrapping subtraction is deliberate; only differences of snapshots are
/// ever meaningful.
pub fn cross(
    env: &Env,
    tick: i32,
    fee_growth_global_0_x96: u128,
    fee_growth_global_1_x96: u128,
) -> i128 {
    let mut info = get_tick(env, tick);

    info.fee_growth_outside_0_x96 =
        fee_growth_global_0_x96.wrapping_sub(info.fee_growth_outside_0_x96);
    info.fee_growth_outside_1_x96 =
        fee_growth_global_1_x96.wrapping_sub(info.fee_growth_outside_1_x96);
    info.seconds_outside = env.ledger().timestamp().wrapping_sub(info.seconds_outside);

    set_tick(env, tick, &info);
    info.liquidity_net
}

/// Fee growth accumulated strictly inside [tick_lower, tick_upper], per unit
/// liquidity. O(1): derived from the global accumulators and the two
/// boundary snapshots, interpreted relative to where the current tick sits.
pub fn get_fee_growth_inside(
    env: &Env,
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    fee_growth_global_0_x96: u128,
    fee_growth_global_1_x96: u128,
) -> (u128, u128) {
    let lower = get_tick(env, tick_lower);
    let upper = get_tick(env, tick_upper);

    let (below_0, below_1) = if tick_current >= tick_lower {
        (lower.fee_growth_outside_0_x96, lower.fee_growth_outside_1_x96)
    } else {
        (
            fee_growth_global_0_x96.wrapping_sub(lower.fee_growth_outside_0_x96),
            fee_growth_global_1_x96.wrapping_sub(lower.fee_growth_outside_1_x96),
        )
    };

    let (above_0, above_1) = if tick_current < tick_upper {
        (upper.fee_growth_outside_0_x96, upper.fee_growth_outside_1_x96)
    } else {
        (
            fee_growth_global_0_x96.wrapping_sub(upper.fee_growth_outside_0_x96),
            fee_growth_global_1_x96.wrapping_sub(upper.fee_growth_outside_1_x96),
        )
    };

    (
        fee_growth_global_0_x96
            .wrapping_sub(below_0)
            .wrapping_sub(above_0),
        fee_growth_global_1_x96
            .wrapping_sub(below_1)
            .wrapping_sub(above_1),
    )
}

// === Tick bitmap ===
//
// One u128 word indexes 128 spacing-aligned ticks, giving the swap loop a
// bounded "next initialized tick" probe per word.

/// Toggle the bitmap bit for an aligned tick.
pub fn flip_tick(env: &Env, tick: i32, tick_spacing: i32) {
    if tick % tick_spacing != 0 {
        panic_with_error!(env, Error::InvalidTick);
    }

    let compressed = tick / tick_spacing;
    let word_pos = compressed >> 7;
    let bit_pos = compressed.rem_euclid(128) as u8;

    let word = get_tick_bitmap_word(env, word_pos);
    set_tick_bitmap_word(env, word_pos, word ^ (1u128 << bit_pos));
}

/// Nearest initialized tick within the bitmap word covering `tick`, searching
/// down (`lte`) or up. When the word holds no candidate, returns the word
/// boundary with `initialized = false` so the caller can keep scanning.
pub fn next_initialized_tick_within_one_word(
    env: &Env,
    tick: i32,
    tick_spacing: i32,
    lte: bool,
) -> (i32, bool) {
    let mut compressed = tick / tick_spacing;
    if tick < 0 && tick % tick_spacing != 0 {
        // round toward negative infinity, matching the price ladder
        compressed -= 1;
    }

    if lte {
        let word_pos = compressed >> 7;
        let bit_pos = compressed.rem_euclid(128) as u8;

        // bits at or below the current position
        let mask = (1u128 << bit_pos) - 1 + (1u128 << bit_pos);
        let masked = get_tick_bitmap_word(env, word_pos) & mask;

        let initialized = masked != 0;
        let next = if initialized {
            let msb = 127 - masked.leading_zeros() as i32;
            (word_pos * 128 + msb) * tick_spacing
        } else {
            (word_pos * 128) * tick_spacing
        };
        (next, initialized)
    } else {
        let start = compressed + 1;
        let word_pos = start >> 7;
        let bit_pos = start.rem_euclid(128) as u8;

        // bits at or above the current position
        let mask = !((1u128 << bit_pos) - 1);
        let masked = get_tick_bitmap_word(env, word_pos) & mask;

        let initialized = masked != 0;
        let next = if initialized {
            let lsb = masked.trailing_zeros() as i32;
            (word_pos * 128 + lsb) * tick_spacing
        } else {
            (word_pos * 128 + 127) * tick_spacing
        };
        (next, initialized)
    }
}
