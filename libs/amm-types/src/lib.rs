#![no_std]

mod order;
mod pool;
mod position;
mod tick;

pub use order::*;
pub use pool::*;
pub use position::*;
pub use tick::*;

/// Q96 fixed-point scale (2^96), used for sqrt prices and growth accumulators
pub const Q96: u128 = 1 << 96;

/// Lowest usable tick index. The ladder is symmetric and clipped to the
/// range whose sqrt prices fit in a u128.
pub const MIN_TICK: i32 = -443636;

/// Highest usable tick index
pub const MAX_TICK: i32 = 443636;

/// sqrt(1.0001^MIN_TICK) * 2^96, the floor of the representable price range
pub const MIN_SQRT_RATIO: u128 = 18446743374134;

/// sqrt(1.0001^MAX_TICK) * 2^96, clipped to u128
pub const MAX_SQRT_RATIO: u128 = 340275971719517849884101479065584693834;

/// Swap fee expressed in hundredths of a basis point (1e-6 of the input)
pub type Fee = u32;

/// Tick spacing is a fixed function of the fee tier; unknown tiers are
/// rejected at pool construction.
pub fn fee_to_tick_spacing(fee: Fee) -> Option<i32> {
    match fee {
        500 => Some(10),
        3000 => Some(60),
        10000 => Some(200),
        _ => None,
    }
}

/// Upper bound on gross liquidity referencing a single tick, chosen so the
/// sum over every usable tick cannot overflow a u128.
pub fn max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let min_tick = (MIN_TICK / tick_spacing) * tick_spacing;
    let max_tick = (MAX_TICK / tick_spacing) * tick_spacing;
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u128 + 1;
    u128::MAX / num_ticks
}
