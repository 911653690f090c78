use soroban_sdk::contracttype;

/// Aggregate record for all limit orders sharing one (tick, direction) pair.
///
/// There is deliberately no per-depositor state here: ownership lives in the
/// receipt token, and fills are credited to `fill_growth_x96` so any receipt
/// balance can be settled proportionally at claim time. The record persists
/// for the lifetime of the pool once created.
#[contracttype]
#[derive(Clone, Debug, Default)]
pub struct LimitOrderInfo {
    /// Unfilled liquidity currently anchored in the tick registry
    pub liquidity: u128,
    /// Outstanding receipt units, minted 1:1 with deposited amounts
    pub receipt_supply: u128,
    /// Cumulative output-asset units credited per receipt unit, X96-scaled.
    /// Grows on every matching crossing; never decreases.
    pub fill_growth_x96: u128,
}

impl LimitOrderInfo {
    pub fn new() -> Self {
        Self::default()
    }
}
