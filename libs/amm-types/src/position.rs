use soroban_sdk::{contracttype, Address};

/// Identifies a liquidity position: one owner, one tick range.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionKey {
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Per-position ledger entry. Fees accrue lazily: every touch recomputes the
/// delta between the current fee growth inside the range and the stored
/// checkpoint, scaled by the position's liquidity.
#[contracttype]
#[derive(Clone, Debug, Default)]
pub struct PositionInfo {
    pub liquidity: u128,
    pub fee_growth_inside_0_last_x96: u128,
    pub fee_growth_inside_1_last_x96: u128,
    /// Collectible token0, from burns and fee accrual
    pub tokens_owed_0: u128,
    /// Collectible token1
    pub tokens_owed_1: u128,
}

impl PositionInfo {
    pub fn new() -> Self {
        Self::default()
    }
}
