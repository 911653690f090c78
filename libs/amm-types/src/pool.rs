use soroban_sdk::{contracttype, Address};

/// Mutable pool state, kept in instance storage.
///
/// `fee_growth_global_*_x96` are cumulative fees per unit of in-range
/// liquidity, X96-scaled. They only ever grow; all consumers subtract
/// snapshots with wrapping arithmetic.
#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolState {
    /// Current sqrt(price) as Q64.96
    pub sqrt_price_x96: u128,
    /// Tick whose price range contains the current price
    pub tick: i32,
    /// Liquidity active at the current price
    pub liquidity: u128,
    pub fee_growth_global_0_x96: u128,
    pub fee_growth_global_1_x96: u128,
    /// Reserved protocol-fee accumulators; no accrual path is configured
    pub protocol_fees_0: i128,
    pub protocol_fees_1: i128,
}

impl PoolState {
    pub fn new(sqrt_price_x96: u128, tick: i32) -> Self {
        Self {
            sqrt_price_x96,
            tick,
            liquidity: 0,
            fee_growth_global_0_x96: 0,
            fee_growth_global_1_x96: 0,
            protocol_fees_0: 0,
            protocol_fees_1: 0,
        }
    }
}

/// Immutable pool parameters, fixed at initialization.
#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Deploying factory; also gates one-time collaborator wiring
    pub factory: Address,
    /// Token0 address (must sort below token1)
    pub token0: Address,
    /// Token1 address
    pub token1: Address,
    /// Fee tier in hundredths of a basis point
    pub fee: u32,
    /// Tick spacing derived from the fee tier
    pub tick_spacing: i32,
    pub max_liquidity_per_tick: u128,
}
