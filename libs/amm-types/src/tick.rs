use soroban_sdk::contracttype;

/// Record kept for every initialized tick.
///
/// The `*_outside` snapshots follow the usual convention: their meaning is
/// relative to which side of the current tick this tick sits on, and they are
/// flipped against the global accumulators every time the tick is crossed.
#[contracttype]
#[derive(Clone, Debug, Default)]
pub struct TickInfo {
    /// Total liquidity that references this tick from either boundary
    pub liquidity_gross: u128,
    /// Net liquidity added when the price crosses this tick left-to-right
    pub liquidity_net: i128,
    pub fee_growth_outside_0_x96: u128,
    pub fee_growth_outside_1_x96: u128,
    /// Seconds spent on the other side of this tick, same flip convention
    pub seconds_outside: u64,
    pub initialized: bool,
}

impl TickInfo {
    pub fn new() -> Self {
        Self::default()
    }
}
