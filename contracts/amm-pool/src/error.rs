use soroban_sdk::contracterror;

/// Pool error taxonomy. Every failure traps, so state is restored as if the
/// call never happened; nothing is retried internally.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // lifecycle ordering
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // malformed tick inputs
    /// tick_lower must sit strictly below tick_upper
    InvalidRange = 3,
    /// Outside [MIN_TICK, MAX_TICK] or misaligned to the tick spacing
    TickOutOfRange = 4,
    /// Limit-order anchor misaligned or on the wrong side of the price
    InvalidTick = 5,

    // caller attempts to remove or claim more than owned
    InsufficientLiquidity = 6,
    InsufficientReceiptBalance = 7,

    /// Swap price limit on the wrong side of the current price
    PriceLimitInvalid = 8,
    /// Expected asset transfer did not materialize after the callback
    DeliveryNotReceived = 9,

    // no-op guards
    ZeroAmount = 10,
    NothingToClaim = 11,

    /// A state-mutating entry point was re-entered through a callback
    ReentrancyLocked = 12,

    // receipt-token collaborator wiring
    ReceiptTokenNotSet = 13,
    ReceiptTokenAlreadySet = 14,

    // construction
    InvalidFee = 15,
    InvalidTokenOrder = 16,

    /// Gross liquidity on a tick exceeded the per-tick maximum
    LiquidityOverflow = 17,
}
