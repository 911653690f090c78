use soroban_sdk::contracterror;

/// Failures raised by the fixed-point kernels. Every function traps via
/// `panic_with_error!` rather than wrapping or truncating; the host reverts
/// the enclosing call.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MathError {
    /// A result exceeded the supported 128-bit fixed-point range
    Overflow = 1,
    DivisionByZero = 2,
    /// Input outside the supported tick or sqrt-price domain
    InputOutOfBounds = 3,
}
