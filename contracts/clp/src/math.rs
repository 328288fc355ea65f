//! Bonding curve pricing.
//!
//! Every emission is the Bancor form `y = a * ((1 + b / c)^d - 1)` evaluated
//! in double precision and rounded half away from zero, which is the rounding
//! `f64::round` performs. All hosts computing IEEE-754 doubles produce
//! bit-identical results for these inputs; the unit tests pin the reference
//! vectors.

use cosmwasm_std::{StdError, StdResult, Uint128};

fn emission(a: f64, b: f64, c: f64, d: f64) -> f64 {
    a * ((1.0 + b / c).powf(d) - 1.0)
}

fn to_amount(value: f64) -> StdResult<Uint128> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded >= u128::MAX as f64 {
        return Err(StdError::generic_err(
            "bonding curve emission is out of range",
        ));
    }
    Ok(Uint128::new(rounded as u128))
}

/// Pool tokens emitted when `reserve_paid` reserve coins are paid into a pool
/// holding `reserve_balance` reserve coins against `current_supply` tokens.
/// The buy side uses the exponent `reserve_ratio / 100`.
pub fn token_emission(
    current_supply: Uint128,
    reserve_paid: Uint128,
    reserve_balance: Uint128,
    reserve_ratio: u64,
) -> StdResult<Uint128> {
    to_amount(emission(
        current_supply.u128() as f64,
        reserve_paid.u128() as f64,
        reserve_balance.u128() as f64,
        reserve_ratio as f64 / 100.0,
    ))
}

/// Reserve coins emitted when `tokens_paid` pool tokens are paid back into
/// the pool. The sell side uses the inverted exponent `100 / reserve_ratio`.
pub fn reserve_emission(
    reserve_balance: Uint128,
    tokens_paid: Uint128,
    current_supply: Uint128,
    reserve_ratio: u64,
) -> StdResult<Uint128> {
    to_amount(emission(
        reserve_balance.u128() as f64,
        tokens_paid.u128() as f64,
        current_supply.u128() as f64,
        100.0 / reserve_ratio as f64,
    ))
}
