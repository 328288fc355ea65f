use cosmwasm_std::{Addr, Coin, StdResult};

/// Token factory subdenoms can be up to 44 characters long.
pub const MAX_TICKER_LENGTH: usize = 44;

/// Returns true if `ticker` can be used as the subdenom of a pool token.
pub fn is_valid_ticker(ticker: &str) -> bool {
    !ticker.is_empty()
        && ticker.len() <= MAX_TICKER_LENGTH
        && ticker.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Returns the full token factory denomination of the token issued for `ticker`.
///
/// The denom is a deterministic function of the engine address and the ticker,
/// so it doubles as the pool's identity on the bank ledger.
pub fn pool_denom(contract_addr: &Addr, ticker: &str) -> String {
    format!("factory/{contract_addr}/{ticker}")
}

/// Multiplies an order amount by a per-unit price. The result is denominated
/// in the price denom.
pub fn total_price(amount: &Coin, price: &Coin) -> StdResult<Coin> {
    Ok(Coin {
        denom: price.denom.clone(),
        amount: amount.amount.checked_mul(price.amount)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::{coin, Addr, StdError};

    #[test]
    fn test_ticker_validation() {
        assert!(is_valid_ticker("ETH"));
        assert!(is_valid_ticker("TOK2"));
        assert!(!is_valid_ticker(""));
        assert!(!is_valid_ticker("bad-ticker"));
        assert!(!is_valid_ticker("has space"));
        assert!(!is_valid_ticker(&"X".repeat(MAX_TICKER_LENGTH + 1)));
    }

    #[test]
    fn test_pool_denom() {
        let contract = Addr::unchecked("contract0");
        assert_eq!(pool_denom(&contract, "ETH"), "factory/contract0/ETH");
    }

    #[test]
    fn test_total_price() {
        let total = total_price(&coin(200, "eth"), &coin(8, "rune")).unwrap();
        assert_eq!(total, coin(1600, "rune"));

        let err = total_price(&coin(u128::MAX, "eth"), &coin(2, "rune")).unwrap_err();
        assert!(matches!(err, StdError::Overflow { .. }));
    }
}
