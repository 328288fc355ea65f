use cosmwasm_std::{OverflowError, StdError};
use thiserror::Error;

use tidal::clp::MAX_RESERVE_RATIO;

/// This enum describes CLP contract errors
#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error(
        "reserve ratio must be higher than zero and less than or equal to {}",
        MAX_RESERVE_RATIO
    )]
    InvalidReserveRatio {},

    #[error("clp already exists for this ticker symbol")]
    ClpExists {},

    #[error("clp does not exist for this ticker symbol")]
    ClpNotExists {},

    #[error("ticker symbol cannot be used for a new clp")]
    InvalidTickerName {},

    #[error("stored clp record could not be decoded")]
    ClpParsing {},

    #[error("sender does not hold the coins required for this operation")]
    NotEnoughCoins {},

    #[error("initial token supply must be positive")]
    InvalidInitialSupply {},

    #[error("initial reserve deposit must be positive")]
    InvalidInitialBaseCoins {},

    #[error("clp cannot serve this side of the trade")]
    ClpEmpty {},

    #[error("cannot trade a coin for the same coin")]
    SameCoin {},

    #[error("token decimals must fit into a single byte")]
    InvalidDecimals {},
}

impl ContractError {
    /// Stable numeric code clients dispatch on. The closed error kinds keep
    /// the historical codespace-14 numbering; host failures map to 140.
    pub fn code(&self) -> u32 {
        match self {
            ContractError::Std(_) => 140,
            ContractError::InvalidReserveRatio {} => 141,
            ContractError::ClpExists {} => 142,
            ContractError::ClpNotExists {} => 143,
            ContractError::InvalidTickerName {} => 144,
            ContractError::ClpParsing {} => 145,
            ContractError::NotEnoughCoins {} => 146,
            ContractError::InvalidInitialSupply {} => 147,
            ContractError::InvalidInitialBaseCoins {} => 148,
            ContractError::ClpEmpty {} => 149,
            ContractError::SameCoin {} => 150,
            ContractError::InvalidDecimals {} => 151,
        }
    }
}

impl From<OverflowError> for ContractError {
    fn from(o: OverflowError) -> Self {
        StdError::from(o).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        let cases: Vec<(ContractError, u32)> = vec![
            (ContractError::InvalidReserveRatio {}, 141),
            (ContractError::ClpExists {}, 142),
            (ContractError::ClpNotExists {}, 143),
            (ContractError::InvalidTickerName {}, 144),
            (ContractError::ClpParsing {}, 145),
            (ContractError::NotEnoughCoins {}, 146),
            (ContractError::InvalidInitialSupply {}, 147),
            (ContractError::InvalidInitialBaseCoins {}, 148),
            (ContractError::ClpEmpty {}, 149),
            (ContractError::SameCoin {}, 150),
            (ContractError::InvalidDecimals {}, 151),
        ];
        for (err, code) in cases {
            assert_eq!(err.code(), code);
        }
    }
}
