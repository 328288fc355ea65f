use cosmwasm_std::{Coin, OverflowError, StdError};
use thiserror::Error;

/// This enum describes exchange contract errors
#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("kind must be 'buy' for buy orders or 'sell' for sell orders")]
    InvalidKind {},

    #[error("invalid genesis: {reason}")]
    InvalidGenesis { reason: String },

    #[error("order must not be expired")]
    OrderExpired {},

    #[error("denom of amount and price must not be the same")]
    SameDenom {},

    #[error("amount must be positive")]
    AmountNotPositive {},

    #[error("price must be positive")]
    PriceNotPositive {},

    #[error("orderbook direction is not supported, please swap amount and price denoms")]
    OrderBookDirection {},

    #[error("must have at least {required} to place this limit order")]
    InsufficientCoins { required: Coin },
}

impl ContractError {
    /// Stable numeric code clients dispatch on. The closed error kinds keep
    /// the historical codespace-15 numbering; host failures map to 0.
    pub fn code(&self) -> u32 {
        match self {
            ContractError::Std(_) => 0,
            ContractError::InvalidKind {} => 1,
            ContractError::InvalidGenesis { .. } => 2,
            ContractError::OrderExpired {} => 3,
            ContractError::SameDenom {} => 4,
            ContractError::AmountNotPositive {} => 5,
            ContractError::PriceNotPositive {} => 6,
            ContractError::OrderBookDirection {} => 7,
            ContractError::InsufficientCoins { .. } => 8,
        }
    }

    pub fn invalid_genesis(reason: impl Into<String>) -> Self {
        ContractError::InvalidGenesis {
            reason: reason.into(),
        }
    }
}

impl From<OverflowError> for ContractError {
    fn from(o: OverflowError) -> Self {
        StdError::from(o).into()
    }
}
