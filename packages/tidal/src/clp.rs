use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Coin, Uint128};

/// The lowest reserve ratio (in percent) a pool can be created with.
pub const MIN_RESERVE_RATIO: u64 = 1;
/// The highest reserve ratio (in percent) a pool can be created with.
/// A 100% ratio makes the bonding curve linear.
pub const MAX_RESERVE_RATIO: u64 = 100;

/// This structure stores the main parameters of a continuous liquidity pool.
#[cw_serde]
pub struct Clp {
    /// The account that created the pool
    pub creator: Addr,
    /// Ticker symbol the pool was created for
    pub ticker: String,
    /// Human readable token name
    pub name: String,
    /// Number of decimals the issued token uses
    pub decimals: u8,
    /// Reserve ratio in percent, within [1, 100]
    pub reserve_ratio: u64,
    /// Token supply minted when the pool was created
    pub initial_supply: Uint128,
    /// Supply the bonding curve prices against. Trades move already minted
    /// tokens, so this stays at `initial_supply`; creation is the only mint.
    pub current_supply: Uint128,
    /// Full token factory denom of the issued token
    pub denom: String,
    /// Reserve coins deposited into the pool
    pub reserve_balance: Uint128,
    /// Issued tokens still held by the pool
    pub token_balance: Uint128,
}

/// This structure describes the parameters used for creating the CLP contract.
#[cw_serde]
pub struct InstantiateMsg {
    /// The reserve denomination every pool is priced against
    pub reserve_denom: String,
    /// Pool records to re-establish when replaying an exported state
    #[serde(default)]
    pub clps: Vec<Clp>,
}

/// This structure describes the execute messages of the contract.
#[cw_serde]
pub enum ExecuteMsg {
    /// Create a new continuous liquidity pool for `ticker`. The reserve
    /// deposit declared in `initial_base_amount` must be attached as funds.
    Create {
        /// Ticker symbol of the new token
        ticker: String,
        /// Human readable token name
        name: String,
        /// Number of decimals the issued token uses. Must fit into a byte.
        decimals: u32,
        /// Reserve ratio in percent, within [1, 100]
        reserve_ratio: u64,
        /// Token supply to mint into the pool
        initial_supply: Uint128,
        /// Reserve coins backing the pool, attached as funds
        initial_base_amount: Uint128,
    },
    /// Trade `from_amount` of `from_ticker` (attached as funds) for
    /// `to_ticker`. Either side may be the reserve denomination; trades
    /// between two pool tokens are bridged through the reserve.
    Trade {
        from_ticker: String,
        to_ticker: String,
        from_amount: Uint128,
    },
}

/// This structure describes the available query messages for the CLP contract.
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Config returns the contract settings.
    #[returns(ConfigResponse)]
    Config {},
    /// Clp returns the pool record stored for `ticker`.
    #[returns(Clp)]
    Clp { ticker: String },
    /// Clps returns pool records, paginated by ticker in ascending key order.
    #[returns(ClpsResponse)]
    Clps {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Price returns the spot price of `unit` pool tokens in the reserve
    /// denomination, i.e. the emission when selling `unit` tokens.
    #[returns(PriceResponse)]
    Price { ticker: String, unit: Uint128 },
}

#[cw_serde]
pub struct ConfigResponse {
    /// The reserve denomination every pool is priced against
    pub reserve_denom: String,
}

/// A custom struct for each query response that returns an array of pool records.
#[cw_serde]
pub struct ClpsResponse {
    pub clps: Vec<Clp>,
}

#[cw_serde]
pub struct PriceResponse {
    /// Reserve coins emitted for the requested amount of pool tokens
    pub price: Coin,
}

#[cw_serde]
pub struct MigrateMsg {}

/// Log event emitted after every trade. This is the observable API clients
/// parse out of the transaction result.
#[derive(
    ::serde::Serialize, ::serde::Deserialize, Clone, Debug, PartialEq, ::schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct TradeLog {
    /// Coins the sender spent, in the denomination they offered
    pub from_token_spent: Uint128,
    /// Coins the sender received, in the denomination they asked for
    pub to_token_received: Uint128,
    /// Reserve coins that moved through the pools to settle the trade
    pub reserve_transacted: Uint128,
}
