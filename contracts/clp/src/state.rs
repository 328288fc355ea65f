use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Deps, Order, StdResult};
use cw_storage_plus::{Bound, Item, Map};

use tidal::clp::Clp;

/// This structure stores the main config parameters for the CLP contract.
#[cw_serde]
pub struct Config {
    /// The reserve denomination every pool is priced against
    pub reserve_denom: String,
}

/// Stores the config struct at the given key
pub const CONFIG: Item<Config> = Item::new("config");

/// Created pools, keyed by ticker
pub const CLPS: Map<&str, Clp> = Map::new("clp");

/// ## Pagination settings
/// The maximum limit for reading pools from [`CLPS`]
const MAX_LIMIT: u32 = 30;
/// The default limit for reading pools from [`CLPS`]
const DEFAULT_LIMIT: u32 = 10;

/// Reads pools from [`CLPS`] in ascending ticker order, starting after the
/// `start_after` ticker if one is given.
pub fn read_clps(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Vec<Clp>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);

    CLPS.range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, clp) = item?;
            Ok(clp)
        })
        .collect()
}
