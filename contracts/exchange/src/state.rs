use cosmwasm_std::{Deps, Order, StdResult};
use cw_storage_plus::{Bound, Item, Map};

use tidal::exchange::{OrderBook, OrderBookId, OrderKind};

/// Order books keyed by `(kind, amount denom, price denom)`. The denoms are
/// kept in the order the caller specified, so a reversed pair is a distinct
/// book.
pub const ORDER_BOOKS: Map<(&str, &str, &str), OrderBook> = Map::new("order_book");

/// The identifier handed to the next processed limit order
pub const NEXT_ORDER_ID: Item<u64> = Item::new("next_order_id");

/// Builds the storage key of the book an order of `kind` for
/// `(amount_denom, price_denom)` rests in.
pub fn book_key<'a>(
    kind: OrderKind,
    amount_denom: &'a str,
    price_denom: &'a str,
) -> (&'static str, &'a str, &'a str) {
    (kind.as_str(), amount_denom, price_denom)
}

/// ## Pagination settings
/// The maximum limit for reading books from [`ORDER_BOOKS`]
const MAX_LIMIT: u32 = 30;
/// The default limit for reading books from [`ORDER_BOOKS`]
const DEFAULT_LIMIT: u32 = 10;

/// Reads order books in ascending key-byte order, starting after the
/// `start_after` book if one is given. Key-byte order makes the export
/// deterministic across hosts.
pub fn read_order_books(
    deps: Deps,
    start_after: Option<OrderBookId>,
    limit: Option<u32>,
) -> StdResult<Vec<OrderBook>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_ref().map(|id| {
        Bound::exclusive(book_key(
            id.kind,
            id.amount_denom.as_str(),
            id.price_denom.as_str(),
        ))
    });

    ORDER_BOOKS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, book) = item?;
            Ok(book)
        })
        .collect()
}
