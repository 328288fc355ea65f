use std::fmt;

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Coin, StdError, StdResult, Timestamp};

use crate::asset::total_price;

/// The side a limit order takes in its book.
#[derive(Copy, Eq)]
#[cw_serde]
pub enum OrderKind {
    /// The sender wants `amount` bought, paying with the price denom
    Buy,
    /// The sender wants `amount` sold, receiving the price denom
    Sell,
}

impl OrderKind {
    /// The side of the book an incoming order of this kind matches against.
    pub fn opposite(&self) -> OrderKind {
        match self {
            OrderKind::Buy => OrderKind::Sell,
            OrderKind::Sell => OrderKind::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Buy => "buy",
            OrderKind::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

/// A limit order resting in an order book.
#[cw_serde]
pub struct LimitOrder {
    /// Globally unique, monotonically assigned identifier
    pub order_id: u64,
    /// The account that placed the order and holds its escrow claim
    pub sender: Addr,
    pub kind: OrderKind,
    /// The unfilled amount. Decremented as the order fills; the order leaves
    /// the book once this reaches zero.
    pub amount: Coin,
    /// Limit price per unit of `amount`, in a different denom
    pub price: Coin,
    /// Orders expiring before the block time are refunded in the block's
    /// begin blocker
    pub expires_at: Timestamp,
}

impl LimitOrder {
    /// The coins locked in escrow while this order rests in a book: the full
    /// bid for a buy order, the offered amount for a sell order.
    pub fn locked_coin(&self) -> StdResult<Coin> {
        match self.kind {
            OrderKind::Buy => total_price(&self.amount, &self.price),
            OrderKind::Sell => Ok(self.amount.clone()),
        }
    }

    /// Tests whether this resting order fills an incoming order of the
    /// opposite kind. Returns the fillable amount and the fill price when the
    /// prices cross; the resting order's price always wins.
    ///
    /// The caller is responsible for fetching the matching book, so denom or
    /// kind mismatches are internal errors.
    pub fn fill_with(
        &self,
        kind: OrderKind,
        unfilled: &Coin,
        price: &Coin,
    ) -> StdResult<Option<(Coin, Coin)>> {
        if self.amount.denom != unfilled.denom {
            return Err(StdError::generic_err(format!(
                "amount denom does not match between stored order {} and order to fill {}",
                self.amount.denom, unfilled.denom
            )));
        }
        if self.price.denom != price.denom {
            return Err(StdError::generic_err(format!(
                "price denom does not match between stored order {} and order to fill {}",
                self.price.denom, price.denom
            )));
        }
        if self.kind == kind {
            return Err(StdError::generic_err(format!(
                "kind does not match between stored order {} and order to fill {}",
                self.kind, kind
            )));
        }

        let fill_amount = if unfilled.amount < self.amount.amount {
            unfilled.clone()
        } else {
            self.amount.clone()
        };

        let crosses = match kind {
            OrderKind::Buy => price.amount >= self.price.amount,
            OrderKind::Sell => self.price.amount >= price.amount,
        };

        Ok(crosses.then(|| (fill_amount, self.price.clone())))
    }
}

/// A price-time ordered list of resting limit orders for one
/// `(kind, amount denom, price denom)` triple.
#[cw_serde]
pub struct OrderBook {
    pub kind: OrderKind,
    pub amount_denom: String,
    pub price_denom: String,
    /// Best price first; equal prices keep arrival order
    pub orders: Vec<LimitOrder>,
}

impl OrderBook {
    pub fn new(
        kind: OrderKind,
        amount_denom: impl Into<String>,
        price_denom: impl Into<String>,
    ) -> Self {
        OrderBook {
            kind,
            amount_denom: amount_denom.into(),
            price_denom: price_denom.into(),
            orders: vec![],
        }
    }

    /// Inserts a limit order, ordered by price and then by time: a buy book
    /// has the most expensive orders first, a sell book the cheapest first.
    /// New orders go after resting orders with an equal price.
    pub fn add(&mut self, order: LimitOrder) -> StdResult<()> {
        if order.amount.denom != self.amount_denom {
            return Err(StdError::generic_err(format!(
                "amount denom does not match between limit order {} and order book {}",
                order.amount.denom, self.amount_denom
            )));
        }
        if order.price.denom != self.price_denom {
            return Err(StdError::generic_err(format!(
                "price denom does not match between limit order {} and order book {}",
                order.price.denom, self.price_denom
            )));
        }
        if order.kind != self.kind {
            return Err(StdError::generic_err(format!(
                "kind does not match between limit order {} and order book {}",
                order.kind, self.kind
            )));
        }

        let at = self
            .orders
            .iter()
            .position(|resting| self.goes_before(&order.price, &resting.price))
            .unwrap_or(self.orders.len());
        self.orders.insert(at, order);

        Ok(())
    }

    /// Whether an order priced `new_price` sorts strictly before a resting
    /// order priced `resting_price`.
    fn goes_before(&self, new_price: &Coin, resting_price: &Coin) -> bool {
        match self.kind {
            OrderKind::Buy => new_price.amount > resting_price.amount,
            OrderKind::Sell => new_price.amount < resting_price.amount,
        }
    }

    /// Drops every order that expired before `now` and returns the removed
    /// orders so the caller can restore their escrow.
    pub fn remove_expired(&mut self, now: Timestamp) -> Vec<LimitOrder> {
        let (expired, kept): (Vec<_>, Vec<_>) = self
            .orders
            .drain(..)
            .partition(|order| order.expires_at < now);
        self.orders = kept;
        expired
    }

    /// Drops orders whose amount reached zero, for cleanup after a matching pass.
    pub fn remove_filled(&mut self) {
        self.orders.retain(|order| !order.amount.amount.is_zero());
    }

    /// Whether the stored sequence respects the book's price ordering.
    pub fn is_sorted(&self) -> bool {
        self.orders
            .windows(2)
            .all(|pair| !self.goes_before(&pair[1].price, &pair[0].price))
    }
}

/// This structure describes the parameters used for creating the exchange contract.
#[cw_serde]
pub struct InstantiateMsg {
    /// The identifier handed to the first processed limit order
    pub starting_order_id: u64,
    /// Order books to re-establish when replaying an exported state. The
    /// escrow backing their orders must be provided to the contract account
    /// by the host's bank genesis.
    #[serde(default)]
    pub books: Vec<OrderBook>,
}

/// This structure describes the execute messages of the contract.
#[cw_serde]
pub enum ExecuteMsg {
    /// Place a limit order. The coins the order locks (the full bid for a
    /// buy order, the offered amount for a sell order) must be attached as
    /// funds; whatever the matching pass does not spend or park is refunded.
    CreateLimitOrder {
        kind: OrderKind,
        /// What the sender wants bought or sold
        amount: Coin,
        /// Limit price per unit of `amount`, in a different denom
        price: Coin,
        expires_at: Timestamp,
    },
}

/// Hooks the host chain invokes around block processing.
#[cw_serde]
pub enum SudoMsg {
    /// Runs before the block's transactions: refunds and removes every
    /// expired order.
    BeginBlocker {},
}

/// This structure describes the available query messages for the exchange contract.
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// NextOrderId returns the identifier the next processed order will get.
    #[returns(u64)]
    NextOrderId {},
    /// OrderBook returns the book stored for the given triple. An empty book
    /// is returned if no order was ever parked under it.
    #[returns(OrderBook)]
    OrderBook {
        kind: OrderKind,
        amount_denom: String,
        price_denom: String,
    },
    /// OrderBooks returns books paginated in ascending key order. This is
    /// the deterministic state export used for snapshots.
    #[returns(OrderBooksResponse)]
    OrderBooks {
        start_after: Option<OrderBookId>,
        limit: Option<u32>,
    },
}

/// Identifies one order book; used as a pagination cursor.
#[cw_serde]
pub struct OrderBookId {
    pub kind: OrderKind,
    pub amount_denom: String,
    pub price_denom: String,
}

/// A custom struct for each query response that returns an array of order books.
#[cw_serde]
pub struct OrderBooksResponse {
    pub books: Vec<OrderBook>,
}

#[cw_serde]
pub struct MigrateMsg {}

/// Returned after order matching to signal whether the order was fully
/// filled or an open amount is sitting in the order book.
#[cw_serde]
pub struct ProcessedLimitOrder {
    pub order_id: u64,
    /// The remainder parked in the sender's book; zero when fully filled
    pub open_amount: Coin,
}

/// Returned after order matching for every resting order the incoming order
/// (partially) filled.
#[cw_serde]
pub struct FilledLimitOrder {
    pub order_id: u64,
    pub filled_amount: Coin,
    pub filled_price: Coin,
}

/// Log event emitted after every processed limit order. This is the
/// observable API clients parse out of the transaction result.
#[cw_serde]
pub struct LimitOrderResponse {
    pub processed: ProcessedLimitOrder,
    pub filled: Vec<FilledLimitOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::coin;

    fn order(order_id: u64, kind: OrderKind, amount: Coin, price: Coin) -> LimitOrder {
        LimitOrder {
            order_id,
            sender: Addr::unchecked("sender"),
            kind,
            amount,
            price,
            expires_at: Timestamp::from_seconds(1_000),
        }
    }

    #[test]
    fn add_limit_order_to_empty_buy_order_book() {
        let mut book = OrderBook::new(OrderKind::Buy, "eth", "btc");
        let lo = order(4, OrderKind::Buy, coin(60, "eth"), coin(150, "btc"));

        book.add(lo.clone()).unwrap();

        assert_eq!(book.orders, vec![lo]);
    }

    #[test]
    fn add_limit_order_to_buy_order_book() {
        let mut book = OrderBook::new(OrderKind::Buy, "eth", "btc");
        let lo1 = order(1, OrderKind::Buy, coin(80, "eth"), coin(180, "btc"));
        let lo2 = order(2, OrderKind::Buy, coin(20, "eth"), coin(150, "btc"));
        let lo3 = order(3, OrderKind::Buy, coin(200, "eth"), coin(100, "btc"));
        book.orders = vec![lo1.clone(), lo2.clone(), lo3.clone()];

        // same price as lo2: goes after it, before the cheaper lo3
        let lo4 = order(4, OrderKind::Buy, coin(60, "eth"), coin(150, "btc"));
        book.add(lo4.clone()).unwrap();

        assert_eq!(book.orders, vec![lo1, lo2, lo4, lo3]);
        assert!(book.is_sorted());
    }

    #[test]
    fn add_limit_order_to_sell_order_book() {
        let mut book = OrderBook::new(OrderKind::Sell, "eth", "btc");
        let lo1 = order(1, OrderKind::Sell, coin(80, "eth"), coin(90, "btc"));
        let lo2 = order(2, OrderKind::Sell, coin(20, "eth"), coin(150, "btc"));
        let lo3 = order(3, OrderKind::Sell, coin(200, "eth"), coin(151, "btc"));
        book.orders = vec![lo1.clone(), lo2.clone(), lo3.clone()];

        let lo4 = order(4, OrderKind::Sell, coin(60, "eth"), coin(150, "btc"));
        book.add(lo4.clone()).unwrap();

        assert_eq!(book.orders, vec![lo1, lo2, lo4, lo3]);
        assert!(book.is_sorted());
    }

    #[test]
    fn add_limit_order_rejects_mismatches() {
        let mut book = OrderBook::new(OrderKind::Sell, "eth", "btc");

        let wrong_amount = order(1, OrderKind::Sell, coin(10, "rune"), coin(1, "btc"));
        book.add(wrong_amount).unwrap_err();

        let wrong_price = order(2, OrderKind::Sell, coin(10, "eth"), coin(1, "rune"));
        book.add(wrong_price).unwrap_err();

        let wrong_kind = order(3, OrderKind::Buy, coin(10, "eth"), coin(1, "btc"));
        book.add(wrong_kind).unwrap_err();

        assert!(book.orders.is_empty());
    }

    #[test]
    fn remove_expired_limit_orders() {
        let now = Timestamp::from_seconds(1_000);
        let mut book = OrderBook::new(OrderKind::Buy, "eth", "btc");

        let mut stale = order(4, OrderKind::Buy, coin(60, "eth"), coin(150, "btc"));
        stale.expires_at = now.minus_seconds(60);
        let mut live = order(5, OrderKind::Buy, coin(30, "eth"), coin(130, "btc"));
        live.expires_at = now.plus_seconds(60);

        book.add(stale.clone()).unwrap();
        book.add(live.clone()).unwrap();

        let expired = book.remove_expired(now);

        assert_eq!(expired, vec![stale]);
        assert_eq!(book.orders, vec![live]);
    }

    #[test]
    fn remove_filled_limit_orders() {
        let mut book = OrderBook::new(OrderKind::Buy, "eth", "btc");
        let filled = order(4, OrderKind::Buy, coin(0, "eth"), coin(150, "btc"));
        let open = order(5, OrderKind::Buy, coin(30, "eth"), coin(130, "btc"));
        book.orders = vec![filled, open.clone()];

        book.remove_filled();

        assert_eq!(book.orders, vec![open]);
    }

    #[test]
    fn fill_with_rejects_mismatches() {
        let lo = order(42, OrderKind::Buy, coin(60, "eth"), coin(150, "btc"));

        lo.fill_with(OrderKind::Buy, &coin(50, "rune"), &coin(140, "btc"))
            .unwrap_err();
        lo.fill_with(OrderKind::Buy, &coin(50, "eth"), &coin(140, "rune"))
            .unwrap_err();
        lo.fill_with(OrderKind::Buy, &coin(50, "eth"), &coin(140, "btc"))
            .unwrap_err();
    }

    #[test]
    fn fill_resting_buy_order_with_sell() {
        let lo = order(42, OrderKind::Buy, coin(60, "eth"), coin(150, "btc"));

        // seller asks more than the resting bid: no fill
        let fill = lo
            .fill_with(OrderKind::Sell, &coin(50, "eth"), &coin(151, "btc"))
            .unwrap();
        assert_eq!(fill, None);

        let fill = lo
            .fill_with(OrderKind::Sell, &coin(50, "eth"), &coin(140, "btc"))
            .unwrap();
        assert_eq!(fill, Some((coin(50, "eth"), coin(150, "btc"))));

        let fill = lo
            .fill_with(OrderKind::Sell, &coin(50, "eth"), &coin(150, "btc"))
            .unwrap();
        assert_eq!(fill, Some((coin(50, "eth"), coin(150, "btc"))));

        // incoming order larger than the resting one: capped at its amount
        let fill = lo
            .fill_with(OrderKind::Sell, &coin(70, "eth"), &coin(100, "btc"))
            .unwrap();
        assert_eq!(fill, Some((coin(60, "eth"), coin(150, "btc"))));
    }

    #[test]
    fn fill_resting_sell_order_with_buy() {
        let lo = order(42, OrderKind::Sell, coin(200, "eth"), coin(11, "btc"));

        let fill = lo
            .fill_with(OrderKind::Buy, &coin(180, "eth"), &coin(10, "btc"))
            .unwrap();
        assert_eq!(fill, None);

        let fill = lo
            .fill_with(OrderKind::Buy, &coin(180, "eth"), &coin(11, "btc"))
            .unwrap();
        assert_eq!(fill, Some((coin(180, "eth"), coin(11, "btc"))));

        let fill = lo
            .fill_with(OrderKind::Buy, &coin(220, "eth"), &coin(13, "btc"))
            .unwrap();
        assert_eq!(fill, Some((coin(200, "eth"), coin(11, "btc"))));
    }

    #[test]
    fn locked_coin_per_kind() {
        let buy = order(1, OrderKind::Buy, coin(60, "eth"), coin(150, "btc"));
        assert_eq!(buy.locked_coin().unwrap(), coin(9_000, "btc"));

        let sell = order(2, OrderKind::Sell, coin(60, "eth"), coin(150, "btc"));
        assert_eq!(sell.locked_coin().unwrap(), coin(60, "eth"));
    }

    #[test]
    fn limit_order_log_json_shape() {
        let result = LimitOrderResponse {
            processed: ProcessedLimitOrder {
                order_id: 3,
                open_amount: coin(0, "eth"),
            },
            filled: vec![FilledLimitOrder {
                order_id: 1,
                filled_amount: coin(120, "eth"),
                filled_price: coin(6, "rune"),
            }],
        };
        assert_eq!(
            cosmwasm_std::to_json_string(&result).unwrap(),
            r#"{"processed":{"order_id":3,"open_amount":{"denom":"eth","amount":"0"}},"filled":[{"order_id":1,"filled_amount":{"denom":"eth","amount":"120"},"filled_price":{"denom":"rune","amount":"6"}}]}"#
        );
    }
}
