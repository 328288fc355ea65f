use cosmwasm_std::{
    attr, coin, entry_point, to_json_binary, to_json_string, Addr, BankMsg, Binary, Coin,
    CosmosMsg, Deps, DepsMut, Env, MessageInfo, Order, Response, StdError, StdResult, Storage,
    Timestamp, Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use cw_utils::must_pay;

use tidal::asset::total_price;
use tidal::exchange::{
    ExecuteMsg, FilledLimitOrder, InstantiateMsg, LimitOrder, LimitOrderResponse, MigrateMsg,
    OrderBook, OrderBooksResponse, OrderKind, ProcessedLimitOrder, QueryMsg, SudoMsg,
};

use crate::error::ContractError;
use crate::state::{book_key, read_order_books, NEXT_ORDER_ID, ORDER_BOOKS};

/// Contract name that is used for migration.
const CONTRACT_NAME: &str = "tidal-exchange";
/// Contract version that is used for migration.
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates a new contract with the specified parameters in the [`InstantiateMsg`].
/// Order books carried in the message re-establish an exported state; the
/// escrow behind their orders must be provided to the contract account by the
/// host's bank genesis.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if NEXT_ORDER_ID.may_load(deps.storage)?.is_some() {
        return Err(ContractError::invalid_genesis(
            "initial order id already set",
        ));
    }
    NEXT_ORDER_ID.save(deps.storage, &msg.starting_order_id)?;

    for book in msg.books {
        validate_imported_book(&book, msg.starting_order_id)?;
        let key = book_key(book.kind, &book.amount_denom, &book.price_denom);
        if ORDER_BOOKS.has(deps.storage, key) {
            return Err(ContractError::invalid_genesis("duplicate order book"));
        }
        ORDER_BOOKS.save(deps.storage, key, &book)?;
    }

    Ok(Response::new())
}

/// Checks an order book supplied at genesis: its orders must belong to it,
/// respect its price ordering and predate the starting order id.
fn validate_imported_book(book: &OrderBook, next_order_id: u64) -> Result<(), ContractError> {
    if book.amount_denom == book.price_denom {
        return Err(ContractError::SameDenom {});
    }
    for order in &book.orders {
        if order.kind != book.kind {
            return Err(ContractError::InvalidKind {});
        }
        if order.amount.denom != book.amount_denom || order.price.denom != book.price_denom {
            return Err(ContractError::invalid_genesis(
                "order denoms do not match the book",
            ));
        }
        if order.amount.amount.is_zero() {
            return Err(ContractError::AmountNotPositive {});
        }
        if order.price.amount.is_zero() {
            return Err(ContractError::PriceNotPositive {});
        }
        if order.order_id >= next_order_id {
            return Err(ContractError::invalid_genesis(
                "order id not below the starting order id",
            ));
        }
    }
    if !book.is_sorted() {
        return Err(ContractError::invalid_genesis(
            "orders are not sorted by price",
        ));
    }
    Ok(())
}

/// Exposes all the execute functions available in the contract.
///
/// ## Variants
/// * **ExecuteMsg::CreateLimitOrder { .. }** Validates a limit order, fills
/// it against the opposite book as far as prices cross and parks the
/// remainder.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateLimitOrder {
            kind,
            amount,
            price,
            expires_at,
        } => create_limit_order(deps, env, info, kind, amount, price, expires_at),
    }
}

/// Processes a limit order. After error checking it fills the order against
/// resting orders of the opposite book; whatever cannot be filled is parked
/// as a new entry in the sender's own book, with its lock left behind in the
/// contract as escrow.
pub fn create_limit_order(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    kind: OrderKind,
    amount: Coin,
    price: Coin,
    expires_at: Timestamp,
) -> Result<Response, ContractError> {
    if expires_at <= env.block.time {
        return Err(ContractError::OrderExpired {});
    }
    if amount.denom == price.denom {
        return Err(ContractError::SameDenom {});
    }
    if amount.amount.is_zero() {
        return Err(ContractError::AmountNotPositive {});
    }
    if price.amount.is_zero() {
        return Err(ContractError::PriceNotPositive {});
    }

    // The order's full lock must be attached: the worst-case bid for a buy
    // order, the offered amount for a sell order.
    let required = match kind {
        OrderKind::Buy => total_price(&amount, &price)?,
        OrderKind::Sell => amount.clone(),
    };
    let paid = must_pay(&info, &required.denom).map_err(|_| ContractError::InsufficientCoins {
        required: required.clone(),
    })?;
    if paid != required.amount {
        return Err(ContractError::InsufficientCoins { required });
    }

    let (unfilled, filled, mut messages, spent) =
        fill_order_if_possible(deps.storage, &info.sender, kind, &amount, &price)?;

    let order_id = next_order_id(deps.storage)?;

    if !unfilled.amount.is_zero() {
        let order = LimitOrder {
            order_id,
            sender: info.sender.clone(),
            kind,
            amount: unfilled.clone(),
            price: price.clone(),
            expires_at,
        };
        let key = book_key(kind, &amount.denom, &price.denom);
        let mut book = ORDER_BOOKS
            .may_load(deps.storage, key)?
            .unwrap_or_else(|| OrderBook::new(kind, &amount.denom, &price.denom));
        book.add(order)?;
        ORDER_BOOKS.save(deps.storage, key, &book)?;
    }

    // Matching settled at the makers' prices, so part of the attached funds
    // may be neither spent nor parked; give it back.
    let locked = match kind {
        OrderKind::Buy => total_price(&unfilled, &price)?.amount,
        OrderKind::Sell => unfilled.amount,
    };
    let surplus = paid.checked_sub(spent)?.checked_sub(locked)?;
    if !surplus.is_zero() {
        messages.push(
            BankMsg::Send {
                to_address: info.sender.to_string(),
                amount: vec![coin(surplus.u128(), &required.denom)],
            }
            .into(),
        );
    }

    let result = LimitOrderResponse {
        processed: ProcessedLimitOrder {
            order_id,
            open_amount: unfilled,
        },
        filled,
    };

    Ok(Response::new()
        .add_messages(messages)
        .set_data(to_json_binary(&result)?)
        .add_attributes(vec![
            attr("action", "create_limit_order"),
            attr("sender", info.sender),
            attr("order_id", order_id.to_string()),
            attr("log", to_json_string(&result)?),
        ]))
}

/// Walks the opposite book and fills as much of the incoming order as prices
/// allow. Returns the unfilled remainder, the fill events, the settlement
/// messages, and how much of the attached funds the fills consumed.
fn fill_order_if_possible(
    storage: &mut dyn Storage,
    sender: &Addr,
    kind: OrderKind,
    amount: &Coin,
    price: &Coin,
) -> Result<(Coin, Vec<FilledLimitOrder>, Vec<CosmosMsg>, Uint128), ContractError> {
    let key = book_key(kind.opposite(), &amount.denom, &price.denom);
    let Some(mut book) = ORDER_BOOKS.may_load(storage, key)? else {
        return Ok((amount.clone(), vec![], vec![], Uint128::zero()));
    };

    let mut unfilled = amount.clone();
    let mut filled: Vec<FilledLimitOrder> = vec![];
    let mut messages: Vec<CosmosMsg> = vec![];
    let mut spent = Uint128::zero();

    for resting in book.orders.iter_mut() {
        if unfilled.amount.is_zero() {
            break;
        }

        // The book is sorted, so the first resting order that does not cross
        // ends the walk.
        let Some((fill_amount, fill_price)) = resting.fill_with(kind, &unfilled, price)? else {
            break;
        };
        let fill_total = total_price(&fill_amount, &fill_price)?;

        // The maker's escrow is already held by this contract; the taker's
        // side comes out of the funds attached to this message.
        match kind {
            OrderKind::Buy => {
                messages.push(
                    BankMsg::Send {
                        to_address: resting.sender.to_string(),
                        amount: vec![fill_total.clone()],
                    }
                    .into(),
                );
                messages.push(
                    BankMsg::Send {
                        to_address: sender.to_string(),
                        amount: vec![fill_amount.clone()],
                    }
                    .into(),
                );
                spent = spent.checked_add(fill_total.amount)?;
            }
            OrderKind::Sell => {
                messages.push(
                    BankMsg::Send {
                        to_address: resting.sender.to_string(),
                        amount: vec![fill_amount.clone()],
                    }
                    .into(),
                );
                messages.push(
                    BankMsg::Send {
                        to_address: sender.to_string(),
                        amount: vec![fill_total.clone()],
                    }
                    .into(),
                );
                spent = spent.checked_add(fill_amount.amount)?;
            }
        }

        resting.amount.amount = resting.amount.amount.checked_sub(fill_amount.amount)?;
        unfilled.amount = unfilled.amount.checked_sub(fill_amount.amount)?;

        filled.push(FilledLimitOrder {
            order_id: resting.order_id,
            filled_amount: fill_amount,
            filled_price: fill_price,
        });
    }

    book.remove_filled();
    ORDER_BOOKS.save(storage, key, &book)?;

    Ok((unfilled, filled, messages, spent))
}

/// Allocates the next order identifier. The counter is monotonic; every
/// processed order consumes one id, filled or parked.
fn next_order_id(storage: &mut dyn Storage) -> Result<u64, ContractError> {
    let id = NEXT_ORDER_ID
        .may_load(storage)?
        .ok_or_else(|| ContractError::invalid_genesis("initial order id never set"))?;
    NEXT_ORDER_ID.save(storage, &(id + 1))?;
    Ok(id)
}

/// Exposes the hooks the host chain invokes around block processing.
///
/// ## Variants
/// * **SudoMsg::BeginBlocker {}** Runs before the block's transactions and
/// refunds every expired order.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn sudo(deps: DepsMut, env: Env, msg: SudoMsg) -> Result<Response, ContractError> {
    match msg {
        SudoMsg::BeginBlocker {} => refund_expired_orders(deps, env),
    }
}

/// Sweeps every order book, drops the orders that expired before the block
/// time and restores their escrow to the senders. This is the only place
/// where expiry has ledger effects.
fn refund_expired_orders(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let books = ORDER_BOOKS
        .range(deps.storage, None, None, Order::Ascending)
        .collect::<StdResult<Vec<_>>>()?;

    let mut messages: Vec<CosmosMsg> = vec![];
    let mut refunded = 0u64;

    for ((kind, amount_denom, price_denom), mut book) in books {
        let expired = book.remove_expired(env.block.time);
        if expired.is_empty() {
            continue;
        }

        for order in expired {
            messages.push(
                BankMsg::Send {
                    to_address: order.sender.to_string(),
                    amount: vec![order.locked_coin()?],
                }
                .into(),
            );
            refunded += 1;
        }

        ORDER_BOOKS.save(
            deps.storage,
            (kind.as_str(), amount_denom.as_str(), price_denom.as_str()),
            &book,
        )?;
    }

    Ok(Response::new().add_messages(messages).add_attributes(vec![
        attr("action", "refund_expired_orders"),
        attr("refunded", refunded.to_string()),
    ]))
}

/// Exposes all the queries available in the contract.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::NextOrderId {} => to_json_binary(&NEXT_ORDER_ID.load(deps.storage)?),
        QueryMsg::OrderBook {
            kind,
            amount_denom,
            price_denom,
        } => to_json_binary(&query_order_book(deps, kind, amount_denom, price_denom)?),
        QueryMsg::OrderBooks { start_after, limit } => to_json_binary(&OrderBooksResponse {
            books: read_order_books(deps, start_after, limit)?,
        }),
    }
}

/// Returns the book for the given triple, or a fresh empty book if no order
/// was ever parked under it. Asking for a pair that only exists reversed gets
/// the direction hint instead of a silently empty book.
fn query_order_book(
    deps: Deps,
    kind: OrderKind,
    amount_denom: String,
    price_denom: String,
) -> StdResult<OrderBook> {
    if let Some(book) =
        ORDER_BOOKS.may_load(deps.storage, book_key(kind, &amount_denom, &price_denom))?
    {
        return Ok(book);
    }

    if ORDER_BOOKS.has(deps.storage, book_key(kind, &price_denom, &amount_denom)) {
        return Err(StdError::generic_err(
            ContractError::OrderBookDirection {}.to_string(),
        ));
    }

    Ok(OrderBook::new(kind, amount_denom, price_denom))
}

/// Used for the migration of the contract.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let version = get_contract_version(deps.storage)?;
    if version.contract != CONTRACT_NAME {
        return Err(StdError::generic_err("contract name mismatch").into());
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("previous_contract_version", version.version)
        .add_attribute("new_contract_version", CONTRACT_VERSION))
}
