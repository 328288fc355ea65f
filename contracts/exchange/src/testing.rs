use cosmwasm_std::testing::{mock_dependencies, mock_env, mock_info};
use cosmwasm_std::{coin, coins, from_json, BankMsg, SubMsg, Timestamp};

use tidal::exchange::{
    ExecuteMsg, InstantiateMsg, LimitOrderResponse, OrderBook, OrderKind, QueryMsg, SudoMsg,
};

use crate::contract::{execute, instantiate, query, sudo};
use crate::error::ContractError;

fn init(deps: cosmwasm_std::DepsMut) {
    let msg = InstantiateMsg {
        starting_order_id: 1,
        books: vec![],
    };
    instantiate(deps, mock_env(), mock_info("owner", &[]), msg).unwrap();
}

fn expires_in(seconds: u64) -> Timestamp {
    mock_env().block.time.plus_seconds(seconds)
}

fn order_msg(kind: OrderKind, amount: cosmwasm_std::Coin, price: cosmwasm_std::Coin) -> ExecuteMsg {
    ExecuteMsg::CreateLimitOrder {
        kind,
        amount,
        price,
        expires_at: expires_in(60),
    }
}

fn query_book(deps: cosmwasm_std::Deps, kind: OrderKind, amount: &str, price: &str) -> OrderBook {
    let res = query(
        deps,
        mock_env(),
        QueryMsg::OrderBook {
            kind,
            amount_denom: amount.to_string(),
            price_denom: price.to_string(),
        },
    )
    .unwrap();
    from_json(res).unwrap()
}

#[test]
fn duplicate_initialization_fails() {
    let mut deps = mock_dependencies();
    init(deps.as_mut());

    let msg = InstantiateMsg {
        starting_order_id: 7,
        books: vec![],
    };
    let err = instantiate(deps.as_mut(), mock_env(), mock_info("owner", &[]), msg).unwrap_err();
    assert_eq!(
        err,
        ContractError::invalid_genesis("initial order id already set")
    );
}

#[test]
fn unmatched_order_is_parked() {
    let mut deps = mock_dependencies();
    init(deps.as_mut());

    let info = mock_info("seller", &coins(120, "eth"));
    let res = execute(
        deps.as_mut(),
        mock_env(),
        info,
        order_msg(OrderKind::Sell, coin(120, "eth"), coin(6, "rune")),
    )
    .unwrap();

    // nothing matched and nothing left over: the whole lock stays escrowed
    assert!(res.messages.is_empty());
    let result: LimitOrderResponse = from_json(res.data.unwrap()).unwrap();
    assert_eq!(result.processed.order_id, 1);
    assert_eq!(result.processed.open_amount, coin(120, "eth"));
    assert!(result.filled.is_empty());

    let book = query_book(deps.as_ref(), OrderKind::Sell, "eth", "rune");
    assert_eq!(book.orders.len(), 1);
    assert_eq!(book.orders[0].order_id, 1);
}

#[test]
fn crossing_order_settles_at_maker_price() {
    let mut deps = mock_dependencies();
    init(deps.as_mut());

    let info = mock_info("seller", &coins(120, "eth"));
    execute(
        deps.as_mut(),
        mock_env(),
        info,
        order_msg(OrderKind::Sell, coin(120, "eth"), coin(6, "rune")),
    )
    .unwrap();

    // the buyer bids 8 but fills at the resting 6; the difference comes back
    let info = mock_info("buyer", &coins(960, "rune"));
    let res = execute(
        deps.as_mut(),
        mock_env(),
        info,
        order_msg(OrderKind::Buy, coin(120, "eth"), coin(8, "rune")),
    )
    .unwrap();

    assert_eq!(
        res.messages,
        vec![
            SubMsg::new(BankMsg::Send {
                to_address: "seller".to_string(),
                amount: coins(720, "rune"),
            }),
            SubMsg::new(BankMsg::Send {
                to_address: "buyer".to_string(),
                amount: coins(120, "eth"),
            }),
            SubMsg::new(BankMsg::Send {
                to_address: "buyer".to_string(),
                amount: coins(240, "rune"),
            }),
        ]
    );

    let result: LimitOrderResponse = from_json(res.data.unwrap()).unwrap();
    assert_eq!(result.processed.order_id, 2);
    assert_eq!(result.processed.open_amount, coin(0, "eth"));
    assert_eq!(result.filled.len(), 1);
    assert_eq!(result.filled[0].order_id, 1);
    assert_eq!(result.filled[0].filled_amount, coin(120, "eth"));
    assert_eq!(result.filled[0].filled_price, coin(6, "rune"));

    // the filled maker left the book
    let book = query_book(deps.as_ref(), OrderKind::Sell, "eth", "rune");
    assert!(book.orders.is_empty());
}

#[test]
fn partial_fill_parks_the_rest() {
    let mut deps = mock_dependencies();
    init(deps.as_mut());

    let info = mock_info("seller", &coins(50, "eth"));
    execute(
        deps.as_mut(),
        mock_env(),
        info,
        order_msg(OrderKind::Sell, coin(50, "eth"), coin(6, "rune")),
    )
    .unwrap();

    let info = mock_info("buyer", &coins(480, "rune"));
    let res = execute(
        deps.as_mut(),
        mock_env(),
        info,
        order_msg(OrderKind::Buy, coin(80, "eth"), coin(6, "rune")),
    )
    .unwrap();

    // 50 filled at 6, 30 parked at 6: nothing to refund
    assert_eq!(
        res.messages,
        vec![
            SubMsg::new(BankMsg::Send {
                to_address: "seller".to_string(),
                amount: coins(300, "rune"),
            }),
            SubMsg::new(BankMsg::Send {
                to_address: "buyer".to_string(),
                amount: coins(50, "eth"),
            }),
        ]
    );

    let result: LimitOrderResponse = from_json(res.data.unwrap()).unwrap();
    assert_eq!(result.processed.open_amount, coin(30, "eth"));

    let book = query_book(deps.as_ref(), OrderKind::Buy, "eth", "rune");
    assert_eq!(book.orders.len(), 1);
    assert_eq!(book.orders[0].order_id, 2);
    assert_eq!(book.orders[0].amount, coin(30, "eth"));
}

#[test]
fn begin_blocker_refunds_expired_orders() {
    let mut deps = mock_dependencies();
    init(deps.as_mut());

    let info = mock_info("seller", &coins(60, "eth"));
    let msg = ExecuteMsg::CreateLimitOrder {
        kind: OrderKind::Sell,
        amount: coin(60, "eth"),
        price: coin(150, "btc"),
        expires_at: expires_in(5),
    };
    execute(deps.as_mut(), mock_env(), info, msg).unwrap();

    let info = mock_info("buyer", &coins(900, "btc"));
    let msg = ExecuteMsg::CreateLimitOrder {
        kind: OrderKind::Buy,
        amount: coin(30, "eth"),
        price: coin(30, "btc"),
        expires_at: expires_in(120),
    };
    execute(deps.as_mut(), mock_env(), info, msg).unwrap();

    let mut env = mock_env();
    env.block.time = env.block.time.plus_seconds(10);
    let res = sudo(deps.as_mut(), env, SudoMsg::BeginBlocker {}).unwrap();

    // only the stale sell order is refunded; the live buy order survives
    assert_eq!(
        res.messages,
        vec![SubMsg::new(BankMsg::Send {
            to_address: "seller".to_string(),
            amount: coins(60, "eth"),
        })]
    );
    assert!(query_book(deps.as_ref(), OrderKind::Sell, "eth", "btc")
        .orders
        .is_empty());
    assert_eq!(
        query_book(deps.as_ref(), OrderKind::Buy, "eth", "btc")
            .orders
            .len(),
        1
    );
}

#[test]
fn next_order_id_survives_full_fills() {
    let mut deps = mock_dependencies();
    init(deps.as_mut());

    let info = mock_info("seller", &coins(10, "eth"));
    execute(
        deps.as_mut(),
        mock_env(),
        info,
        order_msg(OrderKind::Sell, coin(10, "eth"), coin(5, "rune")),
    )
    .unwrap();

    let info = mock_info("buyer", &coins(50, "rune"));
    execute(
        deps.as_mut(),
        mock_env(),
        info,
        order_msg(OrderKind::Buy, coin(10, "eth"), coin(5, "rune")),
    )
    .unwrap();

    let res = query(deps.as_ref(), mock_env(), QueryMsg::NextOrderId {}).unwrap();
    let next: u64 = from_json(res).unwrap();
    assert_eq!(next, 3);
}
