use cosmwasm_std::testing::{mock_dependencies, mock_env, mock_info, MOCK_CONTRACT_ADDR};
use cosmwasm_std::{coin, coins, from_json, Addr, BankMsg, SubMsg, Uint128};

use tidal::clp::{
    Clp, ConfigResponse, ExecuteMsg, InstantiateMsg, PriceResponse, QueryMsg, TradeLog,
};
use tidal::token_factory::{tf_create_denom_msg, tf_mint_msg};

use crate::contract::{execute, instantiate, query};
use crate::error::ContractError;

const RESERVE: &str = "utide";

fn init(deps: cosmwasm_std::DepsMut) {
    let msg = InstantiateMsg {
        reserve_denom: RESERVE.to_string(),
        clps: vec![],
    };
    instantiate(deps, mock_env(), mock_info("owner", &[]), msg).unwrap();
}

fn create_msg(ticker: &str, supply: u128, base: u128) -> ExecuteMsg {
    ExecuteMsg::Create {
        ticker: ticker.to_string(),
        name: format!("{ticker} token"),
        decimals: 0,
        reserve_ratio: 100,
        initial_supply: Uint128::new(supply),
        initial_base_amount: Uint128::new(base),
    }
}

fn trade_msg(from: &str, to: &str, amount: u128) -> ExecuteMsg {
    ExecuteMsg::Trade {
        from_ticker: from.to_string(),
        to_ticker: to.to_string(),
        from_amount: Uint128::new(amount),
    }
}

#[test]
fn proper_initialization() {
    let mut deps = mock_dependencies();
    init(deps.as_mut());

    let res = query(deps.as_ref(), mock_env(), QueryMsg::Config {}).unwrap();
    let config: ConfigResponse = from_json(res).unwrap();
    assert_eq!(config.reserve_denom, RESERVE);
}

#[test]
fn create_emits_denom_and_mint() {
    let mut deps = mock_dependencies();
    init(deps.as_mut());

    let info = mock_info("creator", &coins(500, RESERVE));
    let res = execute(deps.as_mut(), mock_env(), info, create_msg("ETH", 500, 500)).unwrap();

    let denom = format!("factory/{MOCK_CONTRACT_ADDR}/ETH");
    assert_eq!(
        res.messages,
        vec![
            SubMsg::new(tf_create_denom_msg(MOCK_CONTRACT_ADDR.to_string(), "ETH")),
            SubMsg::new(tf_mint_msg(
                MOCK_CONTRACT_ADDR.to_string(),
                coin(500, &denom),
                MOCK_CONTRACT_ADDR.to_string(),
            )),
        ]
    );

    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::Clp {
            ticker: "ETH".to_string(),
        },
    )
    .unwrap();
    let pool: Clp = from_json(res).unwrap();
    assert_eq!(pool.creator, Addr::unchecked("creator"));
    assert_eq!(pool.denom, denom);
    assert_eq!(pool.current_supply, Uint128::new(500));
    assert_eq!(pool.reserve_balance, Uint128::new(500));
    assert_eq!(pool.token_balance, Uint128::new(500));
}

#[test]
fn buy_trade_pays_out_pool_tokens() {
    let mut deps = mock_dependencies();
    init(deps.as_mut());

    let info = mock_info("creator", &coins(500, RESERVE));
    execute(deps.as_mut(), mock_env(), info, create_msg("ETH", 500, 500)).unwrap();

    let info = mock_info("trader", &coins(10, RESERVE));
    let res = execute(deps.as_mut(), mock_env(), info, trade_msg(RESERVE, "ETH", 10)).unwrap();

    let denom = format!("factory/{MOCK_CONTRACT_ADDR}/ETH");
    assert_eq!(
        res.messages,
        vec![SubMsg::new(BankMsg::Send {
            to_address: "trader".to_string(),
            amount: coins(10, denom),
        })]
    );

    let log: TradeLog = from_json(res.data.unwrap()).unwrap();
    assert_eq!(log.from_token_spent, Uint128::new(10));
    assert_eq!(log.to_token_received, Uint128::new(10));
    assert_eq!(log.reserve_transacted, Uint128::new(10));
}

#[test]
fn bridged_trade_keeps_reserve_inside() {
    let mut deps = mock_dependencies();
    init(deps.as_mut());

    let info = mock_info("creator", &coins(500, RESERVE));
    execute(deps.as_mut(), mock_env(), info, create_msg("ETH", 500, 500)).unwrap();
    let info = mock_info("creator", &coins(500, RESERVE));
    execute(deps.as_mut(), mock_env(), info, create_msg("BTC", 500, 500)).unwrap();

    let btc_denom = format!("factory/{MOCK_CONTRACT_ADDR}/BTC");
    let eth_denom = format!("factory/{MOCK_CONTRACT_ADDR}/ETH");

    let info = mock_info("trader", &coins(20, &btc_denom));
    let res = execute(deps.as_mut(), mock_env(), info, trade_msg("BTC", "ETH", 20)).unwrap();

    // only the final leg's emission leaves the contract
    assert_eq!(
        res.messages,
        vec![SubMsg::new(BankMsg::Send {
            to_address: "trader".to_string(),
            amount: coins(20, eth_denom),
        })]
    );

    let log: TradeLog = from_json(res.data.unwrap()).unwrap();
    assert_eq!(log.from_token_spent, Uint128::new(20));
    assert_eq!(log.to_token_received, Uint128::new(20));
    assert_eq!(log.reserve_transacted, Uint128::new(20));
}

#[test]
fn trade_requires_matching_funds() {
    let mut deps = mock_dependencies();
    init(deps.as_mut());

    let info = mock_info("creator", &coins(500, RESERVE));
    execute(deps.as_mut(), mock_env(), info, create_msg("ETH", 500, 500)).unwrap();

    let info = mock_info("trader", &coins(9, RESERVE));
    let err = execute(deps.as_mut(), mock_env(), info, trade_msg(RESERVE, "ETH", 10)).unwrap_err();
    assert_eq!(err, ContractError::NotEnoughCoins {});

    // wrong denomination attached for a token sale
    let info = mock_info("trader", &coins(10, RESERVE));
    let err = execute(deps.as_mut(), mock_env(), info, trade_msg("ETH", RESERVE, 10)).unwrap_err();
    assert_eq!(err, ContractError::NotEnoughCoins {});
}

#[test]
fn price_query_quotes_in_reserve() {
    let mut deps = mock_dependencies();
    init(deps.as_mut());

    let info = mock_info("creator", &coins(500, RESERVE));
    execute(deps.as_mut(), mock_env(), info, create_msg("ETH", 500, 500)).unwrap();

    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::Price {
            ticker: "ETH".to_string(),
            unit: Uint128::new(10),
        },
    )
    .unwrap();
    let price: PriceResponse = from_json(res).unwrap();
    assert_eq!(price.price, coin(10, RESERVE));
}
