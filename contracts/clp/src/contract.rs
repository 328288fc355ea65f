use cosmwasm_std::{
    attr, coin, entry_point, to_json_binary, to_json_string, BankMsg, Binary, Coin, CosmosMsg,
    Deps, DepsMut, Env, MessageInfo, Response, StdError, StdResult, Storage, Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use cw_utils::must_pay;

use tidal::asset::{is_valid_ticker, pool_denom};
use tidal::clp::{
    Clp, ClpsResponse, ConfigResponse, ExecuteMsg, InstantiateMsg, MigrateMsg, PriceResponse,
    QueryMsg, TradeLog, MAX_RESERVE_RATIO, MIN_RESERVE_RATIO,
};
use tidal::token_factory::{tf_create_denom_msg, tf_mint_msg};

use crate::error::ContractError;
use crate::math::{reserve_emission, token_emission};
use crate::state::{read_clps, Config, CLPS, CONFIG};

/// Contract name that is used for migration.
const CONTRACT_NAME: &str = "tidal-clp";
/// Contract version that is used for migration.
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates a new contract with the specified parameters in the [`InstantiateMsg`].
/// Pool records carried in the message re-establish an exported state.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    CONFIG.save(
        deps.storage,
        &Config {
            reserve_denom: msg.reserve_denom.clone(),
        },
    )?;

    for clp in msg.clps {
        validate_imported_clp(&clp, &msg.reserve_denom)?;
        if CLPS.has(deps.storage, &clp.ticker) {
            return Err(ContractError::ClpExists {});
        }
        CLPS.save(deps.storage, &clp.ticker, &clp)?;
    }

    Ok(Response::new())
}

/// Checks a pool record supplied at genesis against the same rules `Create`
/// enforces. Records the export could never have produced fail as unparsable.
fn validate_imported_clp(clp: &Clp, reserve_denom: &str) -> Result<(), ContractError> {
    if clp.ticker == reserve_denom || !is_valid_ticker(&clp.ticker) {
        return Err(ContractError::InvalidTickerName {});
    }
    if !(MIN_RESERVE_RATIO..=MAX_RESERVE_RATIO).contains(&clp.reserve_ratio) {
        return Err(ContractError::InvalidReserveRatio {});
    }
    if clp.initial_supply.is_zero() {
        return Err(ContractError::InvalidInitialSupply {});
    }
    if clp.denom.is_empty() || clp.current_supply.is_zero() {
        return Err(ContractError::ClpParsing {});
    }
    Ok(())
}

/// Exposes all the execute functions available in the contract.
///
/// ## Variants
/// * **ExecuteMsg::Create { .. }** Creates a new pool backed by the attached
/// reserve coins.
///
/// * **ExecuteMsg::Trade { .. }** Trades the attached coins against one pool,
/// or through two pools bridged by the reserve.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Create {
            ticker,
            name,
            decimals,
            reserve_ratio,
            initial_supply,
            initial_base_amount,
        } => create(
            deps,
            env,
            info,
            ticker,
            name,
            decimals,
            reserve_ratio,
            initial_supply,
            initial_base_amount,
        ),
        ExecuteMsg::Trade {
            from_ticker,
            to_ticker,
            from_amount,
        } => trade(deps, env, info, from_ticker, to_ticker, from_amount),
    }
}

/// Creates a new pool: debits the reserve deposit attached to the message,
/// creates the pool's token factory denom and mints the initial supply into
/// the pool. Creation is the only point where pool tokens are minted.
#[allow(clippy::too_many_arguments)]
pub fn create(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    ticker: String,
    name: String,
    decimals: u32,
    reserve_ratio: u64,
    initial_supply: Uint128,
    initial_base_amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if initial_supply.is_zero() {
        return Err(ContractError::InvalidInitialSupply {});
    }
    if initial_base_amount.is_zero() {
        return Err(ContractError::InvalidInitialBaseCoins {});
    }
    if ticker == config.reserve_denom || !is_valid_ticker(&ticker) {
        return Err(ContractError::InvalidTickerName {});
    }
    if CLPS.has(deps.storage, &ticker) {
        return Err(ContractError::ClpExists {});
    }
    if !(MIN_RESERVE_RATIO..=MAX_RESERVE_RATIO).contains(&reserve_ratio) {
        return Err(ContractError::InvalidReserveRatio {});
    }
    let decimals: u8 = decimals
        .try_into()
        .map_err(|_| ContractError::InvalidDecimals {})?;

    assert_funds(&info, &config.reserve_denom, initial_base_amount)?;

    let denom = pool_denom(&env.contract.address, &ticker);
    let clp = Clp {
        creator: info.sender,
        ticker: ticker.clone(),
        name,
        decimals,
        reserve_ratio,
        initial_supply,
        current_supply: initial_supply,
        denom: denom.clone(),
        reserve_balance: initial_base_amount,
        token_balance: initial_supply,
    };
    CLPS.save(deps.storage, &ticker, &clp)?;

    let messages: Vec<CosmosMsg> = vec![
        tf_create_denom_msg(env.contract.address.to_string(), ticker.clone()),
        tf_mint_msg(
            env.contract.address.to_string(),
            coin(initial_supply.u128(), &denom),
            env.contract.address.to_string(),
        ),
    ];

    Ok(Response::new().add_messages(messages).add_attributes(vec![
        attr("action", "create_clp"),
        attr("ticker", ticker),
        attr("denom", denom),
        attr("initial_supply", initial_supply),
        attr("reserve_deposit", initial_base_amount),
    ]))
}

/// Trades the attached `from_amount` for the asset named by `to_ticker`.
///
/// Three routes exist, picked by which side is the reserve denomination:
/// a buy leg (reserve in, pool tokens out), a sell leg (pool tokens in,
/// reserve out), or both legs chained with the intermediate reserve never
/// leaving the contract.
pub fn trade(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    from_ticker: String,
    to_ticker: String,
    from_amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if from_ticker == to_ticker {
        return Err(ContractError::SameCoin {});
    }
    if from_amount.is_zero() {
        return Err(ContractError::NotEnoughCoins {});
    }

    let reserve = config.reserve_denom.as_str();

    let (log, payout) = if from_ticker == reserve {
        let mut pool = load_clp(deps.storage, &to_ticker)?;
        assert_funds(&info, reserve, from_amount)?;

        let emitted = buy_leg(&mut pool, from_amount)?;
        CLPS.save(deps.storage, &to_ticker, &pool)?;

        let log = TradeLog {
            from_token_spent: from_amount,
            to_token_received: emitted,
            reserve_transacted: from_amount,
        };
        (log, coin(emitted.u128(), pool.denom))
    } else if to_ticker == reserve {
        let mut pool = load_clp(deps.storage, &from_ticker)?;
        assert_funds(&info, &pool.denom, from_amount)?;

        let emitted = sell_leg(&mut pool, from_amount)?;
        CLPS.save(deps.storage, &from_ticker, &pool)?;

        let log = TradeLog {
            from_token_spent: from_amount,
            to_token_received: emitted,
            reserve_transacted: emitted,
        };
        (log, coin(emitted.u128(), reserve))
    } else {
        let mut from_pool = load_clp(deps.storage, &from_ticker)?;
        let mut to_pool = load_clp(deps.storage, &to_ticker)?;
        assert_funds(&info, &from_pool.denom, from_amount)?;

        // Each leg prices against the pool state observed before its own
        // settlement; the bridged reserve stays inside the contract.
        let bridged = sell_leg(&mut from_pool, from_amount)?;
        let emitted = buy_leg(&mut to_pool, bridged)?;
        CLPS.save(deps.storage, &from_ticker, &from_pool)?;
        CLPS.save(deps.storage, &to_ticker, &to_pool)?;

        let log = TradeLog {
            from_token_spent: from_amount,
            to_token_received: emitted,
            reserve_transacted: bridged,
        };
        (log, coin(emitted.u128(), to_pool.denom))
    };

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![payout],
        })
        .set_data(to_json_binary(&log)?)
        .add_attributes(vec![
            attr("action", "trade"),
            attr("sender", info.sender),
            attr("from_ticker", from_ticker),
            attr("to_ticker", to_ticker),
            attr("log", to_json_string(&log)?),
        ]))
}

fn load_clp(storage: &dyn Storage, ticker: &str) -> Result<Clp, ContractError> {
    CLPS.may_load(storage, ticker)
        .map_err(|_| ContractError::ClpParsing {})?
        .ok_or(ContractError::ClpNotExists {})
}

/// Verifies the sender attached exactly `amount` of `denom` to the message.
fn assert_funds(info: &MessageInfo, denom: &str, amount: Uint128) -> Result<(), ContractError> {
    let paid = must_pay(info, denom).map_err(|_| ContractError::NotEnoughCoins {})?;
    if paid != amount {
        return Err(ContractError::NotEnoughCoins {});
    }
    Ok(())
}

/// Buy leg: reserve coins in, pool tokens out. Mutates the pool's depths and
/// returns the emitted token amount.
fn buy_leg(pool: &mut Clp, reserve_paid: Uint128) -> Result<Uint128, ContractError> {
    if pool.reserve_balance.is_zero() || pool.token_balance.is_zero() {
        return Err(ContractError::ClpEmpty {});
    }

    let emitted = token_emission(
        pool.current_supply,
        reserve_paid,
        pool.reserve_balance,
        pool.reserve_ratio,
    )?;
    if emitted.is_zero() || emitted > pool.token_balance {
        return Err(ContractError::ClpEmpty {});
    }

    pool.reserve_balance = pool.reserve_balance.checked_add(reserve_paid)?;
    pool.token_balance = pool.token_balance.checked_sub(emitted)?;

    Ok(emitted)
}

/// Sell leg: pool tokens in, reserve coins out.
fn sell_leg(pool: &mut Clp, tokens_paid: Uint128) -> Result<Uint128, ContractError> {
    if pool.reserve_balance.is_zero() {
        return Err(ContractError::ClpEmpty {});
    }

    let emitted = reserve_emission(
        pool.reserve_balance,
        tokens_paid,
        pool.current_supply,
        pool.reserve_ratio,
    )?;
    if emitted.is_zero() || emitted > pool.reserve_balance {
        return Err(ContractError::ClpEmpty {});
    }

    pool.token_balance = pool.token_balance.checked_add(tokens_paid)?;
    pool.reserve_balance = pool.reserve_balance.checked_sub(emitted)?;

    Ok(emitted)
}

/// Exposes all the queries available in the contract.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => {
            let config = CONFIG.load(deps.storage)?;
            to_json_binary(&ConfigResponse {
                reserve_denom: config.reserve_denom,
            })
        }
        QueryMsg::Clp { ticker } => to_json_binary(&CLPS.load(deps.storage, &ticker)?),
        QueryMsg::Clps { start_after, limit } => to_json_binary(&ClpsResponse {
            clps: read_clps(deps, start_after, limit)?,
        }),
        QueryMsg::Price { ticker, unit } => to_json_binary(&query_price(deps, ticker, unit)?),
    }
}

/// The spot price of `unit` pool tokens, defined as the reserve emission
/// when selling them.
fn query_price(deps: Deps, ticker: String, unit: Uint128) -> StdResult<PriceResponse> {
    let config = CONFIG.load(deps.storage)?;
    let pool = CLPS.load(deps.storage, &ticker)?;

    let price = reserve_emission(
        pool.reserve_balance,
        unit,
        pool.current_supply,
        pool.reserve_ratio,
    )?;

    Ok(PriceResponse {
        price: Coin {
            denom: config.reserve_denom,
            amount: price,
        },
    })
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
