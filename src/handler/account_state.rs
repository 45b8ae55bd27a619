use alloy::primitives::{Address, U256};
use futures::future::join_all;

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::{parse_address, to_decimal},
    types::{AccountPosition, AccountSnapshot, Comptroller, LendingToken},
};

use super::{
    market_state::market_overview,
    try_call,
};

const WAD: u64 = 1_000_000_000_000_000_000;

/// Snapshots one account across every configured market. The only error
/// surfaced to the caller is a malformed address; every contract read
/// degrades to an absent field.
pub async fn get_account(
    state: &AppState<State>,
    address: &str,
) -> Result<AccountSnapshot, Error> {
    let account = parse_address(address)
        .ok_or_else(|| Error::InvalidAddress(address.to_owned()))?;

    let (liquidity, shortfall) = match state.config.comptroller_contract {
        Some(comptroller) => {
            let comptroller =
                Comptroller::new(comptroller, state.chain.provider());
            match try_call(
                "getAccountLiquidity",
                comptroller.getAccountLiquidity(account).call(),
            )
            .await
            {
                Some(result) => {
                    (Some(result.liquidity), Some(result.shortfall))
                },
                None => (None, None),
            }
        },
        None => (None, None),
    };

    let positions = join_all(
        state
            .config
            .market_contracts
            .iter()
            .map(|market| account_position(state, *market, account)),
    )
    .await;

    Ok(AccountSnapshot {
        account: account.to_checksum(None),
        liquidity: liquidity.map(to_decimal),
        shortfall: shortfall.map(to_decimal),
        is_healthy: is_healthy(shortfall),
        positions,
    })
}

async fn account_position(
    state: &AppState<State>,
    market_address: Address,
    account: Address,
) -> AccountPosition {
    let market = LendingToken::new(market_address, state.chain.provider());
    let overview = market_overview(state, market_address).await;

    let balance = try_call("balanceOf", market.balanceOf(account).call()).await;
    let borrow_balance = try_call(
        "borrowBalanceStored",
        market.borrowBalanceStored(account).call(),
    )
    .await;

    AccountPosition {
        market: market_address.to_checksum(None),
        underlying: overview.underlying.map(|a| a.to_checksum(None)),
        symbol: overview.symbol,
        decimals: overview.decimals,
        supply_dtoken: balance.map(to_decimal),
        supply_underlying: underlying_amount(balance, overview.exchange_rate)
            .map(to_decimal),
        borrow_balance: borrow_balance.map(to_decimal),
        exchange_rate: overview.exchange_rate.map(to_decimal),
        price: overview.price.map(to_decimal),
        collateral_factor: overview.collateral_factor.map(to_decimal),
        is_listed: overview.is_listed,
    }
}

pub fn is_healthy(shortfall: Option<U256>) -> Option<bool> {
    shortfall.map(|value| value.is_zero())
}

/// `(balance * exchangeRate) / 10^18`, the on-chain fixed-point convention.
/// Floor division is intentional; an unknown operand or an overflowing
/// product yields None.
pub fn underlying_amount(
    balance: Option<U256>,
    exchange_rate: Option<U256>,
) -> Option<U256> {
    let product = balance?.checked_mul(exchange_rate?)?;
    Some(product / U256::from(WAD))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_iff_zero_shortfall() {
        assert_eq!(is_healthy(Some(U256::ZERO)), Some(true));
        assert_eq!(is_healthy(Some(U256::from(5u64))), Some(false));
        assert_eq!(is_healthy(None), None);
    }

    #[test]
    fn underlying_amount_scales_by_exchange_rate() {
        let rate = U256::from(2u64) * U256::from(WAD);
        assert_eq!(
            underlying_amount(Some(U256::from(10u64)), Some(rate)),
            Some(U256::from(20u64))
        );
    }

    #[test]
    fn underlying_amount_floors() {
        // 3 * 0.5e18 / 1e18 == 1.5 -> 1
        let half = U256::from(WAD) / U256::from(2u64);
        assert_eq!(
            underlying_amount(Some(U256::from(3u64)), Some(half)),
            Some(U256::from(1u64))
        );
    }

    #[test]
    fn underlying_amount_requires_both_operands() {
        assert_eq!(underlying_amount(None, Some(U256::from(1u64))), None);
        assert_eq!(underlying_amount(Some(U256::from(1u64)), None), None);
    }

    #[test]
    fn underlying_amount_overflow_is_absent() {
        assert_eq!(underlying_amount(Some(U256::MAX), Some(U256::MAX)), None);
    }
}
