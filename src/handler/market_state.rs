use alloy::primitives::{Address, U256};
use bigdecimal::ToPrimitive;
use futures::future::join_all;

use crate::{
    configuration::{AppState, State},
    helpers::to_decimal,
    types::{
        Comptroller, Erc20, JumpRateModel, LendingToken, MarketSnapshot,
        PriceOracle,
    },
};

use super::try_call;

/// Fallback when the rate model has no SECONDS_PER_YEAR accessor.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

pub async fn list_markets(state: &AppState<State>) -> Vec<MarketSnapshot> {
    let snapshots = state
        .config
        .market_contracts
        .iter()
        .map(|address| market_snapshot(state, *address));

    join_all(snapshots).await
}

async fn market_snapshot(
    state: &AppState<State>,
    address: Address,
) -> MarketSnapshot {
    let market = LendingToken::new(address, state.chain.provider());
    let overview = market_overview(state, address).await;

    let total_supply =
        try_call("totalSupply", market.totalSupply().call()).await;
    let total_borrows =
        try_call("totalBorrows", market.totalBorrows().call()).await;
    let total_reserves =
        try_call("totalReserves", market.totalReserves().call())
            .await
            .unwrap_or(U256::ZERO);
    let cash = try_call("getCash", market.getCash().call()).await;
    let reserve_factor = try_call(
        "reserveFactorMantissa",
        market.reserveFactorMantissa().call(),
    )
    .await
    .unwrap_or(U256::ZERO);
    let rate_model =
        try_call("interestRateModel", market.interestRateModel().call())
            .await;

    let (borrow_rate, supply_rate) = match (rate_model, cash, total_borrows) {
        (Some(model), Some(cash), Some(borrows)) => {
            yearly_rates(
                state,
                model,
                cash,
                borrows,
                total_reserves,
                reserve_factor,
            )
            .await
        },
        _ => (None, None),
    };

    MarketSnapshot {
        market: address.to_checksum(None),
        underlying: overview.underlying.map(|a| a.to_checksum(None)),
        symbol: overview.symbol,
        decimals: overview.decimals,
        total_supply: total_supply.map(to_decimal),
        total_borrows: total_borrows.map(to_decimal),
        total_reserves: Some(to_decimal(total_reserves)),
        cash: cash.map(to_decimal),
        exchange_rate: overview.exchange_rate.map(to_decimal),
        utilization: utilization(cash, total_borrows, total_reserves),
        borrow_rate_per_year: borrow_rate.map(to_decimal),
        supply_rate_per_year: supply_rate.map(to_decimal),
        price: overview.price.map(to_decimal),
        collateral_factor: overview.collateral_factor.map(to_decimal),
        is_listed: overview.is_listed,
    }
}

/// The per-market reads shared between the market list and account
/// positions: underlying token metadata, stored exchange rate, oracle
/// price, and the comptroller's market configuration.
#[derive(Debug, Default)]
pub(crate) struct MarketOverview {
    pub underlying: Option<Address>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub exchange_rate: Option<U256>,
    pub price: Option<U256>,
    pub collateral_factor: Option<U256>,
    pub is_listed: Option<bool>,
}

pub(crate) async fn market_overview(
    state: &AppState<State>,
    address: Address,
) -> MarketOverview {
    let market = LendingToken::new(address, state.chain.provider());

    let underlying = try_call("underlying", market.underlying().call()).await;

    let (symbol, decimals) = match underlying {
        Some(asset) => {
            let token = Erc20::new(asset, state.chain.provider());
            (
                try_call("symbol", token.symbol().call()).await,
                try_call("decimals", token.decimals().call()).await,
            )
        },
        None => (None, None),
    };

    let exchange_rate =
        try_call("exchangeRateStored", market.exchangeRateStored().call())
            .await;

    let price = match (state.config.price_oracle_contract, underlying) {
        (Some(oracle), Some(asset)) => {
            let oracle = PriceOracle::new(oracle, state.chain.provider());
            try_call("getAssetPrice", oracle.getAssetPrice(asset).call())
                .await
        },
        _ => None,
    };

    // one combined call; a failure leaves both fields absent
    let (collateral_factor, is_listed) =
        match state.config.comptroller_contract {
            Some(comptroller) => {
                let comptroller =
                    Comptroller::new(comptroller, state.chain.provider());
                match try_call(
                    "getMarketConfiguration",
                    comptroller.getMarketConfiguration(address).call(),
                )
                .await
                {
                    Some(config) => {
                        (Some(config.collateralFactor), Some(config.isListed))
                    },
                    None => (None, None),
                }
            },
            None => (None, None),
        };

    MarketOverview {
        underlying,
        symbol,
        decimals,
        exchange_rate,
        price,
        collateral_factor,
        is_listed,
    }
}

async fn yearly_rates(
    state: &AppState<State>,
    model_address: Address,
    cash: U256,
    borrows: U256,
    reserves: U256,
    reserve_factor: U256,
) -> (Option<U256>, Option<U256>) {
    let model = JumpRateModel::new(model_address, state.chain.provider());

    let mut borrow_rate = try_call(
        "getBorrowRatePerYear",
        model.getBorrowRatePerYear(cash, borrows, reserves).call(),
    )
    .await;
    if borrow_rate.is_none() {
        let per_second = try_call(
            "getBorrowRate",
            model.getBorrowRate(cash, borrows, reserves).call(),
        )
        .await;
        if let Some(rate) = per_second {
            let seconds =
                try_call("SECONDS_PER_YEAR", model.SECONDS_PER_YEAR().call())
                    .await;
            borrow_rate = per_year(rate, seconds);
        }
    }

    let mut supply_rate = try_call(
        "getSupplyRatePerYear",
        model
            .getSupplyRatePerYear(cash, borrows, reserves, reserve_factor)
            .call(),
    )
    .await;
    if supply_rate.is_none() {
        let per_second = try_call(
            "getSupplyRate",
            model
                .getSupplyRate(cash, borrows, reserves, reserve_factor)
                .call(),
        )
        .await;
        if let Some(rate) = per_second {
            let seconds =
                try_call("SECONDS_PER_YEAR", model.SECONDS_PER_YEAR().call())
                    .await;
            supply_rate = per_year(rate, seconds);
        }
    }

    (borrow_rate, supply_rate)
}

/// Scales a per-second rate to per-year. Overflow yields None rather than a
/// wrapped value.
pub fn per_year(
    rate_per_second: U256,
    seconds_per_year: Option<U256>,
) -> Option<U256> {
    rate_per_second
        .checked_mul(seconds_per_year.unwrap_or(U256::from(SECONDS_PER_YEAR)))
}

/// `borrows / (cash + borrows - reserves)`, absent unless both operands are
/// known and the denominator is positive.
pub fn utilization(
    cash: Option<U256>,
    borrows: Option<U256>,
    reserves: U256,
) -> Option<f64> {
    let cash = cash?;
    let borrows = borrows?;

    let denominator = cash.checked_add(borrows)?.checked_sub(reserves)?;
    if denominator.is_zero() {
        return None;
    }

    (to_decimal(borrows) / to_decimal(denominator)).to_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utilization_requires_known_operands() {
        assert_eq!(utilization(None, Some(U256::from(1u64)), U256::ZERO), None);
        assert_eq!(utilization(Some(U256::from(1u64)), None, U256::ZERO), None);
    }

    #[test]
    fn utilization_requires_positive_denominator() {
        // cash + borrows == reserves -> zero denominator
        assert_eq!(
            utilization(
                Some(U256::from(3u64)),
                Some(U256::from(2u64)),
                U256::from(5u64)
            ),
            None
        );
        // reserves exceed cash + borrows -> negative denominator
        assert_eq!(
            utilization(
                Some(U256::from(1u64)),
                Some(U256::from(1u64)),
                U256::from(10u64)
            ),
            None
        );
        assert_eq!(
            utilization(Some(U256::ZERO), Some(U256::ZERO), U256::ZERO),
            None
        );
    }

    #[test]
    fn utilization_divides_borrows_by_liquidity() {
        let value = utilization(
            Some(U256::from(300u64)),
            Some(U256::from(100u64)),
            U256::ZERO,
        )
        .unwrap();
        assert!((value - 0.25).abs() < 1e-12);

        let with_reserves = utilization(
            Some(U256::from(300u64)),
            Some(U256::from(100u64)),
            U256::from(200u64),
        )
        .unwrap();
        assert!((with_reserves - 0.5).abs() < 1e-12);
    }

    #[test]
    fn per_year_defaults_seconds_per_year() {
        assert_eq!(
            per_year(U256::from(100u64), None),
            Some(U256::from(3_153_600_000u64))
        );
    }

    #[test]
    fn per_year_uses_model_seconds_when_present() {
        assert_eq!(
            per_year(U256::from(100u64), Some(U256::from(2u64))),
            Some(U256::from(200u64))
        );
    }

    #[test]
    fn per_year_overflow_is_absent() {
        assert_eq!(per_year(U256::MAX, Some(U256::from(2u64))), None);
    }
}
