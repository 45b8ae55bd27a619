pub use self::{
    account::{AccountPosition, AccountSnapshot},
    contracts::{
        Comptroller, Erc20, JumpRateModel, LendingToken, PriceOracle,
        TrackedEvent,
    },
    market::MarketSnapshot,
};

mod account;
mod contracts;
mod market;
