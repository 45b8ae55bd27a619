use alloy::{
    primitives::B256, rpc::types::Log, sol, sol_types::SolEvent,
};
use serde_json::{json, Value};

use crate::error::Error;

sol! {
    #[sol(rpc)]
    contract LendingToken {
        function underlying() external view returns (address);
        function totalSupply() external view returns (uint256);
        function totalBorrows() external view returns (uint256);
        function totalReserves() external view returns (uint256);
        function getCash() external view returns (uint256);
        function exchangeRateStored() external view returns (uint256);
        function interestRateModel() external view returns (address);
        function reserveFactorMantissa() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function borrowBalanceStored(address account) external view returns (uint256);

        event Mint(address minter, uint256 mintAmount, uint256 mintTokens);
        event Redeem(address redeemer, uint256 redeemAmount, uint256 redeemTokens);
        event Borrow(address borrower, uint256 borrowAmount, uint256 accountBorrows, uint256 totalBorrows);
        event RepayBorrow(address payer, address borrower, uint256 repayAmount, uint256 accountBorrows, uint256 totalBorrows);
        event LiquidateBorrow(address liquidator, address borrower, uint256 repayAmount, address dTokenCollateral, uint256 seizeTokens);
        event Transfer(address indexed from, address indexed to, uint256 amount);
    }

    #[sol(rpc)]
    contract Comptroller {
        function getMarketConfiguration(address market) external view returns (uint256 collateralFactor, bool isListed);
        function getAccountLiquidity(address account) external view returns (uint256 liquidity, uint256 shortfall);
    }

    #[sol(rpc)]
    contract Erc20 {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }

    #[sol(rpc)]
    contract PriceOracle {
        function getAssetPrice(address asset) external view returns (uint256);
    }

    #[sol(rpc)]
    contract JumpRateModel {
        function getBorrowRatePerYear(uint256 cash, uint256 borrows, uint256 reserves) external view returns (uint256);
        function getSupplyRatePerYear(uint256 cash, uint256 borrows, uint256 reserves, uint256 reserveFactorMantissa) external view returns (uint256);
        function getBorrowRate(uint256 cash, uint256 borrows, uint256 reserves) external view returns (uint256);
        function getSupplyRate(uint256 cash, uint256 borrows, uint256 reserves, uint256 reserveFactorMantissa) external view returns (uint256);
        function SECONDS_PER_YEAR() external view returns (uint256);
    }
}

/// The fixed set of market events kept in the local log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedEvent {
    Mint,
    Redeem,
    Borrow,
    RepayBorrow,
    LiquidateBorrow,
    Transfer,
}

impl TrackedEvent {
    pub const ALL: [TrackedEvent; 6] = [
        TrackedEvent::Mint,
        TrackedEvent::Redeem,
        TrackedEvent::Borrow,
        TrackedEvent::RepayBorrow,
        TrackedEvent::LiquidateBorrow,
        TrackedEvent::Transfer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TrackedEvent::Mint => "Mint",
            TrackedEvent::Redeem => "Redeem",
            TrackedEvent::Borrow => "Borrow",
            TrackedEvent::RepayBorrow => "RepayBorrow",
            TrackedEvent::LiquidateBorrow => "LiquidateBorrow",
            TrackedEvent::Transfer => "Transfer",
        }
    }

    /// topic0 used to filter the node's logs for this event.
    pub fn signature_hash(&self) -> B256 {
        match self {
            TrackedEvent::Mint => LendingToken::Mint::SIGNATURE_HASH,
            TrackedEvent::Redeem => LendingToken::Redeem::SIGNATURE_HASH,
            TrackedEvent::Borrow => LendingToken::Borrow::SIGNATURE_HASH,
            TrackedEvent::RepayBorrow => {
                LendingToken::RepayBorrow::SIGNATURE_HASH
            },
            TrackedEvent::LiquidateBorrow => {
                LendingToken::LiquidateBorrow::SIGNATURE_HASH
            },
            TrackedEvent::Transfer => LendingToken::Transfer::SIGNATURE_HASH,
        }
    }

    /// Decodes a fetched log into the args object stored alongside the
    /// event. Addresses are checksummed, uint256 amounts rendered as
    /// decimal strings.
    pub fn decode_args(&self, log: &Log) -> Result<Value, Error> {
        let args = match self {
            TrackedEvent::Mint => {
                let event =
                    log.log_decode::<LendingToken::Mint>()?.inner.data;
                json!({
                    "minter": event.minter.to_checksum(None),
                    "mintAmount": event.mintAmount.to_string(),
                    "mintTokens": event.mintTokens.to_string(),
                })
            },
            TrackedEvent::Redeem => {
                let event =
                    log.log_decode::<LendingToken::Redeem>()?.inner.data;
                json!({
                    "redeemer": event.redeemer.to_checksum(None),
                    "redeemAmount": event.redeemAmount.to_string(),
                    "redeemTokens": event.redeemTokens.to_string(),
                })
            },
            TrackedEvent::Borrow => {
                let event =
                    log.log_decode::<LendingToken::Borrow>()?.inner.data;
                json!({
                    "borrower": event.borrower.to_checksum(None),
                    "borrowAmount": event.borrowAmount.to_string(),
                    "accountBorrows": event.accountBorrows.to_string(),
                    "totalBorrows": event.totalBorrows.to_string(),
                })
            },
            TrackedEvent::RepayBorrow => {
                let event =
                    log.log_decode::<LendingToken::RepayBorrow>()?.inner.data;
                json!({
                    "payer": event.payer.to_checksum(None),
                    "borrower": event.borrower.to_checksum(None),
                    "repayAmount": event.repayAmount.to_string(),
                    "accountBorrows": event.accountBorrows.to_string(),
                    "totalBorrows": event.totalBorrows.to_string(),
                })
            },
            TrackedEvent::LiquidateBorrow => {
                let event = log
                    .log_decode::<LendingToken::LiquidateBorrow>()?
                    .inner
                    .data;
                json!({
                    "liquidator": event.liquidator.to_checksum(None),
                    "borrower": event.borrower.to_checksum(None),
                    "repayAmount": event.repayAmount.to_string(),
                    "dTokenCollateral": event.dTokenCollateral.to_checksum(None),
                    "seizeTokens": event.seizeTokens.to_string(),
                })
            },
            TrackedEvent::Transfer => {
                let event =
                    log.log_decode::<LendingToken::Transfer>()?.inner.data;
                json!({
                    "from": event.from.to_checksum(None),
                    "to": event.to.to_checksum(None),
                    "amount": event.amount.to_string(),
                })
            },
        };

        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, LogData, B256, U256};

    use super::*;

    fn rpc_log(address: Address, data: LogData) -> Log {
        Log {
            inner: alloy::primitives::Log { address, data },
            block_hash: None,
            block_number: Some(4321),
            block_timestamp: None,
            transaction_hash: Some(B256::repeat_byte(0x11)),
            transaction_index: Some(0),
            log_index: Some(7),
            removed: false,
        }
    }

    #[test]
    fn decodes_mint_args() {
        let minter = Address::repeat_byte(0xaa);
        let data = LendingToken::Mint {
            minter,
            mintAmount: U256::from(1_500u64),
            mintTokens: U256::from(3u64),
        }
        .encode_log_data();

        let log = rpc_log(Address::repeat_byte(0x01), data);
        let args = TrackedEvent::Mint.decode_args(&log).unwrap();

        assert_eq!(args["minter"], minter.to_checksum(None));
        assert_eq!(args["mintAmount"], "1500");
        assert_eq!(args["mintTokens"], "3");
    }

    #[test]
    fn decodes_indexed_transfer_args() {
        let from = Address::repeat_byte(0x02);
        let to = Address::repeat_byte(0x03);
        let data = LendingToken::Transfer {
            from,
            to,
            amount: U256::from(9_999u64),
        }
        .encode_log_data();

        let log = rpc_log(Address::repeat_byte(0x01), data);
        let args = TrackedEvent::Transfer.decode_args(&log).unwrap();

        assert_eq!(args["from"], from.to_checksum(None));
        assert_eq!(args["to"], to.to_checksum(None));
        assert_eq!(args["amount"], "9999");
    }

    #[test]
    fn rejects_mismatched_event_data() {
        let data = LendingToken::Mint {
            minter: Address::repeat_byte(0xaa),
            mintAmount: U256::from(1u64),
            mintTokens: U256::from(1u64),
        }
        .encode_log_data();

        let log = rpc_log(Address::repeat_byte(0x01), data);
        assert!(TrackedEvent::Transfer.decode_args(&log).is_err());
    }

    #[test]
    fn tracked_events_have_distinct_topics() {
        for (i, a) in TrackedEvent::ALL.iter().enumerate() {
            for b in TrackedEvent::ALL.iter().skip(i + 1) {
                assert_ne!(a.signature_hash(), b.signature_hash());
            }
        }
    }
}
