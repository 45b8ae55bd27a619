use bigdecimal::BigDecimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPosition {
    pub market: String,
    pub underlying: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    #[serde(rename = "supplyDToken")]
    pub supply_dtoken: Option<BigDecimal>,
    pub supply_underlying: Option<BigDecimal>,
    pub borrow_balance: Option<BigDecimal>,
    pub exchange_rate: Option<BigDecimal>,
    pub price: Option<BigDecimal>,
    pub collateral_factor: Option<BigDecimal>,
    pub is_listed: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub account: String,
    pub liquidity: Option<BigDecimal>,
    pub shortfall: Option<BigDecimal>,
    /// True iff the comptroller reports zero shortfall; null when the
    /// shortfall itself could not be read.
    pub is_healthy: Option<bool>,
    pub positions: Vec<AccountPosition>,
}
