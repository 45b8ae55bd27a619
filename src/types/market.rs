use bigdecimal::BigDecimal;
use serde::Serialize;

/// Point-in-time view over one market contract. Every derived field is
/// independently optional: a failed upstream call leaves that field null
/// without invalidating the rest of the snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub market: String,
    pub underlying: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub total_supply: Option<BigDecimal>,
    pub total_borrows: Option<BigDecimal>,
    pub total_reserves: Option<BigDecimal>,
    pub cash: Option<BigDecimal>,
    pub exchange_rate: Option<BigDecimal>,
    pub utilization: Option<f64>,
    pub borrow_rate_per_year: Option<BigDecimal>,
    pub supply_rate_per_year: Option<BigDecimal>,
    pub price: Option<BigDecimal>,
    pub collateral_factor: Option<BigDecimal>,
    pub is_listed: Option<bool>,
}
