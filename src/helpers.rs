use alloy::primitives::{Address, U256};
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

/// Parses an account or contract address. Uniform-case input is accepted as
/// plain hex; mixed-case input must carry a valid EIP-55 checksum.
pub fn parse_address(value: &str) -> Option<Address> {
    let hex = value.strip_prefix("0x")?;
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let mixed_case = hex.bytes().any(|b| b.is_ascii_uppercase())
        && hex.bytes().any(|b| b.is_ascii_lowercase());

    if mixed_case {
        Address::parse_checksummed(value, None).ok()
    } else {
        value.parse().ok()
    }
}

pub fn to_decimal(value: U256) -> BigDecimal {
    let int = BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>());
    BigDecimal::from(int)
}

#[cfg(test)]
mod tests {
    use super::*;

    // EIP-55 test vector
    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn accepts_lowercase_address() {
        let parsed = parse_address(&CHECKSUMMED.to_lowercase());
        assert_eq!(parsed.unwrap().to_checksum(None), CHECKSUMMED);
    }

    #[test]
    fn accepts_uppercase_address() {
        let upper = format!("0x{}", CHECKSUMMED[2..].to_uppercase());
        let parsed = parse_address(&upper);
        assert_eq!(parsed.unwrap().to_checksum(None), CHECKSUMMED);
    }

    #[test]
    fn accepts_valid_checksum() {
        assert!(parse_address(CHECKSUMMED).is_some());
    }

    #[test]
    fn rejects_broken_checksum() {
        // flip the case of one checksummed character
        let broken = CHECKSUMMED.replace("aAeb", "aaeb");
        assert!(parse_address(&broken).is_none());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_address("").is_none());
        assert!(parse_address("0x1234").is_none());
        assert!(parse_address("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_none());
        assert!(parse_address("0xZZZeb6053F3E94C9b9A09f33669435E7Ef1BeAe1").is_none());
    }

    #[test]
    fn converts_u256_to_decimal() {
        assert_eq!(to_decimal(U256::ZERO), BigDecimal::from(0));
        assert_eq!(to_decimal(U256::from(42u64)), BigDecimal::from(42));
        assert_eq!(to_decimal(U256::MAX).to_string(), U256::MAX.to_string());
    }
}
