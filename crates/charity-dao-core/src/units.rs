//! Decimal token amounts.
//!
//! Amounts travel on-chain as integers scaled by `10^decimals`. These helpers
//! convert between user-facing decimal strings and those integers without
//! floating point.

use alloy_primitives::U256;

use crate::errors::{DaoError, DaoResult};

/// Longest accepted amount input, in characters.
pub const MAX_AMOUNT_INPUT_LEN: usize = 24;

/// Largest supported `decimals` value.
pub const MAX_DECIMALS: u8 = 36;

/// `10^decimals` as a `U256`.
pub fn scale(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Parse a decimal string such as `"1.5"` into base units.
pub fn parse_units(input: &str, decimals: u8) -> DaoResult<U256> {
    if decimals > MAX_DECIMALS {
        return Err(DaoError::invalid_argument(format!("unsupported decimals: {decimals}")));
    }
    let s = input.trim();
    if s.is_empty() {
        return Err(DaoError::invalid_argument("amount is required"));
    }

    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(DaoError::invalid_argument(format!("invalid amount: {input}")));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(DaoError::invalid_argument(format!("invalid amount: {input}")));
    }
    if frac.len() > decimals as usize {
        return Err(DaoError::invalid_argument(format!(
            "amount {input} has more than {decimals} fractional digits"
        )));
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(frac);
    digits.extend(std::iter::repeat('0').take(decimals as usize - frac.len()));
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(digits, 10)
        .map_err(|_| DaoError::invalid_argument(format!("amount out of range: {input}")))
}

/// Format base units as a decimal string without trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
    let raw = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return raw;
    }

    let padded = if raw.len() <= decimals {
        format!("{}{raw}", "0".repeat(decimals - raw.len() + 1))
    } else {
        raw
    };
    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{frac}")
    }
}

/// Parse a user-entered purchase amount: bounded length, strictly positive.
pub fn parse_purchase_amount(input: &str, decimals: u8) -> DaoResult<U256> {
    if input.trim().len() > MAX_AMOUNT_INPUT_LEN {
        return Err(DaoError::invalid_argument(format!(
            "amount input too long - up to {MAX_AMOUNT_INPUT_LEN} characters"
        )));
    }
    let amount = parse_units(input, decimals)?;
    if amount.is_zero() {
        return Err(DaoError::invalid_argument("amount must be greater than zero"));
    }
    Ok(amount)
}

/// Price of `amount` tokens (in token base units) expressed in payment-token
/// base units: `amount * price / 10^token_decimals`, rounded down.
pub fn purchase_total(amount: U256, price: U256, token_decimals: u8) -> DaoResult<U256> {
    amount
        .checked_mul(price)
        .map(|v| v / scale(token_decimals))
        .ok_or_else(|| DaoError::invalid_argument("purchase total overflows"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_whole_and_fractional() {
        assert_eq!(parse_units("10", 6).unwrap(), U256::from(10_000_000u64));
        assert_eq!(parse_units("1.5", 18).unwrap(), U256::from(1_500_000_000_000_000_000u128));
        assert_eq!(parse_units(".25", 2).unwrap(), U256::from(25u64));
        assert_eq!(parse_units("0", 18).unwrap(), U256::ZERO);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_units("", 6).is_err());
        assert!(parse_units(".", 6).is_err());
        assert!(parse_units("1.2.3", 6).is_err());
        assert!(parse_units("-1", 6).is_err());
        assert!(parse_units("1e3", 6).is_err());
        assert!(parse_units("0.0000001", 6).is_err());
    }

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_units(U256::from(10_000_000u64), 6), "10");
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_units(U256::from(5u64), 6), "0.000005");
        assert_eq!(format_units(U256::ZERO, 18), "0");
    }

    #[test]
    fn purchase_amount_limits() {
        assert!(parse_purchase_amount("0", 18).is_err());
        assert!(parse_purchase_amount(&"1".repeat(25), 18).is_err());
        assert_eq!(parse_purchase_amount("2", 0).unwrap(), U256::from(2u64));
    }

    #[test]
    fn total_for_ten_usdc_price() {
        // 3 tokens at 10 USDC each = 30 USDC in 6-decimal units.
        let amount = parse_units("3", 18).unwrap();
        let price = parse_units("10", 6).unwrap();
        assert_eq!(purchase_total(amount, price, 18).unwrap(), U256::from(30_000_000u64));

        let half = parse_units("0.5", 18).unwrap();
        assert_eq!(purchase_total(half, price, 18).unwrap(), U256::from(5_000_000u64));
    }

    proptest! {
        #[test]
        fn formatted_value_parses_back(v in any::<u128>(), decimals in 0u8..=18) {
            let value = U256::from(v);
            let text = format_units(value, decimals);
            prop_assert_eq!(parse_units(&text, decimals).unwrap(), value);
        }
    }
}
