//! Amount validation shared by every money movement.

use crate::types::BankerError;

/// Validate a raw amount and floor it to whole money.
///
/// Fails unless the value is finite and the floor is at least 1. Amounts
/// that do not fit a signed 64-bit delta are refused as well.
pub fn normalize_amount(value: f64) -> Result<u64, BankerError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(BankerError::InvalidAmount(value.to_string()));
    }
    let floored = value.floor();
    if floored < 1.0 || floored >= i64::MAX as f64 {
        return Err(BankerError::InvalidAmount(value.to_string()));
    }
    Ok(floored as u64)
}

/// Coerce typed input to an amount. Text that is not a number is an
/// invalid amount, same as zero or a negative value.
pub fn parse_amount(input: &str) -> Result<u64, BankerError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| BankerError::InvalidAmount(input.trim().to_string()))?;
    normalize_amount(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_floors_fractions() {
        assert_eq!(normalize_amount(500.0), Ok(500));
        assert_eq!(normalize_amount(99.99), Ok(99));
        assert_eq!(normalize_amount(1.0), Ok(1));
    }

    #[test]
    fn test_normalize_rejects_non_positive_and_non_finite() {
        for bad in [0.0, -1.0, -0.5, 0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(
                matches!(normalize_amount(bad), Err(BankerError::InvalidAmount(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_normalize_rejects_out_of_range() {
        assert!(normalize_amount(1e19).is_err());
        assert!(normalize_amount(9_000_000_000_000_000_000.0).is_ok());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 1500 "), Ok(1500));
        assert_eq!(parse_amount("12.7"), Ok(12));
        assert_eq!(parse_amount("abc"), Err(BankerError::InvalidAmount("abc".to_string())));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("inf").is_err());
    }
}
