use alloy_primitives::U256;
use thiserror::Error;

/// ERC-20 default precision, also the precision of the native coin.
pub const DEFAULT_DECIMALS: u8 = 18;

/// This enum describes fixed-point conversion errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Amount is empty")]
    Empty {},

    #[error("Amount contains a non-numeric character: {0:?}")]
    InvalidCharacter(char),

    #[error("Amount has more than one decimal point")]
    MultipleDecimalPoints {},

    #[error("Amount has {got} fractional digits, token only supports {max}")]
    PrecisionLoss { got: usize, max: u8 },

    #[error("Amount does not fit into 256 bits")]
    Overflow {},
}

/// Converts a non-negative decimal string into an integer amount in smallest
/// token units, scaled by `decimals`. Fractional digits beyond the token's
/// precision are rejected rather than truncated.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256, UnitsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UnitsError::Empty {});
    }
    let (int_part, frac_part) = match input.split_once('.') {
        None => (input, ""),
        Some((int_part, frac_part)) => {
            if frac_part.contains('.') {
                return Err(UnitsError::MultipleDecimalPoints {});
            }
            (int_part, frac_part)
        }
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(UnitsError::Empty {});
    }
    if frac_part.len() > decimals as usize {
        return Err(UnitsError::PrecisionLoss {
            got: frac_part.len(),
            max: decimals,
        });
    }

    let ten = U256::from(10u8);
    let mut value = U256::ZERO;
    for c in int_part.chars().chain(frac_part.chars()) {
        let digit = c.to_digit(10).ok_or(UnitsError::InvalidCharacter(c))?;
        value = value
            .checked_mul(ten)
            .and_then(|v| v.checked_add(U256::from(digit)))
            .ok_or(UnitsError::Overflow {})?;
    }
    for _ in 0..(decimals as usize - frac_part.len()) {
        value = value.checked_mul(ten).ok_or(UnitsError::Overflow {})?;
    }
    Ok(value)
}

/// Renders an integer amount in smallest token units back into its decimal
/// form, trimming trailing fractional zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let (int_part, frac_part) = match U256::from(10u8).checked_pow(U256::from(decimals)) {
        Some(scale) => (value / scale, value % scale),
        None => (U256::ZERO, value),
    };
    if frac_part.is_zero() {
        return int_part.to_string();
    }
    let digits = frac_part.to_string();
    let mut padded = "0".repeat(decimals as usize - digits.len());
    padded.push_str(&digits);
    format!("{}.{}", int_part, padded.trim_end_matches('0'))
}
