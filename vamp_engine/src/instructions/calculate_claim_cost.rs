use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constant::{LAMPORTS_DECIMALS, MAX_CURVE_EXPONENT};
use crate::error::{Result, VampError};

/// `price(s) = base_price + curve_slope * s^curve_exponent`, in lamports per token unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondingCurve {
    pub base_price: u64,
    pub curve_slope: u64,
    pub curve_exponent: u32,
    /// Ceiling on the marginal price; requests crossing it are rejected.
    pub max_price: Option<u64>,
}

impl BondingCurve {
    pub fn price_at(&self, supply: u64) -> Result<u128> {
        if self.curve_slope == 0 {
            return Ok(self.base_price as u128);
        }
        let power = pow(supply as u128, self.curve_exponent)?;
        (self.curve_slope as u128)
            .checked_mul(power)
            .and_then(|v| v.checked_add(self.base_price as u128))
            .ok_or(VampError::ArithmeticOverflow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingMode {
    /// Paid claiming disabled.
    Free,
    FixedPrice {
        flat_price_per_token: u64,
        max_price: Option<u64>,
    },
    BondingCurve(BondingCurve),
}

impl PricingMode {
    /// Price of the unit at `supply`, before any ceiling check.
    pub fn unit_price(&self, supply: u64) -> Result<u64> {
        match self {
            PricingMode::Free => Ok(0),
            PricingMode::FixedPrice {
                flat_price_per_token,
                ..
            } => Ok(*flat_price_per_token),
            PricingMode::BondingCurve(curve) => {
                u64::try_from(curve.price_at(supply)?).map_err(|_| VampError::ArithmeticOverflow)
            }
        }
    }
}

fn unsupported_exponent(exponent: u32) -> VampError {
    VampError::InvalidAccountData(format!("unsupported curve exponent {exponent}"))
}

fn pow(base: u128, exponent: u32) -> Result<u128> {
    if exponent > MAX_CURVE_EXPONENT {
        return Err(unsupported_exponent(exponent));
    }
    base.checked_pow(exponent).ok_or(VampError::ArithmeticOverflow)
}

/// `sum(k^exponent for k in 0..n)`
fn power_sum(n: u128, exponent: u32) -> Result<u128> {
    if n == 0 {
        return Ok(0);
    }
    let m = n - 1;
    // n * (n - 1) / 2 without the intermediate product overflowing
    let triangular = if n % 2 == 0 {
        (n / 2).checked_mul(m)
    } else {
        n.checked_mul(m / 2)
    };
    let sum = match exponent {
        0 => Some(n),
        1 => triangular,
        2 => m
            .checked_mul(n)
            .and_then(|v| v.checked_mul(2 * m + 1))
            .map(|v| v / 6),
        3 => triangular.and_then(|t| t.checked_mul(t)),
        _ => return Err(unsupported_exponent(exponent)),
    };
    sum.ok_or(VampError::ArithmeticOverflow)
}

fn check_ceiling(price: u128, max_price: Option<u64>) -> Result<()> {
    match max_price {
        Some(max_price) if price > max_price as u128 => {
            Err(VampError::PriceCeilingExceeded { price, max_price })
        }
        _ => Ok(()),
    }
}

/// Cost of `token_amount` units at a flat price per unit.
pub fn calculate_claim_cost_fixed_price(
    token_amount: u64,
    flat_price_per_token: u64,
    max_price: Option<u64>,
) -> Result<u64> {
    if token_amount == 0 {
        return Ok(0);
    }
    check_ceiling(flat_price_per_token as u128, max_price)?;
    token_amount
        .checked_mul(flat_price_per_token)
        .ok_or(VampError::ArithmeticOverflow)
}

/// Exact sum of `curve.price_at(s)` for `s` in `[current_supply, current_supply + token_amount)`.
pub fn calculate_claim_cost_bonding_curve(
    token_amount: u64,
    current_supply: u64,
    curve: &BondingCurve,
) -> Result<u64> {
    if token_amount == 0 {
        return Ok(0);
    }
    let last_unit = current_supply
        .checked_add(token_amount - 1)
        .ok_or(VampError::ArithmeticOverflow)?;
    // a marginal price too large for u128 is above any ceiling
    let marginal_price = match (curve.price_at(last_unit), curve.max_price) {
        (Err(VampError::ArithmeticOverflow), Some(max_price)) => {
            return Err(VampError::PriceCeilingExceeded {
                price: u128::MAX,
                max_price,
            })
        }
        (price, _) => price?,
    };
    check_ceiling(marginal_price, curve.max_price)?;

    let base_cost = (token_amount as u128)
        .checked_mul(curve.base_price as u128)
        .ok_or(VampError::ArithmeticOverflow)?;

    let curve_cost = if curve.curve_slope == 0 {
        0
    } else {
        let start = current_supply as u128;
        let end = start + token_amount as u128;
        let units = power_sum(end, curve.curve_exponent)?
            .checked_sub(power_sum(start, curve.curve_exponent)?)
            .ok_or(VampError::ArithmeticOverflow)?;
        units
            .checked_mul(curve.curve_slope as u128)
            .ok_or(VampError::ArithmeticOverflow)?
    };

    let total = base_cost
        .checked_add(curve_cost)
        .ok_or(VampError::ArithmeticOverflow)?;
    u64::try_from(total).map_err(|_| VampError::ArithmeticOverflow)
}

/// Lamports owed for claiming `token_amount` units when `current_supply` are already circulating.
pub fn calculate_claim_cost(
    current_supply: u64,
    token_amount: u64,
    mode: &PricingMode,
) -> Result<u64> {
    match mode {
        PricingMode::Free => Ok(0),
        PricingMode::FixedPrice {
            flat_price_per_token,
            max_price,
        } => calculate_claim_cost_fixed_price(token_amount, *flat_price_per_token, *max_price),
        PricingMode::BondingCurve(curve) => {
            calculate_claim_cost_bonding_curve(token_amount, current_supply, curve)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimQuote {
    pub token_amount: u64,
    pub current_supply: u64,
    pub cost: u64,
    /// Price of the last unit in the request (of the next unit for an empty request).
    pub marginal_price: u64,
    pub cost_sol: Decimal,
}

pub fn quote_claim(current_supply: u64, token_amount: u64, mode: &PricingMode) -> Result<ClaimQuote> {
    let cost = calculate_claim_cost(current_supply, token_amount, mode)?;
    let last_unit = current_supply
        .checked_add(token_amount.saturating_sub(1))
        .ok_or(VampError::ArithmeticOverflow)?;
    let marginal_price = mode.unit_price(last_unit)?;
    Ok(ClaimQuote {
        token_amount,
        current_supply,
        cost,
        marginal_price,
        cost_sol: Decimal::from_i128_with_scale(cost as i128, LAMPORTS_DECIMALS),
    })
}
