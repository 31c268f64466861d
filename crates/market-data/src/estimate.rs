//! Thai Gold Estimate
//!
//! Derives a Thai 96.5% gold board price from the world spot price and the
//! USD/THB rate. Used to sanity-check the association board, or to stand in
//! for it.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::normalize::to_fixed;

/// Grams per troy ounce
pub const TROY_OUNCE_GRAMS: Decimal = dec!(31.1035);
/// Grams per baht-weight of gold
pub const BAHT_WEIGHT_GRAMS: Decimal = dec!(15.244);
/// Thai standard gold purity
pub const PURITY: Decimal = dec!(0.965);

const ROUNDING_STEP: Decimal = dec!(50);
const BAR_SELL_SPREAD: Decimal = dec!(100);
const ORNAMENT_BUY_SPREAD: Decimal = dec!(400);
const ORNAMENT_SELL_SPREAD: Decimal = dec!(500);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThaiGoldEstimate {
    pub gold_price_usd: Decimal,
    pub exchange_rate: Decimal,
    pub price_per_gram_usd: Decimal,
    pub raw_price_thb: Decimal,
    pub purity_adjusted: Decimal,
    pub bar_buy: Decimal,
    pub bar_sell: Decimal,
    pub ornament_buy: Decimal,
    pub ornament_sell: Decimal,
}

/// Baht per baht-weight, rounded to the nearest 50 baht.
///
/// `None` when the inputs are so large the arithmetic overflows.
pub fn estimate_thai_gold(world_usd_per_oz: Decimal, usd_thb: Decimal) -> Option<ThaiGoldEstimate> {
    let price_per_gram = world_usd_per_oz.checked_div(TROY_OUNCE_GRAMS)?;
    let raw_price = price_per_gram
        .checked_mul(BAHT_WEIGHT_GRAMS)?
        .checked_mul(usd_thb)?;
    let adjusted = raw_price.checked_mul(PURITY)?;

    let bar_buy = adjusted
        .checked_div(ROUNDING_STEP)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(ROUNDING_STEP)?;

    Some(ThaiGoldEstimate {
        gold_price_usd: world_usd_per_oz,
        exchange_rate: usd_thb,
        price_per_gram_usd: to_fixed(price_per_gram, 4),
        raw_price_thb: to_fixed(raw_price, 2),
        purity_adjusted: to_fixed(adjusted, 2),
        bar_buy,
        bar_sell: bar_buy.checked_add(BAR_SELL_SPREAD)?,
        ornament_buy: bar_buy.checked_add(ORNAMENT_BUY_SPREAD)?,
        ornament_sell: bar_buy.checked_add(ORNAMENT_SELL_SPREAD)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_from_fallback_inputs() {
        let estimate = estimate_thai_gold(dec!(2644.58), dec!(31.9575)).unwrap();

        assert_eq!(estimate.price_per_gram_usd.to_string(), "85.0252");
        assert_eq!(estimate.purity_adjusted.to_string(), "39971.14");
        assert_eq!(estimate.bar_buy, dec!(39950));
        assert_eq!(estimate.bar_sell, dec!(40050));
        assert_eq!(estimate.ornament_buy, dec!(40350));
        assert_eq!(estimate.ornament_sell, dec!(40450));
    }

    #[test]
    fn test_rounds_to_nearest_fifty() {
        let estimate = estimate_thai_gold(dec!(2000), dec!(35)).unwrap();
        assert_eq!(estimate.bar_buy, dec!(33100));
        assert_eq!(estimate.bar_buy % dec!(50), Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_inputs_give_none() {
        assert!(estimate_thai_gold(Decimal::from_scientific("1e28").unwrap(), dec!(31.9575)).is_none());
        assert!(estimate_thai_gold(dec!(2644.58), Decimal::MAX).is_none());
    }
}
