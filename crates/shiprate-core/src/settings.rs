//! Global calculator settings and the enums shared with rate rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::units::DistanceUnit;

/// Strategy for combining per-item costs into one shipping cost.
///
/// Wire names keep the `flat__`/`progressive__` prefixes used by the
/// persisted settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotalCostType {
    #[serde(rename = "flat__highest")]
    FlatHighest,
    #[serde(rename = "flat__lowest")]
    FlatLowest,
    #[serde(rename = "flat__average")]
    FlatAverage,
    #[serde(rename = "progressive__per_shipping_class")]
    PerShippingClass,
    #[serde(rename = "progressive__per_product")]
    PerProduct,
    #[default]
    #[serde(rename = "progressive__per_piece")]
    PerPiece,
}

/// How a surcharge or discount amount is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentType {
    #[default]
    None,
    Fixed,
    Percent,
}

/// Operator-level defaults; rate rows may override most of these per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    pub distance_unit: DistanceUnit,
    /// Round the calculated distance up to the next whole unit before
    /// matching and pricing.
    pub round_up_distance: bool,
    /// Append the formatted distance to the shipping label.
    pub show_distance: bool,
    pub title: String,
    pub total_cost_type: TotalCostType,
    pub surcharge_type: AdjustmentType,
    pub surcharge: Decimal,
    pub discount_type: AdjustmentType,
    pub discount: Decimal,
    /// `None` or zero disables the bound.
    pub min_cost: Option<Decimal>,
    pub max_cost: Option<Decimal>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            distance_unit: DistanceUnit::Kilometers,
            round_up_distance: false,
            show_distance: false,
            title: "Shipping".to_owned(),
            total_cost_type: TotalCostType::default(),
            surcharge_type: AdjustmentType::default(),
            surcharge: Decimal::ZERO,
            discount_type: AdjustmentType::default(),
            discount: Decimal::ZERO,
            min_cost: None,
            max_cost: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_cost_type_wire_names() {
        let t: TotalCostType = serde_yaml::from_str("flat__highest").unwrap();
        assert_eq!(t, TotalCostType::FlatHighest);
        let t: TotalCostType = serde_yaml::from_str("progressive__per_piece").unwrap();
        assert_eq!(t, TotalCostType::PerPiece);
        assert!(serde_yaml::from_str::<TotalCostType>("flat_highest").is_err());
    }

    #[test]
    fn defaults_are_progressive_per_piece_with_no_adjustments() {
        let settings = GlobalSettings::default();
        assert_eq!(settings.distance_unit, DistanceUnit::Kilometers);
        assert_eq!(settings.total_cost_type, TotalCostType::PerPiece);
        assert_eq!(settings.surcharge_type, AdjustmentType::None);
        assert_eq!(settings.title, "Shipping");
        assert!(settings.min_cost.is_none());
    }

    #[test]
    fn settings_deserialize_with_partial_yaml() {
        let settings: GlobalSettings = serde_yaml::from_str(
            "distance_unit: mi\ntotal_cost_type: flat__average\nsurcharge_type: percent\nsurcharge: 10\n",
        )
        .unwrap();
        assert_eq!(settings.distance_unit, DistanceUnit::Miles);
        assert_eq!(settings.total_cost_type, TotalCostType::FlatAverage);
        assert_eq!(settings.surcharge_type, AdjustmentType::Percent);
        assert_eq!(settings.surcharge, Decimal::new(10, 0));
        // Untouched fields keep their defaults.
        assert!(!settings.round_up_distance);
    }
}
