//! The operator-defined rate table and its YAML loader.
//!
//! Row order in the file is preserved verbatim because matching is
//! first-match-wins. Override fields accept `null`, `""`, or `"inherit"` as
//! "use the global default".

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;
use crate::settings::{AdjustmentType, GlobalSettings, TotalCostType};

/// One configured shipping rule.
///
/// Rule fields gate whether the row applies; rate fields price it. `None`
/// on an override field means "inherit the global setting"; `None` or zero
/// on a bound means "unbounded".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RateRow {
    /// Upper bound on the calculated distance, inclusive. A row without it
    /// never matches.
    pub max_distance: Option<Decimal>,
    pub min_order_amount: Option<Decimal>,
    pub max_order_amount: Option<Decimal>,
    pub min_order_quantity: Option<u32>,
    pub max_order_quantity: Option<u32>,
    /// Cost per distance unit for items with no class-specific rate.
    pub base_rate: Option<Decimal>,
    /// Per-shipping-class cost overrides, keyed by shipping class id.
    pub class_rates: BTreeMap<i64, Decimal>,
    #[serde(deserialize_with = "inheritable")]
    pub total_cost_type: Option<TotalCostType>,
    #[serde(deserialize_with = "inheritable")]
    pub surcharge_type: Option<AdjustmentType>,
    #[serde(deserialize_with = "inheritable")]
    pub surcharge: Option<Decimal>,
    #[serde(deserialize_with = "inheritable")]
    pub discount_type: Option<AdjustmentType>,
    #[serde(deserialize_with = "inheritable")]
    pub discount: Option<Decimal>,
    #[serde(deserialize_with = "inheritable")]
    pub min_cost: Option<Decimal>,
    #[serde(deserialize_with = "inheritable")]
    pub max_cost: Option<Decimal>,
    #[serde(deserialize_with = "inheritable")]
    pub title: Option<String>,
}

/// The full rates configuration: global defaults plus the ordered table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatesFile {
    #[serde(default)]
    pub settings: GlobalSettings,
    #[serde(default)]
    pub rates: Vec<RateRow>,
}

/// Maps `null`, `""`, and `"inherit"` to `None`; anything else parses as `T`.
fn inheritable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) if s.is_empty() || s == "inherit" => Ok(None),
        Some(v) => T::deserialize(v).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Load and validate the rates configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_rates(path: &Path) -> Result<RatesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RatesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let rates_file: RatesFile = serde_yaml::from_str(&content)?;
    validate_rates(&rates_file)?;

    Ok(rates_file)
}

fn validate_rates(rates_file: &RatesFile) -> Result<(), ConfigError> {
    for (index, row) in rates_file.rates.iter().enumerate() {
        let place = index + 1;
        if let Some(max_distance) = row.max_distance {
            if max_distance.is_sign_negative() {
                return Err(ConfigError::Validation(format!(
                    "rate row {place}: max_distance must not be negative"
                )));
            }
        }
        if row.base_rate.is_some_and(|r| r.is_sign_negative())
            || row.class_rates.values().any(|r| r.is_sign_negative())
        {
            return Err(ConfigError::Validation(format!(
                "rate row {place}: rates must not be negative"
            )));
        }
        if let (Some(min), Some(max)) = (row.min_order_amount, row.max_order_amount) {
            if !min.is_zero() && !max.is_zero() && min > max {
                return Err(ConfigError::Validation(format!(
                    "rate row {place}: min_order_amount exceeds max_order_amount"
                )));
            }
        }
    }
    Ok(())
}
