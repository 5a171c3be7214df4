//! Core value types and configuration for the shiprate workspace.
//!
//! Everything here is plain data: distances and their unit conversions,
//! origin/destination locations, the order snapshot, global settings, the
//! rate table, and environment-driven process configuration. No I/O beyond
//! reading the rates file and the environment.

mod app_config;
mod config;
mod distance;
mod error;
mod location;
mod order;
mod rates;
mod settings;
mod units;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use distance::{Distance, DistanceFormatter, DistanceParts};
pub use error::{ConfigError, CoreError};
pub use location::{AddressComponents, Location, LocationKind};
pub use order::{LineItem, OrderContext};
pub use rates::{load_rates, RateRow, RatesFile};
pub use settings::{AdjustmentType, GlobalSettings, TotalCostType};
pub use units::DistanceUnit;
