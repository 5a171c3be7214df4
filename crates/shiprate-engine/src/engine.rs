//! Row matching and cost computation over the ordered rate table.
//!
//! Matching is first-match-wins in stored order. Costs are computed per
//! shippable line item, aggregated by the row's (or global) total-cost
//! strategy, adjusted by surcharge/discount, and clamped.
//!
//! The progressive aggregations deduplicate by shipping-class/product key:
//! a later line item sharing a key replaces the earlier per-item cost
//! instead of adding to it. That matches the long-observed behavior this
//! engine reproduces; the tests name it explicitly so changing it is a
//! deliberate decision.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use shiprate_core::{
    AdjustmentType, Distance, GlobalSettings, LineItem, OrderContext, RateRow, TotalCostType,
};

/// A priced shipping option.
#[derive(Debug, Clone)]
pub struct Quote {
    pub cost: Decimal,
    pub formatted_cost: String,
    pub label: String,
}

/// First row, in stored order, whose rule predicates all hold.
///
/// `None` means "no shipping option available" — a normal outcome, not an
/// error. A row without `max_distance` never matches; order bounds of zero
/// are treated as unbounded.
#[must_use]
pub fn match_row<'a>(
    rows: &'a [RateRow],
    distance: &Distance,
    ctx: &OrderContext,
    settings: &GlobalSettings,
) -> Option<&'a RateRow> {
    let travelled = distance.value_in(settings.distance_unit);
    rows.iter().find(|row| {
        row.max_distance.is_some_and(|max| travelled <= max)
            && min_bound_ok(row.min_order_amount, ctx.subtotal)
            && max_bound_ok(row.max_order_amount, ctx.subtotal)
            && min_quantity_ok(row.min_order_quantity, ctx.item_count)
            && max_quantity_ok(row.max_order_quantity, ctx.item_count)
    })
}

fn min_bound_ok(bound: Option<Decimal>, value: Decimal) -> bool {
    bound.is_none_or(|b| b.is_zero() || b <= value)
}

fn max_bound_ok(bound: Option<Decimal>, value: Decimal) -> bool {
    bound.is_none_or(|b| b.is_zero() || b >= value)
}

fn min_quantity_ok(bound: Option<u32>, value: u32) -> bool {
    bound.is_none_or(|b| b == 0 || b <= value)
}

fn max_quantity_ok(bound: Option<u32>, value: u32) -> bool {
    bound.is_none_or(|b| b == 0 || b >= value)
}

/// Computes the shipping cost for a matched row.
#[must_use]
pub fn compute_cost(
    row: &RateRow,
    distance: &Distance,
    ctx: &OrderContext,
    settings: &GlobalSettings,
) -> Decimal {
    let travelled = distance.value_in(settings.distance_unit);

    let item_costs: Vec<(&LineItem, Decimal)> = ctx
        .shippable()
        .map(|item| {
            let rate = item
                .shipping_class_id
                .and_then(|class| row.class_rates.get(&class).copied())
                .or(row.base_rate)
                .unwrap_or(Decimal::ZERO);
            (item, rate * travelled)
        })
        .collect();
    if item_costs.is_empty() {
        return Decimal::ZERO;
    }

    let cost_type = row.total_cost_type.unwrap_or(settings.total_cost_type);
    let mut cost = aggregate(cost_type, &item_costs);

    let surcharge_type = row.surcharge_type.unwrap_or(settings.surcharge_type);
    let surcharge = row.surcharge.unwrap_or(settings.surcharge);
    match surcharge_type {
        AdjustmentType::Fixed => cost += surcharge,
        AdjustmentType::Percent => cost += cost * surcharge / Decimal::ONE_HUNDRED,
        AdjustmentType::None => {}
    }

    let discount_type = row.discount_type.unwrap_or(settings.discount_type);
    let discount = row.discount.unwrap_or(settings.discount);
    match discount_type {
        AdjustmentType::Fixed => cost -= discount,
        AdjustmentType::Percent => cost -= cost * discount / Decimal::ONE_HUNDRED,
        AdjustmentType::None => {}
    }

    if let Some(min) = row.min_cost.or(settings.min_cost) {
        if !min.is_zero() && cost < min {
            cost = min;
        }
    }
    if let Some(max) = row.max_cost.or(settings.max_cost) {
        if !max.is_zero() && cost > max {
            cost = max;
        }
    }

    cost
}

fn aggregate(cost_type: TotalCostType, item_costs: &[(&LineItem, Decimal)]) -> Decimal {
    match cost_type {
        TotalCostType::FlatHighest => item_costs
            .iter()
            .map(|(_, cost)| *cost)
            .max()
            .unwrap_or_default(),
        TotalCostType::FlatLowest => item_costs
            .iter()
            .map(|(_, cost)| *cost)
            .min()
            .unwrap_or_default(),
        TotalCostType::FlatAverage => {
            let total: Decimal = item_costs.iter().map(|(_, cost)| *cost).sum();
            total / Decimal::from(item_costs.len())
        }
        TotalCostType::PerShippingClass => {
            // Keyed by class: a later item with the same class replaces the
            // earlier cost, it does not add to it.
            let mut by_class: BTreeMap<i64, Decimal> = BTreeMap::new();
            for (item, cost) in item_costs {
                by_class.insert(item.shipping_class_id.unwrap_or(0), *cost);
            }
            by_class.values().copied().sum()
        }
        TotalCostType::PerProduct => {
            let mut by_product: BTreeMap<i64, Decimal> = BTreeMap::new();
            for (item, cost) in item_costs {
                by_product.insert(item.product_id, *cost);
            }
            by_product.values().copied().sum()
        }
        TotalCostType::PerPiece => {
            let mut by_product: BTreeMap<i64, Decimal> = BTreeMap::new();
            for (item, cost) in item_costs {
                by_product.insert(item.product_id, *cost * Decimal::from(item.quantity));
            }
            by_product.values().copied().sum()
        }
    }
}

/// Two-decimal rendering with no thousands separator.
#[must_use]
pub fn format_cost(cost: Decimal) -> String {
    format!(
        "{:.2}",
        cost.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Shipping label for a matched row: row title, else global title, else a
/// generic fallback; optionally suffixed with the formatted distance.
#[must_use]
pub fn label(row: &RateRow, distance: &Distance, settings: &GlobalSettings) -> String {
    let title = row
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(&settings.title);
    let title = if title.trim().is_empty() {
        "Shipping"
    } else {
        title
    };

    if settings.show_distance {
        format!(
            "{title} ({} {})",
            distance.in_unit(settings.distance_unit),
            settings.distance_unit
        )
    } else {
        title.to_owned()
    }
}

/// Full pipeline for one calculation: apply the round-up toggle, match a
/// row, price it, and build the label. `None` means no shipping option;
/// the no-match case is logged at info level.
#[must_use]
pub fn quote(
    rows: &[RateRow],
    distance: &Distance,
    ctx: &OrderContext,
    settings: &GlobalSettings,
) -> Option<Quote> {
    let mut distance = distance.clone();
    if settings.round_up_distance {
        distance.set_ceiling(true);
    }

    let Some(row) = match_row(rows, &distance, ctx, settings) else {
        tracing::info!(
            distance = %distance.in_unit(settings.distance_unit),
            unit = %settings.distance_unit,
            "no rate row matched - no shipping option available"
        );
        return None;
    };

    let cost = compute_cost(row, &distance, ctx, settings);
    Some(Quote {
        cost,
        formatted_cost: format_cost(cost),
        label: label(row, &distance, settings),
    })
}
