use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Timelike, Weekday, Datelike};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Constants of the delivery fee rules. Amounts are in euros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Cart value at or above which delivery is free
    pub free_delivery_threshold: f64,
    pub base_fee: f64,
    /// Distance covered by the base fee, in meters
    pub base_distance_m: u64,
    /// Every started step beyond the base distance costs `distance_step_fee`
    pub distance_step_m: u64,
    pub distance_step_fee: f64,
    /// Carts below this value are topped up to it
    pub small_order_threshold: f64,
    pub free_items: u64,
    pub item_surcharge: f64,
    /// Item count above which the bulk fee applies
    pub bulk_threshold: u64,
    pub bulk_fee: f64,
    pub rush_hour_day: Weekday,
    /// Rush hour window in local hours, start inclusive, end exclusive
    pub rush_hour_start: u32,
    pub rush_hour_end: u32,
    pub rush_hour_multiplier: f64,
    pub max_fee: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            free_delivery_threshold: 200.0,
            base_fee: 2.0,
            base_distance_m: 1000,
            distance_step_m: 500,
            distance_step_fee: 1.0,
            small_order_threshold: 10.0,
            free_items: 4,
            item_surcharge: 0.5,
            bulk_threshold: 12,
            bulk_fee: 1.2,
            rush_hour_day: Weekday::Fri,
            rush_hour_start: 15,
            rush_hour_end: 19,
            rush_hour_multiplier: 1.2,
            max_fee: 15.0,
        }
    }
}

impl FeeSchedule {
    /// Load a schedule from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schedule file: {}", path.display()))?;
        let schedule: FeeSchedule =
            serde_json::from_str(&raw).context("Failed to parse schedule JSON")?;
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("free_delivery_threshold", self.free_delivery_threshold),
            ("base_fee", self.base_fee),
            ("distance_step_fee", self.distance_step_fee),
            ("small_order_threshold", self.small_order_threshold),
            ("item_surcharge", self.item_surcharge),
            ("bulk_fee", self.bulk_fee),
            ("rush_hour_multiplier", self.rush_hour_multiplier),
            ("max_fee", self.max_fee),
        ];
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("Invalid schedule: {} must be a non-negative number, got {}", name, value);
            }
        }

        if self.distance_step_m == 0 {
            anyhow::bail!("Invalid schedule: distance_step_m must be greater than 0");
        }

        if self.rush_hour_end > 24 || self.rush_hour_start >= self.rush_hour_end {
            anyhow::bail!(
                "Invalid schedule: rush hour window {}..{} must satisfy start < end <= 24",
                self.rush_hour_start,
                self.rush_hour_end
            );
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeeCalculator {
    schedule: FeeSchedule,
}

impl FeeCalculator {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Delivery fee for an already validated order.
    ///
    /// Rules run in a fixed order: the free delivery check returns before
    /// anything else, the rush hour multiplier scales the accumulated
    /// surcharges, and the cap is applied last.
    pub fn calculate_fee(
        &self,
        cart_value: f64,
        delivery_distance_m: u64,
        item_count: u64,
        order_time: NaiveDateTime,
    ) -> f64 {
        let s = &self.schedule;

        if cart_value >= s.free_delivery_threshold {
            debug!(cart_value, "free delivery");
            return 0.0;
        }

        let mut fee = s.base_fee;

        if delivery_distance_m > s.base_distance_m {
            let steps = (delivery_distance_m - s.base_distance_m).div_ceil(s.distance_step_m);
            fee += steps as f64 * s.distance_step_fee;
            debug!(delivery_distance_m, steps, "distance surcharge");
        }

        if cart_value < s.small_order_threshold {
            fee += s.small_order_threshold - cart_value;
            debug!(cart_value, "small order surcharge");
        }

        if item_count > s.free_items {
            fee += (item_count - s.free_items) as f64 * s.item_surcharge;
        }

        if item_count > s.bulk_threshold {
            fee += s.bulk_fee;
            debug!(item_count, "bulk fee");
        }

        if self.is_rush_hour(order_time) {
            fee *= s.rush_hour_multiplier;
            debug!(%order_time, "rush hour");
        }

        if fee > s.max_fee {
            return s.max_fee;
        }
        fee
    }

    pub fn is_rush_hour(&self, order_time: NaiveDateTime) -> bool {
        let hour = order_time.hour();
        order_time.weekday() == self.schedule.rush_hour_day
            && hour >= self.schedule.rush_hour_start
            && hour < self.schedule.rush_hour_end
    }
}

/// Fee under the default schedule.
pub fn calculate_fee(
    cart_value: f64,
    delivery_distance_m: u64,
    item_count: u64,
    order_time: NaiveDateTime,
) -> f64 {
    FeeCalculator::default().calculate_fee(cart_value, delivery_distance_m, item_count, order_time)
}
