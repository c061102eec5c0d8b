use thiserror::Error;
use tracing::debug;

use super::types::{Field, OrderInput, RawOrderInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field} is incorrect, please fix it")]
pub struct InvalidInput {
    pub field: Field,
}

impl From<Field> for InvalidInput {
    fn from(field: Field) -> Self {
        Self { field }
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn positive_count(value: Option<f64>) -> Option<u64> {
    positive(value)
        .filter(|v| v.fract() == 0.0 && *v <= u64::MAX as f64)
        .map(|v| v as u64)
}

fn check(raw: &RawOrderInput) -> Result<OrderInput, Field> {
    let cart_value = positive(raw.cart_value).ok_or(Field::CartValue)?;
    let delivery_distance_m =
        positive_count(raw.delivery_distance).ok_or(Field::DeliveryDistance)?;
    let item_count = positive_count(raw.item_count).ok_or(Field::NumberOfItems)?;
    let order_time = raw.order_time.ok_or(Field::OrderTime)?;

    Ok(OrderInput {
        cart_value,
        delivery_distance_m,
        item_count,
        order_time,
    })
}

/// Check the raw form values in field order and stop at the first failure.
pub fn validate(raw: &RawOrderInput) -> Result<OrderInput, InvalidInput> {
    check(raw).map_err(|field| {
        debug!(%field, "input rejected");
        InvalidInput::from(field)
    })
}
