use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Form fields, in the order they are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    CartValue,
    DeliveryDistance,
    NumberOfItems,
    OrderTime,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::CartValue,
        Field::DeliveryDistance,
        Field::NumberOfItems,
        Field::OrderTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::CartValue => "Cart value",
            Field::DeliveryDistance => "Delivery distance",
            Field::NumberOfItems => "Number of items",
            Field::OrderTime => "Order time",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Values as collected from the user. `None` is a missing or unparsable value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOrderInput {
    pub cart_value: Option<f64>,
    pub delivery_distance: Option<f64>,
    pub item_count: Option<f64>,
    pub order_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderInput {
    pub cart_value: f64,
    pub delivery_distance_m: u64,
    pub item_count: u64,
    pub order_time: NaiveDateTime,
}

/// One calculation, as written to JSON or a batch file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub order: OrderInput,
    pub fee: f64,
}
