use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::fees::FeeCalculator;
use crate::orders::{validate, Quote, RawOrderInput};
use crate::util::{parse_number, parse_order_time};

/// Input row of a batch file. Fields stay as text so that malformed values
/// are reported per row instead of failing the whole file.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchOrder {
    pub cart_value: String,
    pub delivery_distance: String,
    pub item_count: String,
    pub order_time: String,
}

/// Output row: exactly one of `fee` and `warning` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    pub cart_value: String,
    pub delivery_distance: String,
    pub item_count: String,
    pub order_time: String,
    pub fee: Option<f64>,
    pub warning: Option<String>,
}

impl BatchOrder {
    fn raw(&self) -> RawOrderInput {
        RawOrderInput {
            cart_value: parse_number(&self.cart_value),
            delivery_distance: parse_number(&self.delivery_distance),
            item_count: parse_number(&self.item_count),
            order_time: parse_order_time(&self.order_time),
        }
    }
}

pub fn quote_order(calc: &FeeCalculator, order: BatchOrder) -> BatchRow {
    let (fee, warning) = match validate(&order.raw()) {
        Ok(input) => (
            Some(calc.calculate_fee(
                input.cart_value,
                input.delivery_distance_m,
                input.item_count,
                input.order_time,
            )),
            None,
        ),
        Err(err) => (None, Some(err.field.to_string())),
    };

    BatchRow {
        cart_value: order.cart_value,
        delivery_distance: order.delivery_distance,
        item_count: order.item_count,
        order_time: order.order_time,
        fee,
        warning,
    }
}

pub fn read_batch<R: Read>(calc: &FeeCalculator, reader: R) -> Result<Vec<BatchRow>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (idx, record) in rdr.deserialize::<BatchOrder>().enumerate() {
        // Header is line 1
        let order = record.with_context(|| format!("Malformed batch row at line {}", idx + 2))?;
        rows.push(quote_order(calc, order));
    }
    Ok(rows)
}

pub fn write_batch<W: Write>(rows: &[BatchRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Quote every order in `input` and write the results to `out`.
pub fn run_batch(calc: &FeeCalculator, input: &Path, out: &Path) -> Result<Vec<BatchRow>> {
    let file = std::fs::File::open(input)
        .with_context(|| format!("Failed to open batch file: {}", input.display()))?;
    let rows = read_batch(calc, file)?;

    let rejected = rows.iter().filter(|r| r.warning.is_some()).count();
    if rejected > 0 {
        warn!(rejected, "batch rows with invalid input");
    }
    info!(rows = rows.len(), "batch quoted");

    let out_file = std::fs::File::create(out)
        .with_context(|| format!("Failed to create output file: {}", out.display()))?;
    write_batch(&rows, out_file)?;
    Ok(rows)
}

pub fn quote_json(quote: &Quote) -> Result<String> {
    Ok(serde_json::to_string_pretty(quote)?)
}
