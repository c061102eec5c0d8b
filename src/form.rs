//! Terminal form for the fee calculator.
//!
//! `DeliveryForm` holds the current field values between calculations. Each
//! `submit` validates them, computes the fee and replaces the previously shown
//! fee or warning, so fixing a field and submitting again clears the warning.

use anyhow::Result;
use chrono::NaiveDateTime;
use std::io::{BufRead, Write};
use tracing::info;

use crate::fees::FeeCalculator;
use crate::orders::{validate, Field, InvalidInput, RawOrderInput};
use crate::util::{format_order_time, parse_number, parse_order_time};

pub const DEFAULT_CART_VALUE: f64 = 5.0;
pub const DEFAULT_DELIVERY_DISTANCE: f64 = 555.0;
pub const DEFAULT_ITEM_COUNT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormOutcome {
    Fee(f64),
    Warning(InvalidInput),
}

#[derive(Debug, Clone)]
pub struct DeliveryForm {
    calculator: FeeCalculator,
    input: RawOrderInput,
    outcome: Option<FormOutcome>,
}

impl DeliveryForm {
    /// Form pre-filled with the default cart, distance and item values.
    pub fn new(calculator: FeeCalculator, now: NaiveDateTime) -> Self {
        Self {
            calculator,
            input: RawOrderInput {
                cart_value: Some(DEFAULT_CART_VALUE),
                delivery_distance: Some(DEFAULT_DELIVERY_DISTANCE),
                item_count: Some(DEFAULT_ITEM_COUNT),
                order_time: Some(now),
            },
            outcome: None,
        }
    }

    pub fn input(&self) -> &RawOrderInput {
        &self.input
    }

    pub fn outcome(&self) -> Option<FormOutcome> {
        self.outcome
    }

    /// Replace a field from user text. Text that does not parse clears the field.
    pub fn set_text(&mut self, field: Field, text: &str) {
        match field {
            Field::CartValue => self.input.cart_value = parse_number(text),
            Field::DeliveryDistance => self.input.delivery_distance = parse_number(text),
            Field::NumberOfItems => self.input.item_count = parse_number(text),
            Field::OrderTime => self.input.order_time = parse_order_time(text),
        }
    }

    pub fn text(&self, field: Field) -> String {
        match field {
            Field::CartValue => number_text(self.input.cart_value),
            Field::DeliveryDistance => number_text(self.input.delivery_distance),
            Field::NumberOfItems => number_text(self.input.item_count),
            Field::OrderTime => self
                .input
                .order_time
                .as_ref()
                .map(format_order_time)
                .unwrap_or_default(),
        }
    }

    pub fn submit(&mut self) -> FormOutcome {
        let outcome = match validate(&self.input) {
            Ok(order) => FormOutcome::Fee(self.calculator.calculate_fee(
                order.cart_value,
                order.delivery_distance_m,
                order.item_count,
                order.order_time,
            )),
            Err(err) => FormOutcome::Warning(err),
        };
        self.outcome = Some(outcome);
        outcome
    }

    /// Text shown under the form for the last submission.
    pub fn render(&self) -> Option<String> {
        self.outcome.map(|outcome| match outcome {
            FormOutcome::Fee(fee) => format!("Delivery fee: {}", format_fee(fee)),
            FormOutcome::Warning(err) => err.to_string(),
        })
    }
}

fn number_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn format_fee(fee: f64) -> String {
    format!("{:.2} \u{20AC}", fee)
}

fn prompt_label(field: Field) -> String {
    match field {
        Field::CartValue => format!("{} (\u{20AC})", field),
        Field::DeliveryDistance => format!("{} (m)", field),
        _ => field.to_string(),
    }
}

/// Read one trimmed line. `None` at end of input.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Run the form against a line-based reader and writer.
///
/// Each prompt shows the current value: an empty answer keeps it, `-` clears
/// it, anything else replaces it. The session ends at end of input or when
/// the user declines another calculation.
pub fn run_session<R: BufRead, W: Write>(
    form: &mut DeliveryForm,
    reader: &mut R,
    writer: &mut W,
) -> Result<()> {
    writeln!(writer, "Delivery fee calculator")?;

    loop {
        for field in Field::ALL {
            write!(writer, "{} [{}]: ", prompt_label(field), form.text(field))?;
            writer.flush()?;

            let Some(answer) = read_line(reader)? else {
                writeln!(writer)?;
                return Ok(());
            };
            match answer.as_str() {
                "" => {}
                "-" => form.set_text(field, ""),
                text => form.set_text(field, text),
            }
        }

        let outcome = form.submit();
        info!(?outcome, "form submitted");
        if let Some(line) = form.render() {
            writeln!(writer, "{}", line)?;
        }

        write!(writer, "Calculate again? [y/N]: ")?;
        writer.flush()?;
        match read_line(reader)? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => continue,
            _ => return Ok(()),
        }
    }
}
