use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::info;

use crate::fees::{FeeCalculator, FeeSchedule};
use crate::form::{format_fee, run_session, DeliveryForm};
use crate::orders::{validate, Quote, RawOrderInput};
use crate::report::{quote_json, run_batch};
use crate::util::{parse_number, parse_order_time};

#[derive(Parser)]
#[command(name = "delivery-fee")]
#[command(about = "Delivery fee calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate the fee for a single order
    Quote {
        /// Cart value in euros
        #[arg(long, allow_hyphen_values = true)]
        cart_value: String,
        /// Delivery distance in meters
        #[arg(long, allow_hyphen_values = true)]
        distance: String,
        /// Number of items in the cart
        #[arg(long, allow_hyphen_values = true)]
        items: String,
        /// Order time (YYYY-MM-DD HH:MM[:SS], defaults to now)
        #[arg(long)]
        time: Option<String>,
        /// Path to fee schedule JSON file
        #[arg(long)]
        schedule: Option<PathBuf>,
        /// Print the quote as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fill in the order form interactively
    Form {
        /// Path to fee schedule JSON file
        #[arg(long)]
        schedule: Option<PathBuf>,
    },
    /// Quote every order in a CSV file
    Batch {
        /// Input CSV (cart_value,delivery_distance,item_count,order_time)
        #[arg(long)]
        input: PathBuf,
        /// Output CSV path
        #[arg(long, default_value = "fees.csv")]
        out: PathBuf,
        /// Path to fee schedule JSON file
        #[arg(long)]
        schedule: Option<PathBuf>,
    },
    /// Print the active fee schedule as JSON
    Schedule {
        /// Path to fee schedule JSON file
        #[arg(long)]
        schedule: Option<PathBuf>,
    },
}

fn load_calculator(schedule: Option<&PathBuf>) -> Result<FeeCalculator> {
    let schedule = match schedule {
        Some(path) => {
            info!(path = %path.display(), "loading fee schedule");
            FeeSchedule::from_file(path)?
        }
        None => FeeSchedule::default(),
    };
    Ok(FeeCalculator::new(schedule))
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Quote {
                cart_value,
                distance,
                items,
                time,
                schedule,
                json,
            } => {
                let calc = load_calculator(schedule.as_ref())?;
                let raw = RawOrderInput {
                    cart_value: parse_number(&cart_value),
                    delivery_distance: parse_number(&distance),
                    item_count: parse_number(&items),
                    order_time: match time {
                        Some(text) => parse_order_time(&text),
                        None => Some(now()),
                    },
                };

                let order = match validate(&raw) {
                    Ok(order) => order,
                    Err(err) => anyhow::bail!("{}", err),
                };
                let fee = calc.calculate_fee(
                    order.cart_value,
                    order.delivery_distance_m,
                    order.item_count,
                    order.order_time,
                );

                if json {
                    println!("{}", quote_json(&Quote { order, fee })?);
                } else {
                    println!("Delivery fee: {}", format_fee(fee));
                }
                Ok(())
            }
            Commands::Form { schedule } => {
                let calc = load_calculator(schedule.as_ref())?;
                let mut form = DeliveryForm::new(calc, now());
                let stdin = io::stdin();
                let stdout = io::stdout();
                run_session(&mut form, &mut stdin.lock(), &mut stdout.lock())
            }
            Commands::Batch {
                input,
                out,
                schedule,
            } => {
                let calc = load_calculator(schedule.as_ref())?;
                let rows = run_batch(&calc, &input, &out)?;
                let rejected = rows.iter().filter(|r| r.warning.is_some()).count();
                println!(
                    "Quoted {} orders ({} rejected). Results written to {}",
                    rows.len(),
                    rejected,
                    out.display()
                );
                Ok(())
            }
            Commands::Schedule { schedule } => {
                let calc = load_calculator(schedule.as_ref())?;
                println!("{}", serde_json::to_string_pretty(calc.schedule())?);
                Ok(())
            }
        }
    }
}
