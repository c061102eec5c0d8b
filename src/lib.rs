pub mod cli;
pub mod fees;
pub mod form;
pub mod orders;
pub mod report;
pub mod util;

pub use fees::{calculate_fee, FeeCalculator, FeeSchedule};
pub use orders::{validate, Field, InvalidInput, OrderInput, RawOrderInput};
