pub mod types;
pub mod validate;

pub use types::{Field, OrderInput, Quote, RawOrderInput};
pub use validate::{validate, InvalidInput};
