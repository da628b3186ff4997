pub mod numeric;

pub use numeric::{Parsed, format_cents, parse_float, parse_int};
