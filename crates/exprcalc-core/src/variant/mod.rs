//! Dynamically-typed values and the operators over them

mod convert;
mod operations;
mod value;

pub use convert::{format_time_span, parse_datetime, parse_decimal, parse_time_span};
pub use operations::{Operator, StringComparison, VariantOperations};
pub use value::{Variant, VariantType};
