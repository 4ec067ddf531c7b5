//! Built-in validators

mod array;
mod boolean;
mod date;
mod function;
mod image;
mod number;
mod object;
mod text;

pub use array::{ArrayValidator, ObjectArrayValidator};
pub use boolean::BooleanValidator;
pub use date::DateIsoStringValidator;
pub use function::FunctionValidator;
pub use image::ImageUrlValidator;
pub use number::NumberValidator;
pub use object::ObjectValidator;
pub use text::{RegexValidator, TextValidator};
