//! Request payloads decoded once at the HTTP boundary.

mod category_form;
mod multipart;
mod parameters;
mod product_form;

pub use category_form::*;
pub use multipart::*;
pub use parameters::*;
pub use product_form::*;
