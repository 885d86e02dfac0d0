mod category;
mod media;
mod product;

pub use category::*;
pub use media::*;
pub use product::*;
