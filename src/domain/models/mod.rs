mod category;
mod complaint;
mod generation;

pub use category::*;
pub use complaint::*;
pub use generation::*;
