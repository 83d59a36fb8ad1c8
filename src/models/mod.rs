pub mod item;
pub mod contribution;

pub use item::*;
pub use contribution::*;
