mod command;
mod identity;
pub mod mealplan;
pub mod recipe;
mod storage;

pub use command::*;
pub use identity::*;
pub use storage::*;
