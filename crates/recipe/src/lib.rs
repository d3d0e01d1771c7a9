mod command;
mod query;
mod seed;

pub use command::*;
pub use query::*;
pub use seed::*;
