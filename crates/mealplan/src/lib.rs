mod export;
mod store;

pub use export::*;
pub use store::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod generate;

        pub use generate::*;
    }
}
