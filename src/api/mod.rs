mod client;
pub mod types;

pub use client::CurrencyClient;
pub use types::*;
