mod cache;
mod common;
mod config;
mod convert;
mod countries;
mod interactive;

pub use self::cache::cache;
pub use self::common::Session;
pub use self::config::config;
pub use self::convert::convert;
pub use self::countries::countries;
pub use self::interactive::interactive;
