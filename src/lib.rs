//! rateport: currency conversion with a local rate cache
//!
//! Rates and the country list are fetched from a free currency API and kept
//! in a small versioned store under `~/.rateport/data`, so repeated
//! conversions within the freshness window stay off the network.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod output;
pub mod store;
