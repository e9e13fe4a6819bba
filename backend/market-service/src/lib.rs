//! StreamMall marketplace core
//!
//! Metered billing for streamed digital content: sessions open against
//! catalog content, accrue cost per elapsed whole minute at the price
//! captured at open, and commit their final charge exactly once on close.
//! The HTTP layer lives outside this crate and consumes the stores and the
//! aggregation reporter exposed here.

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{MarketError, Result};
