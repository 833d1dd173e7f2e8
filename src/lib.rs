//! Fixed Window Limiter - In-process request admission
//!
//! This crate answers, per call, whether a request may proceed under a
//! configured rate of N permits per fixed time window. A background task
//! owned by each limiter instance zeroes the permit count at every window
//! boundary.

pub mod config;
pub mod error;
pub mod ratelimit;

pub use config::RateLimiterConfig;
pub use error::{LimiterError, Result};
pub use ratelimit::{FixedWindow, Lifecycle, RateLimiter, TimeUnit};
