//! Rate limiting logic and state management.

mod backend;
mod fixed_window;
mod unit;

pub use backend::RateLimiter;
pub use fixed_window::{FixedWindow, Lifecycle};
pub use unit::TimeUnit;
