//! Admission policy trait shared by all limiter implementations.

use crate::error::Result;

/// Trait for admission policy implementations.
///
/// The fixed-window limiter is the only policy today. Other algorithms can be
/// substituted behind this contract without touching callers.
pub trait RateLimiter: Send + Sync {
    /// Decide whether the current request may proceed.
    ///
    /// Never blocks waiting for capacity; a rejected caller gets `false`
    /// immediately.
    fn accept(&self) -> bool;

    /// Validate the configuration and begin the policy's background activity.
    fn start(&self) -> Result<()>;

    /// Halt background activity. Subsequent `accept` calls reject.
    fn stop(&self);
}
