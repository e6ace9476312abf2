//! Periodic chain repair.
//!
//! Under-voltage or a loose connector can push nodes into an error state. Apps
//! flagged [`AppFlags::WITH_REPAIR`] get a broadcast of clear-error followed by
//! go-active at a fixed interval after every successful step.
//!
//! [`AppFlags::WITH_REPAIR`]: crate::types::AppFlags::WITH_REPAIR

use crate::time::TimeInstant;
use crate::types::AppResult;

/// Trait for abstracting the chain's broadcast recovery telegrams.
pub trait ChainRepair {
    /// Broadcasts a clear-error telegram.
    fn send_clear_error(&mut self) -> AppResult;

    /// Broadcasts a go-active telegram.
    fn send_go_active(&mut self) -> AppResult;
}

/// Sends the repair pair at most once per interval.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RepairTicker<I: TimeInstant> {
    interval_ms: u64,
    last_repair: I,
}

impl<I: TimeInstant> RepairTicker<I> {
    pub(crate) fn new(interval_ms: u64, now: I) -> Self {
        Self {
            interval_ms,
            last_repair: now,
        }
    }

    /// Sends both telegrams when the interval has passed.
    ///
    /// The first failure is returned and the second telegram skipped. The
    /// timestamp only moves on full success, so a failed repair is retried on
    /// the next due call.
    pub(crate) fn tick<R: ChainRepair>(&mut self, chain: &mut R, now: I) -> AppResult {
        if !now.elapsed_more_than(self.last_repair, self.interval_ms) {
            return Ok(());
        }
        chain.send_clear_error()?;
        chain.send_go_active()?;
        self.last_repair = now;
        Ok(())
    }
}
