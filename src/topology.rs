//! Topology build in front of an app's own start.
//!
//! Apps flagged [`AppFlags::WITH_TOPOLOGY`] are wrapped by [`TopologyWrapper`].
//! The wrapper runs the chain scan one bounded step per manager step, then
//! starts the app and forwards steps to it. The app itself never sees the scan.
//!
//! [`AppFlags::WITH_TOPOLOGY`]: crate::types::AppFlags::WITH_TOPOLOGY

use crate::app::App;
use crate::types::{AppError, AppResult};

/// Trait for abstracting the multi-step discovery of the device chain.
pub trait TopologyScan {
    /// Starts a new scan. Returns immediately.
    fn trigger_scan(&mut self);

    /// Returns true once the scan has completed.
    fn is_scan_done(&self) -> bool;

    /// Performs one bounded step of the scan.
    fn advance_scan(&mut self) -> AppResult;

    /// Number of RGB triplets found by the last completed scan.
    fn triplet_count(&self) -> usize;
}

/// Phase of the topology wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TopologyPhase {
    /// The chain scan is in progress.
    Scanning,
    /// The scan completed and the app was started; steps go to the app.
    RunningApp,
    /// Terminal. Every step returns the latched error.
    Failed(AppError),
}

/// Sub-state machine interleaving a topology scan before an app's start.
///
/// Lives from the manager's start of a flagged app until it is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyWrapper {
    phase: TopologyPhase,
}

impl TopologyWrapper {
    /// Triggers the scan and enters [`TopologyPhase::Scanning`].
    ///
    /// The scan is not run here; the caller gets `Ok` right away.
    pub fn start<C: TopologyScan>(chain: &mut C) -> (Self, AppResult) {
        chain.trigger_scan();
        (
            Self {
                phase: TopologyPhase::Scanning,
            },
            Ok(()),
        )
    }

    /// Advances the wrapper by one step.
    ///
    /// While scanning this returns `Ok` so the manager keeps stepping. A scan
    /// failure or an app failure moves the wrapper to
    /// [`TopologyPhase::Failed`] and is returned immediately.
    pub fn step<C: TopologyScan>(&mut self, chain: &mut C, name: &str, app: &mut dyn App) -> AppResult {
        match self.phase {
            TopologyPhase::Scanning => {
                if !chain.is_scan_done() {
                    return self.latch(chain.advance_scan());
                }
                info!("{}: starting on {} RGBs", name, chain.triplet_count());
                let result = self.latch(app.start());
                if result.is_ok() {
                    self.phase = TopologyPhase::RunningApp;
                }
                result
            }
            TopologyPhase::RunningApp => self.latch(app.step()),
            TopologyPhase::Failed(err) => Err(err),
        }
    }

    pub fn phase(&self) -> TopologyPhase {
        self.phase
    }

    fn latch(&mut self, result: AppResult) -> AppResult {
        if let Err(err) = result {
            self.phase = TopologyPhase::Failed(err);
        }
        result
    }
}
