//! Shared test infrastructure for strip-app-manager integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use core::fmt::Write;
use strip_app_manager::{
    App, AppError, AppManager, AppResult, ChainRepair, Configure, StatusIndicator, TimeDuration,
    TimeInstant, TimeSource, TopologyScan,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Status Indicator
// ============================================================================

/// Mock indicator that records what is visible on the display and LEDs
#[derive(Default)]
pub struct MockIndicator {
    pub label: heapless::String<32>,
    pub hints: (heapless::String<16>, heapless::String<16>),
    pub heartbeat: bool,
    pub error: bool,
    pub error_message: heapless::String<32>,
    pub show_app_calls: u32,
    pub toggles: u32,
    pub error_shown: u32,
}

impl StatusIndicator for MockIndicator {
    fn show_app(&mut self, label: &str, hint_x: &str, hint_y: &str) {
        self.label.clear();
        let _ = self.label.push_str(label);
        self.hints.0.clear();
        let _ = self.hints.0.push_str(hint_x);
        self.hints.1.clear();
        let _ = self.hints.1.push_str(hint_y);
        self.error_message.clear();
        self.show_app_calls += 1;
    }

    fn set_heartbeat(&mut self, on: bool) {
        self.heartbeat = on;
    }

    fn toggle_heartbeat(&mut self) {
        self.heartbeat = !self.heartbeat;
        self.toggles += 1;
    }

    fn set_error(&mut self, on: bool) {
        self.error = on;
    }

    fn show_error(&mut self, message: &str) {
        self.error_message.clear();
        let _ = self.error_message.push_str(message);
        self.error_shown += 1;
    }
}

// ============================================================================
// Mock Chain
// ============================================================================

/// Mock chain: a scan that needs `scan_length` steps, and counted repair telegrams
#[derive(Default)]
pub struct MockChain {
    pub scan_length: u32,
    pub scan_remaining: u32,
    pub triggers: u32,
    pub advances: u32,
    pub fail_scan: Option<AppError>,
    pub clear_errors: u32,
    pub go_actives: u32,
    pub fail_clear_error: Option<AppError>,
    pub triplets: usize,
}

impl MockChain {
    pub fn with_scan_length(scan_length: u32) -> Self {
        Self {
            scan_length,
            triplets: 12,
            ..Default::default()
        }
    }
}

impl TopologyScan for MockChain {
    fn trigger_scan(&mut self) {
        self.triggers += 1;
        self.scan_remaining = self.scan_length;
    }

    fn is_scan_done(&self) -> bool {
        self.scan_remaining == 0
    }

    fn advance_scan(&mut self) -> AppResult {
        self.advances += 1;
        if let Some(err) = self.fail_scan {
            return Err(err);
        }
        self.scan_remaining -= 1;
        Ok(())
    }

    fn triplet_count(&self) -> usize {
        self.triplets
    }
}

impl ChainRepair for MockChain {
    fn send_clear_error(&mut self) -> AppResult {
        self.clear_errors += 1;
        match self.fail_clear_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn send_go_active(&mut self) -> AppResult {
        self.go_actives += 1;
        Ok(())
    }
}

// ============================================================================
// Probe Apps
// ============================================================================

/// Call counters and failure injection shared between a test and its app
#[derive(Default)]
pub struct Probe {
    pub starts: Cell<u32>,
    pub steps: Cell<u32>,
    pub stops: Cell<u32>,
    pub fail_start: Cell<Option<AppError>>,
    pub fail_step: Cell<Option<AppError>>,
    pub configured: Cell<Option<u32>>,
}

impl Probe {
    pub fn counts(&self) -> (u32, u32, u32) {
        (self.starts.get(), self.steps.get(), self.stops.get())
    }
}

/// App reporting every call to its probe
pub struct ProbeApp<'p> {
    probe: &'p Probe,
}

impl<'p> ProbeApp<'p> {
    pub fn new(probe: &'p Probe) -> Self {
        Self { probe }
    }
}

impl App for ProbeApp<'_> {
    fn start(&mut self) -> AppResult {
        self.probe.starts.set(self.probe.starts.get() + 1);
        self.probe.fail_start.get().map_or(Ok(()), Err)
    }

    fn step(&mut self) -> AppResult {
        self.probe.steps.set(self.probe.steps.get() + 1);
        self.probe.fail_step.get().map_or(Ok(()), Err)
    }

    fn stop(&mut self) {
        self.probe.stops.set(self.probe.stops.get() + 1);
    }
}

/// Probe app with a `dim <level>` configuration plugin
pub struct DimmableApp<'p> {
    inner: ProbeApp<'p>,
}

impl<'p> DimmableApp<'p> {
    pub const HELP: &'static str = "SYNTAX: apps config dim <level>\n";

    pub fn new(probe: &'p Probe) -> Self {
        Self {
            inner: ProbeApp::new(probe),
        }
    }
}

impl App for DimmableApp<'_> {
    fn start(&mut self) -> AppResult {
        self.inner.start()
    }

    fn step(&mut self) -> AppResult {
        self.inner.step()
    }

    fn stop(&mut self) {
        self.inner.stop()
    }

    fn config(&mut self) -> Option<&mut dyn Configure> {
        Some(self)
    }
}

impl Configure for DimmableApp<'_> {
    fn help(&self) -> &str {
        Self::HELP
    }

    fn configure(&mut self, args: &[&str], out: &mut dyn Write) {
        match args {
            ["dim", level] => match level.parse::<u32>() {
                Ok(level) => {
                    self.inner.probe.configured.set(Some(level));
                    let _ = writeln!(out, "dim set to {}", level);
                }
                Err(_) => {
                    let _ = writeln!(out, "ERROR: level must be a number");
                }
            },
            _ => {
                let _ = writeln!(out, "ERROR: unknown config");
            }
        }
    }
}

/// App whose configuration plugin has no help text
pub struct HelplessApp;

impl App for HelplessApp {
    fn start(&mut self) -> AppResult {
        Ok(())
    }

    fn step(&mut self) -> AppResult {
        Ok(())
    }

    fn stop(&mut self) {}

    fn config(&mut self) -> Option<&mut dyn Configure> {
        Some(self)
    }
}

impl Configure for HelplessApp {
    fn help(&self) -> &str {
        ""
    }

    fn configure(&mut self, _args: &[&str], _out: &mut dyn Write) {}
}

// ============================================================================
// Test Helper Types
// ============================================================================

pub type TestManager<'a> =
    AppManager<'a, TestInstant, MockTimeSource, MockIndicator, MockChain, 8>;

pub fn new_manager(timer: &MockTimeSource) -> TestManager<'_> {
    TestManager::new(timer, MockIndicator::default(), MockChain::with_scan_length(0))
}
