//! App manager with run/idle state management and timing control.
//!
//! Provides [`AppManager`], which owns the registry, the status indicator and
//! the chain, and runs exactly one app at a time inside the host's
//! cooperative loop. Nothing here blocks: the host calls
//! [`step`](AppManager::step) once per loop iteration and every interval is
//! checked against the injected [`TimeSource`].

use crate::registry::{AppDescriptor, Registry};
use crate::repair::{ChainRepair, RepairTicker};
use crate::status::{StatusIndicator, StatusPresenter};
use crate::time::{TimeInstant, TimeSource};
use crate::topology::{TopologyPhase, TopologyScan, TopologyWrapper};
use crate::types::{AppFlags, AppResult};

/// Timing configuration of the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ManagerConfig {
    /// Toggle period of the heartbeat indicator.
    pub heartbeat_ms: u64,

    /// Minimum time between two repair broadcasts.
    pub repair_ms: u64,

    /// Time a latched error is shown before an app flagged
    /// [`AppFlags::ADVANCE_ON_ERROR`] is switched away from.
    pub error_timeout_ms: u64,
}

impl ManagerConfig {
    pub const DEFAULT_HEARTBEAT_MS: u64 = 500;
    pub const DEFAULT_REPAIR_MS: u64 = 250;
    pub const DEFAULT_ERROR_TIMEOUT_MS: u64 = 10_000;
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            heartbeat_ms: Self::DEFAULT_HEARTBEAT_MS,
            repair_ms: Self::DEFAULT_REPAIR_MS,
            error_timeout_ms: Self::DEFAULT_ERROR_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    /// Carries the topology wrapper when the current app is flagged for it.
    Running(Option<TopologyWrapper>),
}

/// Starts, steps and stops registered apps, one at a time.
///
/// Exactly one app is "current" at all times; only the current app can be
/// running. Operational errors returned by an app are latched and freeze it
/// until the next start.
///
/// # Type Parameters
/// * `'a` - Lifetime of the time source and of the registered apps
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `S` - Status indicator implementation type
/// * `C` - Chain implementation type (topology scan and repair telegrams)
/// * `N` - Number of registration slots, including the void app
pub struct AppManager<'a, I, T, S, C, const N: usize>
where
    I: TimeInstant,
    T: TimeSource<I>,
    S: StatusIndicator,
    C: TopologyScan + ChainRepair,
{
    registry: Registry<'a, N>,
    time_source: &'a T,
    indicator: S,
    chain: C,
    config: ManagerConfig,
    current: usize,
    mode: Mode,
    result: AppResult,
    status: StatusPresenter<I>,
    repair: RepairTicker<I>,
}

impl<'a, I, T, S, C, const N: usize> AppManager<'a, I, T, S, C, N>
where
    I: TimeInstant,
    T: TimeSource<I>,
    S: StatusIndicator,
    C: TopologyScan + ChainRepair,
{
    /// Creates an initialized manager with the default timing.
    ///
    /// Only the void app is registered; nothing is running.
    pub fn new(time_source: &'a T, indicator: S, chain: C) -> Self {
        Self::with_config(time_source, indicator, chain, ManagerConfig::default())
    }

    /// Creates an initialized manager with explicit timing.
    pub fn with_config(time_source: &'a T, indicator: S, chain: C, config: ManagerConfig) -> Self {
        let now = time_source.now();

        Self {
            registry: Registry::new(),
            time_source,
            indicator,
            chain,
            config,
            current: 0,
            mode: Mode::Idle,
            result: Ok(()),
            status: StatusPresenter::new(config.heartbeat_ms, now),
            repair: RepairTicker::new(config.repair_ms, now),
        }
    }

    /// Returns the manager to its freshly constructed state.
    ///
    /// Every registration except the void app is dropped, the void app is
    /// current and nothing is running. The current app is not stopped.
    pub fn init(&mut self) {
        let now = self.time_source.now();
        self.registry.reset();
        self.current = 0;
        self.mode = Mode::Idle;
        self.result = Ok(());
        self.status = StatusPresenter::new(self.config.heartbeat_ms, now);
        self.repair = RepairTicker::new(self.config.repair_ms, now);
    }

    /// Registers an app; its index is the current [`count`](Self::count).
    ///
    /// # Panics
    /// When all slots are taken or the descriptor is malformed.
    pub fn register(&mut self, descriptor: AppDescriptor<'a>) {
        self.registry.register(descriptor);
    }

    /// Makes the app at `appix` current and starts it.
    ///
    /// The manager is running afterwards even when the start failed; the error
    /// is latched and shown, and [`step`](Self::step) will not call the app.
    ///
    /// # Panics
    /// If an app is already running or `appix` is out of range.
    pub fn start(&mut self, appix: usize) {
        assert!(
            !self.is_running(),
            "start({}) while app {} is running",
            appix,
            self.current
        );
        assert!(
            appix < self.registry.count(),
            "appix {} out of range (count {})",
            appix,
            self.registry.count()
        );

        self.current = appix;
        let descriptor = self.registry.get_mut(appix);
        let name = descriptor.name();
        let flags = descriptor.app_flags();
        let now = self.time_source.now();
        self.status
            .announce(&mut self.indicator, now, descriptor.label(), descriptor.button_hints());
        info!("apps: start '{}' ({})", name, appix);

        let (wrapper, result) = if flags.contains(AppFlags::WITH_TOPOLOGY) {
            let (wrapper, result) = TopologyWrapper::start(&mut self.chain);
            (Some(wrapper), result)
        } else {
            (None, descriptor.app().start())
        };

        self.result = result;
        self.mode = Mode::Running(wrapper);
        self.status
            .present(&mut self.indicator, self.time_source.now(), name, result);
    }

    /// Steps the current app.
    ///
    /// With an error latched the app is not called. Instead, if it is flagged
    /// [`AppFlags::ADVANCE_ON_ERROR`] and the error is older than the
    /// configured timeout, the manager switches to the next app.
    ///
    /// # Panics
    /// If no app is running.
    pub fn step(&mut self) {
        assert!(self.is_running(), "step() while no app is running");

        let descriptor = self.registry.get_mut(self.current);
        let name = descriptor.name();
        let flags = descriptor.app_flags();

        if self.result.is_err() {
            if flags.contains(AppFlags::ADVANCE_ON_ERROR)
                && self
                    .status
                    .error_expired(self.time_source.now(), self.config.error_timeout_ms)
            {
                warn!("apps: '{}' switches to next after error", name);
                self.switch_to_next();
            }
            return;
        }

        let app = descriptor.app();
        let mut result = match &mut self.mode {
            Mode::Running(Some(wrapper)) => wrapper.step(&mut self.chain, name, app),
            _ => app.step(),
        };

        if result.is_ok() && flags.contains(AppFlags::WITH_REPAIR) {
            result = self.repair.tick(&mut self.chain, self.time_source.now());
        }

        self.result = result;
        self.status
            .present(&mut self.indicator, self.time_source.now(), name, result);
    }

    /// Stops the current app.
    ///
    /// The latched result is kept until the next start.
    ///
    /// # Panics
    /// If no app is running.
    pub fn stop(&mut self) {
        assert!(self.is_running(), "stop() while no app is running");

        let descriptor = self.registry.get_mut(self.current);
        info!("apps: stop '{}'", descriptor.name());
        descriptor.app().stop();
        self.mode = Mode::Idle;
    }

    /// Stops the current app and starts the app at `appix`.
    ///
    /// # Panics
    /// If no app is running or `appix` is out of range.
    pub fn switch(&mut self, appix: usize) {
        self.stop();
        self.start(appix);
    }

    /// Switches to the next app in registration order.
    ///
    /// Wraps from the last app to index 1, so the void app is never selected.
    ///
    /// # Panics
    /// If no app is running or only the void app is registered.
    pub fn switch_to_next(&mut self) {
        let count = self.registry.count();
        assert!(count > 1, "switch_to_next() with only the void app registered");
        self.switch(self.current % (count - 1) + 1);
    }

    /// Index of the current app.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Returns true between a start and the matching stop.
    pub fn is_running(&self) -> bool {
        matches!(self.mode, Mode::Running(_))
    }

    /// The result latched by the last start or step.
    pub fn last_result(&self) -> AppResult {
        self.result
    }

    /// Phase of the topology wrapper, when the running app uses one.
    pub fn topology_phase(&self) -> Option<TopologyPhase> {
        match self.mode {
            Mode::Running(Some(wrapper)) => Some(wrapper.phase()),
            _ => None,
        }
    }

    /// Number of registered apps, the void app included.
    pub fn count(&self) -> usize {
        self.registry.count()
    }

    /// Short name of the app at `appix`.
    ///
    /// # Panics
    /// If `appix` is out of range.
    pub fn name(&self, appix: usize) -> &'a str {
        self.registry.name(appix)
    }

    /// Display label of the app at `appix`.
    ///
    /// # Panics
    /// If `appix` is out of range.
    pub fn display_label(&self, appix: usize) -> &'a str {
        self.registry.display_label(appix)
    }

    /// X and Y button hints of the app at `appix`.
    ///
    /// # Panics
    /// If `appix` is out of range.
    pub fn button_hints(&self, appix: usize) -> (&'a str, &'a str) {
        self.registry.get(appix).button_hints()
    }

    /// Feature flags of the app at `appix`.
    ///
    /// # Panics
    /// If `appix` is out of range.
    pub fn flags(&self, appix: usize) -> AppFlags {
        self.registry.get(appix).app_flags()
    }

    /// Returns true when the app at `appix` accepts `apps config`.
    pub fn is_configurable(&mut self, appix: usize) -> bool {
        self.registry.is_configurable(appix)
    }

    pub fn registry(&self) -> &Registry<'a, N> {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut Registry<'a, N> {
        &mut self.registry
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn indicator(&self) -> &S {
        &self.indicator
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut C {
        &mut self.chain
    }
}
