//! Fixed-capacity table of registered apps.
//!
//! The index of a descriptor ("appix") is its registration position. Slot 0 is
//! reserved for [`VoidApp`], which the manager registers on initialization.

use crate::app::{App, Configure, VoidApp};
use crate::types::{AppFlags, RegistrationError};
use heapless::Vec;

/// Default number of registration slots.
pub const DEFAULT_SLOTS: usize = 8;

enum AppHandle<'a> {
    Void(VoidApp),
    Borrowed(&'a mut dyn App),
}

impl<'a> AppHandle<'a> {
    fn app(&mut self) -> &mut dyn App {
        match self {
            AppHandle::Void(app) => app,
            AppHandle::Borrowed(app) => &mut **app,
        }
    }
}

/// Everything the manager knows about one app.
///
/// Immutable once registered.
pub struct AppDescriptor<'a> {
    name: &'a str,
    label: &'a str,
    hint_x: &'a str,
    hint_y: &'a str,
    flags: AppFlags,
    handle: AppHandle<'a>,
}

impl<'a> AppDescriptor<'a> {
    /// Creates a descriptor with no flags and `--` button hints.
    ///
    /// # Arguments
    /// * `name` - Short machine identifier, ASCII alphanumeric only
    /// * `label` - Human readable name for the status display
    /// * `app` - The app implementation
    pub fn new(name: &'a str, label: &'a str, app: &'a mut dyn App) -> Self {
        Self {
            name,
            label,
            hint_x: VoidApp::HINT,
            hint_y: VoidApp::HINT,
            flags: AppFlags::NONE,
            handle: AppHandle::Borrowed(app),
        }
    }

    pub(crate) fn void() -> Self {
        Self {
            name: VoidApp::NAME,
            label: VoidApp::LABEL,
            hint_x: VoidApp::HINT,
            hint_y: VoidApp::HINT,
            flags: AppFlags::NONE,
            handle: AppHandle::Void(VoidApp),
        }
    }

    /// Sets the labels describing what the X and Y buttons do.
    pub fn hints(mut self, hint_x: &'a str, hint_y: &'a str) -> Self {
        self.hint_x = hint_x;
        self.hint_y = hint_y;
        self
    }

    /// Sets the feature flags.
    pub fn flags(mut self, flags: AppFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Checks the descriptor against the registration rules.
    ///
    /// Takes `&mut self` because the configuration plugin is only reachable
    /// through a mutable borrow of the app.
    pub fn validate(&mut self) -> Result<(), RegistrationError> {
        if self.name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        if let Some(position) = self.name.bytes().position(|b| !b.is_ascii_alphanumeric()) {
            return Err(RegistrationError::InvalidNameChar { position });
        }
        if !self.flags.is_known() {
            return Err(RegistrationError::UnknownFlags {
                bits: self.flags.bits(),
            });
        }
        if let Some(config) = self.handle.app().config() {
            if config.help().is_empty() {
                return Err(RegistrationError::MissingConfigHelp);
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn label(&self) -> &'a str {
        self.label
    }

    /// Returns the X and Y button hints.
    pub fn button_hints(&self) -> (&'a str, &'a str) {
        (self.hint_x, self.hint_y)
    }

    pub fn app_flags(&self) -> AppFlags {
        self.flags
    }

    pub(crate) fn app(&mut self) -> &mut dyn App {
        self.handle.app()
    }
}

/// Why a name prefix did not resolve to a single app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LookupError {
    /// No registered name starts with the prefix.
    NotFound,

    /// More than one registered name starts with the prefix.
    Ambiguous { first: usize, second: usize },
}

/// Returns true when `prefix` is a non-empty, ASCII case-insensitive prefix of `full`.
pub fn is_prefix(full: &str, prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix.len() <= full.len()
        && full.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Ordered, fixed-capacity collection of app descriptors.
///
/// # Type Parameters
/// * `'a` - Lifetime of the borrowed apps and their strings
/// * `N` - Number of registration slots, including the void app
pub struct Registry<'a, const N: usize> {
    apps: Vec<AppDescriptor<'a>, N>,
}

impl<'a, const N: usize> Registry<'a, N> {
    /// Creates a registry holding only the void app.
    ///
    /// # Panics
    /// If `N` is zero.
    pub fn new() -> Self {
        let mut registry = Self { apps: Vec::new() };
        registry.reset();
        registry
    }

    /// Drops every registration and re-registers the void app at index 0.
    pub fn reset(&mut self) {
        self.apps.clear();
        self.register(AppDescriptor::void());
    }

    /// Appends a descriptor; its index is the previous [`count`](Self::count).
    ///
    /// # Panics
    /// When all slots are taken or the descriptor fails
    /// [`validate`](AppDescriptor::validate). Misregistration is a programming
    /// error, not a runtime condition.
    pub fn register(&mut self, mut descriptor: AppDescriptor<'a>) {
        if self.apps.is_full() {
            panic!("{}", RegistrationError::CapacityExceeded { capacity: N });
        }
        if let Err(err) = descriptor.validate() {
            panic!("{}", err);
        }
        debug!("apps: registered '{}' at {}", descriptor.name, self.apps.len());
        if self.apps.push(descriptor).is_err() {
            panic!("{}", RegistrationError::CapacityExceeded { capacity: N });
        }
    }

    /// Returns the number of registered apps, the void app included.
    pub fn count(&self) -> usize {
        self.apps.len()
    }

    /// Returns the descriptor at `appix`.
    ///
    /// # Panics
    /// If `appix` is out of range.
    pub fn get(&self, appix: usize) -> &AppDescriptor<'a> {
        assert!(
            appix < self.apps.len(),
            "appix {} out of range (count {})",
            appix,
            self.apps.len()
        );
        &self.apps[appix]
    }

    pub(crate) fn get_mut(&mut self, appix: usize) -> &mut AppDescriptor<'a> {
        assert!(
            appix < self.apps.len(),
            "appix {} out of range (count {})",
            appix,
            self.apps.len()
        );
        &mut self.apps[appix]
    }

    /// Short name of the app at `appix`.
    pub fn name(&self, appix: usize) -> &'a str {
        self.get(appix).name
    }

    /// Display label of the app at `appix`.
    pub fn display_label(&self, appix: usize) -> &'a str {
        self.get(appix).label
    }

    /// Returns the configuration plugin of the app at `appix`, if any.
    pub fn config_mut(&mut self, appix: usize) -> Option<&mut dyn Configure> {
        self.get_mut(appix).app().config()
    }

    /// Returns true when the app at `appix` offers configuration.
    pub fn is_configurable(&mut self, appix: usize) -> bool {
        self.config_mut(appix).is_some()
    }

    /// Iterates over the descriptors in index order.
    pub fn iter(&self) -> impl Iterator<Item = &AppDescriptor<'a>> {
        self.apps.iter()
    }

    /// Resolves a name to an index.
    ///
    /// An exact match wins (lowest index first). Otherwise the prefix must
    /// match exactly one registered name.
    pub fn find(&self, name: &str) -> Result<usize, LookupError> {
        if let Some(appix) = self
            .apps
            .iter()
            .position(|d| d.name.eq_ignore_ascii_case(name))
        {
            return Ok(appix);
        }

        let mut matches = self
            .apps
            .iter()
            .enumerate()
            .filter(|(_, d)| is_prefix(d.name, name))
            .map(|(appix, _)| appix);

        match (matches.next(), matches.next()) {
            (Some(appix), None) => Ok(appix),
            (Some(first), Some(second)) => Err(LookupError::Ambiguous { first, second }),
            (None, _) => Err(LookupError::NotFound),
        }
    }
}

impl<'a, const N: usize> Default for Registry<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}
