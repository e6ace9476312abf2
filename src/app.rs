//! The contract an app implements to be run by the manager.

use crate::types::AppResult;
use core::fmt::Write;

/// A cooperative app: a small state machine the manager starts, steps and stops.
///
/// None of the methods may block. Long running work is split across
/// [`step`](App::step) calls.
pub trait App {
    /// Resets the app's state machine to its starting state.
    ///
    /// Called once before the first [`step`](App::step). An error is latched by
    /// the manager and the app is not stepped afterwards.
    fn start(&mut self) -> AppResult;

    /// Advances the app's state machine. Called once per host loop iteration.
    fn step(&mut self) -> AppResult;

    /// Shuts the app down when another app is selected.
    ///
    /// Failures here cannot be reported; the next app starts regardless.
    fn stop(&mut self);

    /// Returns the configuration plugin, if the app offers one.
    fn config(&mut self) -> Option<&mut dyn Configure> {
        None
    }
}

/// Configuration plugin published through `apps config <name> ...`.
pub trait Configure {
    /// Help text shown for `apps config <name>`.
    fn help(&self) -> &str;

    /// Handles `apps config <name> <args...>`.
    ///
    /// `args` holds the tokens after the app name. Output goes to `out`.
    fn configure(&mut self, args: &[&str], out: &mut dyn Write);
}

/// The app doing nothing, always registered in slot 0.
///
/// Selecting it hands the chain over to the command interpreter.
#[derive(Debug, Default, Clone, Copy)]
pub struct VoidApp;

impl VoidApp {
    pub const NAME: &'static str = "voidapp";
    pub const LABEL: &'static str = "USB command";
    pub const HINT: &'static str = "--";
}

impl App for VoidApp {
    fn start(&mut self) -> AppResult {
        Ok(())
    }

    fn step(&mut self) -> AppResult {
        Ok(())
    }

    fn stop(&mut self) {}
}
