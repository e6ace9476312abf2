#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`App`**: Trait an animation implements (start, step, stop, optional configuration)
//! - **`AppDescriptor`**: Name, display label, button hints and flags of a registered app
//! - **`AppFlags`**: Extra services the manager runs around an app (topology build, repair, advance on error)
//! - **`Registry`**: Fixed-capacity table of descriptors; slot 0 holds the void app
//! - **`AppManager`**: Starts, steps, stops and switches the single current app
//! - **`TopologyWrapper`**: Sub-state machine running the chain scan before an app's start
//! - **`StatusIndicator`**, **`TopologyScan`**, **`ChainRepair`**: Traits to implement for your board
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`AppsCommand`**: The `apps` text command (list, switch, config)
//!
//! Operational errors are returned as [`AppResult`] values and latched by the
//! manager. Contract violations (bad index, starting while running,
//! misregistration) panic.

#[macro_use]
mod fmt;

pub mod time;
pub mod types;
pub mod app;
pub mod registry;
pub mod status;
pub mod topology;
pub mod repair;
pub mod manager;
pub mod command;

pub use app::{App, Configure, VoidApp};
pub use command::{
    APPS_COMMAND, APPS_LONG_HELP, APPS_SHORT_HELP, AppRef, AppsAction, AppsCommand, CommandError,
};
pub use manager::{AppManager, ManagerConfig};
pub use registry::{AppDescriptor, DEFAULT_SLOTS, LookupError, Registry};
pub use repair::ChainRepair;
pub use status::StatusIndicator;
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use topology::{TopologyPhase, TopologyScan, TopologyWrapper};
pub use types::{AppError, AppFlags, AppResult, RegistrationError};
