//! Core types shared by the registry and the manager.

use core::ops::BitOr;

/// Feature flags an app requests from the manager.
///
/// A closed set: registering with any bit outside [`AppFlags::ALL`] is a
/// contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppFlags(u8);

impl AppFlags {
    /// No extra features.
    pub const NONE: Self = AppFlags(0x00);

    /// Build the chain topology before the app's own start.
    pub const WITH_TOPOLOGY: Self = AppFlags(0x01);

    /// Periodically broadcast repair telegrams while the app runs.
    pub const WITH_REPAIR: Self = AppFlags(0x02);

    /// Switch to the next app once an error has been latched for a while.
    pub const ADVANCE_ON_ERROR: Self = AppFlags(0x04);

    /// Every known flag.
    pub const ALL: Self = AppFlags(0x07);

    /// Wraps raw bits without checking them.
    ///
    /// Unknown bits are rejected when the descriptor is registered.
    #[inline]
    pub const fn from_bits_retain(bits: u8) -> Self {
        AppFlags(bits)
    }

    /// Returns the raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true when every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true when all bits are known flags.
    #[inline]
    pub const fn is_known(self) -> bool {
        self.0 & !Self::ALL.0 == 0
    }

    /// Renders the flags as `tre`, upper case for every flag that is set.
    pub fn letters(self) -> &'static str {
        const LETTERS: [&str; 8] = ["tre", "Tre", "tRe", "TRe", "trE", "TrE", "tRE", "TRE"];
        LETTERS[(self.0 & Self::ALL.0) as usize]
    }
}

impl BitOr for AppFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        AppFlags(self.0 | rhs.0)
    }
}

/// Operational errors reported by apps and by the chain collaborators.
///
/// These never unwind. The manager latches them and freezes the faulted app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppError {
    /// A telegram could not be sent or received.
    Transport,

    /// A node did not answer in time.
    Timeout,

    /// The chain topology could not be determined.
    Topology,

    /// A node on the chain reported an error condition.
    Chain,

    /// App specific failure code.
    App(u16),
}

impl AppError {
    /// Short label that fits on the status display.
    pub fn short(&self) -> &'static str {
        match self {
            AppError::Transport => "transport",
            AppError::Timeout => "timeout",
            AppError::Topology => "topology",
            AppError::Chain => "chain error",
            AppError::App(_) => "app error",
        }
    }
}

impl core::fmt::Display for AppError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AppError::Transport => write!(f, "telegram transport failed"),
            AppError::Timeout => write!(f, "node did not answer in time"),
            AppError::Topology => write!(f, "chain topology could not be built"),
            AppError::Chain => write!(f, "node reported an error condition"),
            AppError::App(code) => write!(f, "app failed with code {}", code),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AppError {}

/// Outcome of an app's lifecycle call.
pub type AppResult = Result<(), AppError>;

/// Reasons a descriptor is refused at registration.
///
/// Registration failures are programming errors, so [`Registry::register`]
/// panics with this error's message.
///
/// [`Registry::register`]: crate::registry::Registry::register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationError {
    /// All slots are taken.
    CapacityExceeded { capacity: usize },

    /// The name is empty.
    EmptyName,

    /// The name contains a character that is not ASCII alphanumeric.
    InvalidNameChar { position: usize },

    /// Flags contain bits outside the known set.
    UnknownFlags { bits: u8 },

    /// A configuration plugin was supplied with empty help text.
    MissingConfigHelp,
}

impl core::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegistrationError::CapacityExceeded { capacity } => {
                write!(f, "all {} app slots are registered", capacity)
            }
            RegistrationError::EmptyName => write!(f, "app name must not be empty"),
            RegistrationError::InvalidNameChar { position } => {
                write!(
                    f,
                    "app name has a non-alphanumeric character at position {}",
                    position
                )
            }
            RegistrationError::UnknownFlags { bits } => {
                write!(f, "unknown app flags {:#04x}", bits)
            }
            RegistrationError::MissingConfigHelp => {
                write!(f, "configurable app must provide help text")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RegistrationError {}
