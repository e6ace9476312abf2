//! The `apps` text command.
//!
//! A command interpreter registers [`APPS_COMMAND`] with [`APPS_SHORT_HELP`]
//! and [`APPS_LONG_HELP`], tokenizes each input line and hands the tokens to
//! [`AppManager::handle_command`]. Sub-verbs and app names match by ASCII
//! case-insensitive prefix. A leading `@` on the command word suppresses
//! confirmations.

use crate::manager::AppManager;
use crate::registry::{LookupError, is_prefix};
use crate::repair::ChainRepair;
use crate::status::StatusIndicator;
use crate::time::{TimeInstant, TimeSource};
use crate::topology::TopologyScan;
use core::fmt::Write;

/// Name the command is registered under.
pub const APPS_COMMAND: &str = "apps";

/// One-line help for the interpreter's command list.
pub const APPS_SHORT_HELP: &str = "manage and configure active app";

/// Full help for `help apps`.
pub const APPS_LONG_HELP: &str = "SYNTAX: apps [list]\n\
- without argument, shows current app\n\
- with argument lists all registered apps\n\
SYNTAX: apps switch <app>\n\
- stops current app and starts <app>\n\
- <app> is either a name or an id (see list)\n\
- <app> 0 is the 'voidapp' (doing nothing): no interference with commands\n\
SYNTAX: apps config [...]\n\
- without arguments, shows which apps offer configuration\n\
- with app name shows help for configuration of that app\n\
- with app name and arguments configures that app (see its help)\n\
NOTES:\n\
- supports @-prefix to suppress output\n";

/// Target of `apps switch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRef<'c> {
    /// Registration index, signed so a negative index reports out of bounds.
    Index(i64),
    /// Name or name prefix.
    Name(&'c str),
}

/// What an `apps` invocation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppsAction<'c> {
    /// `apps`: show the current app.
    Show,
    /// `apps list`: show all apps.
    List,
    /// `apps switch <app>`.
    Switch(AppRef<'c>),
    /// `apps config`: list configurable apps.
    ConfigList,
    /// `apps config <app>`: show the app's configuration help.
    ConfigHelp(&'c str),
    /// `apps config <app> <args...>`: forward `args` to the app.
    Configure { app: &'c str, args: &'c [&'c str] },
}

/// A parsed `apps` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppsCommand<'c> {
    /// Set when the command word carries the `@` prefix.
    pub silent: bool,
    pub action: AppsAction<'c>,
}

/// User errors of the `apps` command. Reported, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError<'c> {
    /// No tokens at all.
    Empty,
    /// `apps list` with extra arguments.
    TooManyArgs,
    /// `apps switch` without exactly one app.
    MissingApp,
    /// Numeric app index past the registry.
    OutOfBounds(i64),
    /// No app name starts with the given prefix.
    NoSuchApp(&'c str),
    /// Several app names start with the given prefix.
    AmbiguousApp(&'c str),
    /// The app has no configuration plugin.
    NotConfigurable(&'c str),
    /// Unrecognized sub-verb.
    UnknownArguments,
    /// The output sink failed.
    Output,
}

impl core::fmt::Display for CommandError<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::TooManyArgs => write!(f, "too many args"),
            CommandError::MissingApp => write!(f, "<app> missing"),
            CommandError::OutOfBounds(appix) => write!(f, "{} out of bounds", appix),
            CommandError::NoSuchApp(name) => {
                write!(f, "no app with name starting with '{}'", name)
            }
            CommandError::AmbiguousApp(name) => {
                write!(f, "more than one app has a name starting with '{}'", name)
            }
            CommandError::NotConfigurable(name) => write!(f, "app '{}' is not configurable", name),
            CommandError::UnknownArguments => write!(f, "unknown arguments for 'apps'"),
            CommandError::Output => write!(f, "output failed"),
        }
    }
}

impl From<core::fmt::Error> for CommandError<'_> {
    fn from(_: core::fmt::Error) -> Self {
        CommandError::Output
    }
}

impl<'c> AppsCommand<'c> {
    /// Parses the tokens of one `apps` invocation, command word included.
    pub fn parse(argv: &'c [&'c str]) -> Result<Self, CommandError<'c>> {
        let Some(command) = argv.first() else {
            return Err(CommandError::Empty);
        };
        let silent = command.starts_with('@');

        let Some(verb) = argv.get(1) else {
            return Ok(Self {
                silent,
                action: AppsAction::Show,
            });
        };

        let action = if is_prefix("list", verb) {
            if argv.len() != 2 {
                return Err(CommandError::TooManyArgs);
            }
            AppsAction::List
        } else if is_prefix("switch", verb) {
            if argv.len() != 3 {
                return Err(CommandError::MissingApp);
            }
            match argv[2].parse::<i64>() {
                Ok(appix) => AppsAction::Switch(AppRef::Index(appix)),
                Err(_) => AppsAction::Switch(AppRef::Name(argv[2])),
            }
        } else if is_prefix("config", verb) {
            match argv.len() {
                2 => AppsAction::ConfigList,
                3 => AppsAction::ConfigHelp(argv[2]),
                _ => AppsAction::Configure {
                    app: argv[2],
                    args: &argv[3..],
                },
            }
        } else {
            return Err(CommandError::UnknownArguments);
        };

        Ok(Self { silent, action })
    }
}

impl<'a, I, T, S, C, const N: usize> AppManager<'a, I, T, S, C, N>
where
    I: TimeInstant,
    T: TimeSource<I>,
    S: StatusIndicator,
    C: TopologyScan + ChainRepair,
{
    /// Runs one `apps` invocation and prints its outcome to `out`.
    ///
    /// User errors are printed as `ERROR: ...` lines; they never change state.
    pub fn handle_command(&mut self, argv: &[&str], out: &mut dyn Write) -> core::fmt::Result {
        let outcome = AppsCommand::parse(argv).and_then(|command| self.execute(command, out));
        match outcome {
            Ok(()) => Ok(()),
            Err(CommandError::Output) => Err(core::fmt::Error),
            Err(err) => writeln!(out, "ERROR: {}", err),
        }
    }

    /// Executes a parsed `apps` invocation.
    ///
    /// `apps switch` starts the target directly when nothing is running.
    pub fn execute<'c>(
        &mut self,
        command: AppsCommand<'c>,
        out: &mut dyn Write,
    ) -> Result<(), CommandError<'c>> {
        match command.action {
            AppsAction::Show => self.list_one(self.current_index(), out)?,
            AppsAction::List => {
                if !command.silent {
                    writeln!(out, "# {:<10} {:<4} {:>5} {}", "name", "mode", "flags", "display name")?;
                }
                for appix in 0..self.count() {
                    self.list_one(appix, out)?;
                }
                if !command.silent {
                    writeln!(out)?;
                    writeln!(out, "flags: T=withtopo R=withrepair E=nextonerr")?;
                }
            }
            AppsAction::Switch(target) => {
                let appix = match target {
                    AppRef::Index(index) => match usize::try_from(index) {
                        Ok(appix) if appix < self.count() => appix,
                        _ => return Err(CommandError::OutOfBounds(index)),
                    },
                    AppRef::Name(name) => self.resolve(name)?,
                };
                if self.is_running() {
                    self.switch(appix);
                } else {
                    self.start(appix);
                }
                if !command.silent {
                    self.list_one(appix, out)?;
                }
            }
            AppsAction::ConfigList => {
                let mut listed = 0;
                for appix in 0..self.count() {
                    if !self.registry_mut().is_configurable(appix) {
                        continue;
                    }
                    if listed == 0 {
                        writeln!(out, "Configurable apps")?;
                    }
                    writeln!(out, "{} ({})", self.name(appix), self.display_label(appix))?;
                    listed += 1;
                }
                if listed == 0 {
                    writeln!(out, "No registered app is configurable")?;
                }
            }
            AppsAction::ConfigHelp(name) => {
                let appix = self.resolve(name)?;
                let config = self
                    .registry_mut()
                    .config_mut(appix)
                    .ok_or(CommandError::NotConfigurable(name))?;
                let help = config.help();
                out.write_str(help)?;
                if !help.ends_with('\n') {
                    writeln!(out)?;
                }
            }
            AppsAction::Configure { app, args } => {
                let appix = self.resolve(app)?;
                let config = self
                    .registry_mut()
                    .config_mut(appix)
                    .ok_or(CommandError::NotConfigurable(app))?;
                debug!("apps: configure '{}' with {} args", app, args.len());
                config.configure(args, out);
            }
        }
        Ok(())
    }

    fn resolve<'c>(&self, name: &'c str) -> Result<usize, CommandError<'c>> {
        self.registry().find(name).map_err(|err| match err {
            LookupError::NotFound => CommandError::NoSuchApp(name),
            LookupError::Ambiguous { .. } => CommandError::AmbiguousApp(name),
        })
    }

    fn list_one(&self, appix: usize, out: &mut dyn Write) -> core::fmt::Result {
        let mode = if appix != self.current_index() {
            "stop"
        } else if self.is_running() {
            "run"
        } else {
            "idle"
        };
        let descriptor = self.registry().get(appix);
        writeln!(
            out,
            "{} {:<10} {:<4} {:<5} {}",
            appix,
            descriptor.name(),
            mode,
            descriptor.app_flags().letters(),
            descriptor.label()
        )
    }
}
