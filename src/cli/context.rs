use std::io;

use strsim::levenshtein;
use thiserror::Error;
use tracing::warn;

use crate::{
    cli::{commands, output, registry::CommandRegistry},
    config::{Config, ConfigManager},
    core::MonthManager,
    currency::CurrencyFormat,
    domain::MonthKey,
    errors::{CliError, LedgerError},
    storage::open_store,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Recoverable failure of a single command. The shell reports it and keeps
/// reading input.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

/// State shared by every command handler.
pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    pub last_command: Option<String>,
    pub(crate) manager: MonthManager,
    pub(crate) config: Config,
    pub(crate) config_manager: ConfigManager,
    pub(crate) format: CurrencyFormat,
    pub(crate) registry: CommandRegistry,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let store = open_store(&config).map_err(LedgerError::from)?;
        let format = CurrencyFormat::from_config(&config);

        let mut context = Self {
            mode,
            running: true,
            last_command: None,
            manager: MonthManager::new(store),
            config,
            config_manager,
            format,
            registry: commands::registry(),
        };
        context.open_initial_month();
        Ok(context)
    }

    fn open_initial_month(&mut self) {
        let month = self
            .config
            .last_opened_month
            .as_deref()
            .and_then(|raw| raw.parse::<MonthKey>().ok())
            .unwrap_or_else(MonthKey::current);
        if let Err(err) = self.manager.open(month) {
            warn!(%month, error = %err, "starting from defaults");
            output::warning(format!("Could not load {month}: {err}. Starting from defaults."));
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        let marker = if self.manager.is_dirty() { "*" } else { "" };
        format!("ledger [{}{}]> ", self.manager.month(), marker)
    }

    /// Remembers the open month so the next session starts there.
    pub(crate) fn remember_month(&mut self) -> Result<(), CommandError> {
        self.config.last_opened_month = Some(self.manager.month().to_string());
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
            }
            CommandError::Ledger(LedgerError::Store(store)) => {
                output::error(format!("Storage failed: {store}"));
                output::info("Your edits are kept in memory; run `save` again to retry.");
            }
            other => output::error(other),
        }
    }
}
